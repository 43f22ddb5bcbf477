//! Constants shared across the detection pipeline.

/// Model input size as (height, width) in pixels.
pub const DEFAULT_TARGET_SIZE: (u32, u32) = (224, 224);

/// Score above which an image is labeled manipulated.
///
/// The comparison is strict: a score exactly at the threshold is not a
/// manipulation verdict. Tunable through the detector configuration.
pub const DEFAULT_MANIPULATION_THRESHOLD: f32 = 0.5;

/// Multiplier mapping `[0, 255]` channel bytes into `[0, 1]`.
pub const PIXEL_SCALE: f32 = 1.0 / 255.0;

/// Model artifact location used when none is configured.
pub const DEFAULT_MODEL_LOCATION: &str = "models/deepfake-detector.onnx";
