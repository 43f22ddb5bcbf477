//! Input types accepted at the pipeline boundary.

/// A user-submitted image: raw encoded bytes plus the declared MIME type.
///
/// The declared MIME type gates pipeline entry (`image/*` only); the bytes
/// are consumed once by the preprocessor and not retained afterwards.
#[derive(Debug, Clone)]
pub struct ImageInput {
    bytes: Vec<u8>,
    mime_type: String,
    source_name: Option<String>,
}

impl ImageInput {
    /// Creates an input from encoded bytes and a declared MIME type.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            source_name: None,
        }
    }

    /// Attaches an original file name for logging.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// The encoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The MIME type declared by the caller.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The original file name, when one was attached.
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// True when the declared MIME type marks an image payload.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_mime_types_are_accepted() {
        assert!(ImageInput::new(vec![0u8], "image/jpeg").is_image());
        assert!(ImageInput::new(vec![0u8], "image/png").is_image());
        assert!(ImageInput::new(vec![0u8], "image/webp").is_image());
    }

    #[test]
    fn non_image_mime_types_are_rejected() {
        assert!(!ImageInput::new(vec![0u8], "text/plain").is_image());
        assert!(!ImageInput::new(vec![0u8], "application/pdf").is_image());
        assert!(!ImageInput::new(vec![0u8], "").is_image());
    }

    #[test]
    fn source_name_is_optional() {
        let input = ImageInput::new(vec![1, 2, 3], "image/png");
        assert_eq!(input.source_name(), None);

        let named = input.with_source_name("holiday.png");
        assert_eq!(named.source_name(), Some("holiday.png"));
        assert_eq!(named.bytes(), &[1, 2, 3]);
    }
}
