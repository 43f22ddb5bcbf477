//! Model acquisition for the detection pipeline.
//!
//! This module covers everything between a locator string and a loaded
//! [`DetectionModel`](crate::core::inference::DetectionModel): parsing
//! locators, fetching and building artifacts, and the cached provider that
//! guarantees each artifact is loaded at most once.

pub mod loader;
pub mod locator;
pub mod provider;

pub use loader::{ModelLoader, OnnxModelLoader};
pub use locator::ModelLocator;
pub use provider::{ModelCache, ModelProvider};
