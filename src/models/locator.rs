//! Model artifact locators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where a model artifact lives.
///
/// Locators are the cache key for loaded models: two equal locators always
/// resolve to the same cached model instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelLocator {
    /// An `http(s)` URL the artifact is downloaded from.
    Url(String),
    /// A path on the local filesystem.
    Path(PathBuf),
}

impl ModelLocator {
    /// Parses a locator string. Anything starting with `http://` or
    /// `https://` is treated as a URL, everything else as a filesystem path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::Path(PathBuf::from(raw))
        }
    }

    /// True when the artifact must be fetched over the network.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

impl fmt::Display for ModelLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&str> for ModelLocator {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for ModelLocator {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}
