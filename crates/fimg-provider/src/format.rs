//! Output formats

use crate::ProviderError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Image formats the provider can be asked for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Avif,
    Svg,
    /// Provider-specific format, passed through by name
    Other(FormatName),
}

/// Provider-specific format name.
///
/// Only `[a-z0-9+.-]` is accepted, so the name can never leak another
/// directive or a path separator into the `f_` directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatName(String);

impl FormatName {
    pub fn new(name: &str) -> Result<Self, ProviderError> {
        let valid = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'+' | b'.' | b'-'));
        if !valid {
            return Err(ProviderError::InvalidFormat(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ImageFormat {
    /// Get format from a name or file extension (case-insensitive)
    pub fn parse(name: &str) -> Result<Self, ProviderError> {
        Ok(match name.to_ascii_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            "webp" => Self::WebP,
            "avif" => Self::Avif,
            "svg" | "svgz" => Self::Svg,
            other => Self::Other(FormatName::new(other)?),
        })
    }

    /// Format for a file extension, `None` if it is not a usable name
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::parse(ext).ok()
    }

    /// Format implied by a source path's extension.
    ///
    /// Query strings and fragments are ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let file = path.rsplit('/').next().unwrap_or(path);
        let (stem, ext) = file.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Self::from_extension(ext)
    }

    /// Name used in the `f_` directive
    pub fn as_str(&self) -> &str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::WebP => "webp",
            Self::Avif => "avif",
            Self::Svg => "svg",
            Self::Other(name) => name.as_str(),
        }
    }

    pub fn mime_type(&self) -> String {
        match self {
            Self::Svg => "image/svg+xml".to_string(),
            other => format!("image/{}", other.as_str()),
        }
    }

    /// Resolution-independent formats are never transformed
    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Svg)
    }

    pub fn supports_transparency(&self) -> bool {
        matches!(self, Self::Png | Self::WebP | Self::Gif | Self::Avif)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ImageFormat {
    type Error = ProviderError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::parse(&name)
    }
}

impl TryFrom<&str> for ImageFormat {
    type Error = ProviderError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::parse(name)
    }
}

impl From<ImageFormat> for String {
    fn from(format: ImageFormat) -> Self {
        format.as_str().to_string()
    }
}
