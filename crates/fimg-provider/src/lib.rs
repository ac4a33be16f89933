//! fimg Provider
//!
//! Request paths for a remote image transformation service.
//!
//! The provider reads an ordered, `&`-joined directive segment placed
//! between a fixed prefix and the percent-encoded source path:
//! `/_ipx/s_900x900&f_webp/image.png`.

mod directive;
mod format;
mod url;

pub use directive::{Directives, Fit, SizeDirective};
pub use format::{FormatName, ImageFormat};
pub use url::{TransformUrlBuilder, encode_source_path, is_remote_source};

/// Provider error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Cannot encode source path: {0}")]
    EncodingFailure(String),

    #[error("Invalid format name: {0:?}")]
    InvalidFormat(String),
}
