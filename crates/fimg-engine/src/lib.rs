//! fimg Engine
//!
//! Resolves responsive `<img>` and `<picture>` descriptions against a
//! transformation provider, and swaps low-quality placeholders for the
//! final image once it has preloaded.
//!
//! # Example
//! ```rust
//! use fimg_engine::{ImageConfig, ImageRequest, Resolver};
//!
//! let config = ImageConfig::default();
//! let image = Resolver::new(&config)
//!     .resolve_image(&ImageRequest::new("/image.png").with_size(200, 200).with_sizes("500:500,900:900"))
//!     .unwrap();
//!
//! assert_eq!(image.default_url(), "/_ipx/s_900x900/image.png");
//! assert_eq!(image.media_sizes(), Some("(max-width: 500px) 500px, 900px"));
//! ```

mod config;
mod image;
mod metadata;
mod picture;
pub mod placeholder;

pub use config::{ImageConfig, PlaceholderConfig, Preset};
pub use image::{ImageRequest, PlaceholderRequest, ResolvedImage, Resolver};
pub use metadata::{NoMetadata, SourceMetadata};
pub use picture::{FormatPlan, Picture, PictureRequest, PictureSource, select_formats};
pub use placeholder::{
    ImageSlot, PlaceholderSession, PreloadOutcome, PreloadTicket, Preloader, SessionId, SlotSignal, SlotState,
};

// Re-export sub-crates for advanced usage
pub use fimg_provider as provider;
pub use fimg_sizes as sizes;

pub use fimg_provider::{Fit, ImageFormat};
pub use fimg_sizes::{BreakpointTable, Dimensions, SrcsetEntry};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Image resolution error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error(transparent)]
    Sizes(#[from] fimg_sizes::SizesError),

    #[error(transparent)]
    Provider(#[from] fimg_provider::ProviderError),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Preload failed for {url}: {reason}")]
    PreloadFailed { url: String, reason: String },
}
