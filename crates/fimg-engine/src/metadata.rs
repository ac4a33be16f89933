//! Source metadata lookup
//!
//! Intrinsic dimensions for sources the caller did not size.

use fimg_sizes::Dimensions;
use std::collections::HashMap;

/// Intrinsic size provider
pub trait SourceMetadata {
    fn dimensions(&self, src: &str) -> Option<Dimensions>;
}

/// No intrinsic sizes known
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl SourceMetadata for NoMetadata {
    fn dimensions(&self, _src: &str) -> Option<Dimensions> {
        None
    }
}

impl SourceMetadata for HashMap<String, Dimensions> {
    fn dimensions(&self, src: &str) -> Option<Dimensions> {
        self.get(src).copied()
    }
}
