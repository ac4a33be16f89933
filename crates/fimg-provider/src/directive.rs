//! Transformation Directives
//!
//! `size → format → quality → crop`, always in that order, so one request
//! maps to exactly one provider path.

use crate::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Crop/resize behaviour (`c_` directive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    Cover,
    Contain,
    Fill,
    Inside,
    Outside,
}

impl Fit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fit::Cover => "cover",
            Fit::Contain => "contain",
            Fit::Fill => "fill",
            Fit::Inside => "inside",
            Fit::Outside => "outside",
        }
    }
}

/// Target size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeDirective {
    /// `s_{w}x{h}`
    Exact { width: u32, height: u32 },
    /// `w_{w}`
    Width(u32),
    /// `h_{h}`
    Height(u32),
}

impl SizeDirective {
    pub fn from_parts(width: Option<u32>, height: Option<u32>) -> Option<Self> {
        match (width, height) {
            (Some(width), Some(height)) => Some(Self::Exact { width, height }),
            (Some(width), None) => Some(Self::Width(width)),
            (None, Some(height)) => Some(Self::Height(height)),
            (None, None) => None,
        }
    }
}

impl fmt::Display for SizeDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact { width, height } => write!(f, "s_{}x{}", width, height),
            Self::Width(w) => write!(f, "w_{}", w),
            Self::Height(h) => write!(f, "h_{}", h),
        }
    }
}

/// Directive set for one provider request
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Directives {
    size: Option<SizeDirective>,
    format: Option<ImageFormat>,
    quality: Option<u8>,
    fit: Option<Fit>,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.size = SizeDirective::from_parts(width, height);
        self
    }

    pub fn with_format(mut self, format: Option<ImageFormat>) -> Self {
        self.format = format;
        self
    }

    /// Quality is clamped to 0-100
    pub fn with_quality(mut self, quality: Option<u8>) -> Self {
        self.quality = quality.map(|q| q.min(100));
        self
    }

    pub fn with_fit(mut self, fit: Option<Fit>) -> Self {
        self.fit = fit;
        self
    }

    pub fn size(&self) -> Option<SizeDirective> {
        self.size
    }

    pub fn format(&self) -> Option<&ImageFormat> {
        self.format.as_ref()
    }

    pub fn quality(&self) -> Option<u8> {
        self.quality
    }

    pub fn fit(&self) -> Option<Fit> {
        self.fit
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.format.is_none() && self.quality.is_none() && self.fit.is_none()
    }

    /// Path segment, `_` when empty
    pub fn segment(&self) -> String {
        let mut parts = Vec::with_capacity(4);
        if let Some(size) = self.size {
            parts.push(size.to_string());
        }
        if let Some(format) = &self.format {
            parts.push(format!("f_{}", format));
        }
        if let Some(q) = self.quality {
            parts.push(format!("q_{}", q));
        }
        if let Some(fit) = self.fit {
            parts.push(format!("c_{}", fit.as_str()));
        }

        if parts.is_empty() {
            "_".to_string()
        } else {
            parts.join("&")
        }
    }
}

impl fmt::Display for Directives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segment())
    }
}
