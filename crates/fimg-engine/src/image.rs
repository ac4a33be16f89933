//! `<img>` resolution
//!
//! descriptor → candidates → `sizes`/`srcset` + provider URLs.

use crate::metadata::{NoMetadata, SourceMetadata};
use crate::{ImageConfig, ImageError};
use fimg_provider::{Directives, Fit, ImageFormat, TransformUrlBuilder, is_remote_source};
use fimg_sizes::{
    Candidate, Dimensions, SrcsetEntry, default_candidate, join_srcset, media_sizes, parse_descriptor,
    resolve_candidates, srcset_entries,
};

/// Placeholder overrides; unset fields use [`crate::PlaceholderConfig`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaceholderRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u8>,
}

/// Caller inputs for one image slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageRequest {
    pub src: String,
    /// Declared width
    pub width: Option<u32>,
    /// Declared height
    pub height: Option<u32>,
    /// Size descriptor (`"sm:100vw md:50vw"`)
    pub sizes: Option<String>,
    /// Output format override
    pub format: Option<ImageFormat>,
    pub quality: Option<u8>,
    pub fit: Option<Fit>,
    pub preset: Option<String>,
    /// `Some` enables placeholder mode
    pub placeholder: Option<PlaceholderRequest>,
}

impl ImageRequest {
    pub fn new(src: &str) -> Self {
        Self {
            src: src.to_string(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_sizes(mut self, sizes: &str) -> Self {
        self.sizes = Some(sizes.to_string());
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_fit(mut self, fit: Fit) -> Self {
        self.fit = Some(fit);
        self
    }

    pub fn with_preset(mut self, preset: &str) -> Self {
        self.preset = Some(preset.to_string());
        self
    }

    /// Enable placeholder mode with configured defaults
    pub fn with_placeholder(mut self) -> Self {
        self.placeholder = Some(PlaceholderRequest::default());
        self
    }

    pub fn with_placeholder_options(mut self, placeholder: PlaceholderRequest) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn declared(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }
}

/// Final attribute values for one image.
///
/// Built fresh on every resolution and never patched afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    default_url: String,
    candidates: Vec<SrcsetEntry>,
    media_sizes: Option<String>,
}

impl ResolvedImage {
    /// Untransformed source (vector or disallowed remote)
    pub(crate) fn passthrough(src: &str) -> Self {
        Self {
            default_url: src.to_string(),
            candidates: Vec::new(),
            media_sizes: None,
        }
    }

    /// Plain `src`
    pub fn default_url(&self) -> &str {
        &self.default_url
    }

    /// `srcset` entries in media order
    pub fn candidates(&self) -> &[SrcsetEntry] {
        &self.candidates
    }

    /// `sizes` attribute, `None` when not responsive
    pub fn media_sizes(&self) -> Option<&str> {
        self.media_sizes.as_deref()
    }

    pub fn srcset(&self) -> String {
        join_srcset(&self.candidates)
    }

    pub fn is_responsive(&self) -> bool {
        self.media_sizes.is_some()
    }

    /// Attributes for `<img>`, in render order.
    ///
    /// `sizes` and `srcset` are only written for responsive images.
    pub fn attributes(&self, declared: Dimensions) -> Vec<(&'static str, String)> {
        let mut attrs = vec![("src", self.default_url.clone())];
        if let Some(w) = declared.width {
            attrs.push(("width", w.to_string()));
        }
        if let Some(h) = declared.height {
            attrs.push(("height", h.to_string()));
        }
        if let Some(sizes) = &self.media_sizes {
            attrs.push(("sizes", sizes.clone()));
            attrs.push(("srcset", self.srcset()));
        }
        attrs
    }
}

/// Resolves requests against one configuration
pub struct Resolver<'a> {
    config: &'a ImageConfig,
    metadata: &'a dyn SourceMetadata,
    urls: TransformUrlBuilder,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a ImageConfig) -> Self {
        Self::with_metadata(config, &NoMetadata)
    }

    pub fn with_metadata(config: &'a ImageConfig, metadata: &'a dyn SourceMetadata) -> Self {
        Self {
            config,
            metadata,
            urls: TransformUrlBuilder::new(&config.provider_prefix),
        }
    }

    pub fn config(&self) -> &ImageConfig {
        self.config
    }

    /// Resolve the full-resolution `<img>` attributes
    pub fn resolve_image(&self, request: &ImageRequest) -> Result<ResolvedImage, ImageError> {
        let request = self.apply_preset(request)?;
        let format = request.format.clone();
        self.resolve_as(&request, format)
    }

    /// Resolve the low-quality placeholder shown before preload completes
    pub fn resolve_placeholder(&self, request: &ImageRequest) -> Result<ResolvedImage, ImageError> {
        let request = self.apply_preset(request)?;
        if let Some(reason) = self.passthrough_reason(&request.src) {
            tracing::debug!("Placeholder passthrough for {} ({})", request.src, reason);
            return Ok(ResolvedImage::passthrough(&request.src));
        }

        let defaults = self.config.placeholder;
        let overrides = request.placeholder.unwrap_or_default();
        let directives = Directives::new()
            .with_size(
                Some(overrides.width.unwrap_or(defaults.width)),
                Some(overrides.height.unwrap_or(defaults.height)),
            )
            .with_format(request.format.clone())
            .with_quality(Some(overrides.quality.unwrap_or(defaults.quality)));

        Ok(ResolvedImage {
            default_url: self.urls.build(&request.src, &directives)?,
            candidates: Vec::new(),
            media_sizes: None,
        })
    }

    /// Resolve with an explicit output format
    pub(crate) fn resolve_as(
        &self,
        request: &ImageRequest,
        format: Option<ImageFormat>,
    ) -> Result<ResolvedImage, ImageError> {
        if let Some(reason) = self.passthrough_reason(&request.src) {
            tracing::debug!("Passthrough for {} ({})", request.src, reason);
            return Ok(ResolvedImage::passthrough(&request.src));
        }

        let declared = self.declared(request);
        let tokens = parse_descriptor(request.sizes.as_deref().unwrap_or(""))?;
        let resolution = resolve_candidates(&tokens, &self.config.screens, declared)?;

        let url_for = |c: &Candidate| {
            let directives = Directives::new()
                .with_size(c.width, c.height)
                .with_format(format.clone())
                .with_quality(request.quality)
                .with_fit(request.fit);
            self.urls.build(&request.src, &directives)
        };

        let default_url = match default_candidate(&resolution.candidates) {
            Some(c) => url_for(c)?,
            None => url_for(&Candidate::fallback(declared))?,
        };

        if !resolution.responsive {
            let candidates = declared
                .width
                .map(|w| SrcsetEntry::new(default_url.clone(), w))
                .into_iter()
                .collect();
            return Ok(ResolvedImage {
                default_url,
                candidates,
                media_sizes: None,
            });
        }

        Ok(ResolvedImage {
            candidates: srcset_entries(&resolution.candidates, |c| url_for(c))?,
            media_sizes: Some(media_sizes(&resolution.candidates)),
            default_url,
        })
    }

    /// Declared dimensions, or intrinsic ones when nothing was declared
    pub fn declared(&self, request: &ImageRequest) -> Dimensions {
        let declared = request.declared();
        if declared.is_empty() {
            if let Some(intrinsic) = self.metadata.dimensions(&request.src) {
                return intrinsic;
            }
        }
        declared
    }

    pub(crate) fn passthrough_reason(&self, src: &str) -> Option<&'static str> {
        if ImageFormat::from_path(src).is_some_and(|f| f.is_vector()) {
            return Some("vector source");
        }
        if is_remote_source(src) {
            match remote_url(src) {
                Some(url) if self.config.allows_url(&url) => {}
                _ => return Some("remote host not allowed"),
            }
        }
        None
    }

    pub(crate) fn apply_preset(&self, request: &ImageRequest) -> Result<ImageRequest, ImageError> {
        let mut request = request.clone();
        let Some(name) = request.preset.as_deref() else {
            return Ok(request);
        };
        let preset = self
            .config
            .preset(name)
            .ok_or_else(|| ImageError::UnknownPreset(name.to_string()))?;

        request.width = request.width.or(preset.width);
        request.height = request.height.or(preset.height);
        request.quality = request.quality.or(preset.quality);
        request.format = request.format.or_else(|| preset.format.clone());
        request.fit = request.fit.or(preset.fit);
        Ok(request)
    }
}

/// Parse a remote source; protocol-relative ones resolve as `https:`
fn remote_url(src: &str) -> Option<url::Url> {
    match src.strip_prefix("//") {
        Some(rest) => url::Url::parse(&format!("https://{}", rest)).ok(),
        None => url::Url::parse(src).ok(),
    }
}
