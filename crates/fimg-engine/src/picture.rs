//! `<picture>` resolution
//!
//! Decides which formats get their own `<source>` and which one backs the
//! fallback `<img>`.

use crate::image::{ImageRequest, ResolvedImage, Resolver};
use crate::ImageError;
use fimg_provider::ImageFormat;

/// Picture request: one image plus the `<source>` formats to offer.
///
/// `image.format` overrides the fallback `<img>` format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PictureRequest {
    pub image: ImageRequest,
    /// `None` uses [`crate::ImageConfig::formats`]
    pub formats: Option<Vec<ImageFormat>>,
}

impl PictureRequest {
    pub fn new(image: ImageRequest) -> Self {
        Self { image, formats: None }
    }

    pub fn with_formats<I>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = ImageFormat>,
    {
        self.formats = Some(formats.into_iter().collect());
        self
    }
}

/// Outcome of format selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatPlan {
    /// Emit the source unchanged, no `<source>` groups
    Passthrough,
    Transform {
        /// One `<source>` group per format, in request order
        sources: Vec<ImageFormat>,
        /// Format of the fallback `<img>`
        fallback: ImageFormat,
    },
}

/// Choose source formats for a path.
///
/// Vector sources always pass through. Otherwise the override, when
/// given, replaces the fallback format; without one the fallback is `png`
/// for sources that may carry transparency and `jpeg` for the rest.
pub fn select_formats(
    src: &str,
    requested: &[ImageFormat],
    override_format: Option<&ImageFormat>,
) -> FormatPlan {
    let original = ImageFormat::from_path(src);
    if original.as_ref().is_some_and(ImageFormat::is_vector) {
        return FormatPlan::Passthrough;
    }

    let fallback = match (override_format, original) {
        (Some(format), _) => format.clone(),
        (None, Some(original)) if original.supports_transparency() => ImageFormat::Png,
        (None, _) => ImageFormat::Jpeg,
    };

    FormatPlan::Transform {
        sources: requested.to_vec(),
        fallback,
    }
}

/// One `<source>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureSource {
    format: ImageFormat,
    image: ResolvedImage,
}

impl PictureSource {
    pub fn format(&self) -> &ImageFormat {
        &self.format
    }

    pub fn image(&self) -> &ResolvedImage {
        &self.image
    }

    /// `type` attribute
    pub fn mime_type(&self) -> String {
        self.format.mime_type()
    }

    pub fn sizes(&self) -> Option<&str> {
        self.image.media_sizes()
    }

    /// Width list when responsive, the single URL otherwise
    pub fn srcset(&self) -> String {
        if self.image.is_responsive() {
            self.image.srcset()
        } else {
            self.image.default_url().to_string()
        }
    }

    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![("type", self.mime_type())];
        if let Some(sizes) = self.sizes() {
            attrs.push(("sizes", sizes.to_string()));
        }
        attrs.push(("srcset", self.srcset()));
        attrs
    }
}

/// Resolved `<picture>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    sources: Vec<PictureSource>,
    img: ResolvedImage,
}

impl Picture {
    pub fn sources(&self) -> &[PictureSource] {
        &self.sources
    }

    /// Fallback `<img>`
    pub fn img(&self) -> &ResolvedImage {
        &self.img
    }
}

impl Resolver<'_> {
    /// Resolve one `<source>` group per requested format plus the fallback `<img>`
    pub fn resolve_picture(&self, request: &PictureRequest) -> Result<Picture, ImageError> {
        let image = self.apply_preset(&request.image)?;
        let requested = request.formats.as_deref().unwrap_or(self.config().formats.as_slice());

        let plan = match self.passthrough_reason(&image.src) {
            Some(reason) => {
                tracing::debug!("Picture passthrough for {} ({})", image.src, reason);
                FormatPlan::Passthrough
            }
            None => select_formats(&image.src, requested, image.format.as_ref()),
        };

        match plan {
            FormatPlan::Passthrough => Ok(Picture {
                sources: Vec::new(),
                img: ResolvedImage::passthrough(&image.src),
            }),
            FormatPlan::Transform { sources, fallback } => {
                let sources = sources
                    .into_iter()
                    .map(|format| {
                        let resolved = self.resolve_as(&image, Some(format.clone()))?;
                        Ok(PictureSource { format, image: resolved })
                    })
                    .collect::<Result<Vec<_>, ImageError>>()?;

                Ok(Picture {
                    sources,
                    img: self.resolve_as(&image, Some(fallback))?,
                })
            }
        }
    }
}
