//! Edge case tests for fimg-provider
//!
//! Directive ordering, URL determinism and source encoding.

use fimg_provider::*;

// ============================================================================
// DETERMINISM
// ============================================================================

#[test]
fn test_build_is_deterministic() {
    let builder = TransformUrlBuilder::default();
    let make = || {
        Directives::new()
            .with_size(Some(640), Some(480))
            .with_format(Some(ImageFormat::Avif))
            .with_quality(Some(70))
    };

    let a = builder.build("/gallery/photo.jpg", &make()).unwrap();
    let b = builder.build("/gallery/photo.jpg", &make()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, "/_ipx/s_640x480&f_avif&q_70/gallery/photo.jpg");
}

#[test]
fn test_builder_order_independent() {
    let builder = TransformUrlBuilder::default();
    let one = Directives::new().with_quality(Some(50)).with_size(Some(10), Some(10));
    let two = Directives::new().with_size(Some(10), Some(10)).with_quality(Some(50));
    assert_eq!(one, two);
    assert_eq!(
        builder.build("/image.png", &one).unwrap(),
        builder.build("/image.png", &two).unwrap()
    );
}

#[test]
fn test_distinct_directives_distinct_urls() {
    let builder = TransformUrlBuilder::default();
    let base = Directives::new().with_size(Some(300), Some(200));
    let variants = [
        base.clone(),
        base.clone().with_size(Some(300), Some(201)),
        base.clone().with_size(Some(300), None),
        base.clone().with_format(Some(ImageFormat::WebP)),
        base.clone().with_format(Some(ImageFormat::Png)),
        base.clone().with_quality(Some(80)),
        base.clone().with_quality(Some(81)),
        base.clone().with_fit(Some(Fit::Cover)),
        base.clone().with_fit(Some(Fit::Contain)),
    ];

    let urls: std::collections::HashSet<String> = variants
        .iter()
        .map(|d| builder.build("/image.png", d).unwrap())
        .collect();
    assert_eq!(urls.len(), variants.len());
}

// ============================================================================
// ENCODING
// ============================================================================

#[test]
fn test_encoding_keeps_separators() {
    let url = TransformUrlBuilder::default()
        .build("/a b/c#d/e?.png", &Directives::new())
        .unwrap();
    assert_eq!(url, "/_ipx/_/a%20b/c%23d/e%3F.png");
}

#[test]
fn test_leading_slashes_stay_distinct() {
    let builder = TransformUrlBuilder::default();
    let urls: Vec<String> = ["image.png", "/image.png", "//image.png"]
        .iter()
        .map(|src| builder.build(src, &Directives::new()).unwrap())
        .collect();

    assert_eq!(urls[0], "/_ipx/_/image.png");
    assert_eq!(urls[1], "/_ipx/_/image.png");
    assert_eq!(urls[2], "/_ipx/_//image.png");
}

#[test]
fn test_protocol_relative_is_remote() {
    assert!(is_remote_source("//evil.example.com/a.png"));
    assert!(!is_remote_source("/a.png"));
    assert!(!is_remote_source("a.png"));
}

#[test]
fn test_remote_source_path() {
    let url = TransformUrlBuilder::default()
        .build("https://images.unsplash.com/photo 1.jpg", &Directives::new().with_size(Some(100), None))
        .unwrap();
    assert_eq!(url, "/_ipx/w_100/https://images.unsplash.com/photo%201.jpg");
}

#[test]
fn test_custom_prefix_empty() {
    let url = TransformUrlBuilder::new("")
        .build("/image.png", &Directives::new().with_format(Some(ImageFormat::WebP)))
        .unwrap();
    assert_eq!(url, "/f_webp/image.png");
}

// ============================================================================
// FORMATS
// ============================================================================

#[test]
fn test_format_serde_names() {
    let formats: Vec<ImageFormat> = serde_json::from_str(r#"["jpg", "WEBP", "tiff"]"#).unwrap();
    assert_eq!(formats[0], ImageFormat::Jpeg);
    assert_eq!(formats[1], ImageFormat::WebP);
    assert_eq!(formats[2].as_str(), "tiff");
    assert_eq!(serde_json::to_string(&formats).unwrap(), r#"["jpeg","webp","tiff"]"#);

    assert!(serde_json::from_str::<ImageFormat>(r#""webp&q_80""#).is_err());
    assert!(serde_json::from_str::<ImageFormat>(r#""we/bp""#).is_err());
}

#[test]
fn test_format_name_cannot_forge_directives() {
    assert_eq!(
        ImageFormat::try_from("webp&q_80"),
        Err(ProviderError::InvalidFormat("webp&q_80".into()))
    );

    let builder = TransformUrlBuilder::default();
    let custom = ImageFormat::try_from("jxl").unwrap();
    let a = builder.build("/a.png", &Directives::new().with_format(Some(custom))).unwrap();
    let b = builder
        .build("/a.png", &Directives::new().with_format(Some(ImageFormat::WebP)).with_quality(Some(80)))
        .unwrap();
    assert_eq!(a, "/_ipx/f_jxl/a.png");
    assert_eq!(b, "/_ipx/f_webp&q_80/a.png");
}

#[test]
fn test_transparency() {
    assert!(ImageFormat::Png.supports_transparency());
    assert!(!ImageFormat::Jpeg.supports_transparency());
}
