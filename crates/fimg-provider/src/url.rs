//! Transform URL Builder

use crate::{Directives, ProviderError};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped inside a path segment.
///
/// Matches URI path encoding plus `%`, so decoding the output always
/// gives back the source path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Builds `/{prefix}/{directives}/{source}` request paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformUrlBuilder {
    prefix: String,
}

impl TransformUrlBuilder {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build the provider path for a source.
    ///
    /// Pure: equal inputs always produce the same string.
    pub fn build(&self, source: &str, directives: &Directives) -> Result<String, ProviderError> {
        let encoded = encode_source_path(source)?;
        // The segment separator stands in for one leading `/`; any further ones are kept
        let encoded = encoded.strip_prefix('/').unwrap_or(encoded.as_str());

        let mut url = String::with_capacity(self.prefix.len() + encoded.len() + 32);
        if !self.prefix.is_empty() {
            url.push('/');
            url.push_str(&self.prefix);
        }
        url.push('/');
        url.push_str(&directives.segment());
        url.push('/');
        url.push_str(encoded);

        tracing::trace!("Provider path for {}: {}", source, url);
        Ok(url)
    }
}

impl Default for TransformUrlBuilder {
    fn default() -> Self {
        Self::new("_ipx")
    }
}

/// Percent-encode every segment of a source path, keeping `/`
pub fn encode_source_path(source: &str) -> Result<String, ProviderError> {
    if source.trim().is_empty() {
        return Err(ProviderError::EncodingFailure("empty source path".into()));
    }

    Ok(source
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Absolute `http://`/`https://` or protocol-relative `//host/...` source
pub fn is_remote_source(source: &str) -> bool {
    if source.starts_with("//") {
        return true;
    }
    let lower = source.get(..8).unwrap_or(source).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    #[test]
    fn test_build_basic() {
        let builder = TransformUrlBuilder::default();
        let d = Directives::new().with_size(Some(900), Some(900));
        assert_eq!(builder.build("/image.png", &d).unwrap(), "/_ipx/s_900x900/image.png");
        assert_eq!(builder.build("image.png", &d).unwrap(), "/_ipx/s_900x900/image.png");
    }

    #[test]
    fn test_build_encodes_non_ascii() {
        let builder = TransformUrlBuilder::default();
        let d = Directives::new().with_size(Some(500), Some(500));
        assert_eq!(
            builder.build("/汉字.png", &d).unwrap(),
            "/_ipx/s_500x500/%E6%B1%89%E5%AD%97.png"
        );
    }

    #[test]
    fn test_encode_round_trip() {
        let source = "/photos/été 2024/100%/日本語.jpg";
        let encoded = encode_source_path(source).unwrap();
        assert!(encoded.is_ascii());
        assert_eq!(encoded.matches('/').count(), source.matches('/').count());
        assert_eq!(percent_decode_str(&encoded).decode_utf8().unwrap(), source);
    }

    #[test]
    fn test_round_trip_keeps_extra_slashes() {
        let builder = TransformUrlBuilder::default();
        let url = builder.build("//image.png", &Directives::new()).unwrap();
        let path = url.strip_prefix("/_ipx/_/").unwrap();
        assert_eq!(format!("/{}", percent_decode_str(path).decode_utf8().unwrap()), "//image.png");
    }

    #[test]
    fn test_prefix_normalized() {
        let builder = TransformUrlBuilder::new("/cdn/img/");
        let url = builder.build("/a.png", &Directives::new()).unwrap();
        assert_eq!(url, "/cdn/img/_/a.png");
    }

    #[test]
    fn test_empty_source() {
        assert!(matches!(
            encode_source_path(""),
            Err(ProviderError::EncodingFailure(_))
        ));
    }

    #[test]
    fn test_remote_detection() {
        assert!(is_remote_source("https://images.unsplash.com/a.jpg"));
        assert!(is_remote_source("HTTP://example.com/a.jpg"));
        assert!(is_remote_source("//cdn.example.com/a.jpg"));
        assert!(!is_remote_source("/image.png"));
    }
}
