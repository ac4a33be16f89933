//! Media/Srcset Synthesizer
//!
//! Builds the `sizes` and `srcset` attribute values from resolved candidates.

use crate::Candidate;
use std::fmt;

/// One `srcset` entry (`"{url} {width}w"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrcsetEntry {
    /// Image URL
    pub url: String,
    /// Width descriptor
    pub width: u32,
}

impl SrcsetEntry {
    pub fn new(url: impl Into<String>, width: u32) -> Self {
        Self { url: url.into(), width }
    }
}

impl fmt::Display for SrcsetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}w", self.url, self.width)
    }
}

/// Render the `sizes` attribute.
///
/// Order matters: browsers take the first matching condition, so narrow
/// thresholds come first and the terminal size has no condition.
pub fn media_sizes(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| match c.threshold {
            Some(px) if !c.is_last => format!("(max-width: {}px) {}", px, c.css_size),
            _ => c.css_size.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build `srcset` entries in candidate order.
///
/// Candidates without a pixel width are skipped.
pub fn srcset_entries<F, E>(candidates: &[Candidate], mut url_for: F) -> Result<Vec<SrcsetEntry>, E>
where
    F: FnMut(&Candidate) -> Result<String, E>,
{
    candidates
        .iter()
        .filter_map(|c| c.width.map(|w| (c, w)))
        .map(|(c, w)| Ok(SrcsetEntry::new(url_for(c)?, w)))
        .collect()
}

pub fn join_srcset(entries: &[SrcsetEntry]) -> String {
    entries.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Candidate the default `src` is built from.
///
/// The terminal candidate, or the widest-threshold one that has a pixel
/// width when the terminal size is not estimable.
pub fn default_candidate(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.iter().rev().find(|c| c.width.is_some()).or(candidates.last())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(threshold: Option<u32>, width: Option<u32>, css: &str, is_last: bool) -> Candidate {
        Candidate {
            threshold,
            width,
            height: width,
            css_size: css.to_string(),
            is_last,
        }
    }

    #[test]
    fn test_media_sizes_terminal_unconditional() {
        let candidates = vec![
            candidate(Some(500), Some(500), "500px", false),
            candidate(None, Some(900), "900px", true),
        ];
        assert_eq!(media_sizes(&candidates), "(max-width: 500px) 500px, 900px");
    }

    #[test]
    fn test_srcset_skips_unsized() {
        let candidates = vec![
            candidate(Some(640), None, "20em", false),
            candidate(None, Some(400), "400px", true),
        ];
        let entries = srcset_entries(&candidates, |c| {
            Ok::<_, ()>(format!("/img-{}.png", c.width.unwrap_or(0)))
        })
        .unwrap();
        assert_eq!(join_srcset(&entries), "/img-400.png 400w");
    }

    #[test]
    fn test_default_candidate_prefers_terminal() {
        let candidates = vec![
            candidate(Some(640), Some(640), "100vw", false),
            candidate(None, Some(350), "350px", true),
        ];
        assert_eq!(default_candidate(&candidates).unwrap().width, Some(350));

        let unsized_terminal = vec![
            candidate(Some(640), Some(640), "100vw", false),
            candidate(None, None, "20em", true),
        ];
        assert_eq!(default_candidate(&unsized_terminal).unwrap().width, Some(640));
    }
}
