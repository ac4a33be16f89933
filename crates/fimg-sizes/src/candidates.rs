//! Candidate Resolver
//!
//! Maps descriptor tokens onto breakpoint thresholds and pixel widths.

use crate::{BreakpointTable, SizeToken, SizesError};
use serde::{Deserialize, Serialize};

/// Caller-declared (or intrinsic) image dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }

    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        AspectRatio::new(self.width?, self.height?)
    }
}

/// Exact width:height ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

impl AspectRatio {
    /// `None` when either side is zero
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// Height matching `width`, rounded half up
    pub fn height_for(&self, width: u32) -> u32 {
        let num = width as u128 * self.height as u128 * 2 + self.width as u128;
        let den = self.width as u128 * 2;
        u32::try_from(num / den).unwrap_or(u32::MAX)
    }
}

/// Interpreted size value
#[derive(Debug, Clone, PartialEq)]
pub enum SizeValue {
    /// `300` or `300px`
    Pixels { px: u32, bare: bool },
    /// `50vw`
    ViewportWidth(f64),
    /// Any other CSS length, kept verbatim
    Other,
}

impl SizeValue {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(n) = raw.strip_suffix("px").and_then(parse_magnitude) {
            return SizeValue::Pixels { px: round_px(n), bare: false };
        }
        if let Some(n) = raw.strip_suffix("vw").and_then(parse_magnitude) {
            return SizeValue::ViewportWidth(n);
        }
        match parse_magnitude(raw) {
            Some(n) => SizeValue::Pixels { px: round_px(n), bare: true },
            None => SizeValue::Other,
        }
    }

    /// Estimated width at a given viewport threshold
    pub fn width_at(&self, threshold: u32) -> Option<u32> {
        match self {
            SizeValue::Pixels { px, .. } => Some(*px),
            SizeValue::ViewportWidth(pct) => Some(round_px(threshold as f64 * pct / 100.0)),
            SizeValue::Other => None,
        }
    }
}

fn parse_magnitude(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite() && *n >= 0.0)
}

fn round_px(n: f64) -> u32 {
    n.round().min(u32::MAX as f64) as u32
}

/// One resolved candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Media threshold, `None` for the terminal candidate
    pub threshold: Option<u32>,
    /// `None` when the size can't be estimated in pixels
    pub width: Option<u32>,
    /// `None` without a known aspect ratio
    pub height: Option<u32>,
    /// Size as written into the `sizes` attribute
    pub css_size: String,
    pub is_last: bool,
}

impl Candidate {
    /// Single non-responsive candidate from declared dimensions
    pub fn fallback(declared: Dimensions) -> Self {
        Self {
            threshold: None,
            width: declared.width,
            height: declared.height,
            css_size: declared.width.map(|w| format!("{}px", w)).unwrap_or_default(),
            is_last: true,
        }
    }
}

/// Resolver output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Ascending by threshold, terminal candidate last. Never empty.
    pub candidates: Vec<Candidate>,
    /// `false` when no keyed token resolved and the fallback is in use
    pub responsive: bool,
}

/// Resolve parsed tokens against a breakpoint table.
///
/// Bare tokens are skipped. Identical widths are kept as separate
/// candidates. With no keyed tokens the result holds one fallback
/// candidate built from `declared`.
pub fn resolve_candidates(
    tokens: &[SizeToken],
    table: &BreakpointTable,
    declared: Dimensions,
) -> Result<Resolution, SizesError> {
    let ratio = declared.aspect_ratio();

    let mut resolved = Vec::with_capacity(tokens.len());
    for token in tokens {
        let Some(key) = token.key.as_deref() else {
            continue;
        };
        let threshold = table.threshold_for(key)?;
        let value = SizeValue::parse(&token.value);
        let width = value.width_at(threshold);
        let css_size = match value {
            SizeValue::Pixels { bare: true, .. } => format!("{}px", token.value),
            _ => token.value.clone(),
        };

        resolved.push(Candidate {
            threshold: Some(threshold),
            width,
            height: width.zip(ratio).map(|(w, r)| r.height_for(w)),
            css_size,
            is_last: false,
        });
    }

    if resolved.is_empty() {
        tracing::debug!("No keyed sizes, falling back to declared {:?}", declared);
        return Ok(Resolution {
            candidates: vec![Candidate::fallback(declared)],
            responsive: false,
        });
    }

    // Stable: equal thresholds keep declaration order
    resolved.sort_by_key(|c| c.threshold);
    if let Some(last) = resolved.last_mut() {
        last.threshold = None;
        last.is_last = true;
    }

    Ok(Resolution {
        candidates: resolved,
        responsive: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_descriptor;

    fn resolve(descriptor: &str, declared: Dimensions) -> Resolution {
        let tokens = parse_descriptor(descriptor).unwrap();
        resolve_candidates(&tokens, &BreakpointTable::default(), declared).unwrap()
    }

    #[test]
    fn test_size_value_parse() {
        assert_eq!(SizeValue::parse("300"), SizeValue::Pixels { px: 300, bare: true });
        assert_eq!(SizeValue::parse("300px"), SizeValue::Pixels { px: 300, bare: false });
        assert_eq!(SizeValue::parse("50vw"), SizeValue::ViewportWidth(50.0));
        assert_eq!(SizeValue::parse("20em"), SizeValue::Other);
        assert_eq!(SizeValue::parse("-5px"), SizeValue::Other);
    }

    #[test]
    fn test_vw_width_rounds() {
        assert_eq!(SizeValue::ViewportWidth(33.3).width_at(640), Some(213));
        assert_eq!(SizeValue::ViewportWidth(100.0).width_at(320), Some(320));
    }

    #[test]
    fn test_height_for_rounding() {
        let ratio = AspectRatio::new(3, 2).unwrap();
        assert_eq!(ratio.height_for(300), 200);
        assert_eq!(ratio.height_for(301), 201); // 200.67
        assert_eq!(ratio.height_for(100), 67); // 66.67
        assert!(AspectRatio::new(0, 10).is_none());
    }

    #[test]
    fn test_height_for_large_inputs() {
        let square = AspectRatio::new(u32::MAX, u32::MAX).unwrap();
        assert_eq!(square.height_for(u32::MAX), u32::MAX);

        let tall = AspectRatio::new(1, u32::MAX).unwrap();
        assert_eq!(tall.height_for(u32::MAX), u32::MAX);

        let ratio = AspectRatio::new(3_500_000_000, 3_500_000_000).unwrap();
        assert_eq!(ratio.height_for(3_500_000_000), 3_500_000_000);
    }

    #[test]
    fn test_numeric_keys() {
        let res = resolve("200,500:500,900:900", Dimensions::new(200, 200));
        assert!(res.responsive);
        assert_eq!(res.candidates.len(), 2);
        assert_eq!(res.candidates[0].threshold, Some(500));
        assert_eq!(res.candidates[0].css_size, "500px");
        assert_eq!(res.candidates[1].threshold, None);
        assert!(res.candidates[1].is_last);
        assert_eq!(res.candidates[1].height, Some(900));
    }

    #[test]
    fn test_sorted_by_threshold() {
        let res = resolve("lg:400px sm:100vw", Dimensions::new(100, 50));
        let widths: Vec<_> = res.candidates.iter().map(|c| c.width).collect();
        assert_eq!(widths, vec![Some(640), Some(400)]);
        assert_eq!(res.candidates[0].height, Some(320));
    }

    #[test]
    fn test_bare_tokens_fall_back() {
        let res = resolve("200 300", Dimensions::new(200, 100));
        assert!(!res.responsive);
        assert_eq!(res.candidates, vec![Candidate::fallback(Dimensions::new(200, 100))]);
    }

    #[test]
    fn test_unknown_breakpoint() {
        let tokens = parse_descriptor("tablet:400px").unwrap();
        let err = resolve_candidates(&tokens, &BreakpointTable::default(), Dimensions::default());
        assert_eq!(err, Err(SizesError::UnknownBreakpoint("tablet".into())));
    }

    #[test]
    fn test_non_numeric_keeps_css() {
        let res = resolve("sm:20em lg:400px", Dimensions::new(400, 400));
        assert_eq!(res.candidates[0].width, None);
        assert_eq!(res.candidates[0].height, None);
        assert_eq!(res.candidates[0].css_size, "20em");
    }

    #[test]
    fn test_no_ratio_no_height() {
        let declared = Dimensions { width: Some(400), height: None };
        let res = resolve("sm:100vw", declared);
        assert_eq!(res.candidates[0].width, Some(640));
        assert_eq!(res.candidates[0].height, None);
    }
}
