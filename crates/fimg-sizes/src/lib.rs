//! fimg Sizes
//!
//! Breakpoint-aware image sizing.
//!
//! Turns a size descriptor such as `"sm:100vw md:50vw lg:400px"` into an
//! ordered list of candidates, then into the `sizes` media string and the
//! `srcset` width list.
//!
//! # Example
//! ```rust
//! use fimg_sizes::{BreakpointTable, Dimensions, parse_descriptor, resolve_candidates, media_sizes};
//!
//! let tokens = parse_descriptor("500:500,900:900").unwrap();
//! let resolution = resolve_candidates(&tokens, &BreakpointTable::default(), Dimensions::new(200, 200)).unwrap();
//! assert_eq!(media_sizes(&resolution.candidates), "(max-width: 500px) 500px, 900px");
//! ```

mod breakpoints;
mod candidates;
mod descriptor;
mod synth;

pub use breakpoints::{Breakpoint, BreakpointTable};
pub use candidates::{AspectRatio, Candidate, Dimensions, Resolution, SizeValue, resolve_candidates};
pub use descriptor::{SizeToken, parse_descriptor};
pub use synth::{SrcsetEntry, default_candidate, join_srcset, media_sizes, srcset_entries};

/// Sizing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SizesError {
    #[error("Malformed size descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("Unknown breakpoint: {0}")]
    UnknownBreakpoint(String),

    #[error("Invalid breakpoint table: {0}")]
    InvalidBreakpoints(String),
}
