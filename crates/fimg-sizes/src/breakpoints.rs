//! Breakpoint Table
//!
//! Named viewport-width thresholds, kept sorted by threshold.

use crate::SizesError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A named viewport threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoint {
    pub key: String,
    /// Max viewport width in CSS pixels
    pub threshold: u32,
}

/// Immutable breakpoint table.
///
/// Thresholds are strictly increasing. The table deserializes from a plain
/// `{ key: threshold }` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct BreakpointTable {
    entries: Vec<Breakpoint>,
}

impl BreakpointTable {
    /// Build a table from `(key, threshold)` pairs in any order
    pub fn new<I, K>(entries: I) -> Result<Self, SizesError>
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
    {
        let mut entries: Vec<Breakpoint> = entries
            .into_iter()
            .map(|(key, threshold)| Breakpoint { key: key.into(), threshold })
            .collect();

        let mut seen = HashSet::new();
        for bp in &entries {
            if bp.key.is_empty() {
                return Err(SizesError::InvalidBreakpoints("empty key".into()));
            }
            if !seen.insert(bp.key.as_str()) {
                return Err(SizesError::InvalidBreakpoints(format!("duplicate key '{}'", bp.key)));
            }
        }

        entries.sort_by_key(|bp| bp.threshold);
        if let Some(pair) = entries.windows(2).find(|w| w[0].threshold == w[1].threshold) {
            return Err(SizesError::InvalidBreakpoints(format!(
                "'{}' and '{}' share threshold {}px",
                pair[0].key, pair[1].key, pair[0].threshold
            )));
        }

        Ok(Self { entries })
    }

    /// Threshold for a configured key
    pub fn get(&self, key: &str) -> Option<u32> {
        self.entries.iter().find(|bp| bp.key == key).map(|bp| bp.threshold)
    }

    /// Resolve a descriptor key to a threshold.
    ///
    /// Configured keys win; an integer literal key is its own threshold.
    pub fn threshold_for(&self, key: &str) -> Result<u32, SizesError> {
        self.get(key)
            .or_else(|| key.parse::<u32>().ok())
            .ok_or_else(|| SizesError::UnknownBreakpoint(key.to_string()))
    }

    /// Breakpoints in ascending threshold order
    pub fn iter(&self) -> impl Iterator<Item = &Breakpoint> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Widest configured breakpoint
    pub fn largest(&self) -> Option<&Breakpoint> {
        self.entries.last()
    }
}

impl Default for BreakpointTable {
    fn default() -> Self {
        let entries = [
            ("xs", 320),
            ("sm", 640),
            ("md", 768),
            ("lg", 1024),
            ("xl", 1280),
            ("2xl", 1536),
        ];
        Self {
            entries: entries
                .into_iter()
                .map(|(key, threshold)| Breakpoint { key: key.to_string(), threshold })
                .collect(),
        }
    }
}

impl TryFrom<BTreeMap<String, u32>> for BreakpointTable {
    type Error = SizesError;

    fn try_from(map: BTreeMap<String, u32>) -> Result<Self, Self::Error> {
        Self::new(map)
    }
}

impl From<BreakpointTable> for BTreeMap<String, u32> {
    fn from(table: BreakpointTable) -> Self {
        table.entries.into_iter().map(|bp| (bp.key, bp.threshold)).collect()
    }
}
