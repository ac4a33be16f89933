//! Engine configuration
//!
//! One immutable value passed into every resolution; nothing is global.

use fimg_provider::{Fit, ImageFormat};
use fimg_sizes::BreakpointTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// Image engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Provider path prefix (`/_ipx/...`)
    pub provider_prefix: String,
    /// Breakpoint table used for size descriptors
    pub screens: BreakpointTable,
    /// Remote hosts whose images may be transformed
    pub domains: Vec<String>,
    /// Named directive bundles
    pub presets: HashMap<String, Preset>,
    /// `<picture>` source formats when a request names none
    pub formats: Vec<ImageFormat>,
    pub placeholder: PlaceholderConfig,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            provider_prefix: "_ipx".to_string(),
            screens: BreakpointTable::default(),
            domains: Vec::new(),
            presets: HashMap::new(),
            formats: vec![ImageFormat::WebP],
            placeholder: PlaceholderConfig::default(),
        }
    }
}

impl ImageConfig {
    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    /// Whether a remote source's host is on the allow-list.
    ///
    /// Entries may be bare hosts (`example.com`, `example.com:8443`) or full
    /// origins (`https://example.com:8443`). Host and explicit port must match.
    pub fn allows_url(&self, source: &Url) -> bool {
        let Some(host) = host_key(source) else {
            return false;
        };
        self.domains.iter().any(|entry| {
            let parsed = if entry.contains("://") {
                Url::parse(entry)
            } else {
                Url::parse(&format!("https://{}", entry))
            };
            parsed.ok().as_ref().and_then(host_key).is_some_and(|allowed| allowed == host)
        })
    }
}

/// `host[:port]`, with the scheme's default port omitted
fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Placeholder directives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            quality: 50,
        }
    }
}

/// Named modifiers a request can opt into
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u8>,
    pub format: Option<ImageFormat>,
    pub fit: Option<Fit>,
}
