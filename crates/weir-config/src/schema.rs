//! Configuration schema types for Weir.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

// =============================================================================
// Network Config
// =============================================================================

/// Proxy and content-blocking settings for the shared network session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Whether outgoing traffic should go through the configured proxy.
    pub use_proxy: bool,
    /// Proxy address, `[scheme://]host[:port]`. A missing scheme is
    /// normalized to `http://` when the rule is installed.
    pub proxy: String,
    /// Whether ad/tracker blocking is enforced on the session.
    pub block_ads: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            use_proxy: false,
            proxy: String::new(),
            block_ads: true,
        }
    }
}

// =============================================================================
// View Config
// =============================================================================

/// Appearance and identity of the embedded rendering surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Present a mobile user agent instead of the desktop one.
    pub is_mobile: bool,
    /// Background color applied at surface creation, hex `#rrggbb`.
    pub background: String,
    /// Mute page audio by default.
    pub muted: bool,
    /// Named persistent session partition shared by every surface.
    pub partition: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            is_mobile: false,
            background: "#ffffff".into(),
            muted: true,
            partition: "persist:webview".into(),
        }
    }
}

// =============================================================================
// Sniffing Config
// =============================================================================

/// Media source sniffing behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SniffingConfig {
    /// Hand detected sources to the browser-extension channel instead of
    /// persisting them locally.
    pub use_extension: bool,
}

impl Default for SniffingConfig {
    fn default() -> Self {
        Self {
            use_extension: false,
        }
    }
}

// =============================================================================
// Root Config
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeirConfig {
    pub version: u32,
    pub network: NetworkConfig,
    pub view: ViewConfig,
    pub sniffing: SniffingConfig,
}

impl Default for WeirConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_SCHEMA_VERSION,
            network: NetworkConfig::default(),
            view: ViewConfig::default(),
            sniffing: SniffingConfig::default(),
        }
    }
}
