//! # Memory Budget Configuration
//!
//! Region and pool sizes for the resource system, loaded once at startup
//! from a `[memory]` TOML table. Every field has a default, so an empty
//! config is a valid config.

use serde::Deserialize;

use crate::error::{RenderError, RenderResult};

/// `n` kibibytes in bytes.
#[must_use]
pub const fn kilobytes(n: u64) -> u64 {
    n * 1024
}

/// `n` mebibytes in bytes.
#[must_use]
pub const fn megabytes(n: u64) -> u64 {
    kilobytes(n) * 1024
}

/// Memory budgets for the resource system.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    /// Size of the pre-committed device vertex buffer.
    pub vertex_region_bytes: u64,
    /// Size of the pre-committed device index buffer.
    pub index_region_bytes: u64,
    /// Host-side scratch arena used to stage asset bytes per load.
    pub scratch_arena_bytes: usize,
    /// Fixed capacity of the graphic component store.
    pub component_capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            vertex_region_bytes: megabytes(128),
            index_region_bytes: megabytes(64),
            scratch_arena_bytes: megabytes(16) as usize,
            component_capacity: 1024,
        }
    }
}

/// Top-level config file shape; only the `[memory]` table matters here.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    memory: MemoryConfig,
}

impl MemoryConfig {
    /// Parses the `[memory]` table out of a TOML document.
    ///
    /// Missing fields fall back to their defaults; unknown fields in the
    /// table are rejected so typos fail loudly at startup.
    pub fn from_toml_str(text: &str) -> RenderResult<Self> {
        let file: ConfigFile =
            toml::from_str(text).map_err(|e| RenderError::InvalidConfig(e.to_string()))?;
        Ok(file.memory)
    }
}
