//! Configuration for the dispatcher.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{BridgeError, Result};
use crate::gl;

/// Default upper bound written back by single-integer queries.
pub const DEFAULT_INTEGER_QUERY_CLAMP: i64 = 0x07FF_FFFF;

/// Capability codes the host always manages on its own.
pub const DEFAULT_SUPPRESSED_CAPABILITIES: [u32; 4] = [
    gl::PRIMITIVE_RESTART_FIXED_INDEX,
    gl::PROGRAM_POINT_SIZE,
    gl::TEXTURE_CUBE_MAP_SEAMLESS,
    gl::FRAMEBUFFER_SRGB,
];

/// Dispatcher behavior knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Values returned by `glGetIntegerv` are clamped to this maximum
    pub integer_query_clamp: i64,

    /// `glEnable`/`glDisable` codes that are silently dropped
    pub suppressed_capabilities: Vec<u32>,

    /// Fail the call on unknown or wrong-kind handles instead of passing
    /// "no object" to the host
    pub strict_handles: bool,

    /// Marshal the initial pixel pointer of `glTexImage2D`/`glTexImage3D`.
    /// Off by default: those calls only reserve storage and pixel contents
    /// arrive through the sub-image calls.
    pub upload_initial_pixels: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            integer_query_clamp: DEFAULT_INTEGER_QUERY_CLAMP,
            suppressed_capabilities: DEFAULT_SUPPRESSED_CAPABILITIES.to_vec(),
            strict_handles: false,
            upload_initial_pixels: false,
        }
    }
}

impl BridgeConfig {
    /// Config that rejects every handle misuse.
    pub fn strict() -> Self {
        Self {
            strict_handles: true,
            ..Default::default()
        }
    }

    /// Load a JSON config file; missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
            .map_err(|e| BridgeError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse a JSON config.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the dispatcher cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.integer_query_clamp < 0 || self.integer_query_clamp > i64::from(i32::MAX) {
            return Err(BridgeError::Config(format!(
                "integer_query_clamp {:#x} does not fit a GLint",
                self.integer_query_clamp
            )));
        }
        Ok(())
    }

    /// Whether `glEnable(cap)`/`glDisable(cap)` is dropped.
    pub fn is_suppressed(&self, cap: u32) -> bool {
        self.suppressed_capabilities.contains(&cap)
    }

    /// Builder: set the integer query clamp
    pub fn integer_query_clamp(mut self, clamp: i64) -> Self {
        self.integer_query_clamp = clamp;
        self
    }

    /// Builder: set strict handle checking
    pub fn strict_handles(mut self, strict: bool) -> Self {
        self.strict_handles = strict;
        self
    }

    /// Builder: marshal initial texture pixels
    pub fn upload_initial_pixels(mut self, upload: bool) -> Self {
        self.upload_initial_pixels = upload;
        self
    }

    /// Builder: add a suppressed capability
    pub fn suppress(mut self, cap: u32) -> Self {
        if !self.suppressed_capabilities.contains(&cap) {
            self.suppressed_capabilities.push(cap);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.integer_query_clamp, 0x07FF_FFFF);
        assert!(!config.strict_handles);
        assert!(!config.upload_initial_pixels);
        for cap in [0x8D69, 0x8642, 0x884F, 0x8DB9] {
            assert!(config.is_suppressed(cap));
        }
        assert!(!config.is_suppressed(gl::BLEND));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BridgeConfig::from_json(r#"{ "strict_handles": true }"#).unwrap();
        assert!(config.strict_handles);
        assert_eq!(config.suppressed_capabilities.len(), 4);
    }

    #[test]
    fn test_json_rejects_wide_clamp() {
        let err = BridgeConfig::from_json(r#"{ "integer_query_clamp": 4294967296 }"#);
        assert!(matches!(err, Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_builder_chain() {
        let config = BridgeConfig::default()
            .integer_query_clamp(255)
            .strict_handles(true)
            .upload_initial_pixels(true)
            .suppress(gl::DEPTH_TEST)
            .suppress(gl::DEPTH_TEST);

        assert_eq!(config.integer_query_clamp, 255);
        assert!(config.strict_handles);
        assert!(config.upload_initial_pixels);
        assert_eq!(config.suppressed_capabilities.len(), 5);
    }
}
