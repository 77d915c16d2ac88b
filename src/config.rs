//! Configuration for request metadata handlers.

use request_metadata_core::{ContextError, Result};

/// Environment variable toggling scope creation.
pub const ENV_ENABLED: &str = "REQUEST_METADATA_ENABLED";

/// Environment variable selecting strict argument-shape checking.
pub const ENV_STRICT_SHAPES: &str = "REQUEST_METADATA_STRICT_SHAPES";

/// Configuration for [`crate::handlers::setup`].
#[derive(Debug, Clone)]
pub struct RequestMetadataConfig {
    /// When false, wrapped handlers run directly and no metadata is bound.
    pub enabled: bool,

    /// When true, unrecognized handler arguments fail preparation instead
    /// of binding empty metadata.
    pub strict_shapes: bool,
}

impl Default for RequestMetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strict_shapes: false,
        }
    }
}

impl RequestMetadataConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_strict_shapes(mut self, strict: bool) -> Self {
        self.strict_shapes = strict;
        self
    }

    /// Load from `REQUEST_METADATA_ENABLED` and
    /// `REQUEST_METADATA_STRICT_SHAPES`; unset variables keep defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_ENABLED) {
            config.enabled = parse_flag(ENV_ENABLED, &raw)?;
        }
        if let Some(raw) = lookup(ENV_STRICT_SHAPES) {
            config.strict_shapes = parse_flag(ENV_STRICT_SHAPES, &raw)?;
        }
        Ok(config)
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ContextError::Config(format!(
            "{key} must be a boolean flag, got {other:?}"
        ))),
    }
}
