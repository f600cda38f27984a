//! Configuration structures for ocforge-core.
//!
//! This module defines explicit, serializable configuration objects used by
//! higher-level components (engine, CLI) to control document history and
//! decode limits.
//!
//! The core crate itself does not read environment variables or files. All
//! configuration must be provided explicitly by the caller.

use serde::{Deserialize, Serialize};

use crate::errors::{OcError, OcResult};

/// Default number of undoable steps kept by a document.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Global configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Undo/redo history configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of undoable steps. The oldest snapshot is evicted first.
    #[serde(default = "HistoryConfig::default_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
        }
    }
}

impl HistoryConfig {
    fn default_capacity() -> usize {
        DEFAULT_HISTORY_CAPACITY
    }
}

/// Default for [`LimitsConfig::max_pad`].
pub const DEFAULT_MAX_PAD: usize = 1024;

/// Decode and edit limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Largest property-list payload accepted by the decoder.
    #[serde(default = "LimitsConfig::default_max_document_bytes")]
    pub max_document_bytes: usize,

    /// Deepest container nesting accepted by the decoder.
    #[serde(default = "LimitsConfig::default_max_depth")]
    pub max_depth: usize,

    /// Most elements one path assignment may append to a sequence.
    #[serde(default = "LimitsConfig::default_max_pad")]
    pub max_pad: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: Self::default_max_document_bytes(),
            max_depth: Self::default_max_depth(),
            max_pad: Self::default_max_pad(),
        }
    }
}

impl LimitsConfig {
    fn default_max_document_bytes() -> usize {
        16 * 1024 * 1024 // 16 MiB
    }
    fn default_max_depth() -> usize {
        128
    }
    fn default_max_pad() -> usize {
        DEFAULT_MAX_PAD
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &CoreConfig) -> OcResult<()> {
    if cfg.history.capacity == 0 {
        return Err(OcError::invalid_argument(
            "history capacity must be greater than zero",
        ));
    }

    if cfg.limits.max_depth == 0 {
        return Err(OcError::invalid_argument(
            "max_depth must be greater than zero",
        ));
    }

    if cfg.limits.max_document_bytes == 0 {
        return Err(OcError::invalid_argument(
            "max_document_bytes must be greater than zero",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = CoreConfig::default();
        validate_config(&cfg).unwrap();
        assert_eq!(cfg.history.capacity, 50);
    }

    #[test]
    fn zero_capacity_detected() {
        let mut cfg = CoreConfig::default();
        cfg.history.capacity = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: CoreConfig = serde_json::from_str(r#"{"history":{"capacity":5}}"#).unwrap();
        assert_eq!(cfg.history.capacity, 5);
        assert_eq!(cfg.limits, LimitsConfig::default());
    }
}
