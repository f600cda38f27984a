//! Engine configuration.
//!
//! One serializable root ([`EngineConfig`]) that hosts embed, override from a
//! JSON file, and hand to [`crate::Engine`]. Every field has a default, so a
//! partial file only needs to name what it changes.
//!
//! Conventions:
//! - Directory names are relative to the OpenCore root being scanned.
//! - No I/O happens here except [`EngineConfig::from_path`], used by hosts.

use std::fs;
use std::path::Path;

use ocforge_core::config::{validate_config, CoreConfig};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

/// Engine configuration root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub core: CoreConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub synth: SynthConfig,
}

impl EngineConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> EngineResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        let cfg: EngineConfig = serde_json::from_str(&raw)?;
        validate_engine_config(&cfg)?;
        Ok(cfg)
    }
}

/// How `UEFI.Drivers` entries are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverStyle {
    /// Dictionary entries when the existing array already has any, else names.
    #[default]
    Auto,
    /// Plain file names.
    Name,
    /// `{Arguments, Comment, Enabled, LoadEarly, Path}` dictionaries.
    Dict,
}

/// Snapshot (directory reconciliation) configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "SnapshotConfig::default_acpi_dir")]
    pub acpi_dir: String,

    #[serde(default = "SnapshotConfig::default_kexts_dir")]
    pub kexts_dir: String,

    #[serde(default = "SnapshotConfig::default_drivers_dir")]
    pub drivers_dir: String,

    #[serde(default = "SnapshotConfig::default_tools_dir")]
    pub tools_dir: String,

    /// Location of the descriptor inside a kext bundle.
    #[serde(default = "SnapshotConfig::default_descriptor_path")]
    pub descriptor_path: String,

    /// Whether dot-files take part in discovery.
    #[serde(default)]
    pub include_hidden: bool,

    #[serde(default)]
    pub driver_style: DriverStyle,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            acpi_dir: Self::default_acpi_dir(),
            kexts_dir: Self::default_kexts_dir(),
            drivers_dir: Self::default_drivers_dir(),
            tools_dir: Self::default_tools_dir(),
            descriptor_path: Self::default_descriptor_path(),
            include_hidden: false,
            driver_style: DriverStyle::Auto,
        }
    }
}

impl SnapshotConfig {
    fn default_acpi_dir() -> String {
        "ACPI".to_string()
    }
    fn default_kexts_dir() -> String {
        "Kexts".to_string()
    }
    fn default_drivers_dir() -> String {
        "Drivers".to_string()
    }
    fn default_tools_dir() -> String {
        "Tools".to_string()
    }
    fn default_descriptor_path() -> String {
        "Contents/Info.plist".to_string()
    }
}

/// Config synthesis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Platform template used when nothing else matches.
    #[serde(default = "SynthConfig::default_smbios")]
    pub default_smbios: String,

    /// Serial prefix used when the chosen template has none.
    #[serde(default = "SynthConfig::default_serial_prefix")]
    pub default_serial_prefix: String,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            default_smbios: Self::default_smbios(),
            default_serial_prefix: Self::default_serial_prefix(),
        }
    }
}

impl SynthConfig {
    fn default_smbios() -> String {
        "iMacPro1,1".to_string()
    }
    fn default_serial_prefix() -> String {
        "C02".to_string()
    }
}

/// Validate a full configuration object.
pub fn validate_engine_config(cfg: &EngineConfig) -> EngineResult<()> {
    validate_config(&cfg.core)?;

    let dirs = [
        ("acpi_dir", &cfg.snapshot.acpi_dir),
        ("kexts_dir", &cfg.snapshot.kexts_dir),
        ("drivers_dir", &cfg.snapshot.drivers_dir),
        ("tools_dir", &cfg.snapshot.tools_dir),
        ("descriptor_path", &cfg.snapshot.descriptor_path),
    ];
    for (name, value) in dirs {
        if value.trim().is_empty() {
            return Err(EngineError::config(format!("snapshot.{name} must not be empty")));
        }
        if value.starts_with('/') || value.split(['/', '\\']).any(|seg| seg == "..") {
            return Err(EngineError::config(format!(
                "snapshot.{name} must be a relative path without '..': {value}"
            )));
        }
    }

    if cfg.synth.default_smbios.trim().is_empty() {
        return Err(EngineError::config("synth.default_smbios must not be empty"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = EngineConfig::default();
        validate_engine_config(&cfg).unwrap();
        assert_eq!(cfg.snapshot.descriptor_path, "Contents/Info.plist");
        assert_eq!(cfg.snapshot.driver_style, DriverStyle::Auto);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"snapshot":{"driver_style":"dict"},"core":{"history":{"capacity":3}}}"#)
                .unwrap();
        assert_eq!(cfg.snapshot.driver_style, DriverStyle::Dict);
        assert_eq!(cfg.snapshot.kexts_dir, "Kexts");
        assert_eq!(cfg.core.history.capacity, 3);
        assert_eq!(cfg.synth, SynthConfig::default());
    }

    #[test]
    fn traversal_in_dir_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.snapshot.kexts_dir = "../Kexts".to_string();
        assert!(validate_engine_config(&cfg).is_err());
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("ocforge.json");
        fs::write(&p, r#"{"synth":{"default_smbios":"iMac20,1"}}"#).unwrap();
        let cfg = EngineConfig::from_path(&p).unwrap();
        assert_eq!(cfg.synth.default_smbios, "iMac20,1");

        fs::write(&p, r#"{"core":{"history":{"capacity":0}}}"#).unwrap();
        assert!(EngineConfig::from_path(&p).is_err());
    }
}
