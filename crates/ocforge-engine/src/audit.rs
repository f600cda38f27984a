//! Health check of an OpenCore directory.
//!
//! An audit loads `config.plist`, validates it against a schema and
//! cross-checks it against what is actually on disk. Problems that stop the
//! configuration from loading are errors; everything else is a warning.

use std::fs;
use std::path::{Path, PathBuf};

use ocforge_core::schema::{validate, Schema};
use ocforge_core::{codec, DocumentValue, CONFIG_FILE_NAME};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::entries::{bundle_key, driver_key, path_key};
use crate::kext::KextDescriptor;
use crate::snapshot::scan::{scan_dir, EntryKind};

const REQUIRED_DRIVER: &str = "OpenRuntime.efi";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditReport {
    pub valid: bool,
    pub oc_root: PathBuf,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl AuditReport {
    fn error(&mut self, msg: String) {
        warn!(error = %msg, "audit error");
        self.errors.push(msg);
    }

    fn warning(&mut self, msg: String) {
        debug!(warning = %msg, "audit warning");
        self.warnings.push(msg);
    }
}

/// `EFI/OC` below `path` when present, otherwise `path` itself.
pub fn resolve_oc_root(path: &Path) -> PathBuf {
    let nested = path.join("EFI").join("OC");
    if nested.is_dir() {
        nested
    } else {
        path.to_path_buf()
    }
}

pub fn audit(path: &Path, schema: &Schema, cfg: &EngineConfig) -> AuditReport {
    let root = resolve_oc_root(path);
    let mut report = AuditReport {
        oc_root: root.clone(),
        ..Default::default()
    };
    let snap = &cfg.snapshot;

    let document = load_config(&root, cfg, &mut report);
    if let Some(doc) = &document {
        for e in validate(doc, schema) {
            report.error(e.to_string());
        }
    }

    let acpi_dir = root.join(&snap.acpi_dir);
    let kexts_dir = root.join(&snap.kexts_dir);
    let drivers_dir = root.join(&snap.drivers_dir);
    let tools_dir = root.join(&snap.tools_dir);

    let tables = scan_dir(&acpi_dir, "*.aml", EntryKind::File, snap.include_hidden);
    let kexts = scan_dir(&kexts_dir, "*.kext", EntryKind::Dir, snap.include_hidden);
    let drivers = scan_dir(&drivers_dir, "*.efi", EntryKind::File, snap.include_hidden);
    let tools = scan_dir(&tools_dir, "*.efi", EntryKind::File, snap.include_hidden);

    if kexts.is_empty() {
        report.warning(format!("no kexts found in {}", snap.kexts_dir));
    }
    for k in &kexts {
        if let Err(e) = KextDescriptor::read(&kexts_dir.join(k), &snap.descriptor_path, &cfg.core.limits) {
            report.warning(format!("invalid kext {k}: {e}"));
        }
    }
    if drivers_dir.is_dir() && !drivers.iter().any(|d| d == REQUIRED_DRIVER) {
        report.warning(format!("required driver not found: {REQUIRED_DRIVER}"));
    }
    if tables.is_empty() {
        report.warning(format!("no ACPI tables found in {}", snap.acpi_dir));
    }

    if let Some(doc) = &document {
        check_references(doc, "ACPI.Add", path_key, &tables, &snap.acpi_dir, &mut report);
        check_references(doc, "Kernel.Add", bundle_key, &kexts, &snap.kexts_dir, &mut report);
        check_references(doc, "UEFI.Drivers", driver_key, &drivers, &snap.drivers_dir, &mut report);
        check_references(doc, "Misc.Tools", path_key, &tools, &snap.tools_dir, &mut report);
    }

    report.valid = report.errors.is_empty();
    info!(
        root = %root.display(),
        valid = report.valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "audit finished"
    );
    report
}

fn load_config(root: &Path, cfg: &EngineConfig, report: &mut AuditReport) -> Option<DocumentValue> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        report.error(format!("{CONFIG_FILE_NAME} not found in {}", root.display()));
        return None;
    }
    let bytes = match fs::read(&path) {
        Ok(b) => b,
        Err(e) => {
            report.error(format!("cannot read {CONFIG_FILE_NAME}: {e}"));
            return None;
        }
    };
    match codec::decode_with(&bytes, &cfg.core.limits) {
        Ok(v) => Some(v),
        Err(e) => {
            report.error(format!("cannot decode {CONFIG_FILE_NAME}: {e}"));
            None
        }
    }
}

/// Warn about entries of `array` whose file is absent, and about entries
/// listed more than once.
fn check_references(
    doc: &DocumentValue,
    array: &str,
    key_of: fn(&DocumentValue) -> Option<&str>,
    on_disk: &[String],
    dir: &str,
    report: &mut AuditReport,
) {
    let segments: Vec<&str> = array.split('.').collect();
    let Some(items) = ocforge_core::path::lookup(doc, &segments).and_then(|v| v.as_sequence()) else {
        return;
    };

    let mut seen: Vec<&str> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let Some(key) = key_of(item) else {
            continue;
        };
        if !on_disk.iter().any(|f| f == key) {
            report.warning(format!("{array}.{i}: {key} not found in {dir}"));
        }
        if seen.contains(&key) {
            report.warning(format!("{array}.{i}: duplicate entry {key}"));
        } else {
            seen.push(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocforge_core::{Dict, PlistDocument};

    #[test]
    fn missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let report = audit(dir.path(), &Schema::opencore_default(), &EngineConfig::default());
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("config.plist not found"));
        assert!(report.warnings.iter().any(|w| w.starts_with("no kexts found")));
        assert!(report.warnings.iter().any(|w| w.starts_with("no ACPI tables found")));
    }

    #[test]
    fn nested_efi_layout_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let oc = dir.path().join("EFI").join("OC");
        fs::create_dir_all(&oc).unwrap();
        assert_eq!(resolve_oc_root(dir.path()), oc);
        assert_eq!(resolve_oc_root(&oc), oc);
    }

    #[test]
    fn schema_errors_and_dangling_references() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Drivers")).unwrap();
        fs::write(root.join("Drivers/HfsPlus.efi"), b"").unwrap();

        let mut doc = PlistDocument::new();
        let table = DocumentValue::Mapping(Dict::new().with("Path", "SSDT-GONE.aml"));
        assert!(doc.set("ACPI.Add", DocumentValue::Sequence(vec![table])));
        assert!(doc.set(
            "UEFI.Drivers",
            DocumentValue::Sequence(vec!["HfsPlus.efi".into(), "HfsPlus.efi".into()])
        ));
        fs::write(root.join(CONFIG_FILE_NAME), doc.to_bytes()).unwrap();

        let report = audit(root, &Schema::opencore_default(), &EngineConfig::default());
        assert!(!report.valid);
        assert!(report
            .errors
            .iter()
            .any(|e| e == "root: 'Kernel' is a required property"));
        assert!(report
            .warnings
            .contains(&"ACPI.Add.0: SSDT-GONE.aml not found in ACPI".to_string()));
        assert!(report
            .warnings
            .contains(&"UEFI.Drivers.1: duplicate entry HfsPlus.efi".to_string()));
        assert!(report
            .warnings
            .contains(&"required driver not found: OpenRuntime.efi".to_string()));
    }
}
