//! The engine context hosts build once and pass around.
//!
//! [`Engine`] bundles the three things every operation needs: configuration,
//! the schema documents are validated against, and the platform/kext
//! catalog. There is no global state; two engines with different catalogs can
//! coexist in one process.

use std::fmt;
use std::fs;
use std::path::Path;

use ocforge_core::schema::{validate, Schema, ValidationError};
use ocforge_core::{codec, PlistDocument};
use rand::Rng;
use tracing::debug;

use crate::audit::{audit, AuditReport};
use crate::config::{validate_engine_config, EngineConfig};
use crate::errors::{EngineError, EngineResult};
use crate::snapshot::{Reconciler, SnapshotMode, SnapshotReport};
use crate::synth::{
    BuiltinCatalog, Catalog, GenerationMode, HardwareProfile, SynthesizedConfig, Synthesizer,
};

pub struct Engine {
    config: EngineConfig,
    schema: Schema,
    catalog: Box<dyn Catalog + Send + Sync>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Engine with the default schema and built-in catalog.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        validate_engine_config(&config)?;
        Ok(Self {
            config,
            schema: Schema::opencore_default(),
            catalog: Box::new(BuiltinCatalog::default()),
        })
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_catalog<C>(mut self, catalog: C) -> Self
    where
        C: Catalog + Send + Sync + 'static,
    {
        self.catalog = Box::new(catalog);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub fn new_document(&self) -> PlistDocument {
        PlistDocument::from_config(&self.config.core)
    }

    pub fn load_document(&self, path: &Path) -> EngineResult<PlistDocument> {
        let bytes = fs::read(path).map_err(|e| EngineError::io(path, e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "loading document");
        Ok(PlistDocument::load_with(&bytes, &self.config.core)?)
    }

    pub fn validate(&self, doc: &PlistDocument) -> Vec<ValidationError> {
        validate(doc.root(), &self.schema)
    }

    pub fn snapshot(&self, oc_root: &Path, doc: &mut PlistDocument, mode: SnapshotMode) -> SnapshotReport {
        Reconciler::new(&self.config.snapshot, &self.config.core.limits).run(oc_root, doc, mode)
    }

    fn synthesizer(&self) -> Synthesizer<'_> {
        Synthesizer::new(self.catalog(), &self.config.synth)
            .with_history_capacity(self.config.core.history.capacity)
    }

    pub fn synthesize(
        &self,
        hw: &HardwareProfile,
        mode: GenerationMode,
        smbios_override: Option<&str>,
    ) -> SynthesizedConfig {
        self.synthesizer().run(hw, mode, smbios_override)
    }

    pub fn synthesize_with_rng<R: Rng + ?Sized>(
        &self,
        hw: &HardwareProfile,
        mode: GenerationMode,
        smbios_override: Option<&str>,
        rng: &mut R,
    ) -> SynthesizedConfig {
        self.synthesizer().run_with_rng(hw, mode, smbios_override, rng)
    }

    pub fn audit(&self, oc_root: &Path) -> AuditReport {
        audit(oc_root, &self.schema, &self.config)
    }
}

/// Read a schema file: JSON when the extension is `.json`, property list
/// otherwise.
pub fn load_schema(path: &Path) -> EngineResult<Schema> {
    let bytes = fs::read(path).map_err(|e| EngineError::io(path, e))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let schema = if is_json {
        let text = String::from_utf8(bytes)
            .map_err(|_| EngineError::config(format!("{} is not UTF-8", path.display())))?;
        Schema::from_json_str(&text)?
    } else {
        Schema::from_value(&codec::decode(&bytes)?)?
    };
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ocforge_core::OcError;

    #[test]
    fn new_document_uses_configured_capacity() {
        let mut cfg = EngineConfig::default();
        cfg.core.history.capacity = 3;
        let engine = Engine::new(cfg).unwrap();
        assert_eq!(engine.new_document().history_capacity(), 3);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.snapshot.acpi_dir = String::new();
        assert_matches!(Engine::new(cfg), Err(EngineError::Config(_)));
    }

    #[test]
    fn schema_files_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("s.json");
        fs::write(&json, r#"{"type":"object","required":["ACPI"]}"#).unwrap();
        let schema = load_schema(&json).unwrap();

        let engine = Engine::new(EngineConfig::default()).unwrap().with_schema(schema);
        let errors = engine.validate(&engine.new_document());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "root: 'ACPI' is a required property");

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"type":"tuple"}"#).unwrap();
        assert_matches!(load_schema(&bad), Err(EngineError::Core(OcError::Schema(_))));

        assert_matches!(load_schema(&dir.path().join("none.plist")), Err(EngineError::Io { .. }));
    }

    #[test]
    fn load_document_reports_format_errors() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.plist");
        fs::write(&p, b"<plist><dict><key>A</key></dict></plist>").unwrap();
        let engine = Engine::new(EngineConfig::default()).unwrap();
        assert_matches!(engine.load_document(&p), Err(EngineError::Core(OcError::Format(_))));
    }
}
