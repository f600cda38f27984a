use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use ocforge_core::{codec, DocumentValue, PlistDocument};
use ocforge_engine::{Engine, EngineConfig, HardwareProfile};

use crate::args::ValueKindArg;

pub fn engine(config: Option<&Path>) -> Result<Engine> {
    let cfg = match config {
        Some(p) => EngineConfig::from_path(p)
            .with_context(|| format!("loading configuration {}", p.display()))?,
        None => EngineConfig::default(),
    };
    Ok(Engine::new(cfg)?)
}

pub fn read_document(engine: &Engine, path: &Path) -> Result<PlistDocument> {
    engine
        .load_document(path)
        .with_context(|| format!("reading {}", path.display()))
}

pub fn write_document(doc: &PlistDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, doc.to_bytes()).with_context(|| format!("writing {}", path.display()))
}

pub fn read_hardware(path: &Path) -> Result<HardwareProfile> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    HardwareProfile::from_json_str(&raw).with_context(|| format!("parsing hardware profile {}", path.display()))
}

pub fn parse_value(kind: ValueKindArg, raw: &str) -> Result<DocumentValue> {
    let v = match kind {
        ValueKindArg::String => DocumentValue::String(raw.to_string()),
        ValueKindArg::Integer => {
            DocumentValue::Integer(codec::parse_integer(raw.trim()).ok_or_else(|| anyhow!("not an integer: {raw}"))?)
        }
        ValueKindArg::Real => DocumentValue::Real(
            raw.trim()
                .parse::<f64>()
                .with_context(|| format!("not a real number: {raw}"))?,
        ),
        ValueKindArg::Bool => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => DocumentValue::Boolean(true),
            "false" | "no" | "0" => DocumentValue::Boolean(false),
            _ => bail!("not a boolean: {raw}"),
        },
    };
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_kinds() {
        assert_eq!(parse_value(ValueKindArg::Integer, "0x10").unwrap(), DocumentValue::Integer(16));
        assert_eq!(parse_value(ValueKindArg::Integer, "-3").unwrap(), DocumentValue::Integer(-3));
        assert_eq!(
            parse_value(ValueKindArg::Integer, "-9223372036854775808").unwrap(),
            DocumentValue::Integer(i64::MIN)
        );
        assert_eq!(parse_value(ValueKindArg::Integer, "-0x1F").unwrap(), DocumentValue::Integer(-31));
        assert_eq!(parse_value(ValueKindArg::Bool, "Yes").unwrap(), DocumentValue::Boolean(true));
        assert_eq!(parse_value(ValueKindArg::Real, "1.5").unwrap(), DocumentValue::Real(1.5));
        assert!(parse_value(ValueKindArg::Integer, "five").is_err());
        assert!(parse_value(ValueKindArg::Bool, "maybe").is_err());
    }
}
