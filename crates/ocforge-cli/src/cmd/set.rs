use std::path::Path;

use anyhow::{bail, Result};
use ocforge_core::schema::ValidationError;
use ocforge_engine::Engine;
use serde::Serialize;
use tracing::warn;

use crate::args::ValueKindArg;
use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct SetOut<'a> {
    pub path: &'a str,
    pub written: String,
    /// Schema violations in the document as written. Not fatal.
    pub validation_errors: Vec<ValidationError>,
}

pub fn run(
    engine: &Engine,
    plist: &Path,
    path: &str,
    raw: &str,
    kind: ValueKindArg,
    out: Option<&Path>,
) -> Result<bool> {
    let mut doc = input::read_document(engine, plist)?;
    let value = input::parse_value(kind, raw)?;
    if !doc.set(path, value) {
        bail!("cannot set '{path}': the path runs into a non-container value or an out-of-range index");
    }

    let validation_errors = engine.validate(&doc);
    for e in &validation_errors {
        warn!(path = %e.path, validator = %e.validator, "document fails schema after set");
    }

    let target = out.unwrap_or(plist);
    input::write_document(&doc, target)?;

    if output::is_json() {
        output::print(&SetOut {
            path,
            written: target.display().to_string(),
            validation_errors,
        })?;
    } else {
        output::ok(&format!("{path} updated in {}", target.display()));
        for e in &validation_errors {
            output::warning(&e.to_string());
        }
    }
    Ok(true)
}
