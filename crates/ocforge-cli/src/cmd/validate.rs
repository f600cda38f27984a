use std::path::Path;

use anyhow::{Context, Result};
use ocforge_core::schema::ValidationError;
use ocforge_engine::load_schema;
use ocforge_engine::Engine;
use serde::Serialize;

use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct ValidateOut {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

pub fn run(engine: &Engine, plist: &Path, schema: Option<&Path>) -> Result<bool> {
    let doc = input::read_document(engine, plist)?;
    let errors = match schema {
        Some(p) => {
            let schema = load_schema(p).with_context(|| format!("loading schema {}", p.display()))?;
            ocforge_core::schema::validate(doc.root(), &schema)
        }
        None => engine.validate(&doc),
    };

    let out = ValidateOut {
        valid: errors.is_empty(),
        errors,
    };
    if output::is_json() {
        output::print(&out)?;
    } else if out.valid {
        output::ok(&format!("{} is valid", plist.display()));
    } else {
        for e in &out.errors {
            output::problem(&e.to_string());
        }
        output::line(&format!("{} error(s)", out.errors.len()));
    }
    Ok(out.valid)
}
