use std::path::Path;

use anyhow::{bail, Result};
use ocforge_core::json::to_json;
use ocforge_core::DocumentValue;
use ocforge_engine::Engine;

use crate::io::input;
use crate::output;

pub fn run(engine: &Engine, plist: &Path, path: &str) -> Result<bool> {
    let doc = input::read_document(engine, plist)?;
    let Some(value) = doc.lookup(path) else {
        bail!("no value at '{path}'");
    };

    if output::is_json() || value.is_container() {
        output::print(&to_json(value))?;
    } else {
        match value {
            DocumentValue::String(s) => output::line(s),
            other => output::line(&other.summary()),
        }
    }
    Ok(true)
}
