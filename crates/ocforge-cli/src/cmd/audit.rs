use std::path::Path;

use anyhow::Result;
use ocforge_engine::Engine;

use crate::output;

pub fn run(engine: &Engine, oc_dir: &Path) -> Result<bool> {
    let report = engine.audit(oc_dir);

    if output::is_json() {
        output::print(&report)?;
        return Ok(report.valid);
    }
    for e in &report.errors {
        output::problem(e);
    }
    for w in &report.warnings {
        output::warning(w);
    }
    if report.valid {
        output::ok(&format!("{} looks usable", report.oc_root.display()));
    }
    Ok(report.valid)
}
