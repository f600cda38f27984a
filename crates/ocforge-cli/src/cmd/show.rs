use std::path::Path;

use anyhow::Result;
use ocforge_core::walk::{outline, stats, OutlineRow, TreeStats};
use ocforge_engine::Engine;
use serde::Serialize;

use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct ShowOut {
    pub stats: TreeStats,
    pub rows: Vec<OutlineRow>,
}

pub fn run(engine: &Engine, plist: &Path, depth: Option<usize>) -> Result<bool> {
    let doc = input::read_document(engine, plist)?;
    let out = ShowOut {
        stats: stats(doc.root()),
        rows: outline(doc.root(), depth),
    };

    if output::is_json() {
        output::print(&out)?;
        return Ok(true);
    }
    for row in &out.rows {
        let indent = "  ".repeat(row.depth.saturating_sub(1));
        output::line(&format!("{indent}{} ({}) {}", row.key, row.kind, row.display));
    }
    Ok(true)
}
