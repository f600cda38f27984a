use std::path::Path;

use anyhow::Result;
use ocforge_core::CONFIG_FILE_NAME;
use ocforge_engine::audit::resolve_oc_root;
use ocforge_engine::snapshot::Category;
use ocforge_engine::{Engine, SnapshotMode};
use tracing::info;

use crate::io::input;
use crate::output;

pub fn run(
    engine: &Engine,
    oc_dir: &Path,
    plist: Option<&Path>,
    clean: bool,
    out: Option<&Path>,
) -> Result<bool> {
    let root = resolve_oc_root(oc_dir);
    let plist = plist.map(Path::to_path_buf).unwrap_or_else(|| root.join(CONFIG_FILE_NAME));

    let mut doc = if plist.is_file() {
        input::read_document(engine, &plist)?
    } else {
        info!(path = %plist.display(), "no existing document, starting empty");
        engine.new_document()
    };

    let mode = if clean { SnapshotMode::Clean } else { SnapshotMode::Merge };
    let report = engine.snapshot(&root, &mut doc, mode);

    let target = out.unwrap_or(&plist);
    input::write_document(&doc, target)?;

    if output::is_json() {
        output::print(&report)?;
        return Ok(true);
    }
    for w in &report.warnings {
        output::warning(w);
    }
    for c in Category::ALL {
        let s = report.stats(c);
        output::line(&format!(
            "{:<13} kept {:>3}  added {:>3}  removed {:>3}",
            c.array_path(),
            s.kept,
            s.added,
            s.removed
        ));
    }
    output::ok(&format!("wrote {}", target.display()));
    Ok(true)
}
