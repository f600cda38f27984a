//! OC snapshot: reconcile a configuration document with an OpenCore directory.
//!
//! A snapshot scans the four component directories of an OpenCore tree and
//! rewrites the matching arrays of the document:
//!
//! | directory | pattern  | array          | business key  |
//! |-----------|----------|----------------|---------------|
//! | `ACPI`    | `*.aml`  | `ACPI.Add`     | `Path`        |
//! | `Kexts`   | `*.kext` | `Kernel.Add`   | `BundlePath`  |
//! | `Drivers` | `*.efi`  | `UEFI.Drivers` | name / `Path` |
//! | `Tools`   | `*.efi`  | `Misc.Tools`   | `Path`        |
//!
//! In [`SnapshotMode::Merge`] existing entries whose key is still on disk are
//! kept untouched and in place, stale ones are dropped and new items are
//! appended. [`SnapshotMode::Clean`] rebuilds every array from scratch. New
//! kext entries follow dependency order.
//!
//! A snapshot never fails. Unreadable descriptors, duplicate bundle
//! identifiers, dependency cycles and arrays that cannot be written are
//! reported as warnings. The whole rewrite is a single undo step.

pub mod scan;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use ocforge_core::config::LimitsConfig;
use ocforge_core::path::{assign, lookup};
use ocforge_core::{DocumentValue, PlistDocument};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{DriverStyle, SnapshotConfig};
use crate::entries::{self, SNAPSHOT_TAG};
use crate::kext::{KextDescriptor, KextGraph, KextOrder};
use scan::{scan_dir, EntryKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotMode {
    /// Keep existing entries, add new ones, drop stale ones.
    #[default]
    Merge,
    /// Discard existing entries and rebuild.
    Clean,
}

/// The four arrays a snapshot maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Acpi,
    Kexts,
    Drivers,
    Tools,
}

impl Category {
    pub const ALL: [Category; 4] = [Self::Acpi, Self::Kexts, Self::Drivers, Self::Tools];

    /// Dot path of the array inside the document.
    pub fn array_path(&self) -> &'static str {
        match self {
            Self::Acpi => "ACPI.Add",
            Self::Kexts => "Kernel.Add",
            Self::Drivers => "UEFI.Drivers",
            Self::Tools => "Misc.Tools",
        }
    }

    fn segments(&self) -> [&'static str; 2] {
        match self {
            Self::Acpi => ["ACPI", "Add"],
            Self::Kexts => ["Kernel", "Add"],
            Self::Drivers => ["UEFI", "Drivers"],
            Self::Tools => ["Misc", "Tools"],
        }
    }

    fn key_of(&self) -> fn(&DocumentValue) -> Option<&str> {
        match self {
            Self::Acpi | Self::Tools => entries::path_key,
            Self::Kexts => entries::bundle_key,
            Self::Drivers => entries::driver_key,
        }
    }
}

/// Per-array outcome of a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub kept: usize,
    pub added: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotReport {
    pub mode: SnapshotMode,
    pub warnings: Vec<String>,
    pub acpi: CategoryStats,
    pub kexts: CategoryStats,
    pub drivers: CategoryStats,
    pub tools: CategoryStats,
    pub kext_order: KextOrder,
}

impl SnapshotReport {
    pub fn stats(&self, category: Category) -> &CategoryStats {
        match category {
            Category::Acpi => &self.acpi,
            Category::Kexts => &self.kexts,
            Category::Drivers => &self.drivers,
            Category::Tools => &self.tools,
        }
    }

    fn stats_mut(&mut self, category: Category) -> &mut CategoryStats {
        match category {
            Category::Acpi => &mut self.acpi,
            Category::Kexts => &mut self.kexts,
            Category::Drivers => &mut self.drivers,
            Category::Tools => &mut self.tools,
        }
    }
}

/// What was found on disk, before touching the document.
struct Discovery {
    acpi: Vec<String>,
    kexts: BTreeMap<String, KextDescriptor>,
    kext_order: KextOrder,
    drivers: Vec<String>,
    tools: Vec<String>,
}

/// Snapshot runner bound to a configuration.
pub struct Reconciler<'a> {
    cfg: &'a SnapshotConfig,
    limits: &'a LimitsConfig,
}

impl<'a> Reconciler<'a> {
    pub fn new(cfg: &'a SnapshotConfig, limits: &'a LimitsConfig) -> Self {
        Self { cfg, limits }
    }

    /// Reconcile `doc` with the OpenCore tree at `oc_root`.
    pub fn run(&self, oc_root: &Path, doc: &mut PlistDocument, mode: SnapshotMode) -> SnapshotReport {
        let mut report = SnapshotReport {
            mode,
            ..SnapshotReport::default()
        };

        let found = self.discover(oc_root, &mut report.warnings);
        debug!(
            acpi = found.acpi.len(),
            kexts = found.kexts.len(),
            drivers = found.drivers.len(),
            tools = found.tools.len(),
            "snapshot discovery complete"
        );

        let driver_style = match self.cfg.driver_style {
            DriverStyle::Auto => detect_driver_style(doc.root()),
            explicit => explicit,
        };

        let mut fresh: BTreeMap<Category, Vec<(String, DocumentValue)>> = BTreeMap::new();
        fresh.insert(
            Category::Acpi,
            found
                .acpi
                .iter()
                .map(|f| (f.clone(), entries::acpi_entry(f, SNAPSHOT_TAG)))
                .collect(),
        );
        fresh.insert(
            Category::Kexts,
            found
                .kext_order
                .order
                .iter()
                .filter_map(|dir| found.kexts.get(dir))
                .map(|k| {
                    (
                        k.dir_name.clone(),
                        entries::kext_entry(&k.dir_name, k.executable.as_deref(), SNAPSHOT_TAG),
                    )
                })
                .collect(),
        );
        fresh.insert(
            Category::Drivers,
            found
                .drivers
                .iter()
                .map(|f| {
                    let entry = match driver_style {
                        DriverStyle::Dict => entries::driver_dict_entry(f, SNAPSHOT_TAG),
                        _ => entries::driver_name_entry(f),
                    };
                    (f.clone(), entry)
                })
                .collect(),
        );
        fresh.insert(
            Category::Tools,
            found
                .tools
                .iter()
                .map(|f| (f.clone(), entries::tool_entry(f, SNAPSHOT_TAG)))
                .collect(),
        );

        let mut stats: Vec<(Category, CategoryStats)> = Vec::new();
        let mut write_warnings: Vec<String> = Vec::new();

        let committed = doc.update(|root| {
            let mut changed = false;
            for (category, discovered) in fresh {
                let segments = category.segments();
                let existing = match lookup(root, &segments) {
                    None => Vec::new(),
                    Some(DocumentValue::Sequence(items)) => items.clone(),
                    Some(other) => {
                        write_warnings.push(format!(
                            "{} is {}, not an array; rebuilding it",
                            category.array_path(),
                            other.kind()
                        ));
                        Vec::new()
                    }
                };

                let (merged, s) = merge(existing, discovered, category.key_of(), mode);
                if assign(root, &segments, DocumentValue::Sequence(merged)) {
                    stats.push((category, s));
                    changed = true;
                } else {
                    write_warnings.push(format!(
                        "cannot write {}: a parent is not a dict",
                        category.array_path()
                    ));
                }
            }
            changed
        });

        if !committed {
            debug!("snapshot left the document unchanged");
        }
        for (category, s) in stats {
            *report.stats_mut(category) = s;
        }
        report.warnings.extend(write_warnings);
        report.kext_order = found.kext_order;

        for w in &report.warnings {
            warn!("{w}");
        }
        info!(
            mode = ?mode,
            acpi = ?report.acpi,
            kexts = ?report.kexts,
            drivers = ?report.drivers,
            tools = ?report.tools,
            warnings = report.warnings.len(),
            "snapshot applied"
        );
        report
    }

    fn discover(&self, oc_root: &Path, warnings: &mut Vec<String>) -> Discovery {
        let hidden = self.cfg.include_hidden;
        let acpi = scan_dir(&oc_root.join(&self.cfg.acpi_dir), "*.aml", EntryKind::File, hidden);
        let drivers = scan_dir(&oc_root.join(&self.cfg.drivers_dir), "*.efi", EntryKind::File, hidden);
        let tools = scan_dir(&oc_root.join(&self.cfg.tools_dir), "*.efi", EntryKind::File, hidden);

        let kexts_dir = oc_root.join(&self.cfg.kexts_dir);
        let mut kexts = BTreeMap::new();
        for name in scan_dir(&kexts_dir, "*.kext", EntryKind::Dir, hidden) {
            match KextDescriptor::read(&kexts_dir.join(&name), &self.cfg.descriptor_path, self.limits) {
                Ok(desc) => {
                    kexts.insert(name, desc);
                }
                Err(e) => warnings.push(format!("skipping {name}: unreadable descriptor ({e})")),
            }
        }

        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        for (name, desc) in &kexts {
            if desc.bundle_id.is_empty() {
                continue;
            }
            if let Some(first) = seen.get(desc.bundle_id.as_str()) {
                warnings.push(format!(
                    "duplicate CFBundleIdentifier {}: {first} and {name}",
                    desc.bundle_id
                ));
            } else {
                seen.insert(desc.bundle_id.as_str(), name.as_str());
            }
        }

        let graph = KextGraph::build(&kexts);
        let kext_order = graph.order();
        if kext_order.has_cycle {
            warnings.push(format!(
                "kext dependency cycle among {}",
                kext_order.cycle_members.join(", ")
            ));
        }

        Discovery {
            acpi,
            kexts,
            kext_order,
            drivers,
            tools,
        }
    }
}

/// Reconcile with the default snapshot configuration.
///
/// Returns the updated document and the warnings produced.
pub fn reconcile(
    oc_root: &Path,
    mut document: PlistDocument,
    mode: SnapshotMode,
) -> (PlistDocument, Vec<String>) {
    let cfg = SnapshotConfig::default();
    let limits = LimitsConfig::default();
    let report = Reconciler::new(&cfg, &limits).run(oc_root, &mut document, mode);
    (document, report.warnings)
}

/// Dictionary style when any existing driver entry is a dict.
fn detect_driver_style(root: &DocumentValue) -> DriverStyle {
    let dict_entries = lookup(root, &Category::Drivers.segments())
        .and_then(|v| v.as_sequence())
        .is_some_and(|items| items.iter().any(|e| matches!(e, DocumentValue::Mapping(_))));
    if dict_entries {
        DriverStyle::Dict
    } else {
        DriverStyle::Name
    }
}

fn merge(
    existing: Vec<DocumentValue>,
    discovered: Vec<(String, DocumentValue)>,
    key_of: fn(&DocumentValue) -> Option<&str>,
    mode: SnapshotMode,
) -> (Vec<DocumentValue>, CategoryStats) {
    let before = existing.len();

    if mode == SnapshotMode::Clean {
        let added = discovered.len();
        let out = discovered.into_iter().map(|(_, e)| e).collect();
        return (
            out,
            CategoryStats {
                kept: 0,
                added,
                removed: before,
            },
        );
    }

    let current: BTreeSet<&str> = discovered.iter().map(|(k, _)| k.as_str()).collect();
    let mut out: Vec<DocumentValue> = existing
        .into_iter()
        .filter(|e| key_of(e).is_some_and(|k| current.contains(k)))
        .collect();
    let kept = out.len();
    let present: BTreeSet<String> = out.iter().filter_map(key_of).map(str::to_string).collect();

    let mut added = 0;
    for (key, entry) in discovered {
        if !present.contains(&key) {
            out.push(entry);
            added += 1;
        }
    }

    (
        out,
        CategoryStats {
            kept,
            added,
            removed: before - kept,
        },
    )
}
