//! Directory discovery for snapshots.
//!
//! Lists the immediate children of one component directory that match a
//! simple `*` pattern, sorted by name. Only names are returned; callers join
//! them back onto the directory when they need to read a file.
//!
//! A missing directory yields an empty listing. Entries that cannot be read
//! are skipped with a log line rather than failing the scan.

use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Which kind of entry a scan is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// Glob-like match supporting `*` (any run of characters) only.
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    if !pattern.contains('*') {
        return name == pattern;
    }

    let p = pattern.as_bytes();
    let s = name.as_bytes();
    let (mut pi, mut si) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut resume = 0usize;

    while si < s.len() {
        if pi < p.len() && p[pi] != b'*' && p[pi] == s[si] {
            pi += 1;
            si += 1;
        } else if pi < p.len() && p[pi] == b'*' {
            star = Some(pi);
            pi += 1;
            resume = si;
        } else if let Some(st) = star {
            pi = st + 1;
            resume += 1;
            si = resume;
        } else {
            return false;
        }
    }

    while pi < p.len() && p[pi] == b'*' {
        pi += 1;
    }
    pi == p.len()
}

/// List matching entries directly under `dir`, sorted by name.
pub fn scan_dir(dir: &Path, pattern: &str, kind: EntryKind, include_hidden: bool) -> Vec<String> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "component directory absent");
        return Vec::new();
    }

    let mut out = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if !include_hidden && name.starts_with('.') {
            continue;
        }

        let ft = entry.file_type();
        let wanted = match kind {
            EntryKind::File => ft.is_file(),
            EntryKind::Dir => ft.is_dir(),
        };
        if wanted && matches_pattern(name, pattern) {
            out.push(name.to_string());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn pattern_rules() {
        assert!(matches_pattern("SSDT-PLUG.aml", "*.aml"));
        assert!(!matches_pattern("SSDT-PLUG.aml.bak", "*.aml"));
        assert!(matches_pattern("a.b.kext", "*.kext"));
        assert!(matches_pattern("x", "x"));
        assert!(!matches_pattern("notes.txt", "*.efi"));
    }

    #[test]
    fn scan_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for f in ["b.efi", "a.efi", ".hidden.efi", "readme.txt"] {
            fs::write(dir.path().join(f), b"").unwrap();
        }
        fs::create_dir(dir.path().join("c.efi")).unwrap();

        let files = scan_dir(dir.path(), "*.efi", EntryKind::File, false);
        assert_eq!(files, vec!["a.efi", "b.efi"]);

        let with_hidden = scan_dir(dir.path(), "*.efi", EntryKind::File, true);
        assert_eq!(with_hidden, vec![".hidden.efi", "a.efi", "b.efi"]);

        let dirs = scan_dir(dir.path(), "*.efi", EntryKind::Dir, false);
        assert_eq!(dirs, vec!["c.efi"]);
    }

    #[test]
    fn missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_dir(&dir.path().join("nope"), "*", EntryKind::File, false).is_empty());
    }
}
