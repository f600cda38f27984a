//! Builders for the array entries OpenCore configurations carry.
//!
//! Keys are written in alphabetical order, the way ProperTree and
//! `ocvalidate`-clean configs lay them out. Each builder takes the comment
//! suffix so snapshot (`Auto-snapshot`) and synthesis (`Auto-generated`)
//! share the same shapes.
//!
//! The `*_key` functions return the business key used to match an existing
//! entry against a discovered file.

use std::path::Path;

use ocforge_core::{Dict, DocumentValue};

pub const SNAPSHOT_TAG: &str = "Auto-snapshot";
pub const GENERATED_TAG: &str = "Auto-generated";

/// Relative location of a kext's descriptor inside its bundle.
pub const KEXT_PLIST_PATH: &str = "Contents/Info.plist";

/// File name without its last extension.
pub fn stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

fn comment(file_name: &str, tag: &str) -> String {
    format!("{} - {tag}", stem(file_name))
}

/// `ACPI.Add` entry for an `.aml` table.
pub fn acpi_entry(file_name: &str, tag: &str) -> DocumentValue {
    Dict::new()
        .with("Comment", comment(file_name, tag))
        .with("Enabled", true)
        .with("Path", file_name)
        .into()
}

/// `Kernel.Add` entry for a kext bundle.
///
/// `executable` is `None` for codeless bundles, which get an empty
/// `ExecutablePath`.
pub fn kext_entry(bundle_dir: &str, executable: Option<&str>, tag: &str) -> DocumentValue {
    let exec_path = match executable {
        Some(exe) if !exe.is_empty() => format!("Contents/MacOS/{exe}"),
        _ => String::new(),
    };
    Dict::new()
        .with("Arch", "Any")
        .with("BundlePath", bundle_dir)
        .with("Comment", comment(bundle_dir, tag))
        .with("Enabled", true)
        .with("ExecutablePath", exec_path)
        .with("MaxKernel", "")
        .with("MinKernel", "")
        .with("PlistPath", KEXT_PLIST_PATH)
        .into()
}

/// `Misc.Tools` entry for an `.efi` tool.
pub fn tool_entry(file_name: &str, tag: &str) -> DocumentValue {
    Dict::new()
        .with("Arguments", "")
        .with("Auxiliary", false)
        .with("Comment", comment(file_name, tag))
        .with("Enabled", true)
        .with("Name", stem(file_name))
        .with("Path", file_name)
        .into()
}

/// Dictionary-style `UEFI.Drivers` entry.
pub fn driver_dict_entry(file_name: &str, tag: &str) -> DocumentValue {
    Dict::new()
        .with("Arguments", "")
        .with("Comment", comment(file_name, tag))
        .with("Enabled", true)
        .with("LoadEarly", false)
        .with("Path", file_name)
        .into()
}

/// Name-style `UEFI.Drivers` entry.
pub fn driver_name_entry(file_name: &str) -> DocumentValue {
    DocumentValue::String(file_name.to_string())
}

fn string_field<'a>(entry: &'a DocumentValue, key: &str) -> Option<&'a str> {
    entry.as_mapping()?.get(key)?.as_str()
}

pub fn path_key(entry: &DocumentValue) -> Option<&str> {
    string_field(entry, "Path")
}

pub fn bundle_key(entry: &DocumentValue) -> Option<&str> {
    string_field(entry, "BundlePath")
}

/// A driver is keyed by the string itself or, for dictionaries, its `Path`.
pub fn driver_key(entry: &DocumentValue) -> Option<&str> {
    match entry {
        DocumentValue::String(s) => Some(s),
        other => path_key(other),
    }
}
