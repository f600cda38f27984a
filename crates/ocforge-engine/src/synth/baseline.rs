//! The smallest configuration OpenCore accepts.
//!
//! Nine top-level sections with every sub-key present and empty (or at its
//! neutral value). Synthesis fills the interesting parts in afterwards.

use ocforge_core::{Dict, DocumentValue};

fn dict() -> DocumentValue {
    DocumentValue::empty_mapping()
}

fn list() -> DocumentValue {
    DocumentValue::Sequence(Vec::new())
}

pub fn minimal_config() -> Dict {
    Dict::new()
        .with(
            "ACPI",
            Dict::new()
                .with("Add", list())
                .with("Delete", list())
                .with("Patch", list())
                .with("Quirks", dict()),
        )
        .with(
            "Booter",
            Dict::new()
                .with("MmioWhitelist", list())
                .with("Quirks", dict()),
        )
        .with(
            "Boot",
            Dict::new()
                .with("Arguments", "")
                .with("ConsoleAttributes", 0i64)
                .with("HibernateMode", "None")
                .with("LauncherOption", "Disabled")
                .with("LauncherPath", "Default")
                .with("MiscDebug", false)
                .with("PickerMode", "Builtin")
                .with("PickerVariant", "Auto")
                .with("PollAppleHotKeys", false)
                .with("Quirks", dict())
                .with("Security", "Vault")
                .with("Timeout", 5i64),
        )
        .with(
            "DeviceProperties",
            Dict::new().with("Add", dict()).with("Delete", dict()),
        )
        .with(
            "Kernel",
            Dict::new()
                .with("Add", list())
                .with("Block", list())
                .with("Emulate", dict())
                .with("Force", list())
                .with("Patch", list())
                .with("Quirks", dict())
                .with("Scheme", dict()),
        )
        .with(
            "Misc",
            Dict::new()
                .with("Boot", dict())
                .with("Debug", dict())
                .with("Entries", list())
                .with("Security", dict())
                .with("Tools", list()),
        )
        .with(
            "NVRAM",
            Dict::new()
                .with("Add", dict())
                .with("Delete", dict())
                .with("LegacyEnable", false)
                .with("LegacyOverwrite", false)
                .with("LegacySchema", dict()),
        )
        .with(
            "PlatformInfo",
            Dict::new()
                .with("DataHub", dict())
                .with("Generic", dict())
                .with("PlatformNVRAM", dict())
                .with("SMBIOS", dict())
                .with("UpdateDataHub", false)
                .with("UpdateNVRAM", false)
                .with("UpdateSMBIOS", false),
        )
        .with(
            "UEFI",
            Dict::new()
                .with("Audio", dict())
                .with("ConnectDrivers", true)
                .with("Drivers", list())
                .with("Input", dict())
                .with("Output", dict())
                .with("ProtocolOverrides", dict())
                .with("Quirks", dict())
                .with("ReservedMemory", list()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocforge_core::schema::{validate, Schema, REQUIRED_SECTIONS};

    #[test]
    fn has_nine_sections_and_passes_default_schema() {
        let cfg = minimal_config();
        assert_eq!(cfg.len(), 9);
        for section in REQUIRED_SECTIONS {
            assert!(cfg.contains_key(section), "{section} missing");
        }
        let errors = validate(&DocumentValue::Mapping(cfg), &Schema::opencore_default());
        assert!(errors.is_empty(), "{errors:?}");
    }
}
