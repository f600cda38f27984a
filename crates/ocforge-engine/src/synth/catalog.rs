//! Platform templates and kext metadata.
//!
//! The synthesizer asks a [`Catalog`] three things: a platform template by
//! name, a template matching a hardware profile, and metadata about a kext.
//! [`BuiltinCatalog`] is an in-memory implementation; with the
//! `builtin-catalog` feature its default instance carries the standard
//! desktop/laptop templates and the common kexts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::hardware::HardwareProfile;

/// An SMBIOS platform template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmbiosTemplate {
    /// Model identifier, e.g. `iMac20,1`.
    pub name: String,
    /// Serial number prefix; empty means fully random serials.
    #[serde(default)]
    pub serial_prefix: String,
    #[serde(default)]
    pub description: String,
}

impl SmbiosTemplate {
    pub fn new(name: impl Into<String>, serial_prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            serial_prefix: serial_prefix.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KextInfo {
    pub name: String,
    pub version: String,
    pub repo: String,
    pub category: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

/// A CPU model pattern mapped to a platform template name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareMatch {
    pub cpu_model: String,
    pub smbios: String,
}

pub trait Catalog {
    fn smbios(&self, name: &str) -> Option<SmbiosTemplate>;

    /// Template registered for hardware resembling `hw`, if any.
    fn match_hardware(&self, hw: &HardwareProfile) -> Option<SmbiosTemplate>;

    fn kext(&self, name: &str) -> Option<KextInfo>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinCatalog {
    smbios: BTreeMap<String, SmbiosTemplate>,
    kexts: BTreeMap<String, KextInfo>,
    matches: Vec<HardwareMatch>,
}

impl Default for BuiltinCatalog {
    #[cfg(feature = "builtin-catalog")]
    fn default() -> Self {
        Self::standard()
    }

    #[cfg(not(feature = "builtin-catalog"))]
    fn default() -> Self {
        Self::empty()
    }
}

impl BuiltinCatalog {
    pub fn empty() -> Self {
        Self {
            smbios: BTreeMap::new(),
            kexts: BTreeMap::new(),
            matches: Vec::new(),
        }
    }

    /// Catalog seeded with the standard templates and kexts.
    #[cfg(feature = "builtin-catalog")]
    pub fn standard() -> Self {
        let mut c = Self::empty();
        for (name, desc) in [
            ("MacBookPro15,1", "15-inch MacBook Pro, 2018, Coffee Lake"),
            ("MacBookPro15,2", "13-inch MacBook Pro, 2018, Coffee Lake"),
            ("iMac20,1", "27-inch iMac, 2020, Comet Lake"),
            ("iMacPro1,1", "iMac Pro, 2017, Skylake-W"),
            ("Mac14,2", "MacBook Air, 2022"),
        ] {
            c.add_smbios(SmbiosTemplate::new(name, "C02").with_description(desc));
        }

        let kexts = [
            ("Lilu", "1.6.0", "acidanthera/Lilu", "System", true, "Arbitrary kext and process patching"),
            ("VirtualSMC", "1.3.0", "acidanthera/VirtualSMC", "System", true, "SMC emulation"),
            ("WhateverGreen", "1.6.0", "acidanthera/WhateverGreen", "Graphics", true, "Graphics patching"),
            ("AppleALC", "1.8.0", "acidanthera/AppleALC", "Audio", false, "Native audio enabler"),
            ("AirportItlwm", "2.3.0", "OpenIntelWireless/itlwm", "Network", false, "Intel Wi-Fi"),
            ("AirportBrcmFixup", "2.1.0", "acidanthera/AirportBrcmFixup", "Network", false, "Broadcom Wi-Fi fixes"),
            ("CPUFriend", "1.2.0", "acidanthera/CPUFriend", "Power", false, "CPU power management data injection"),
            ("IntelMausi", "1.0.7", "acidanthera/IntelMausi", "Network", false, "Intel Ethernet"),
            ("RealtekRTL8111", "2.4.2", "Mieze/RTL8111_driver_for_OS_X", "Network", false, "Realtek Gigabit Ethernet"),
            ("USBInjectAll", "0.7.7", "Sniki/OS-X-USB-Inject-All", "USB", false, "USB port injection"),
            ("VoodooI2C", "2.8.0", "VoodooI2C/VoodooI2C", "Input", false, "I2C input devices"),
        ];
        for (name, version, repo, category, required, description) in kexts {
            c.add_kext(KextInfo {
                name: name.to_string(),
                version: version.to_string(),
                repo: repo.to_string(),
                category: category.to_string(),
                required,
                description: description.to_string(),
            });
        }
        c
    }

    pub fn add_smbios(&mut self, template: SmbiosTemplate) {
        self.smbios.insert(template.name.clone(), template);
    }

    pub fn add_kext(&mut self, info: KextInfo) {
        self.kexts.insert(info.name.clone(), info);
    }

    /// Register a CPU model pattern. Earlier registrations win.
    pub fn add_hardware_match(&mut self, cpu_model: impl Into<String>, smbios: impl Into<String>) {
        self.matches.push(HardwareMatch {
            cpu_model: cpu_model.into(),
            smbios: smbios.into(),
        });
    }

    pub fn hardware_matches(&self) -> &[HardwareMatch] {
        &self.matches
    }

    pub fn smbios_names(&self) -> impl Iterator<Item = &str> {
        self.smbios.keys().map(String::as_str)
    }
}

fn model_matches(pattern: &str, model: &str) -> bool {
    let (p, m) = (pattern.to_ascii_lowercase(), model.to_ascii_lowercase());
    if p.is_empty() || m.is_empty() {
        return false;
    }
    m.contains(&p) || p.contains(&m)
}

impl Catalog for BuiltinCatalog {
    fn smbios(&self, name: &str) -> Option<SmbiosTemplate> {
        self.smbios.get(name).cloned()
    }

    fn match_hardware(&self, hw: &HardwareProfile) -> Option<SmbiosTemplate> {
        self.matches
            .iter()
            .filter(|m| model_matches(&m.cpu_model, &hw.cpu.model))
            .find_map(|m| self.smbios(&m.smbios))
    }

    fn kext(&self, name: &str) -> Option<KextInfo> {
        self.kexts.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::hardware::CpuInfo;

    fn cpu(model: &str) -> HardwareProfile {
        HardwareProfile {
            cpu: CpuInfo {
                model: model.to_string(),
                vendor: "Intel".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[cfg(feature = "builtin-catalog")]
    #[test]
    fn standard_catalog_contents() {
        let c = BuiltinCatalog::standard();
        assert_eq!(c.smbios_names().count(), 5);
        assert_eq!(c.smbios("iMac20,1").map(|t| t.serial_prefix), Some("C02".to_string()));
        assert!(c.kext("Lilu").is_some_and(|k| k.required));
        assert!(c.kext("VoodooI2C").is_some());
        assert!(c.smbios("MacPro7,1").is_none());
    }

    #[test]
    fn hardware_match_by_model_substring() {
        let mut c = BuiltinCatalog::empty();
        c.add_smbios(SmbiosTemplate::new("iMac20,1", "C02"));
        c.add_hardware_match("i9-10900K", "iMac20,1");
        c.add_hardware_match("i5-1035G1", "Missing1,1");

        let hit = c.match_hardware(&cpu("Intel Core i9-10900K @ 3.70GHz"));
        assert_eq!(hit.map(|t| t.name), Some("iMac20,1".to_string()));

        // The pattern resolves to no template, so there is no match.
        assert!(c.match_hardware(&cpu("Intel Core i5-1035G1")).is_none());
        assert!(c.match_hardware(&cpu("")).is_none());
    }
}
