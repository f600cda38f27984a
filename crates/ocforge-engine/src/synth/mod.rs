//! Configuration synthesis from a hardware profile.
//!
//! [`Synthesizer::run`] produces a complete OpenCore document for a machine:
//!
//! - starts from the nine-section [`baseline::minimal_config`]
//! - picks a platform template (override, catalog match, microarchitecture
//!   heuristic, configured default, in that order)
//! - derives the kext, driver and ACPI table lists from the hardware and the
//!   [`GenerationMode`]
//! - writes the fixed quirk tables and a freshly generated platform identity
//!
//! Everything except the identity fields is a pure function of the inputs.
//! Use [`Synthesizer::run_with_rng`] with a seeded RNG to pin those too.

pub mod baseline;
pub mod catalog;
pub mod hardware;
pub mod identity;
pub mod modes;
pub mod quirks;

use ocforge_core::config::DEFAULT_HISTORY_CAPACITY;
use ocforge_core::path::assign;
use ocforge_core::{Dict, DocumentValue, PlistDocument};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::SynthConfig;
use crate::entries::{acpi_entry, driver_name_entry, kext_entry, GENERATED_TAG};

pub use catalog::{BuiltinCatalog, Catalog, KextInfo, SmbiosTemplate};
pub use hardware::HardwareProfile;
pub use identity::PlatformIdentity;
pub use modes::GenerationMode;

/// Where the chosen platform template came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SmbiosSource {
    Override,
    Catalog,
    Microarchitecture,
    Default,
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesizedConfig {
    #[serde(skip)]
    pub document: PlistDocument,
    pub mode: GenerationMode,
    pub smbios: SmbiosTemplate,
    pub smbios_source: SmbiosSource,
    pub kexts: Vec<String>,
    pub drivers: Vec<String>,
    pub ssdts: Vec<String>,
    /// Catalog metadata for the recommended kexts that have any.
    pub kext_details: Vec<KextInfo>,
    pub identity: PlatformIdentity,
    pub warnings: Vec<String>,
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|k| k == name) {
        list.push(name.to_string());
    }
}

pub fn recommended_kexts(hw: &HardwareProfile, mode: GenerationMode) -> Vec<String> {
    let mut kexts = Vec::new();
    for base in ["Lilu", "VirtualSMC", "WhateverGreen"] {
        push_unique(&mut kexts, base);
    }

    if hw.has_audio() {
        push_unique(&mut kexts, "AppleALC");
    }

    if hw.wifi_from("Intel") {
        push_unique(&mut kexts, "AirportItlwm");
    } else if hw.wifi_from("Broadcom") {
        push_unique(&mut kexts, "AirportBrcmFixup");
    }

    if hw.ethernet_from("Intel") {
        push_unique(&mut kexts, "IntelMausi");
    } else if hw.ethernet_from("Realtek") {
        push_unique(&mut kexts, "RealtekRTL8111");
    }

    if hw.is_intel_cpu() && hw.microarch_is("Coffee Lake") {
        push_unique(&mut kexts, "CPUFriend");
    }

    if mode == GenerationMode::Aggressive {
        push_unique(&mut kexts, "USBInjectAll");
        push_unique(&mut kexts, "VoodooI2C");
    }

    kexts
}

pub fn recommended_drivers(mode: GenerationMode) -> Vec<String> {
    let mut drivers = vec!["OpenRuntime.efi".to_string(), "OpenCanopy.efi".to_string()];
    if mode != GenerationMode::Conservative {
        drivers.push("HfsPlus.efi".to_string());
    }
    drivers
}

pub fn recommended_ssdts(hw: &HardwareProfile, mode: GenerationMode) -> Vec<String> {
    let mut ssdts = Vec::new();
    if hw.is_intel_cpu() {
        ssdts.push("SSDT-PLUG".to_string());
        if hw.microarch_is("Coffee Lake") {
            ssdts.push("SSDT-PMC".to_string());
        }
    }
    if mode != GenerationMode::Conservative {
        ssdts.push("SSDT-USB-Reset".to_string());
    }
    ssdts
}

/// Platform name implied by an Intel microarchitecture alone.
fn microarch_platform(hw: &HardwareProfile) -> Option<&'static str> {
    if !hw.is_intel_cpu() {
        return None;
    }
    [
        ("Coffee Lake", "MacBookPro15,1"),
        ("Comet Lake", "iMac20,1"),
        ("Alder Lake", "Mac14,2"),
    ]
    .into_iter()
    .find(|(family, _)| hw.microarch_is(family))
    .map(|(_, name)| name)
}

pub struct Synthesizer<'a> {
    catalog: &'a dyn Catalog,
    cfg: &'a SynthConfig,
    history_capacity: usize,
}

impl<'a> Synthesizer<'a> {
    pub fn new(catalog: &'a dyn Catalog, cfg: &'a SynthConfig) -> Self {
        Self {
            catalog,
            cfg,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Template by name, falling back to a bare template with the configured
    /// serial prefix when the catalog does not know it.
    fn template(&self, name: &str) -> SmbiosTemplate {
        self.catalog
            .smbios(name)
            .unwrap_or_else(|| SmbiosTemplate::new(name, self.cfg.default_serial_prefix.clone()))
    }

    pub fn choose_smbios(
        &self,
        hw: &HardwareProfile,
        smbios_override: Option<&str>,
        warnings: &mut Vec<String>,
    ) -> (SmbiosTemplate, SmbiosSource) {
        if let Some(name) = smbios_override {
            match self.catalog.smbios(name) {
                Some(t) => return (t, SmbiosSource::Override),
                None => {
                    let msg = format!("unknown SMBIOS override '{name}', falling back to detection");
                    warn!("{msg}");
                    warnings.push(msg);
                }
            }
        }

        if let Some(t) = self.catalog.match_hardware(hw) {
            return (t, SmbiosSource::Catalog);
        }
        if let Some(name) = microarch_platform(hw) {
            return (self.template(name), SmbiosSource::Microarchitecture);
        }
        (self.template(&self.cfg.default_smbios), SmbiosSource::Default)
    }

    pub fn run(
        &self,
        hw: &HardwareProfile,
        mode: GenerationMode,
        smbios_override: Option<&str>,
    ) -> SynthesizedConfig {
        self.run_with_rng(hw, mode, smbios_override, &mut rand::thread_rng())
    }

    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        hw: &HardwareProfile,
        mode: GenerationMode,
        smbios_override: Option<&str>,
        rng: &mut R,
    ) -> SynthesizedConfig {
        let mut warnings = Vec::new();
        let (smbios, smbios_source) = self.choose_smbios(hw, smbios_override, &mut warnings);
        debug!(smbios = %smbios.name, source = ?smbios_source, "platform template chosen");

        let kexts = recommended_kexts(hw, mode);
        let drivers = recommended_drivers(mode);
        let ssdts = recommended_ssdts(hw, mode);
        let identity = identity::generate(rng, &smbios.serial_prefix);

        let kext_details: Vec<KextInfo> = kexts.iter().filter_map(|k| self.catalog.kext(k)).collect();
        for k in &kexts {
            if self.catalog.kext(k).is_none() {
                debug!(kext = %k, "no catalog metadata");
            }
        }

        let generic = Dict::new()
            .with("AdviseFeatures", false)
            .with("MLB", identity.mlb.clone())
            .with("ROM", identity.rom.clone())
            .with("SystemProductName", smbios.name.clone())
            .with("SystemSerialNumber", identity.serial.clone())
            .with("SystemUUID", identity.uuid.clone());

        let acpi_add: Vec<DocumentValue> = ssdts
            .iter()
            .map(|s| acpi_entry(&format!("{s}.aml"), GENERATED_TAG))
            .collect();
        let kernel_add: Vec<DocumentValue> = kexts
            .iter()
            .map(|k| kext_entry(&format!("{k}.kext"), Some(k.as_str()), GENERATED_TAG))
            .collect();
        let uefi_drivers: Vec<DocumentValue> = drivers.iter().map(|d| driver_name_entry(d)).collect();

        let mut root = DocumentValue::Mapping(baseline::minimal_config());
        let mut put = |path: &[&str], value: DocumentValue| {
            if !assign(&mut root, path, value) {
                let msg = format!("could not write {}", path.join("."));
                warn!("{msg}");
                warnings.push(msg);
            }
        };
        put(&["ACPI", "Add"], acpi_add.into());
        put(&["ACPI", "Quirks"], quirks::acpi_quirks().into());
        put(&["Boot", "Quirks"], quirks::boot_quirks().into());
        put(&["Kernel", "Add"], kernel_add.into());
        put(&["Kernel", "Quirks"], quirks::kernel_quirks(mode).into());
        put(&["UEFI", "Drivers"], uefi_drivers.into());
        put(&["UEFI", "Quirks"], quirks::uefi_quirks().into());
        put(&["PlatformInfo", "Generic"], generic.into());

        let document = match root {
            DocumentValue::Mapping(dict) => PlistDocument::from_dict(dict, self.history_capacity),
            _ => PlistDocument::with_capacity(self.history_capacity),
        };

        info!(
            mode = %mode,
            smbios = %smbios.name,
            kexts = kexts.len(),
            drivers = drivers.len(),
            ssdts = ssdts.len(),
            "configuration synthesized"
        );

        SynthesizedConfig {
            document,
            mode,
            smbios,
            smbios_source,
            kexts,
            drivers,
            ssdts,
            kext_details,
            identity,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hardware::{AudioInfo, CpuInfo, GpuInfo, NetworkInfo};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn intel(micro: &str) -> HardwareProfile {
        HardwareProfile {
            cpu: CpuInfo {
                model: "Intel Core i7".to_string(),
                vendor: "Intel".to_string(),
                microarchitecture: Some(micro.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn run(hw: &HardwareProfile, mode: GenerationMode, ov: Option<&str>) -> SynthesizedConfig {
        let catalog = BuiltinCatalog::default();
        let cfg = SynthConfig::default();
        Synthesizer::new(&catalog, &cfg).run_with_rng(hw, mode, ov, &mut StdRng::seed_from_u64(3))
    }

    fn strings(doc: &PlistDocument, path: &str, key: &str) -> Vec<String> {
        doc.lookup(path)
            .and_then(|v| v.as_sequence())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|e| match e {
                        DocumentValue::String(s) => Some(s.clone()),
                        other => other.as_mapping()?.get(key)?.as_str().map(str::to_string),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn coffee_lake_standard() {
        let out = run(&intel("Coffee Lake"), GenerationMode::Standard, None);
        assert_eq!(out.smbios.name, "MacBookPro15,1");
        assert_eq!(out.smbios_source, SmbiosSource::Microarchitecture);
        assert_eq!(
            out.document.get("PlatformInfo.Generic.SystemProductName", DocumentValue::from("")),
            DocumentValue::from("MacBookPro15,1")
        );

        let bundles = strings(&out.document, "Kernel.Add", "BundlePath");
        for k in ["Lilu.kext", "VirtualSMC.kext", "WhateverGreen.kext", "CPUFriend.kext"] {
            assert!(bundles.contains(&k.to_string()), "{k} missing from {bundles:?}");
        }
        assert_eq!(out.ssdts, vec!["SSDT-PLUG", "SSDT-PMC", "SSDT-USB-Reset"]);
        assert_eq!(
            strings(&out.document, "ACPI.Add", "Path"),
            vec!["SSDT-PLUG.aml", "SSDT-PMC.aml", "SSDT-USB-Reset.aml"]
        );
        assert_eq!(
            strings(&out.document, "UEFI.Drivers", ""),
            vec!["OpenRuntime.efi", "OpenCanopy.efi", "HfsPlus.efi"]
        );
        assert_eq!(
            out.document.get("Kernel.Quirks.XhciPortLimit", DocumentValue::from(false)),
            DocumentValue::from(true)
        );
    }

    #[test]
    fn conservative_trims_extras() {
        let out = run(&intel("Comet Lake"), GenerationMode::Conservative, None);
        assert_eq!(out.smbios.name, "iMac20,1");
        assert_eq!(out.drivers, vec!["OpenRuntime.efi", "OpenCanopy.efi"]);
        assert_eq!(out.ssdts, vec!["SSDT-PLUG"]);
        assert_eq!(
            out.document.get("Kernel.Quirks.XhciPortLimit", DocumentValue::from(true)),
            DocumentValue::from(false)
        );
    }

    #[test]
    fn peripherals_and_aggressive_mode() {
        let hw = HardwareProfile {
            gpu: Some(GpuInfo {
                model: "RX 580".into(),
                vendor: "AMD".into(),
                ..Default::default()
            }),
            audio: Some(AudioInfo {
                codec: Some("ALC1220".into()),
                layout_id: Some(7),
            }),
            network: Some(NetworkInfo {
                wifi_model: Some("Intel AX200".into()),
                ethernet_model: Some("Realtek RTL8111H".into()),
                ..Default::default()
            }),
            ..intel("Alder Lake")
        };
        let out = run(&hw, GenerationMode::Aggressive, None);
        assert_eq!(
            out.kexts,
            vec![
                "Lilu",
                "VirtualSMC",
                "WhateverGreen",
                "AppleALC",
                "AirportItlwm",
                "RealtekRTL8111",
                "USBInjectAll",
                "VoodooI2C"
            ]
        );
        assert_eq!(out.smbios.name, "Mac14,2");
        assert_eq!(out.kext_details.len(), out.kexts.len());
    }

    #[test]
    fn gpu_vendor_does_not_change_kext_list() {
        let plain = intel("Comet Lake");
        let with_gpu = HardwareProfile {
            gpu: Some(GpuInfo {
                model: "RX 6600".into(),
                vendor: "AMD".into(),
                ..Default::default()
            }),
            ..intel("Comet Lake")
        };
        let kexts = recommended_kexts(&with_gpu, GenerationMode::Standard);
        assert_eq!(kexts, recommended_kexts(&plain, GenerationMode::Standard));
        assert_eq!(kexts.iter().filter(|k| *k == "WhateverGreen").count(), 1);
    }

    #[test]
    fn override_and_fallbacks() {
        let out = run(&intel("Coffee Lake"), GenerationMode::Standard, Some("iMacPro1,1"));
        assert_eq!(out.smbios.name, "iMacPro1,1");
        assert_eq!(out.smbios_source, SmbiosSource::Override);
        assert!(out.warnings.is_empty());

        let out = run(&intel("Coffee Lake"), GenerationMode::Standard, Some("Nope9,9"));
        assert_eq!(out.smbios.name, "MacBookPro15,1");
        assert_eq!(out.warnings.len(), 1);

        let amd = HardwareProfile {
            cpu: CpuInfo {
                model: "Ryzen 7".into(),
                vendor: "AMD".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let out = run(&amd, GenerationMode::Standard, None);
        assert_eq!(out.smbios.name, "iMacPro1,1");
        assert_eq!(out.smbios_source, SmbiosSource::Default);
        assert!(out.ssdts.iter().all(|s| s != "SSDT-PLUG"));
    }

    #[test]
    fn serial_uses_template_prefix_and_seed_pins_identity() {
        let a = run(&intel("Coffee Lake"), GenerationMode::Standard, None);
        let b = run(&intel("Coffee Lake"), GenerationMode::Standard, None);
        assert!(a.identity.serial.starts_with("C02"));
        assert_eq!(a.document.root(), b.document.root());
        assert_eq!(
            a.document.lookup("PlatformInfo.Generic.ROM").map(|v| v.kind()),
            Some(ocforge_core::ValueKind::Binary)
        );
    }
}
