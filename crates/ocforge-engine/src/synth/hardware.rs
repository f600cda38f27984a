//! Hardware profile value objects.
//!
//! A profile is usually produced by a detection tool and handed to the
//! synthesizer as JSON. Only the CPU is mandatory; every other component is
//! optional and absent components simply contribute nothing.

use serde::{Deserialize, Serialize};

use crate::errors::EngineResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareProfile {
    pub cpu: CpuInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<GpuInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chipset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motherboard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_total_gb: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub model: String,
    pub vendor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub microarchitecture: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuInfo {
    pub model: String,
    pub vendor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vram_mb: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_id: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi_vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bluetooth_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernet_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethernet_vendor: Option<String>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
}

fn any_contains(fields: &[Option<&String>], needle: &str) -> bool {
    fields.iter().flatten().any(|f| contains_ci(f, needle))
}

impl HardwareProfile {
    pub fn from_json_str(s: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn is_intel_cpu(&self) -> bool {
        self.cpu.vendor.eq_ignore_ascii_case("intel")
    }

    /// Case-insensitive substring test on the CPU microarchitecture.
    pub fn microarch_is(&self, family: &str) -> bool {
        self.cpu
            .microarchitecture
            .as_deref()
            .is_some_and(|m| contains_ci(m, family))
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// Whether the Wi-Fi card (model or vendor) mentions `maker`.
    pub fn wifi_from(&self, maker: &str) -> bool {
        self.network.as_ref().is_some_and(|n| {
            any_contains(&[n.wifi_model.as_ref(), n.wifi_vendor.as_ref()], maker)
        })
    }

    /// Whether the wired controller (model or vendor) mentions `maker`.
    pub fn ethernet_from(&self, maker: &str) -> bool {
        self.network.as_ref().is_some_and(|n| {
            any_contains(&[n.ethernet_model.as_ref(), n.ethernet_vendor.as_ref()], maker)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_only_needs_cpu() {
        let hw = HardwareProfile::from_json_str(
            r#"{"cpu":{"model":"Intel Core i7-8700K","vendor":"Intel","microarchitecture":"Coffee Lake"}}"#,
        )
        .unwrap();
        assert!(hw.is_intel_cpu());
        assert!(hw.microarch_is("coffee lake"));
        assert!(!hw.has_audio());
        assert!(!hw.wifi_from("Intel"));
    }

    #[test]
    fn network_matching_checks_model_and_vendor() {
        let hw = HardwareProfile {
            network: Some(NetworkInfo {
                wifi_model: Some("BCM94360CD".into()),
                wifi_vendor: Some("Broadcom".into()),
                ethernet_model: Some("RTL8111H".into()),
                ethernet_vendor: Some("Realtek".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(hw.wifi_from("broadcom"));
        assert!(hw.ethernet_from("Realtek"));
        assert!(!hw.ethernet_from("Intel"));
    }

    #[test]
    fn missing_cpu_is_rejected() {
        assert!(HardwareProfile::from_json_str(r#"{"gpu":{"model":"x","vendor":"AMD"}}"#).is_err());
    }
}
