//! Fixed quirk tables written by synthesis.
//!
//! Booleans unless noted; the three timeouts/delays are integers.

use ocforge_core::{Dict, DocumentValue};

use super::modes::GenerationMode;

pub fn acpi_quirks() -> Dict {
    Dict::new()
        .with("FadtEnableReset", true)
        .with("NormalizeHeaders", true)
        .with("RebaseRegions", true)
        .with("ResetHpet", false)
        .with("ResetLogoStatus", false)
}

pub fn boot_quirks() -> Dict {
    [
        ("AllowNvramReset", true),
        ("AvoidRuntimeDefrag", true),
        ("DevirtualiseMmio", false),
        ("DisableSingleUser", false),
        ("DisableVariableWrite", false),
        ("DiscardHibernateMap", false),
        ("EnableSafeModeSlide", true),
        ("EnableWriteUnprotector", true),
        ("ForceBooterSignature", false),
        ("ForceExitBootServices", false),
        ("ProtectCsmRegion", false),
        ("ProtectSecureBoot", false),
        ("ProtectUefiServices", false),
        ("ProvideCustomSlide", true),
        ("RebuildAppleMemoryMap", true),
        ("SetupVirtualMap", true),
        ("SignalAppleOS", false),
        ("SyncRuntimePermissions", true),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), DocumentValue::from(v)))
    .collect()
}

/// `XhciPortLimit` is only enabled outside conservative mode.
pub fn kernel_quirks(mode: GenerationMode) -> Dict {
    Dict::new()
        .with("AppleCpuPmCfgLock", false)
        .with("AppleXcpmCfgLock", false)
        .with("AppleXcpmExtraMsrs", false)
        .with("AppleXcpmForceBoost", false)
        .with("CustomSMBIOSGuid", false)
        .with("DisableIoMapper", false)
        .with("DisableLinkeditJettison", true)
        .with("DisableRtcChecksum", false)
        .with("ExtendBTFeatureFlags", false)
        .with("ExternalDiskIcons", true)
        .with("ForceSecureBootScheme", false)
        .with("IncreasePciBarSize", false)
        .with("LapicKernelPanic", false)
        .with("LegacyCommpage", false)
        .with("PanicNoKextDump", true)
        .with("PowerTimeoutKernelPanic", true)
        .with("SetApfsTrimTimeout", 0i64)
        .with("ThirdPartyDrives", true)
        .with("XhciPortLimit", mode != GenerationMode::Conservative)
}

pub fn uefi_quirks() -> Dict {
    Dict::new()
        .with("AvoidHighAlloc", false)
        .with("DisableSecurityPolicy", false)
        .with("EnableAudioSupport", false)
        .with("ExitBootServicesDelay", 0i64)
        .with("IgnoreInvalidFlexRatio", false)
        .with("ReleaseUsbOwnership", true)
        .with("RequestBootVarRouting", true)
        .with("TscSyncTimeout", 0i64)
        .with("UnblockFsConnect", false)
}
