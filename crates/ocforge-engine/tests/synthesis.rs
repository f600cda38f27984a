use ocforge_core::schema::{validate, Schema};
use ocforge_core::DocumentValue;
use ocforge_engine::synth::{BuiltinCatalog, SmbiosTemplate};
use ocforge_engine::{Engine, EngineConfig, GenerationMode, HardwareProfile};
use rand::rngs::StdRng;
use rand::SeedableRng;

const COFFEE_LAKE: &str = r#"{
    "cpu": {"model": "Intel Core i7-8700K", "vendor": "Intel", "cores": 6, "microarchitecture": "Coffee Lake"},
    "audio": {"codec": "ALC892", "layout_id": 1}
}"#;

#[test]
fn coffee_lake_desktop() {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let hw = HardwareProfile::from_json_str(COFFEE_LAKE).unwrap();
    let out = engine.synthesize(&hw, GenerationMode::Standard, None);

    assert_eq!(
        out.document.get("PlatformInfo.Generic.SystemProductName", DocumentValue::from("")),
        DocumentValue::from("MacBookPro15,1")
    );
    for k in ["Lilu", "VirtualSMC", "WhateverGreen", "AppleALC", "CPUFriend"] {
        assert!(out.kexts.iter().any(|x| x == k), "{k} missing");
    }
    assert!(validate(out.document.root(), &Schema::opencore_default()).is_empty());
    assert!(!out.document.can_undo());
}

#[test]
fn catalog_hardware_match_beats_heuristic() {
    let mut catalog = BuiltinCatalog::empty();
    catalog.add_smbios(SmbiosTemplate::new("iMac19,1", "C02"));
    catalog.add_hardware_match("i7-8700K", "iMac19,1");
    let engine = Engine::new(EngineConfig::default()).unwrap().with_catalog(catalog);

    let hw = HardwareProfile::from_json_str(COFFEE_LAKE).unwrap();
    let out = engine.synthesize_with_rng(&hw, GenerationMode::Standard, None, &mut StdRng::seed_from_u64(9));
    assert_eq!(out.smbios.name, "iMac19,1");
    assert!(out.kext_details.is_empty());
}

#[test]
fn synthesized_document_round_trips() {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let hw = HardwareProfile::from_json_str(COFFEE_LAKE).unwrap();
    let out = engine.synthesize(&hw, GenerationMode::Aggressive, None);
    let decoded = ocforge_core::codec::decode(&out.document.to_bytes()).unwrap();
    assert_eq!(&decoded, out.document.root());
}
