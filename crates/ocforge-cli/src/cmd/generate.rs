use std::path::Path;

use anyhow::Result;
use ocforge_engine::{Engine, GenerationMode};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::io::input;
use crate::output;

pub fn run(
    engine: &Engine,
    hardware: &Path,
    mode: GenerationMode,
    smbios: Option<&str>,
    seed: Option<u64>,
    out: &Path,
) -> Result<bool> {
    let hw = input::read_hardware(hardware)?;
    let result = match seed {
        Some(s) => engine.synthesize_with_rng(&hw, mode, smbios, &mut StdRng::seed_from_u64(s)),
        None => engine.synthesize(&hw, mode, smbios),
    };
    input::write_document(&result.document, out)?;

    if output::is_json() {
        output::print(&result)?;
        return Ok(true);
    }
    for w in &result.warnings {
        output::warning(w);
    }
    output::line(&format!("SMBIOS   {} ({:?})", result.smbios.name, result.smbios_source));
    output::line(&format!("kexts    {}", result.kexts.join(", ")));
    output::line(&format!("drivers  {}", result.drivers.join(", ")));
    output::line(&format!("ssdts    {}", result.ssdts.join(", ")));
    output::ok(&format!("wrote {}", out.display()));
    Ok(true)
}
