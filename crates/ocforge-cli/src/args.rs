use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use ocforge_engine::GenerationMode;

#[derive(Parser, Debug, Clone)]
#[command(name = "ocforge", version, about = "OpenCore configuration toolkit")]
pub struct Cli {
    /// Emit JSON output on stdout (and JSON logs on stderr).
    #[arg(long, global = true)]
    pub json: bool,

    /// Engine configuration file (JSON).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// How `set` interprets its value argument.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKindArg {
    String,
    Integer,
    Bool,
    Real,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate a config.plist against the OpenCore schema (or a custom one).
    Validate {
        plist: PathBuf,
        /// Schema file, JSON or property list.
        #[arg(long)]
        schema: Option<PathBuf>,
    },

    /// Print the document outline.
    Show {
        plist: PathBuf,
        /// Only descend this many levels.
        #[arg(long)]
        depth: Option<usize>,
    },

    /// Print the value at a dotted path, e.g. `Kernel.Add.0.BundlePath`.
    Get { plist: PathBuf, path: String },

    /// Set the value at a dotted path.
    Set {
        plist: PathBuf,
        path: String,
        value: String,
        #[arg(long, value_enum, default_value_t = ValueKindArg::String)]
        kind: ValueKindArg,
        /// Write here instead of overwriting the input.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Sync ACPI/Kexts/Drivers/Tools entries with an OpenCore directory.
    Snapshot {
        oc_dir: PathBuf,
        /// Document to update (default: <oc_dir>/config.plist).
        #[arg(long)]
        plist: Option<PathBuf>,
        /// Rebuild the arrays instead of merging.
        #[arg(long)]
        clean: bool,
        /// Write here instead of overwriting the document.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Generate a config.plist from a hardware profile.
    Generate {
        /// Hardware profile JSON.
        #[arg(long)]
        hardware: PathBuf,
        #[arg(long, default_value = "standard")]
        mode: GenerationMode,
        /// Force a platform template, e.g. `iMac20,1`.
        #[arg(long)]
        smbios: Option<String>,
        /// Seed for the platform identity generator.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out: PathBuf,
    },

    /// Check an OpenCore directory for problems.
    Audit { oc_dir: PathBuf },
}
