//! Subcommand implementations.
//!
//! Each command returns `Ok(true)` on success, `Ok(false)` when it ran but
//! found problems (non-zero exit without an error message), and `Err` for
//! failures such as unreadable files.

use anyhow::Result;

use crate::args::{Cli, Command};
use crate::io::input;

mod audit;
mod generate;
mod get;
mod set;
mod show;
mod snapshot;
mod validate;

pub fn dispatch(cli: Cli) -> Result<bool> {
    let engine = input::engine(cli.config.as_deref())?;
    match cli.command {
        Command::Validate { plist, schema } => validate::run(&engine, &plist, schema.as_deref()),
        Command::Show { plist, depth } => show::run(&engine, &plist, depth),
        Command::Get { plist, path } => get::run(&engine, &plist, &path),
        Command::Set {
            plist,
            path,
            value,
            kind,
            out,
        } => set::run(&engine, &plist, &path, &value, kind, out.as_deref()),
        Command::Snapshot {
            oc_dir,
            plist,
            clean,
            out,
        } => snapshot::run(&engine, &oc_dir, plist.as_deref(), clean, out.as_deref()),
        Command::Generate {
            hardware,
            mode,
            smbios,
            seed,
            out,
        } => generate::run(&engine, &hardware, mode, smbios.as_deref(), seed, &out),
        Command::Audit { oc_dir } => audit::run(&engine, &oc_dir),
    }
}
