use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::EnvFilter;

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

/// Logs go to stderr. `RUST_LOG` applies unless `-v` was given.
pub fn init_tracing(verbose: u8, json: bool) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

pub fn line(msg: &str) {
    let _ = writeln!(io::stdout(), "{msg}");
}

fn colored(stream: &mut StandardStream, color: Color, label: &str, msg: &str) {
    let _ = stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stream, "{label}");
    let _ = stream.reset();
    let _ = writeln!(stream, " {msg}");
}

pub fn ok(msg: &str) {
    colored(&mut stdout(), Color::Green, "ok", msg);
}

pub fn warning(msg: &str) {
    colored(&mut stdout(), Color::Yellow, "warning:", msg);
}

pub fn problem(msg: &str) {
    colored(&mut stdout(), Color::Red, "error:", msg);
}

pub fn error(msg: &str) {
    colored(&mut StandardStream::stderr(ColorChoice::Auto), Color::Red, "error:", msg);
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(ColorChoice::Auto)
}
