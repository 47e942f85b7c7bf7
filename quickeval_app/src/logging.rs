//! File logger setup.
//!
//! Everything is appended to a single log file as `time - LEVEL - message`.
//! Our own crates log at `Debug`, dependencies at `Info`; `RUST_LOG` overrides both.
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::Local;
use log::LevelFilter;
use quickeval_common::Result;

/// Route the `log` facade to the append-only file at `path`.
pub fn init_logger(path: &Path) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("quickeval", LevelFilter::Debug)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            )
        })
        .init();
    Ok(())
}
