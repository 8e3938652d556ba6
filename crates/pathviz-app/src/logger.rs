//! File logging. The terminal belongs to the UI, so log records go to a
//! file and only when one is configured.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use log::LevelFilter;

/// Install a global logger appending to `path` at `level`.
///
/// Fails if the file cannot be opened or a logger is already installed.
pub fn init(path: &Path, level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::new()
        .filter_level(level)
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(format_record)
        .try_init()?;
    log::info!("logging to {} at {level}", path.display());
    Ok(())
}

fn format_record(buf: &mut env_logger::fmt::Formatter, record: &log::Record<'_>) -> io::Result<()> {
    writeln!(
        buf,
        "[{} {:<5} {}] {}",
        buf.timestamp_millis(),
        record.level(),
        record.target(),
        record.args()
    )
}
