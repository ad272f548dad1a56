//! File-backed `log` sink. The terminal belongs to the game, so records go to a file.

use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

/// Writes `[seconds LEVEL target] message` lines to a file.
pub struct FileLogger {
    level: LevelFilter,
    started: Instant,
    file: Mutex<File>,
}

impl FileLogger {
    /// Open (truncate) `path` for logging at `level`.
    pub fn open(path: &Path, level: LevelFilter) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            level,
            started: Instant::now(),
            file: Mutex::new(file),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(
                file,
                "[{:>9.3} {:<5} {}] {}",
                self.started.elapsed().as_secs_f64(),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Install a [`FileLogger`] as the global logger. Without a call, logging stays off.
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    let logger = FileLogger::open(path, level)
        .with_context(|| format!("opening log file {}", path.display()))?;
    log::set_boxed_logger(Box::new(logger)).context("installing logger")?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_file_logger_filters_by_level() {
        let path = std::env::temp_dir().join(format!("blockblast-log-{}", std::process::id()));
        let logger = FileLogger::open(&path, LevelFilter::Info).unwrap();
        logger.log(
            &Record::builder()
                .args(format_args!("game over: score {}", 120))
                .level(Level::Info)
                .target("blockblast::game")
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("placed single"))
                .level(Level::Debug)
                .target("blockblast::game")
                .build(),
        );
        logger.flush();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(written.contains("INFO  blockblast::game] game over: score 120"));
        assert!(!written.contains("placed single"));
    }
}
