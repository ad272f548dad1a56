//! Best-score persistence: the [`ScoreStore`] trait, an XDG file store and an in-memory store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "blockblast";
const FILENAME: &str = "best";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the best score lives between sessions. Read once at startup, written on every new best.
pub trait ScoreStore {
    /// Stored best score; 0 when nothing has been stored yet.
    fn load(&mut self) -> Result<u32, StoreError>;

    fn save(&mut self, best: u32) -> Result<(), StoreError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn load(&mut self) -> Result<u32, StoreError> {
        (**self).load()
    }

    fn save(&mut self, best: u32) -> Result<(), StoreError> {
        (**self).save(best)
    }
}

/// Config directory from `XDG_CONFIG_HOME` / `HOME` values, falling back to `./.config`.
fn config_base(xdg: Option<String>, home: Option<String>) -> PathBuf {
    match xdg.filter(|x| !x.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => home
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
            .join(".config"),
    }
}

/// Best score as a single decimal line in a file.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_CONFIG_HOME/blockblast/best`, or `~/.config/blockblast/best`.
    pub fn default_path() -> PathBuf {
        config_base(
            std::env::var("XDG_CONFIG_HOME").ok(),
            std::env::var("HOME").ok(),
        )
        .join(APP_DIR)
        .join(FILENAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl ScoreStore for FileScoreStore {
    /// Missing file or unparsable content reads as 0.
    fn load(&mut self) -> Result<u32, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(self.io_error(e)),
        };
        Ok(content
            .lines()
            .next()
            .and_then(|l| l.trim().parse::<u32>().ok())
            .unwrap_or(0))
    }

    /// Creates the parent directory if needed.
    fn save(&mut self, best: u32) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let mut f = fs::File::create(&self.path).map_err(|e| self.io_error(e))?;
        writeln!(f, "{best}").map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

/// Keeps the best score in memory only (`--no-persist`, tests).
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    best: u32,
    saves: Vec<u32>,
}

impl MemoryScoreStore {
    pub fn with_best(best: u32) -> Self {
        Self {
            best,
            saves: Vec::new(),
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Every value passed to `save`, oldest first.
    pub fn saves(&self) -> &[u32] {
        &self.saves
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&mut self) -> Result<u32, StoreError> {
        Ok(self.best)
    }

    fn save(&mut self, best: u32) -> Result<(), StoreError> {
        self.best = best;
        self.saves.push(best);
        Ok(())
    }
}
