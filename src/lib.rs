//! Blockblast — block-placement puzzle in the terminal.
//!
//! Drag pieces from a three-piece hand onto the board; full rows and columns
//! clear for points, consecutive clears build a combo. The rule engine lives in
//! [`board`], [`shapes`] and [`game`]; [`app`] and [`ui`] are the terminal front-end.

pub mod app;
pub mod board;
pub mod game;
pub mod highscores;
pub mod input;
pub mod keyfile;
pub mod logging;
pub mod shapes;
pub mod theme;
pub mod ui;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Options derived from CLI that affect the session (board size, seed, input).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub grid_size: usize,
    pub seed: Option<u64>,
    pub mouse: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: board::DEFAULT_GRID_SIZE,
            seed: None,
            mouse: true,
        }
    }
}

impl From<&Args> for GameConfig {
    fn from(args: &Args) -> Self {
        Self {
            grid_size: args.grid_size as usize,
            seed: args.seed,
            mouse: !args.no_mouse,
        }
    }
}

/// Block-placement puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blockblast",
    version,
    about = "Block-placement puzzle in the terminal. Drop pieces on the grid; full rows and columns clear.",
    long_about = "Blockblast is a terminal block-placement puzzle.\n\n\
        Three pieces wait in the tray. Drag one onto the board: fill a whole row or column to clear it. \
        Clearing on consecutive drops builds a combo worth extra points. The game ends when no piece in \
        the tray fits anywhere; a new board starts right away.\n\n\
        CONTROLS:\n  1 2 3       Pick a piece    Arrows/hjkl Move it\n  Enter/Space Drop            Esc         Put it back\n  \
        ?           Help            n           New game    q  Quit\n\n\
        The mouse works too: press on a piece, drag it over the board, release to drop."
)]
pub struct Args {
    /// Path to theme file (`theme[key]="#RRGGBB"` lines). Uses the built-in palette if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal, light, high-contrast or colorblind.
    #[arg(short, long, default_value = "normal")]
    pub palette: Palette,

    /// Extra shapes (`shape[name]="##/#."` lines) merged into the built-in set.
    #[arg(short, long, value_name = "FILE")]
    pub shapes: Option<PathBuf>,

    /// Board side length in cells.
    #[arg(long, default_value_t = 8, value_name = "N", value_parser = clap::value_parser!(u8).range(4..=16))]
    pub grid_size: u8,

    /// Seed for piece and colour draws (reproducible games).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Best-score file. Defaults to $XDG_CONFIG_HOME/blockblast/best.
    #[arg(long, value_name = "FILE")]
    pub scores_file: Option<PathBuf>,

    /// Keep the best score in memory only.
    #[arg(long)]
    pub no_persist: bool,

    /// Keyboard only: do not capture the mouse.
    #[arg(long)]
    pub no_mouse: bool,

    /// Write log records to this file (the terminal is busy with the game).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for --log-file: error, warn, info, debug, trace.
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: log::LevelFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    Light,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
