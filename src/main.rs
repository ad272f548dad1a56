//! Blockblast — block-placement puzzle in the terminal.

use anyhow::{Context, Result};
use blockblast::app::App;
use blockblast::highscores::{FileScoreStore, MemoryScoreStore, ScoreStore};
use blockblast::shapes::Catalog;
use blockblast::theme::Theme;
use blockblast::{Args, GameConfig, logging};
use clap::Parser;

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        logging::init(path, args.log_level)?;
    }

    let theme = Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        log::warn!("theme not loaded, using built-in palette: {e}");
        Theme::for_palette(args.palette)
    });
    let catalog = Catalog::load(args.shapes.as_deref()).with_context(|| match &args.shapes {
        Some(path) => format!("loading shapes from {}", path.display()),
        None => "loading built-in shapes".to_string(),
    })?;
    let store: Box<dyn ScoreStore> = if args.no_persist {
        Box::new(MemoryScoreStore::default())
    } else {
        let store = args
            .scores_file
            .clone()
            .map_or_else(FileScoreStore::default, FileScoreStore::new);
        log::info!("best score file: {}", store.path().display());
        Box::new(store)
    };

    let config = GameConfig::from(&args);
    let mut app = App::new(config, theme, catalog, store);
    app.run()?;
    Ok(())
}
