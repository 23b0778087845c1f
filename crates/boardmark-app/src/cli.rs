//! Command-line rendering: board description in, SVG markup out.

use crate::description::BoardDescription;
use boardmark_core::ConfigError;
use boardmark_render::{OverlayScene, RenderError, RenderOutcome, render_overlay};
use clap::Parser;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "boardmark")]
#[command(version, about = "Render a chessboard annotation overlay to SVG")]
pub struct Args {
    /// Board description JSON file, or `-` to read stdin
    #[arg(value_name = "BOARD")]
    pub input: PathBuf,

    /// Write the markup here instead of stdout
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

impl Args {
    /// The input file, or `None` for stdin.
    pub fn input_path(&self) -> Option<&Path> {
        (self.input.as_os_str() != "-").then_some(self.input.as_path())
    }
}

/// Read a board description from a file, or stdin when `path` is `None`.
pub fn load_description(path: Option<&Path>) -> AppResult<BoardDescription> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    log::debug!("Read board description ({} bytes)", text.len());
    Ok(BoardDescription::from_json(&text)?)
}

/// Render a description into a fresh scene and return its markup.
pub fn render_markup(description: BoardDescription) -> AppResult<String> {
    let mut board = description.into_board();
    let mut scene = OverlayScene::new();
    if let RenderOutcome::Rendered(report) = render_overlay(&mut board, &mut scene)? {
        log::info!(
            "Rendered {} shapes and {} custom graphics",
            report.shapes.inserted,
            report.custom.inserted
        );
    }
    Ok(scene.to_markup())
}

/// Render the board named by `args`.
pub fn run(args: &Args) -> AppResult<()> {
    let description = load_description(args.input_path())?;
    let mut markup = render_markup(description)?;
    markup.push('\n');

    match &args.output {
        Some(path) => {
            std::fs::write(path, markup)?;
            log::info!("Wrote {}", path.display());
        }
        None => std::io::stdout().write_all(markup.as_bytes())?,
    }
    Ok(())
}
