//! Boardmark Application
//!
//! Hosts for the overlay renderer: a command-line tool that turns a board
//! description into SVG markup, and a browser binding for wasm32.

mod cli;
mod description;

pub use cli::{AppError, AppResult, Args, load_description, render_markup, run};
pub use description::BoardDescription;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebOverlay, render_board_markup, start};
