//! WebAssembly entry point and browser bindings.

use crate::description::BoardDescription;
use boardmark_core::BoardState;
use boardmark_render::DomOverlay;
use wasm_bindgen::prelude::*;

fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

#[wasm_bindgen(start)]
pub fn start() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"boardmark: logger already initialized".into());
    }
    log::info!("Starting boardmark (WASM)");
}

/// Render a JSON board description to SVG markup.
#[wasm_bindgen(js_name = renderBoardMarkup)]
pub fn render_board_markup(json: &str) -> Result<String, JsValue> {
    let description = BoardDescription::from_json(json).map_err(js_error)?;
    crate::cli::render_markup(description).map_err(js_error)
}

/// Overlay mounted under a board element and updated in place.
#[wasm_bindgen]
pub struct WebOverlay {
    board: BoardState,
    host: DomOverlay,
}

#[wasm_bindgen]
impl WebOverlay {
    /// Mount the overlay layers under the element with id `container_id`.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str) -> Result<WebOverlay, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| js_error("no document"))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| js_error(format!("no element with id {container_id}")))?;
        let host = DomOverlay::mount(&document, &container)?;
        Ok(Self {
            board: BoardState::default(),
            host,
        })
    }

    /// Replace the board from a JSON description and reconcile the DOM.
    /// Returns the number of DOM mutations.
    pub fn update(&mut self, json: &str) -> Result<usize, JsValue> {
        let description = BoardDescription::from_json(json).map_err(js_error)?;
        let outcome = description
            .apply(&mut self.board, &mut self.host)
            .map_err(js_error)?;
        Ok(outcome.mutations())
    }
}
