//! Board descriptions loaded from JSON.

use boardmark_core::config::from_json_str;
use boardmark_core::{
    BoardState, Bounds, BrushCatalog, ConfigResult, CurrentShape, DrawableState, Orientation,
    Shape,
};
use boardmark_render::{OverlayHost, RenderOutcome, RenderResult, render_overlay, reset_overlay};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Everything needed to render one overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardDescription {
    pub orientation: Orientation,
    /// Viewport size in pixels.
    pub bounds: Bounds,
    pub shapes: Vec<Shape>,
    pub auto_shapes: Vec<Shape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentShape>,
    /// Extra brushes layered over the stock palette.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brushes: Option<BrushCatalog>,
}

impl Default for BoardDescription {
    fn default() -> Self {
        Self {
            orientation: Orientation::White,
            bounds: Size::new(512.0, 512.0),
            shapes: Vec::new(),
            auto_shapes: Vec::new(),
            current: None,
            brushes: None,
        }
    }
}

impl BoardDescription {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        from_json_str(json)
    }

    /// Build the board state the renderer consumes.
    pub fn into_board(self) -> BoardState {
        let brushes = match self.brushes {
            Some(extra) => BrushCatalog::default().merged_with(extra),
            None => BrushCatalog::default(),
        };
        let mut drawable = DrawableState::new(brushes);
        drawable.set_shapes(self.shapes);
        drawable.set_auto_shapes(self.auto_shapes);
        if let Some(current) = self.current {
            drawable.set_current(current);
        }
        BoardState::new(self.orientation, self.bounds, drawable)
    }

    /// Replace the contents of a live `board` with this description and
    /// reconcile `host`.
    ///
    /// A changed brush catalog resets the overlay first: elements and
    /// definitions are keyed by brush name, so a restyled brush would otherwise
    /// never reach the scene.
    pub fn apply<H>(self, board: &mut BoardState, host: &mut H) -> RenderResult<RenderOutcome>
    where
        H: OverlayHost + ?Sized,
    {
        let next = self.into_board();
        if board.drawable.brushes != next.drawable.brushes {
            log::debug!("brush catalog changed, resetting overlay");
            board.drawable.brushes = next.drawable.brushes;
            reset_overlay(board, host);
        }
        board.set_orientation(next.orientation);
        board.set_bounds(next.bounds);
        board.drawable.set_shapes(next.drawable.shapes);
        board.drawable.set_auto_shapes(next.drawable.auto_shapes);
        match next.drawable.current {
            Some(current) => board.drawable.set_current(current),
            None => board.drawable.clear_current(),
        }
        render_overlay(board, host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardmark_core::ConfigError;
    use boardmark_render::OverlayScene;

    #[test]
    fn test_empty_object_uses_defaults() {
        let desc = BoardDescription::from_json("{}").unwrap();
        assert_eq!(desc, BoardDescription::default());
        let board = desc.into_board();
        assert_eq!(board.bounds, Size::new(512.0, 512.0));
        assert_eq!(board.drawable.brushes, BrushCatalog::default());
    }

    #[test]
    fn test_full_description() {
        let json = r##"{
            "orientation": "black",
            "bounds": { "width": 400, "height": 300 },
            "shapes": [{ "orig": "e2", "dest": "e4", "brush": "ocean" }],
            "autoShapes": [{ "orig": "d5", "brush": "red" }],
            "current": { "shape": { "orig": "g1", "dest": "f3" }, "pointerSquare": "f3" },
            "brushes": { "ocean": { "key": "ocean", "color": "#0077be", "opacity": 0.8, "lineWidth": 12 } }
        }"##;
        let board = BoardDescription::from_json(json).unwrap().into_board();
        assert_eq!(board.orientation, Orientation::Black);
        assert_eq!(board.bounds, Size::new(400.0, 300.0));
        assert_eq!(board.drawable.shapes.len(), 1);
        assert_eq!(board.drawable.auto_shapes.len(), 1);
        assert!(board.drawable.live_shape().is_some());
        assert!(board.drawable.brushes.get("ocean").is_some());
        assert!(board.drawable.brushes.get("green").is_some());
    }

    #[test]
    fn test_bad_square_is_rejected() {
        let result = BoardDescription::from_json(r#"{ "shapes": [{ "orig": "z9" }] }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_apply_restyled_brush_reaches_scene() {
        let arrow = r#"{ "shapes": [{ "orig": "e2", "dest": "e4" }] }"#;
        let restyled = r##"{
            "shapes": [{ "orig": "e2", "dest": "e4" }],
            "brushes": { "green": { "key": "green", "color": "#0000ff", "opacity": 1, "lineWidth": 10 } }
        }"##;
        let mut board = BoardState::default();
        let mut scene = OverlayScene::new();

        BoardDescription::from_json(arrow)
            .unwrap()
            .apply(&mut board, &mut scene)
            .unwrap();
        assert!(scene.shapes_svg().to_markup().contains("#15781b"));

        let outcome = BoardDescription::from_json(restyled)
            .unwrap()
            .apply(&mut board, &mut scene)
            .unwrap();
        assert!(outcome.mutations() > 0);
        let markup = scene.shapes_svg().to_markup();
        assert!(markup.contains("fill=\"#0000ff\""));
        assert!(!markup.contains("#15781b"));

        let again = BoardDescription::from_json(restyled)
            .unwrap()
            .apply(&mut board, &mut scene)
            .unwrap();
        assert_eq!(again, RenderOutcome::Unchanged);
    }
}
