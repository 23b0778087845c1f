//! Brushes: named visual styles for arrows and square highlights.

use crate::config::{self, ConfigError, ConfigResult};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key of the synthetic brush used for the white halo behind hilited arrows.
pub const HILITE_BRUSH_KEY: &str = "hilite";

/// Brush color (RGBA8), serialized as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SvgColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SvgColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse a CSS color: hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), a named
    /// color (`white`) or a functional form (`rgb(...)`, `hsl(...)`).
    pub fn parse(s: &str) -> ConfigResult<Self> {
        let dynamic = peniko::color::parse_color(s.trim())
            .map_err(|e| ConfigError::InvalidColor(format!("{s}: {e}")))?;
        let color: Color = dynamic.to_alpha_color();
        Ok(color.into())
    }
}

impl fmt::Display for SvgColor {
    /// `#rrggbb`, or `#rrggbbaa` when the color is not opaque.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl From<Color> for SvgColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SvgColor> for Color {
    fn from(color: SvgColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl TryFrom<String> for SvgColor {
    type Error = ConfigError;

    fn try_from(value: String) -> ConfigResult<Self> {
        SvgColor::parse(&value)
    }
}

impl From<SvgColor> for String {
    fn from(color: SvgColor) -> Self {
        color.to_string()
    }
}

/// A named visual style. The key doubles as the dedup key for shared
/// definitions (arrowhead markers, gradients).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brush {
    pub key: String,
    pub color: SvgColor,
    pub opacity: f64,
    pub line_width: f64,
}

impl Brush {
    pub fn new(key: impl Into<String>, color: SvgColor, opacity: f64, line_width: f64) -> Self {
        Self {
            key: key.into(),
            color,
            opacity,
            line_width,
        }
    }

    /// The fixed white brush drawn beneath hilited arrows.
    pub fn hilite() -> Self {
        Self::new(HILITE_BRUSH_KEY, SvgColor::white(), 1.0, 1.0)
    }

    /// Derive a one-off brush from modifier overrides.
    ///
    /// The key is the base key followed by the overridden line width, so equal
    /// overrides share one set of definitions.
    pub fn with_modifiers(&self, modifiers: &Modifiers) -> Self {
        let width_override = modifiers.line_width.filter(|w| truthy(*w));
        let key = match width_override {
            Some(width) => format!("{}{}", self.key, width),
            None => self.key.clone(),
        };
        Self {
            key,
            color: self.color,
            opacity: (self.opacity * 10.0).round() / 10.0,
            line_width: width_override.unwrap_or(self.line_width).round(),
        }
    }
}

/// Per-shape overrides of the named brush.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Modifiers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hilite: bool,
}

impl Modifiers {
    pub fn line_width(width: f64) -> Self {
        Self {
            line_width: Some(width),
            hilite: false,
        }
    }

    pub fn hilited() -> Self {
        Self {
            line_width: None,
            hilite: true,
        }
    }
}

/// A number counts as set when it is neither zero nor NaN.
pub(crate) fn truthy(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

/// Catalog of named brushes, read-only to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrushCatalog {
    brushes: BTreeMap<String, Brush>,
}

impl Default for BrushCatalog {
    fn default() -> Self {
        let stock = [
            ("green", SvgColor::rgb(0x15, 0x78, 0x1b), 1.0, 10.0),
            ("red", SvgColor::rgb(0x88, 0x20, 0x20), 1.0, 10.0),
            ("blue", SvgColor::rgb(0x00, 0x30, 0x88), 1.0, 10.0),
            ("yellow", SvgColor::rgb(0xe6, 0x8f, 0x00), 1.0, 10.0),
            ("paleBlue", SvgColor::rgb(0x00, 0x30, 0x88), 0.4, 15.0),
            ("paleGreen", SvgColor::rgb(0x15, 0x78, 0x1b), 0.4, 15.0),
            ("paleRed", SvgColor::rgb(0x88, 0x20, 0x20), 0.4, 15.0),
            ("paleGrey", SvgColor::rgb(0x4a, 0x4a, 0x4a), 0.35, 15.0),
            ("purple", SvgColor::rgb(0x68, 0x21, 0x7a), 0.65, 10.0),
            ("pink", SvgColor::rgb(0xee, 0x20, 0x80), 0.5, 10.0),
            ("white", SvgColor::white(), 1.0, 10.0),
        ];
        Self::from_brushes(
            stock
                .into_iter()
                .map(|(key, color, opacity, width)| Brush::new(key, color, opacity, width)),
        )
    }
}

impl BrushCatalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self {
            brushes: BTreeMap::new(),
        }
    }

    /// Build a catalog keyed by each brush's own key.
    pub fn from_brushes(brushes: impl IntoIterator<Item = Brush>) -> Self {
        Self {
            brushes: brushes.into_iter().map(|b| (b.key.clone(), b)).collect(),
        }
    }

    /// Load a catalog from a JSON object of `name -> brush`.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        config::from_json_str(json)
    }

    /// Overlay `other` on top of this catalog; entries in `other` win.
    pub fn merged_with(mut self, other: BrushCatalog) -> Self {
        self.brushes.extend(other.brushes);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Brush> {
        self.brushes.get(name)
    }

    pub fn len(&self) -> usize {
        self.brushes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brushes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.brushes.keys().map(String::as_str)
    }

    /// Resolve a brush name, applying modifiers when present.
    ///
    /// Without modifiers the catalog brush is returned unchanged. Derived brushes
    /// are computed fresh on every call and never inserted into the catalog.
    pub fn resolve(&self, name: &str, modifiers: Option<&Modifiers>) -> Option<Brush> {
        let base = self.get(name)?;
        Some(match modifiers {
            Some(m) => base.with_modifiers(m),
            None => base.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse_and_format() {
        let green = SvgColor::parse("#15781B").unwrap();
        assert_eq!(green, SvgColor::rgb(0x15, 0x78, 0x1b));
        assert_eq!(green.to_string(), "#15781b");
        assert_eq!(SvgColor::parse("white").unwrap(), SvgColor::white());
        assert_eq!(SvgColor::parse("#fff").unwrap(), SvgColor::white());
        assert_eq!(
            SvgColor::parse("rgb(21, 120, 27)").unwrap(),
            SvgColor::rgb(0x15, 0x78, 0x1b)
        );
        assert_eq!(
            SvgColor::parse("#00000080").unwrap(),
            SvgColor::new(0, 0, 0, 0x80)
        );
        let translucent = SvgColor::new(0, 0, 0, 0x80);
        assert_eq!(translucent.to_string(), "#00000080");
        assert!(matches!(
            SvgColor::parse("not-a-color"),
            Err(ConfigError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_color_peniko_roundtrip() {
        let color = SvgColor::rgb(0xe6, 0x8f, 0x00);
        let peniko_color: Color = color.into();
        assert_eq!(SvgColor::from(peniko_color), color);
    }

    #[test]
    fn test_resolve_without_modifiers_is_unchanged() {
        let catalog = BrushCatalog::default();
        let green = catalog.resolve("green", None).unwrap();
        assert_eq!(&green, catalog.get("green").unwrap());
        assert!(catalog.resolve("magenta", None).is_none());
    }

    #[test]
    fn test_custom_brush_key_collapse() {
        let catalog = BrushCatalog::default();
        let a = catalog.resolve("red", Some(&Modifiers::line_width(6.0))).unwrap();
        let b = catalog.resolve("red", Some(&Modifiers::line_width(6.0))).unwrap();
        let c = catalog.resolve("red", Some(&Modifiers::line_width(8.0))).unwrap();
        assert_eq!(a.key, "red6");
        assert_eq!(a.key, b.key);
        assert_eq!(c.key, "red8");
        assert!((a.line_width - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_custom_brush_rounding() {
        let base = Brush::new("pale", SvgColor::white(), 0.35, 15.0);
        let derived = base.with_modifiers(&Modifiers::line_width(6.6));
        assert_eq!(derived.key, "pale6.6");
        assert!((derived.line_width - 7.0).abs() < f64::EPSILON);
        assert!((derived.opacity - 0.4).abs() < 1e-9);

        // A hilite-only override keeps the base key and width.
        let hilited = base.with_modifiers(&Modifiers::hilited());
        assert_eq!(hilited.key, "pale");
        assert!((hilited.line_width - 15.0).abs() < f64::EPSILON);

        // A zero width is treated as no override.
        let zero = base.with_modifiers(&Modifiers::line_width(0.0));
        assert_eq!(zero.key, "pale");
    }

    #[test]
    fn test_catalog_json_and_merge() {
        let json = r##"{ "orange": { "key": "orange", "color": "#ff8800", "opacity": 0.8, "lineWidth": 12 } }"##;
        let extra = BrushCatalog::from_json_str(json).unwrap();
        assert_eq!(extra.len(), 1);
        let merged = BrushCatalog::default().merged_with(extra);
        assert!(merged.get("orange").is_some());
        assert!(merged.get("green").is_some());
        assert_eq!(merged.len(), BrushCatalog::default().len() + 1);
    }

    #[test]
    fn test_modifiers_serde_defaults() {
        let m: Modifiers = serde_json::from_str("{}").unwrap();
        assert_eq!(m, Modifiers::default());
        let m: Modifiers = serde_json::from_str(r#"{ "lineWidth": 6, "hilite": true }"#).unwrap();
        assert_eq!(m.line_width, Some(6.0));
        assert!(m.hilite);
    }
}
