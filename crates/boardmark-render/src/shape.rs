//! Turning one prepared shape into SVG elements.

use crate::defs::{SHAFT_MASK_ID, gradient_id, marker_id, url_ref};
use crate::svg::{HASH_ATTR, SvgElement};
use boardmark_core::geometry::{square_center, square_size};
use boardmark_core::{
    ArrowTally, Bounds, Brush, BrushCatalog, Orientation, Shape, ShapeKind, Square, SyncableShape,
};
use kurbo::{Point, Vec2};

/// Stroke width of square outlines.
pub const SQUARE_STROKE_WIDTH: f64 = 4.0 / 64.0;
/// Extra width of the white halo under hilited arrows.
pub const HILITE_EXTRA_WIDTH: f64 = 0.04;

/// Arrow line width in user units.
pub fn line_width(brush: &Brush, current: bool) -> f64 {
    let base = if brush.line_width != 0.0 { brush.line_width } else { 10.0 };
    let factor = if current { 0.85 } else { 1.0 };
    base * factor / 64.0
}

/// Element opacity; the live shape is drawn slightly fainter.
pub fn opacity(brush: &Brush, current: bool) -> f64 {
    let base = if brush.opacity != 0.0 { brush.opacity } else { 1.0 };
    let factor = if current { 0.9 } else { 1.0 };
    base * factor
}

/// Distance kept free before the destination center.
pub fn arrow_margin(shorten: bool) -> f64 {
    (if shorten { 20.0 } else { 10.0 }) / 64.0
}

/// A shape with its brush resolved, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Styled<'s> {
    /// Raw inline markup; needs no brush.
    Custom(&'s str),
    Arrow { dest: Square, brush: Brush },
    Square(Brush),
}

impl<'s> Styled<'s> {
    /// Resolve the shape's brush. `None` when the brush is missing from `catalog`.
    pub fn resolve(shape: &'s Shape, catalog: &BrushCatalog) -> Option<Self> {
        let brush = || catalog.resolve(&shape.brush, shape.modifiers.as_ref());
        Some(match shape.kind() {
            ShapeKind::Custom { svg } => Styled::Custom(svg),
            ShapeKind::Arrow { dest } => Styled::Arrow {
                dest,
                brush: brush()?,
            },
            ShapeKind::Square => Styled::Square(brush()?),
        })
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Styled::Custom(_))
    }
}

/// Per-pass inputs shared by every shape.
#[derive(Debug, Clone, Copy)]
pub struct ShapeContext<'a> {
    pub orientation: Orientation,
    pub bounds: Bounds,
    pub tally: &'a ArrowTally,
}

/// Straight arrow geometry in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowGeometry {
    pub from: Point,
    /// End of the shortened shaft, where the marker sits.
    pub tip: Point,
    /// Angle of the line in radians.
    pub angle: f64,
    pub shaft_length: f64,
    pub margin: f64,
}

impl ArrowGeometry {
    pub fn new(from: Point, to: Point, margin: f64) -> Self {
        let delta: Vec2 = to - from;
        let angle = delta.atan2();
        let shaft_length = (delta.hypot() - margin).max(0.0);
        Self {
            from,
            tip: from + Vec2::from_angle(angle) * shaft_length,
            angle,
            shaft_length,
            margin,
        }
    }
}

impl ShapeContext<'_> {
    fn center(&self, square: Square) -> Point {
        square_center(square, self.orientation, self.bounds)
    }

    /// Geometry of an arrow; arrows sharing their destination are shortened
    /// unless they are the live preview.
    pub fn arrow_geometry(&self, orig: Square, dest: Square, current: bool) -> ArrowGeometry {
        let shorten = self.tally.is_shared(dest) && !current;
        ArrowGeometry::new(self.center(orig), self.center(dest), arrow_margin(shorten))
    }

    /// Render a resolved shape, tagged with its fingerprint.
    pub fn render(&self, syncable: &SyncableShape<'_>, styled: &Styled<'_>) -> SvgElement {
        let shape = syncable.shape;
        let el = match styled {
            Styled::Custom(svg) => self.render_custom(svg, shape.orig),
            Styled::Arrow { dest, brush } => {
                let geometry = self.arrow_geometry(shape.orig, *dest, syncable.current);
                render_arrow(&geometry, brush, syncable.current, shape.is_hilited())
            }
            Styled::Square(brush) => self.render_square(shape.orig, brush, syncable.current),
        };
        el.attr(HASH_ATTR, &syncable.hash)
    }

    /// Outline of one square, clipped by a nested viewport so the stroke stays inside.
    fn render_square(&self, square: Square, brush: &Brush, current: bool) -> SvgElement {
        let center = self.center(square);
        let size = square_size(self.bounds);
        SvgElement::new("svg")
            .attr("x", center.x - size.width / 2.0)
            .attr("y", center.y - size.height / 2.0)
            .attr("width", size.width)
            .attr("height", size.height)
            .attr("overflow", "hidden")
            .child(
                SvgElement::new("rect")
                    .attr("x", 0)
                    .attr("y", 0)
                    .attr("width", size.width)
                    .attr("height", size.height)
                    .attr("fill", "none")
                    .attr("stroke", brush.color)
                    .attr("stroke-width", SQUARE_STROKE_WIDTH)
                    .attr("opacity", opacity(brush, current)),
            )
    }

    /// Raw markup in a 100x100 frame over the origin square.
    fn render_custom(&self, svg: &str, square: Square) -> SvgElement {
        let center = self.center(square);
        let size = square_size(self.bounds);
        let x = center.x - size.width / 2.0;
        let y = center.y - size.height / 2.0;
        SvgElement::new("g")
            .attr("transform", format!("translate({x},{y})"))
            .child(
                SvgElement::new("svg")
                    .attr("width", size.width)
                    .attr("height", size.height)
                    .attr("viewBox", "0 0 100 100")
                    .with_inner_markup(svg),
            )
    }
}

/// One colored pass of an arrow: gradient shaft plus the invisible line that
/// carries the arrowhead marker.
fn render_arrow_pass(geometry: &ArrowGeometry, key: &str, width: f64, opacity: f64) -> SvgElement {
    let from = geometry.from;
    let degrees = geometry.angle.to_degrees();
    let shaft = SvgElement::new("rect")
        .attr("x", 0)
        .attr("y", -width / 2.0)
        .attr("width", geometry.shaft_length)
        .attr("height", width)
        .attr("fill", url_ref(&gradient_id(key)))
        .attr("mask", url_ref(SHAFT_MASK_ID))
        .attr("transform", format!("translate({},{}) rotate({})", from.x, from.y, degrees));
    let carrier = SvgElement::new("line")
        .attr("x1", from.x)
        .attr("y1", from.y)
        .attr("x2", geometry.tip.x)
        .attr("y2", geometry.tip.y)
        .attr("stroke", "transparent")
        .attr("stroke-width", width)
        .attr("marker-end", url_ref(&marker_id(key)));
    SvgElement::new("g")
        .attr("opacity", opacity)
        .child(shaft)
        .child(carrier)
}

/// Arrow, with a white halo pass underneath when hilited.
pub fn render_arrow(geometry: &ArrowGeometry, brush: &Brush, current: bool, hilite: bool) -> SvgElement {
    let width = line_width(brush, current);
    let colored = render_arrow_pass(geometry, &brush.key, width, opacity(brush, current));
    if !hilite {
        return colored;
    }
    let halo = render_arrow_pass(
        geometry,
        boardmark_core::HILITE_BRUSH_KEY,
        width + HILITE_EXTRA_WIDTH,
        1.0,
    );
    SvgElement::new("g").child(halo).child(colored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardmark_core::{BrushCatalog, Modifiers, Shape};
    use kurbo::Size;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn ctx(tally: &ArrowTally) -> ShapeContext<'_> {
        ShapeContext {
            orientation: Orientation::White,
            bounds: Size::new(512.0, 512.0),
            tally,
        }
    }

    #[test]
    fn test_width_and_opacity_rules() {
        let brush = BrushCatalog::default().get("paleBlue").unwrap().clone();
        assert!((line_width(&brush, false) - 15.0 / 64.0).abs() < 1e-12);
        assert!((line_width(&brush, true) - 15.0 * 0.85 / 64.0).abs() < 1e-12);
        assert!((opacity(&brush, true) - 0.36).abs() < 1e-12);

        let zero = Brush::new("z", brush.color, 0.0, 0.0);
        assert!((line_width(&zero, false) - 10.0 / 64.0).abs() < 1e-12);
        assert!((opacity(&zero, false) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_arrow_geometry_margin() {
        let g = ArrowGeometry::new(Point::new(0.0, 0.0), Point::new(4.0, 0.0), arrow_margin(false));
        assert!((g.shaft_length - (4.0 - 10.0 / 64.0)).abs() < 1e-12);
        assert!((g.tip.x - g.shaft_length).abs() < 1e-12);
        assert!(g.tip.y.abs() < 1e-12);

        // Degenerate lengths never go negative.
        let short = ArrowGeometry::new(Point::ZERO, Point::new(0.1, 0.0), arrow_margin(true));
        assert!(short.shaft_length.abs() < f64::EPSILON);
    }

    #[test]
    fn test_shared_destination_shortens_non_live() {
        let shapes = vec![
            Shape::arrow(sq("a1"), sq("d4"), "green"),
            Shape::arrow(sq("g1"), sq("d4"), "green"),
        ];
        let tally = ArrowTally::from_shapes(&shapes);
        let c = ctx(&tally);
        let persisted = c.arrow_geometry(sq("a1"), sq("d4"), false);
        let live = c.arrow_geometry(sq("a1"), sq("d4"), true);
        assert!((persisted.margin - 20.0 / 64.0).abs() < 1e-12);
        assert!((live.margin - 10.0 / 64.0).abs() < 1e-12);
        let lone = c.arrow_geometry(sq("a1"), sq("c3"), false);
        assert!((lone.margin - 10.0 / 64.0).abs() < 1e-12);
    }

    #[test]
    fn test_render_arrow_elements() {
        let shape = Shape::arrow(sq("a1"), sq("h8"), "green");
        let tally = ArrowTally::from_shapes([&shape]);
        let styled = Styled::resolve(&shape, &BrushCatalog::default()).unwrap();
        let syncable = SyncableShape {
            shape: &shape,
            current: false,
            hash: "h".into(),
        };
        let el = ctx(&tally).render(&syncable, &styled);
        assert_eq!(el.get_attr(HASH_ATTR), Some("h"));
        assert_eq!(el.count_tag("rect"), 1);
        assert_eq!(el.count_tag("line"), 1);
        let line = el.descendants().find(|e| e.tag() == "line").unwrap();
        assert_eq!(line.get_attr("marker-end"), Some("url(#arrowhead-green)"));
        assert_eq!(line.get_attr("stroke"), Some("transparent"));
        let rect = el.descendants().find(|e| e.tag() == "rect").unwrap();
        assert_eq!(rect.get_attr("fill"), Some("url(#gradient-green)"));
        assert_eq!(rect.get_attr("mask"), Some("url(#cg-shaft-mask)"));
    }

    #[test]
    fn test_render_hilited_arrow_has_halo_first() {
        let shape = Shape::arrow(sq("e2"), sq("e4"), "red").with_modifiers(Modifiers::hilited());
        let tally = ArrowTally::from_shapes([&shape]);
        let styled = Styled::resolve(&shape, &BrushCatalog::default()).unwrap();
        let syncable = SyncableShape {
            shape: &shape,
            current: false,
            hash: "hh".into(),
        };
        let el = ctx(&tally).render(&syncable, &styled);
        assert_eq!(el.children().len(), 2);
        let halo = &el.children()[0];
        let colored = &el.children()[1];
        assert_eq!(halo.get_attr("opacity"), Some("1"));
        assert_eq!(
            halo.children()[1].get_attr("marker-end"),
            Some("url(#arrowhead-hilite)")
        );
        assert_eq!(
            colored.children()[1].get_attr("marker-end"),
            Some("url(#arrowhead-red)")
        );
        let halo_width: f64 = halo.children()[1].get_attr("stroke-width").unwrap().parse().unwrap();
        let width: f64 = colored.children()[1].get_attr("stroke-width").unwrap().parse().unwrap();
        assert!((halo_width - width - HILITE_EXTRA_WIDTH).abs() < 1e-12);
    }

    #[test]
    fn test_render_square_outline() {
        let shape = Shape::square(sq("e4"), "blue");
        let tally = ArrowTally::new();
        let styled = Styled::resolve(&shape, &BrushCatalog::default()).unwrap();
        let syncable = SyncableShape {
            shape: &shape,
            current: true,
            hash: "sq".into(),
        };
        let el = ctx(&tally).render(&syncable, &styled);
        assert_eq!(el.tag(), "svg");
        assert_eq!(el.get_attr("overflow"), Some("hidden"));
        assert_eq!(el.get_attr("x"), Some("0"));
        assert_eq!(el.get_attr("y"), Some("0"));
        let rect = &el.children()[0];
        assert_eq!(rect.get_attr("stroke-width"), Some("0.0625"));
        assert_eq!(rect.get_attr("opacity"), Some("0.9"));
        assert_eq!(rect.get_attr("fill"), Some("none"));
    }

    #[test]
    fn test_render_custom_frame() {
        let shape = Shape::custom(sq("a8"), "<circle cx='50' cy='50' r='40'/>");
        let tally = ArrowTally::new();
        let syncable = SyncableShape {
            shape: &shape,
            current: false,
            hash: "c".into(),
        };
        let styled = Styled::resolve(&shape, &BrushCatalog::empty()).unwrap();
        let el = ctx(&tally).render(&syncable, &styled);
        assert_eq!(el.get_attr("transform"), Some("translate(-4,-4)"));
        let frame = &el.children()[0];
        assert_eq!(frame.get_attr("viewBox"), Some("0 0 100 100"));
        assert_eq!(frame.inner_markup(), Some("<circle cx='50' cy='50' r='40'/>"));
    }

    #[test]
    fn test_resolve_requires_known_brush() {
        let catalog = BrushCatalog::default();
        let arrow = Shape::arrow(sq("b1"), sq("c3"), "magenta");
        assert_eq!(Styled::resolve(&arrow, &catalog), None);
        let square = Shape::square(sq("b1"), "magenta");
        assert_eq!(Styled::resolve(&square, &catalog), None);

        let mut custom = Shape::custom(sq("b1"), "<g/>");
        custom.brush = "magenta".into();
        assert_eq!(Styled::resolve(&custom, &catalog), Some(Styled::Custom("<g/>")));

        let red = Shape::arrow(sq("b1"), sq("c3"), "red").with_modifiers(Modifiers::line_width(6.0));
        match Styled::resolve(&red, &catalog) {
            Some(Styled::Arrow { dest, brush }) => {
                assert_eq!(dest, sq("c3"));
                assert_eq!(brush.key, "red6");
            }
            other => panic!("expected an arrow, got {other:?}"),
        }
    }
}
