//! Live DOM containers for the browser build.

use crate::renderer::{OverlayHost, OverlayLayers, OverlayScene};
use crate::svg::SvgElement;
use crate::sync::KeyedContainer;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Create a DOM subtree mirroring `element`.
fn build_node(document: &Document, element: &SvgElement) -> Result<Element, JsValue> {
    let node = document.create_element_ns(Some(SVG_NS), element.tag())?;
    for (name, value) in element.attrs() {
        if name != "xmlns" {
            node.set_attribute(name, value)?;
        }
    }
    for child in element.children() {
        node.append_child(&build_node(document, child)?)?;
    }
    if let Some(markup) = element.inner_markup() {
        node.insert_adjacent_html("beforeend", markup)?;
    }
    Ok(node)
}

/// A DOM element whose children are reconciled by key.
pub struct DomLayer {
    element: Element,
    document: Document,
}

impl DomLayer {
    pub fn new(element: Element, document: Document) -> Self {
        Self { element, document }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    fn child(&self, index: usize) -> Option<Element> {
        self.element.children().item(index as u32)
    }
}

impl KeyedContainer for DomLayer {
    fn child_keys(&self, attr: &str) -> Vec<Option<String>> {
        let children = self.element.children();
        (0..children.length())
            .map(|i| children.item(i).and_then(|c| c.get_attribute(attr)))
            .collect()
    }

    fn remove_child(&mut self, index: usize) {
        if let Some(child) = self.child(index) {
            child.remove();
        }
    }

    fn move_child(&mut self, from: usize, to: usize) {
        let Some(node) = self.child(from) else {
            return;
        };
        let reference = if from > to {
            self.child(to)
        } else {
            self.child(to + 1)
        };
        if let Err(err) = self.element.insert_before(&node, reference.as_deref()) {
            log::warn!("failed to move overlay node: {err:?}");
        }
    }

    fn insert_child(&mut self, index: usize, element: SvgElement) {
        let node = match build_node(&self.document, &element) {
            Ok(node) => node,
            Err(err) => {
                log::warn!("failed to build <{}>: {err:?}", element.tag());
                return;
            }
        };
        let reference = self.child(index);
        if let Err(err) = self.element.insert_before(&node, reference.as_deref()) {
            log::warn!("failed to insert overlay node: {err:?}");
        }
    }
}

/// Overlay host backed by two `<svg>` roots mounted under a board container.
pub struct DomOverlay {
    defs: DomLayer,
    shapes: DomLayer,
    custom: DomLayer,
}

impl DomOverlay {
    /// Append the shapes and custom-graphics roots to `container`.
    pub fn mount(document: &Document, container: &Element) -> Result<Self, JsValue> {
        let scene = OverlayScene::new();
        let shapes_root = build_node(document, &scene.shapes_svg())?;
        let custom_root = build_node(document, &scene.custom_svg())?;
        container.append_child(&shapes_root)?;
        container.append_child(&custom_root)?;

        let missing = || JsValue::from_str("overlay root is missing a layer");
        let defs = shapes_root.first_element_child().ok_or_else(missing)?;
        let shapes = shapes_root.last_element_child().ok_or_else(missing)?;
        let custom = custom_root.first_element_child().ok_or_else(missing)?;

        Ok(Self {
            defs: DomLayer::new(defs, document.clone()),
            shapes: DomLayer::new(shapes, document.clone()),
            custom: DomLayer::new(custom, document.clone()),
        })
    }
}

impl OverlayHost for DomOverlay {
    type Defs = DomLayer;
    type Layer = DomLayer;

    fn layers(&mut self) -> OverlayLayers<'_, DomLayer, DomLayer> {
        OverlayLayers {
            defs: &mut self.defs,
            shapes: &mut self.shapes,
            custom: &mut self.custom,
        }
    }
}
