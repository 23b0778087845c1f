//! Retained SVG element tree.

use std::fmt::{self, Write};

/// Attribute carrying a shape fingerprint on rendered elements.
pub const HASH_ATTR: &str = "cgHash";
/// Attribute carrying the brush key on shared definitions.
pub const KEY_ATTR: &str = "cgKey";

/// An SVG element with ordered attributes, child elements and optional raw
/// inner markup (custom graphics are kept as opaque text).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgElement {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<SvgElement>,
    inner_markup: Option<String>,
}

impl SvgElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder form of [`set_attr`](Self::set_attr).
    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder form of [`push_child`](Self::push_child).
    pub fn child(mut self, child: SvgElement) -> Self {
        self.children.push(child);
        self
    }

    /// Attach raw markup, written verbatim after the child elements.
    pub fn with_inner_markup(mut self, markup: impl Into<String>) -> Self {
        self.inner_markup = Some(markup.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[SvgElement] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<SvgElement> {
        &mut self.children
    }

    pub fn push_child(&mut self, child: SvgElement) {
        self.children.push(child);
    }

    pub fn inner_markup(&self) -> Option<&str> {
        self.inner_markup.as_deref()
    }

    /// Depth-first iterator over this element and all descendants.
    pub fn descendants(&self) -> impl Iterator<Item = &SvgElement> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    /// Number of descendants (this element included) with the given tag.
    pub fn count_tag(&self, tag: &str) -> usize {
        self.descendants().filter(|e| e.tag == tag).count()
    }

    /// Serialize to SVG markup.
    pub fn write_markup(&self, out: &mut String) -> fmt::Result {
        write!(out, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            write!(out, " {}=\"{}\"", name, escape_attr(value))?;
        }
        if self.children.is_empty() && self.inner_markup.is_none() {
            return out.write_str("/>");
        }
        out.write_char('>')?;
        for child in &self.children {
            child.write_markup(out)?;
        }
        if let Some(markup) = &self.inner_markup {
            out.write_str(markup)?;
        }
        write!(out, "</{}>", self.tag)
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_markup(&mut out);
        out
    }
}

impl fmt::Display for SvgElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

/// Escape a value for use inside a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
