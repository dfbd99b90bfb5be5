//! Read-only model of a rendered document.
//!
//! A [`DocumentSnapshot`] is the serialized capture of a page: every element
//! in document order with its computed style and layout box, plus the text of
//! each stylesheet the capturing context could read. [`Document`] validates the
//! snapshot and indexes it as an arena so elements can be navigated by cheap
//! [`ElementRef`] handles.
//!
//! Snapshot JSON looks like this:
//!
//! ```json
//! {
//!   "url": "https://example.com/",
//!   "elements": [
//!     { "tag": "html", "style": { "background-color": "rgb(255, 255, 255)" } },
//!     { "tag": "body", "parent": 0, "rect": { "width": 1280, "height": 900 } },
//!     { "tag": "a", "parent": 1, "classes": ["btn"], "attributes": { "href": "/" } }
//!   ],
//!   "stylesheets": [{ "href": null, "text": ":root { --brand: #3366ff; }" }]
//! }
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use themesnatch_css::SelectorElement;

use crate::error::DocumentError;

/// Serialized page capture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub url: String,
    /// Capture time in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    /// Elements in document order. The first element is the root.
    #[serde(default)]
    pub elements: Vec<ElementData>,
    #[serde(default)]
    pub stylesheets: Vec<StylesheetData>,
}

/// One element of the capture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementData {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Attributes other than `id` and `class`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Index of the parent element; `None` only for the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    #[serde(default)]
    pub rect: Rect,
    /// Computed style, property name to serialized value.
    #[serde(default)]
    pub style: BTreeMap<String, String>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        ElementData {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_rect(mut self, width: f64, height: f64) -> Self {
        self.rect = Rect { width, height };
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }
}

/// Rendered box size in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A stylesheet attached to the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylesheetData {
    #[serde(default)]
    pub href: Option<String>,
    /// Sheet text, or `None` when the capturing context was denied access.
    #[serde(default)]
    pub text: Option<String>,
}

// ─── Document ───────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Node {
    data: ElementData,
    class_attr: String,
    children: Vec<usize>,
    /// Position within the parent's children.
    position: usize,
}

/// A validated snapshot, indexed for navigation.
#[derive(Debug)]
pub struct Document {
    url: String,
    timestamp: Option<u64>,
    nodes: Vec<Node>,
    stylesheets: Vec<StylesheetData>,
}

impl Document {
    /// Indexes a snapshot.
    ///
    /// Every element after the first must name a parent with a smaller index.
    pub fn new(snapshot: DocumentSnapshot) -> Result<Self, DocumentError> {
        let mut nodes: Vec<Node> = Vec::with_capacity(snapshot.elements.len());

        for (index, mut data) in snapshot.elements.into_iter().enumerate() {
            data.tag.make_ascii_lowercase();
            let mut position = 0;
            match data.parent {
                Some(parent) if parent < index => {
                    let siblings = &mut nodes[parent].children;
                    position = siblings.len();
                    siblings.push(index);
                }
                Some(parent) => return Err(DocumentError::ParentOutOfOrder { index, parent }),
                None if index > 0 => return Err(DocumentError::MultipleRoots { index }),
                None => {}
            }

            let class_attr = data.classes.join(" ");
            nodes.push(Node {
                data,
                class_attr,
                children: Vec::new(),
                position,
            });
        }

        Ok(Document {
            url: snapshot.url,
            timestamp: snapshot.timestamp,
            nodes,
            stylesheets: snapshot.stylesheets,
        })
    }

    /// Parses and indexes a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let snapshot: DocumentSnapshot = serde_json::from_str(json)?;
        Document::new(snapshot)
    }

    /// Reads a JSON snapshot from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Document::from_json(&content)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn stylesheets(&self) -> &[StylesheetData] {
        &self.stylesheets
    }

    pub fn element(&self, index: usize) -> Option<ElementRef<'_>> {
        (index < self.nodes.len()).then_some(ElementRef { doc: self, index })
    }

    /// All elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        (0..self.nodes.len()).map(move |index| ElementRef { doc: self, index })
    }

    /// The document element, normally `<html>`.
    pub fn root(&self) -> Option<ElementRef<'_>> {
        self.element(0)
    }

    /// The first `<body>` element.
    pub fn body(&self) -> Option<ElementRef<'_>> {
        self.elements().find(|el| el.tag() == "body")
    }
}

/// A handle to one element of a [`Document`].
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    doc: &'a Document,
    index: usize,
}

impl<'a> ElementRef<'a> {
    fn node(&self) -> &'a Node {
        &self.doc.nodes[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Lowercase tag name.
    pub fn tag(&self) -> &'a str {
        &self.node().data.tag
    }

    pub fn classes(&self) -> &'a [String] {
        &self.node().data.classes
    }

    /// The full class attribute, space separated.
    pub fn class_attr(&self) -> &'a str {
        &self.node().class_attr
    }

    pub fn rect(&self) -> Rect {
        self.node().data.rect
    }

    /// Computed value of `property`, empty when absent.
    pub fn style(&self, property: &str) -> &'a str {
        self.node()
            .data
            .style
            .get(property)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// All computed properties, including custom properties.
    pub fn styles(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.node()
            .data
            .style
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Minimal selector: `#id`, else `.first-class`, else the tag name.
    pub fn selector(&self) -> String {
        let data = &self.node().data;
        if let Some(id) = data.id.as_deref().filter(|id| !id.is_empty()) {
            return format!("#{}", id);
        }
        match data.classes.iter().find(|c| !c.trim().is_empty()) {
            Some(class) => format!(".{}", class.trim()),
            None => data.tag.to_ascii_lowercase(),
        }
    }

    /// Rendered with a non-empty box and not hidden by `display`,
    /// `visibility` or `opacity`.
    pub fn is_visible(&self) -> bool {
        if self.rect().is_empty() {
            return false;
        }
        if self.style("display") == "none" || self.style("visibility") == "hidden" {
            return false;
        }
        !matches!(self.style("opacity").trim().parse::<f64>(), Ok(o) if o == 0.0)
    }

    pub fn ancestors(&self) -> impl Iterator<Item = ElementRef<'a>> {
        std::iter::successors(SelectorElement::parent(self), |el| {
            SelectorElement::parent(el)
        })
    }

    pub fn children(&self) -> impl Iterator<Item = ElementRef<'a>> {
        let doc = self.doc;
        self.node()
            .children
            .iter()
            .map(move |&index| ElementRef { doc, index })
    }
}

impl std::fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRef")
            .field("index", &self.index)
            .field("selector", &self.selector())
            .finish()
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.index == other.index
    }
}

impl<'a> SelectorElement for ElementRef<'a> {
    fn local_name(&self) -> &str {
        self.tag()
    }

    fn id(&self) -> Option<&str> {
        self.node().data.id.as_deref()
    }

    fn has_class(&self, name: &str) -> bool {
        self.classes().iter().any(|c| c == name)
    }

    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        let data = &self.node().data;
        match name {
            "class" if !data.classes.is_empty() => Some(Cow::Borrowed(self.class_attr())),
            "class" => None,
            "id" => data.id.as_deref().map(Cow::Borrowed),
            _ => data.attributes.get(name).map(|v| Cow::Borrowed(v.as_str())),
        }
    }

    fn parent(&self) -> Option<Self> {
        self.node()
            .data
            .parent
            .map(|index| ElementRef { doc: self.doc, index })
    }

    fn prev_sibling(&self) -> Option<Self> {
        let parent = self.node().data.parent?;
        let position = self.node().position.checked_sub(1)?;
        let index = self.doc.nodes[parent].children[position];
        Some(ElementRef { doc: self.doc, index })
    }

    fn next_sibling(&self) -> Option<Self> {
        let parent = self.node().data.parent?;
        let index = *self.doc.nodes[parent].children.get(self.node().position + 1)?;
        Some(ElementRef { doc: self.doc, index })
    }

    fn is_root(&self) -> bool {
        self.index == 0
    }
}
