//! In-memory Document Tree
//!
//! Parses a catalog file into an owned tree of elements and text with `quick-xml`,
//! normalizes it once, and offers the read-only lookups the catalog queries need:
//! tag search in document order, attribute maps and text content.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{LoadError, LoadResult};

/// Origin reported in errors for documents parsed from memory
const IN_MEMORY: &str = "<memory>";

/// A name/value pair attached to an element, as read from the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A node of the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// A tagged node with attributes and ordered children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes exactly as they appeared, duplicates included
    pub fn raw_attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Name to value mapping of this element's attributes.
    ///
    /// A repeated attribute name keeps the value of its first occurrence.
    pub fn attributes(&self) -> AttributeMap {
        AttributeMap::from_attributes(&self.attributes)
    }

    /// Value of the first attribute called `name`
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct element children in document order
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Concatenation of all descendant text in document order
    pub fn text_content(&self) -> String {
        let mut buf = String::new();
        self.collect_text(&mut buf);
        buf
    }

    fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => buf.push_str(text),
                Node::Element(element) => element.collect_text(buf),
            }
        }
    }

    fn collect_by_tag<'a>(&'a self, tag: &str, out: &mut Vec<&'a Element>) {
        if self.name == tag {
            out.push(self);
        }
        for child in self.child_elements() {
            child.collect_by_tag(tag, out);
        }
    }

    /// Merge adjacent text nodes and drop empty ones.
    ///
    /// Whitespace-only text is kept: it still separates inline elements in
    /// mixed content, and `child_elements` never sees it.
    fn normalize(&mut self) {
        let mut merged: Vec<Node> = Vec::with_capacity(self.children.len());
        for child in self.children.drain(..) {
            match child {
                Node::Text(text) => match merged.last_mut() {
                    Some(Node::Text(previous)) => previous.push_str(&text),
                    _ => merged.push(Node::Text(text)),
                },
                Node::Element(mut element) => {
                    element.normalize();
                    merged.push(Node::Element(element));
                }
            }
        }

        merged.retain(|node| !matches!(node, Node::Text(text) if text.is_empty()));
        self.children = merged;
    }

    fn from_start(start: &BytesStart<'_>, origin: &Path) -> LoadResult<Self> {
        let name = utf8(start.name().as_ref(), origin)?.to_string();
        let mut element = Element::new(name);

        let mut attributes = start.attributes();
        attributes.with_checks(false);
        for attr in attributes {
            let attr = attr.map_err(|e| {
                LoadError::malformed(
                    origin,
                    format!("invalid attribute on <{}>: {}", element.name, e),
                )
            })?;
            let key = utf8(attr.key.as_ref(), origin)?.to_string();
            let raw = utf8(&attr.value, origin)?;
            let value = quick_xml::escape::unescape(raw).map_err(|e| {
                LoadError::malformed(
                    origin,
                    format!(
                        "invalid escape in attribute '{}' on <{}>: {}",
                        key, element.name, e
                    ),
                )
            })?;
            element.attributes.push(Attribute {
                name: key,
                value: value.into_owned(),
            });
        }

        Ok(element)
    }
}

/// Insertion-ordered attribute mapping with first-wins semantics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<(String, String)>,
}

impl AttributeMap {
    pub fn from_attributes(attributes: &[Attribute]) -> Self {
        let mut map = Self::default();
        for attr in attributes {
            map.insert_if_absent(&attr.name, &attr.value);
        }
        map
    }

    /// Insert unless `name` is already present; returns whether it was inserted
    pub fn insert_if_absent(&mut self, name: &str, value: &str) -> bool {
        if self.contains_key(name) {
            return false;
        }
        self.entries.push((name.to_string(), value.to_string()));
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Immutable, normalized document tree
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Read and parse the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_bytes(&bytes, path)
    }

    /// Parse markup held in memory.
    pub fn parse(xml: &str) -> LoadResult<Self> {
        Self::parse_bytes(xml.as_bytes(), Path::new(IN_MEMORY))
    }

    fn parse_bytes(bytes: &[u8], origin: &Path) -> LoadResult<Self> {
        let content = std::str::from_utf8(strip_bom(bytes))
            .map_err(|e| LoadError::malformed(origin, format!("invalid UTF-8: {}", e)))?;

        let mut reader = Reader::from_str(content);
        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(LoadError::malformed(
                        origin,
                        format!("{} (at byte {})", e, reader.error_position()),
                    ));
                }
            };

            match event {
                Event::Start(start) => open.push(Element::from_start(&start, origin)?),
                Event::Empty(start) => {
                    let element = Element::from_start(&start, origin)?;
                    attach(&mut open, &mut root, element, origin)?;
                }
                Event::End(end) => {
                    let element = open.pop().ok_or_else(|| {
                        LoadError::malformed(
                            origin,
                            format!(
                                "unexpected end tag </{}>",
                                String::from_utf8_lossy(end.name().as_ref())
                            ),
                        )
                    })?;
                    attach(&mut open, &mut root, element, origin)?;
                }
                Event::Text(text) => {
                    let text = text.xml10_content().map_err(|e| invalid_text(origin, e))?;
                    push_text(&mut open, &text, origin)?;
                }
                Event::CData(cdata) => {
                    let text = cdata.xml10_content().map_err(|e| invalid_text(origin, e))?;
                    push_text(&mut open, &text, origin)?;
                }
                Event::GeneralRef(reference) => {
                    let name = utf8(reference.as_ref(), origin)?;
                    let resolved = resolve_entity(name).ok_or_else(|| {
                        LoadError::malformed(origin, format!("unknown entity &{};", name))
                    })?;
                    push_text(&mut open, &resolved, origin)?;
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions and DOCTYPE carry no data
                _ => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(LoadError::malformed(
                origin,
                format!("unclosed element <{}>", unclosed.name),
            ));
        }

        let mut root =
            root.ok_or_else(|| LoadError::malformed(origin, "document has no root element"))?;
        root.normalize();
        Ok(Self { root })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Every element named `tag`, root included, in document (pre-order) order
    pub fn elements_by_tag(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.root.collect_by_tag(tag, &mut found);
        found
    }
}

fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    origin: &Path,
) -> LoadResult<()> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(LoadError::malformed(
            origin,
            format!("second root element <{}>", element.name),
        ));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(open: &mut [Element], text: &str, origin: &Path) -> LoadResult<()> {
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(text.to_string()));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(LoadError::malformed(
            origin,
            "character data outside the root element",
        )),
    }
}

fn utf8<'a>(bytes: &'a [u8], origin: &Path) -> LoadResult<&'a str> {
    std::str::from_utf8(bytes)
        .map_err(|e| LoadError::malformed(origin, format!("invalid UTF-8: {}", e)))
}

fn invalid_text(origin: &Path, error: quick_xml::encoding::EncodingError) -> LoadError {
    LoadError::malformed(origin, format!("invalid text content: {}", error))
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes)
}

/// Resolve predefined and numeric character references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };
    char::from_u32(code).map(|c| c.to_string())
}
