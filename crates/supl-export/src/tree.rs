//! Generic labeled tree of an export document.
//!
//! The export is a flat-ish XML dump of database rows: every row is an
//! element whose children are single-valued fields. [`Document`] keeps the
//! whole tree in memory and offers the two lookups the extractors need,
//! a descendant search by element name and a child-text lookup by field name.
//!
//! Element names are stored without namespace prefix.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{ExportError, ExportResult};

/// One element of the document: its local name, text content and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder method to set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder method to append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Builder method to append a text-only child, i.e. a field.
    pub fn with_field(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_child(Element::new(name).with_text(text))
    }

    /// Returns the local element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the text content (already trimmed).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the direct children in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Returns the first direct child named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns the text of the first direct child named `name`.
    ///
    /// A child with empty text counts as missing.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(Element::text)
            .filter(|text| !text.is_empty())
    }

    /// Returns the text of a field, or `""` when it is missing.
    pub fn field_or_default(&self, name: &str) -> &str {
        self.field(name).unwrap_or_default()
    }

    /// Iterates over all descendants (not including `self`) in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }
}

/// Pre-order iterator over the descendants of an [`Element`].
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// A parsed export document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Wraps an already-built tree.
    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    /// Reads and parses an export file.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error if the file cannot be read and an
    /// `InvalidDocument` error if it is not well-formed.
    pub fn from_path(path: impl AsRef<Path>) -> ExportResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExportError::io(format!("failed to read {}", path.display())).with_source(e)
        })?;
        Self::parse_str(&content)
    }

    /// Parses an export from a string.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidDocument` error for malformed XML, mismatched tags,
    /// a truncated document or a document without a root element.
    pub fn parse_str(xml: &str) -> ExportResult<Self> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                ExportError::invalid_document(format!(
                    "malformed XML at byte {}",
                    reader.buffer_position()
                ))
                .with_source(e)
            })?;

            match event {
                Event::Start(e) => stack.push(Element::new(local_name(&e))),
                Event::Empty(e) => {
                    attach(Element::new(local_name(&e)), &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        ExportError::invalid_document("closing tag without an open element")
                    })?;
                    attach(element, &mut stack, &mut root)?;
                }
                Event::Text(e) => {
                    if let Some(current) = stack.last_mut() {
                        let text = e.unescape().map_err(|err| {
                            ExportError::invalid_document(format!(
                                "invalid text in <{}>",
                                current.name
                            ))
                            .with_source(err)
                        })?;
                        current.text.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(ExportError::invalid_document(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }

        root.map(Self::from_root)
            .ok_or_else(|| ExportError::invalid_document("document has no root element"))
    }

    /// Returns the root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Iterates over every element named `kind`, in document order.
    pub fn elements<'a, 'k>(
        &'a self,
        kind: &'k str,
    ) -> impl Iterator<Item = &'a Element> + use<'a, 'k> {
        std::iter::once(&self.root)
            .chain(self.root.descendants())
            .filter(move |e| e.name == kind)
    }

    /// Returns the first element named `kind`.
    pub fn first(&self, kind: &str) -> Option<&Element> {
        self.elements(kind).next()
    }

    /// Returns true if the document contains at least one element named `kind`.
    pub fn contains(&self, kind: &str) -> bool {
        self.first(kind).is_some()
    }
}

fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> ExportResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(ExportError::invalid_document(format!(
                "second root element <{}>",
                element.name
            )));
        }
    }
    Ok(())
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}
