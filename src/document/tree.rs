//! Minimal mutable XML tree over quick-xml events.
//!
//! Text is kept in its escaped form so that a parse/write cycle leaves the
//! body byte-for-byte intact apart from the attributes that were changed.

use std::path::Path;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::DocumentError;

/// A child of an element
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Escaped character data
    Text(String),
    /// Comments, CDATA, processing instructions
    Other(Event<'static>),
}

/// An XML element with attributes in source order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, DocumentError> {
        let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value()?.to_string();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, name: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First direct child with the given name
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    /// All descendants (and self) with the given name, in document order
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect(name, &mut found);
        found
    }

    fn collect<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        if self.name == name {
            found.push(self);
        }
        for child in self.child_elements() {
            child.collect(name, found);
        }
    }

    /// Visit every element with the given name in document order
    pub fn for_each_named_mut<F>(&mut self, name: &str, f: &mut F)
    where
        F: FnMut(&mut Element),
    {
        if self.name == name {
            f(self);
        }
        for node in &mut self.children {
            if let Node::Element(child) = node {
                child.for_each_named_mut(name, f);
            }
        }
    }

    /// Unescaped text of the element and its descendants
    pub fn text_content(&self) -> Result<String, DocumentError> {
        let mut text = String::new();
        self.collect_text(&mut text)?;
        Ok(text)
    }

    fn collect_text(&self, out: &mut String) -> Result<(), DocumentError> {
        for node in &self.children {
            match node {
                Node::Text(raw) => out.push_str(&unescape(raw)?),
                Node::Element(child) => child.collect_text(out)?,
                Node::Other(Event::CData(data)) => {
                    out.push_str(&String::from_utf8_lossy(data))
                }
                Node::Other(_) => {}
            }
        }
        Ok(())
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<(), DocumentError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for node in &self.children {
            match node {
                Node::Element(child) => child.write(writer)?,
                Node::Text(raw) => {
                    writer.write_event(Event::Text(BytesText::from_escaped(raw.as_str())))?
                }
                Node::Other(event) => writer.write_event(event.borrow())?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

/// A parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => stack.push(Element::from_start(e)?),
                Event::Empty(ref e) => {
                    let element = Element::from_start(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(ref e) => {
                    let element = stack.pop().ok_or_else(|| {
                        DocumentError::UnexpectedClose(
                            String::from_utf8_lossy(e.name().as_ref()).to_string(),
                        )
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(ref e) => {
                    if let Some(parent) = stack.last_mut() {
                        let raw = String::from_utf8_lossy(e).to_string();
                        parent.children.push(Node::Text(raw));
                    }
                }
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Eof => break,
                other => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Other(other.into_owned()));
                    }
                }
            }
        }

        if let Some(open) = stack.pop() {
            return Err(DocumentError::Unclosed(open.name));
        }
        root.map(|root| Document { root }).ok_or(DocumentError::NoRoot)
    }

    /// Serialize with an XML declaration
    pub fn to_xml_string(&self) -> Result<String, DocumentError> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
        self.root.write(&mut writer)?;
        writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), DocumentError> {
        std::fs::write(path, self.to_xml_string()?)?;
        Ok(())
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), DocumentError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_some() => return Err(DocumentError::MultipleRoots(element.name)),
        None => *root = Some(element),
    }
    Ok(())
}
