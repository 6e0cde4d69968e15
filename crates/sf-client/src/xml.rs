//! A small owned XML tree for reading SOAP responses.
//!
//! Elements are keyed by local name only; lookups return the first match in
//! document order, the same way the partner API responses are usually read.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::error::{Error, ErrorKind, Result};

/// One element: local name, concatenated text, `xsi:nil` flag and children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub text: String,
    pub nil: bool,
    pub children: Vec<XmlNode>,
}

fn xml_error(err: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::Xml(err.to_string()))
}

impl XmlNode {
    fn from_start(start: &BytesStart<'_>) -> Self {
        let nil = start.attributes().flatten().any(|attr| {
            attr.key.local_name().as_ref() == b"nil" && &*attr.value == b"true"
        });

        Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            nil,
            ..Self::default()
        }
    }

    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<XmlNode> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        // stack[0] is a synthetic document node collecting the root element
        let mut stack = vec![XmlNode::default()];

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => stack.push(XmlNode::from_start(&start)),
                Ok(Event::Empty(start)) => {
                    let node = XmlNode::from_start(&start);
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(node);
                    }
                }
                Ok(Event::Text(text)) => {
                    let text = text.unescape().map_err(xml_error)?;
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&text);
                    }
                }
                Ok(Event::CData(data)) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Ok(Event::End(_)) => {
                    if stack.len() < 2 {
                        return Err(xml_error("unexpected closing tag"));
                    }
                    if let Some(node) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(node);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(xml_error(format!(
                        "{} at position {}",
                        e,
                        reader.buffer_position()
                    )))
                }
            }
        }

        if stack.len() != 1 {
            return Err(xml_error("unexpected end of document"));
        }

        stack
            .pop()
            .and_then(|document| document.children.into_iter().next())
            .ok_or_else(|| xml_error("document has no root element"))
    }

    /// First element named `name`, searching self and descendants depth-first.
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Every element named `name`, in document order.
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a XmlNode> {
        let mut found = Vec::new();
        self.collect(name, &mut found);
        found
    }

    fn collect<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlNode>) {
        if self.name == name {
            found.push(self);
        }
        for child in &self.children {
            child.collect(name, found);
        }
    }

    /// Direct children named `name`.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text of the first element named `name`.
    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.find(name).map(|node| node.text.as_str())
    }

    /// Convert this element's content to JSON.
    ///
    /// Leaves become strings (or `null` when `xsi:nil`), elements with
    /// children become objects, repeated child names become arrays.
    pub fn to_value(&self) -> Value {
        if self.children.is_empty() {
            return if self.nil {
                Value::Null
            } else {
                Value::String(self.text.clone())
            };
        }

        let mut map = Map::new();
        for child in &self.children {
            let value = child.to_value();
            match map.get_mut(&child.name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(child.name.clone(), value);
                }
            }
        }
        Value::Object(map)
    }
}
