//! A tiny owned element tree.
//!
//! Pages are built bottom-up with [`element`] and serialized once with
//! [`Node::to_html`]. Nothing is patched in place: every re-render builds a
//! fresh tree.

use crate::error::{ReportError, Result};
use serde_json::Value;
use std::fmt::{self, Write as FmtWrite};

const VOID_TAGS: [&str; 8] = [
    "area", "br", "col", "hr", "img", "input", "link", "meta",
];

/// A property value. Booleans render as present/absent attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(String),
    Bool(bool),
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Str(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Str(s)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Str(fmt_num(v))
    }
}

/// Ordered property mapping handed to [`element`].
#[derive(Debug, Clone, Default)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property. `classList` and `className` map to `class`; a later
    /// value for the same name replaces the earlier one.
    pub fn set(mut self, name: &str, value: impl Into<PropValue>) -> Self {
        let name = match name {
            "classList" | "className" => "class",
            other => other,
        };
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.set("id", PropValue::Str(id.into()))
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.set("classList", PropValue::Str(class.into()))
    }
}

/// Anything that may appear in a child list.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Empty,
    Text(String),
    Node(Node),
    List(Vec<Child>),
}

impl From<&str> for Child {
    fn from(s: &str) -> Self {
        Child::Text(s.to_string())
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Child::Text(s)
    }
}

impl From<Node> for Child {
    fn from(n: Node) -> Self {
        Child::Node(n)
    }
}

impl From<Element> for Child {
    fn from(e: Element) -> Self {
        Child::Node(Node::Element(e))
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(items: Vec<T>) -> Self {
        Child::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(item: Option<T>) -> Self {
        item.map(Into::into).unwrap_or(Child::Empty)
    }
}

impl TryFrom<Value> for Child {
    type Error = ReportError;

    /// Dynamic children, e.g. caption text that came in with the results.
    /// Only strings, arrays of children and null are accepted.
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Child::Empty),
            Value::String(s) => Ok(Child::Text(s)),
            Value::Array(items) => items
                .into_iter()
                .map(Child::try_from)
                .collect::<Result<Vec<_>>>()
                .map(Child::List),
            other => Err(ReportError::InvalidChild(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, PropValue)>,
    children: Vec<Node>,
}

/// Build one element from a tag, its properties and a (possibly nested)
/// child list. Nested lists are flattened in order and empty children are
/// skipped.
pub fn element(tag: &str, props: Props, children: impl Into<Child>) -> Node {
    let mut el = Element {
        tag: tag.to_string(),
        attrs: props.entries,
        children: Vec::new(),
    };
    el.append(children.into());
    Node::Element(el)
}

impl Element {
    fn append(&mut self, child: Child) {
        match child {
            Child::Empty => {}
            Child::Text(s) => self.children.push(Node::Text(s)),
            Child::Node(n) => self.children.push(n),
            Child::List(items) => {
                for item in items {
                    self.append(item);
                }
            }
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(n, _)| n == name).and_then(|(_, v)| match v {
            PropValue::Str(s) => Some(s.as_str()),
            PropValue::Bool(true) => Some(""),
            PropValue::Bool(false) => None,
        })
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<PropValue>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(s) => out.push_str(s),
                Node::Element(e) => out.push_str(&e.text_content()),
            }
        }
        out
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.attr("id") == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|e| e.find_by_id(id))
    }

    /// All descendants (including `self`) with the given tag, in document
    /// order.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect(tag, &mut out);
        out
    }

    fn collect<'a>(&'a self, tag: &str, out: &mut Vec<&'a Element>) {
        if self.tag == tag {
            out.push(self);
        }
        for child in self.child_elements() {
            child.collect(tag, out);
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    fn write_html(&self, out: &mut String) -> fmt::Result {
        write!(out, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            match value {
                PropValue::Str(s) => write!(out, " {}=\"{}\"", name, escape_html(s))?,
                PropValue::Bool(true) => write!(out, " {}", name)?,
                PropValue::Bool(false) => {}
            }
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag.as_str()) {
            return Ok(());
        }
        for child in &self.children {
            child.write_html(out)?;
        }
        write!(out, "</{}>", self.tag)
    }
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn child_count(&self) -> usize {
        self.as_element().map(Element::child_count).unwrap_or(0)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<PropValue>) {
        if let Some(e) = self.as_element_mut() {
            e.set_attr(name, value);
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) -> fmt::Result {
        match self {
            Node::Text(s) => out.write_str(&escape_html(s)),
            Node::Element(e) => e.write_html(out),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Compact number formatting for attribute values (no trailing zeros).
pub fn fmt_num(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        let s = format!("{:.3}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
