//! A small owned element tree holding one article at a time
//!
//! The streaming reader materializes each article container into an [`Element`];
//! field extraction then works on the tree through the selectors in
//! [`crate::common::select`].

use crate::common::select;
use crate::common::xml_utils::collapse_whitespace;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

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

    /// Builder-style attribute setter, mostly useful in tests
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder-style child setter, mostly useful in tests
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder-style text setter, mostly useful in tests
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Direct child whose name matches case-insensitively (`Year` / `year`)
    pub fn child_ignore_case(&self, name: &str) -> Option<&Element> {
        self.child_elements()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.child_elements().any(|e| e.name == name)
    }

    /// All descendant text in document order, markup ignored
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out, &[]);
        out
    }

    /// Like [`Element::text`] but skipping direct children with the given names
    pub fn text_without_children(&self, skip: &[&str]) -> String {
        let mut out = String::new();
        self.collect_text(&mut out, skip);
        out
    }

    fn collect_text(&self, out: &mut String, skip: &[&str]) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) if skip.contains(&e.name.as_str()) => {}
                Node::Element(e) => e.collect_text(out, &[]),
            }
        }
    }

    /// Flattened text with whitespace collapsed
    pub fn flat_text(&self) -> String {
        collapse_whitespace(&self.text())
    }

    pub fn find(&self, path: &str) -> Option<&Element> {
        select::select(self, path).into_iter().next()
    }

    pub fn find_all(&self, path: &str) -> Vec<&Element> {
        select::select(self, path)
    }

    /// First non-empty flattened value selected by `path` (element text or `@attr`)
    pub fn find_text(&self, path: &str) -> Option<String> {
        select::select_values(self, path)
            .into_iter()
            .find(|v| !v.is_empty())
    }

    /// Every flattened value selected by `path`, in document order
    pub fn find_all_text(&self, path: &str) -> Vec<String> {
        select::select_values(self, path)
    }
}
