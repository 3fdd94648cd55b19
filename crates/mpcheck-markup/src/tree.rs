//! Markup document tree.
//!
//! The tree keeps every element the source mentions, even when the source
//! is malformed, so component discovery sees every tag name.

use std::collections::HashSet;

use crate::span::{Span, Spanned};

/// A parsed markup document: a forest of top-level nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub children: Vec<Node>,
}

/// A node in the markup tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(Comment),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Element(element) => element.span,
            Node::Text(text) => text.span,
            Node::Comment(comment) => comment.span,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// An element such as `<view class="box">...</view>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: Spanned<String>,
    /// Span of the opening tag, from `<` to its terminator.
    pub open_span: Span,
    /// Span of the whole element including children and closing tag.
    pub span: Span,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    pub self_closing: bool,
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Find an attribute by exact name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| *attr.name == name)
    }
}

/// An attribute on an opening tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Spanned<String>,
    /// The value without surrounding quotes; `None` for boolean attributes.
    pub value: Option<Spanned<String>>,
    pub span: Span,
}

impl Attribute {
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref().map(String::as_str)
    }

    /// Whether the value contains an interpolation marker.
    pub fn is_dynamic(&self) -> bool {
        self.value().is_some_and(|value| value.contains("{{"))
    }
}

/// Character data between tags, verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub value: String,
    pub span: Span,
}

impl Document {
    /// Iterate over every node in document order (pre-order).
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Iterate over every element in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.descendants().filter_map(Node::as_element)
    }

    /// The first occurrence of each distinct element name, in document order.
    pub fn distinct_elements(&self) -> Vec<&Element> {
        let mut seen = HashSet::new();
        self.elements()
            .filter(|&element| seen.insert(element.name()))
            .collect()
    }
}

/// Pre-order iterator over a [`Document`].
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(node) => {
                    if let Node::Element(element) = node {
                        self.stack.push(element.children.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
