//! Nodes of the editable tree
//!
//! Only two kinds of nodes exist: text and elements. Elements keep their tag name in
//! lowercase and their attributes in source order, which is what the serializer needs to
//! reproduce the markup a browser would produce for the same tree.

use crate::supsub::mark::Mark;

/// Zero-width character used to keep an otherwise-empty mark visible and focusable.
pub const PLACEHOLDER: char = '\u{FEFF}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// An element holding a single text child.
    pub fn with_text(tag: &str, text: impl Into<String>) -> Self {
        let mut element = Self::new(tag);
        element.children.push(Node::Text(text.into()));
        element
    }

    /// Bare mark element wrapping `text`.
    pub fn mark(mark: Mark, text: impl Into<String>) -> Self {
        Self::with_text(mark.tag(), text)
    }

    /// The mark this element stands for, if its tag is one.
    pub fn as_mark(&self) -> Option<Mark> {
        Mark::from_tag(&self.tag)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.append_text(&mut out);
        }
        out
    }

    /// Number of characters of text below this element.
    pub fn text_len(&self) -> usize {
        self.children.iter().map(Node::text_len).sum()
    }

    /// Copy of the element without its children.
    pub fn shallow_clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            children: Vec::new(),
        }
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// The mark of an element node; `None` for text and other elements.
    pub fn as_mark(&self) -> Option<Mark> {
        self.as_element().and_then(Element::as_mark)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, Node::Text(text) if text.is_empty())
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.append_text(&mut out);
        out
    }

    pub fn text_len(&self) -> usize {
        match self {
            Node::Text(text) => char_len(text),
            Node::Element(element) => element.text_len(),
        }
    }

    fn append_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.append_text(out);
                }
            }
        }
    }

    /// Deep structural equality, the way `Node.isEqualNode` compares DOM nodes.
    ///
    /// Tag names compare case-insensitively and attributes as an unordered set; children
    /// must match pairwise in order. Identity never matters.
    pub fn is_equal_node(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Text(a), Node::Text(b)) => a == b,
            (Node::Element(a), Node::Element(b)) => {
                a.tag.eq_ignore_ascii_case(&b.tag)
                    && same_attributes(&a.attrs, &b.attrs)
                    && a.children.len() == b.children.len()
                    && a
                        .children
                        .iter()
                        .zip(&b.children)
                        .all(|(x, y)| x.is_equal_node(y))
            }
            _ => false,
        }
    }
}

fn same_attributes(a: &[(String, String)], b: &[(String, String)]) -> bool {
    a.len() == b.len()
        && a.iter().all(|(name, value)| {
            b.iter()
                .any(|(other_name, other_value)| name == other_name && value == other_value)
        })
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the `index`-th character, clamped to the end of `text`.
pub fn byte_index(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Characters `from..to` of `text`, both clamped.
pub fn char_slice(text: &str, from: usize, to: usize) -> &str {
    let start = byte_index(text, from);
    let end = byte_index(text, to.max(from));
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_nodes_ignore_attribute_order() {
        let mut a = Element::with_text("sup", "x");
        a.attrs = vec![("a".into(), "1".into()), ("b".into(), "2".into())];
        let mut b = Element::with_text("SUP", "x");
        b.attrs = vec![("b".into(), "2".into()), ("a".into(), "1".into())];
        assert!(Node::Element(a).is_equal_node(&Node::Element(b)));
    }

    #[test]
    fn test_unequal_nodes() {
        let sup = Node::Element(Element::with_text("sup", "x"));
        let sub = Node::Element(Element::with_text("sub", "x"));
        let other_text = Node::Element(Element::with_text("sup", "y"));
        assert!(!sup.is_equal_node(&sub));
        assert!(!sup.is_equal_node(&other_text));
        assert!(!sup.is_equal_node(&Node::text("x")));
    }

    #[test]
    fn test_char_slice_multibyte() {
        let text = "a\u{FEFF}bé";
        assert_eq!(char_len(text), 4);
        assert_eq!(char_slice(text, 1, 3), "\u{FEFF}b");
        assert_eq!(char_slice(text, 3, 10), "é");
        assert_eq!(char_slice(text, 5, 2), "");
    }

    #[test]
    fn test_text_content() {
        let mut root = Element::new("div");
        root.children.push(Node::text("a"));
        root.children.push(Node::Element(Element::mark(Mark::Superscript, "b")));
        assert_eq!(root.text_content(), "ab");
        assert_eq!(root.text_len(), 2);
    }
}
