//! The editable document
//!
//! An owned tree under a single root element. The tree is addressed with [`NodePath`]s and
//! edited through a handful of splice-style primitives; everything smarter (formatting,
//! pasting) is built on top of them elsewhere.

use super::html;
use super::node::{byte_index, char_len, Element, Node};
use super::position::{NodePath, Position, Range, Selection};
use crate::supsub::mark::Mark;

const ROOT_TAG: &str = "div";

/// Borrowed view of the node a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Element(&'a Element),
    Text(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            root: Element::new(ROOT_TAG),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_html(html: &str) -> Self {
        let mut document = Self::new();
        document.set_html(html);
        document
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut document = Self::new();
        document.root.children = nodes;
        document
    }

    /// Replace the whole content, like assigning `innerHTML`.
    pub fn set_html(&mut self, html: &str) {
        self.root.children = html::parse_fragment(html);
    }

    /// Serialize the content, like reading `innerHTML`.
    pub fn inner_html(&self) -> String {
        html::serialize_nodes(&self.root.children)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn children(&self) -> &[Node] {
        &self.root.children
    }

    pub fn text_content(&self) -> String {
        self.root.text_content()
    }

    pub fn resolve(&self, path: &[usize]) -> Option<NodeRef<'_>> {
        let mut element = &self.root;
        for (depth, index) in path.iter().enumerate() {
            match element.children.get(*index)? {
                Node::Element(child) => element = child,
                Node::Text(text) => {
                    return (depth + 1 == path.len()).then_some(NodeRef::Text(text));
                }
            }
        }
        Some(NodeRef::Element(element))
    }

    pub fn element(&self, path: &[usize]) -> Option<&Element> {
        match self.resolve(path)? {
            NodeRef::Element(element) => Some(element),
            NodeRef::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut element = &mut self.root;
        for index in path {
            element = element.children.get_mut(*index)?.as_element_mut()?;
        }
        Some(element)
    }

    pub(super) fn text_mut(&mut self, path: &[usize]) -> Option<&mut String> {
        let (index, parent) = path.split_last()?;
        match self.element_mut(parent)?.children.get_mut(*index)? {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    /// The point clamped into its node, or `None` when its path no longer resolves.
    pub fn clamp(&self, position: &Position) -> Option<Position> {
        let max = match self.resolve(&position.node)? {
            NodeRef::Element(element) => element.children.len(),
            NodeRef::Text(text) => char_len(text),
        };
        Some(Position::new(position.node.clone(), position.offset.min(max)))
    }

    /// The selection as a validated range, `None` if either end is stale.
    pub fn range_of(&self, selection: &Selection) -> Option<Range> {
        let anchor = self.clamp(&selection.anchor)?;
        let focus = self.clamp(&selection.focus)?;
        Some(Selection::new(anchor, focus).range())
    }

    /// The element around the node at `path`: a text node's parent, or the element itself.
    pub fn containing_element(&self, path: &[usize]) -> Option<NodePath> {
        match self.resolve(path)? {
            NodeRef::Element(_) => Some(path.to_vec()),
            NodeRef::Text(_) => Some(path[..path.len() - 1].to_vec()),
        }
    }

    /// Characters of text preceding `position` in document order.
    pub fn text_offset(&self, position: &Position) -> usize {
        chars_before(&self.root, &position.node, position.offset)
    }

    /// Offset of `position` within the text of the element at `element`, clamped to it.
    pub fn offset_within(&self, element: &[usize], position: &Position) -> usize {
        let start = self.text_offset(&Position::new(element.to_vec(), 0));
        let len = self.element(element).map_or(0, Element::text_len);
        self.text_offset(position).saturating_sub(start).min(len)
    }

    /// Inverse of [`Document::text_offset`]. At a boundary between two text nodes the
    /// earlier one wins, so a caret placed after inserted text stays with it.
    pub fn position_at_text_offset(&self, offset: usize) -> Position {
        let mut remaining = offset;
        let mut path = Vec::new();
        find_text_position(&self.root, &mut path, &mut remaining).unwrap_or_else(|| self.end())
    }

    /// Boundary after the last child of the root.
    pub fn end(&self) -> Position {
        Position::new(Vec::new(), self.root.children.len())
    }

    pub fn insert_children(&mut self, parent: &[usize], index: usize, nodes: Vec<Node>) -> Option<()> {
        let element = self.element_mut(parent)?;
        let index = index.min(element.children.len());
        element.children.splice(index..index, nodes);
        Some(())
    }

    pub fn remove_child(&mut self, parent: &[usize], index: usize) -> Option<Node> {
        let element = self.element_mut(parent)?;
        (index < element.children.len()).then(|| element.children.remove(index))
    }

    /// Replace child `index` of `parent` with `nodes` (possibly none).
    pub fn replace_child(&mut self, parent: &[usize], index: usize, nodes: Vec<Node>) -> Option<()> {
        let element = self.element_mut(parent)?;
        if index >= element.children.len() {
            return None;
        }
        element.children.splice(index..=index, nodes);
        Some(())
    }

    /// Turn `position` into an element boundary `(parent, child index)`.
    ///
    /// A point in the middle of a text node splits it; a point in an empty text node
    /// removes the node and takes its place.
    pub fn split_text_at(&mut self, position: &Position) -> Option<(NodePath, usize)> {
        let len = match self.resolve(&position.node)? {
            NodeRef::Element(_) => return Some((position.node.clone(), position.offset)),
            NodeRef::Text(text) => char_len(text),
        };
        let (index, parent) = position.node.split_last()?;
        let (index, parent) = (*index, parent.to_vec());
        if len == 0 {
            self.remove_child(&parent, index);
            return Some((parent, index));
        }
        if position.offset == 0 {
            return Some((parent, index));
        }
        if position.offset >= len {
            return Some((parent, index + 1));
        }
        let tail = {
            let text = self.text_mut(&position.node)?;
            let at = byte_index(text, position.offset);
            text.split_off(at)
        };
        self.insert_children(&parent, index + 1, vec![Node::Text(tail)])?;
        Some((parent, index + 1))
    }

    /// Insert plain text at `position`, joining a neighbouring text node when there is one.
    /// Returns the point right after the inserted text.
    pub fn insert_text(&mut self, position: &Position, text: &str) -> Option<Position> {
        let inserted = char_len(text);
        let (is_text, len) = match self.resolve(&position.node)? {
            NodeRef::Text(existing) => (true, char_len(existing)),
            NodeRef::Element(element) => (false, element.children.len()),
        };
        if is_text {
            let offset = position.offset.min(len);
            let target = self.text_mut(&position.node)?;
            let at = byte_index(target, offset);
            target.insert_str(at, text);
            return Some(Position::new(position.node.clone(), offset + inserted));
        }

        let index = position.offset.min(len);
        let parent = position.node.clone();
        let element = self.element_mut(&parent)?;
        let child_path = |i: usize| {
            let mut path = parent.clone();
            path.push(i);
            path
        };
        if index > 0 {
            if let Some(Node::Text(previous)) = element.children.get_mut(index - 1) {
                let offset = char_len(previous) + inserted;
                previous.push_str(text);
                return Some(Position::new(child_path(index - 1), offset));
            }
        }
        if let Some(Node::Text(next)) = element.children.get_mut(index) {
            next.insert_str(0, text);
            return Some(Position::new(child_path(index), inserted));
        }
        element.children.insert(index, Node::text(text));
        Some(Position::new(child_path(index), inserted))
    }

    /// Drop empty text nodes and empty marks directly under the root, keeping `selection`
    /// pointing at the same content.
    pub fn remove_empty_root_nodes(&mut self, selection: &mut Selection) {
        for index in (0..self.root.children.len()).rev() {
            let node = &self.root.children[index];
            let empty = node.is_empty_text() || (node.as_mark().is_some() && node.text_len() == 0);
            if empty {
                self.root.children.remove(index);
                selection.adjust_for_removal(&[], index);
            }
        }
    }

    /// Rewrite the tree into the editor's canonical shape: only text and bare mark
    /// elements at the top level, no marks inside marks, no empty nodes, adjacent text
    /// nodes joined and adjacent runs of the same mark merged.
    ///
    /// The text content is left untouched, so text offsets survive normalization.
    pub fn normalize(&mut self) {
        let children = std::mem::take(&mut self.root.children);
        self.root.children = normalize_nodes(children, None);
    }
}

fn chars_before(element: &Element, path: &[usize], offset: usize) -> usize {
    match path.split_first() {
        None => element.children.iter().take(offset).map(Node::text_len).sum(),
        Some((index, rest)) => {
            let before: usize = element.children.iter().take(*index).map(Node::text_len).sum();
            before
                + match element.children.get(*index) {
                    Some(Node::Element(child)) => chars_before(child, rest, offset),
                    Some(Node::Text(text)) => offset.min(char_len(text)),
                    None => 0,
                }
        }
    }
}

fn find_text_position(element: &Element, path: &mut NodePath, remaining: &mut usize) -> Option<Position> {
    for (index, child) in element.children.iter().enumerate() {
        path.push(index);
        match child {
            Node::Text(text) => {
                let len = char_len(text);
                if *remaining <= len {
                    return Some(Position::new(path.clone(), *remaining));
                }
                *remaining -= len;
            }
            Node::Element(child) => {
                if let Some(found) = find_text_position(child, path, remaining) {
                    return Some(found);
                }
            }
        }
        path.pop();
    }
    None
}

fn normalize_nodes(nodes: Vec<Node>, inside: Option<Mark>) -> Vec<Node> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Node::Text(_) => push_node(&mut out, node),
            Node::Element(element) => match element.as_mark() {
                Some(mark) if inside.is_none() => {
                    let children = normalize_nodes(element.children, Some(mark));
                    if children.iter().any(|child| child.text_len() > 0) {
                        let mut bare = Element::new(mark.tag());
                        bare.children = children;
                        push_node(&mut out, Node::Element(bare));
                    }
                }
                _ => {
                    for child in normalize_nodes(element.children, inside) {
                        push_node(&mut out, child);
                    }
                }
            },
        }
    }
    out
}

fn push_node(out: &mut Vec<Node>, node: Node) {
    if node.is_empty_text() {
        return;
    }
    let merge = match (out.last(), &node) {
        (Some(Node::Text(_)), Node::Text(_)) => true,
        (Some(Node::Element(previous)), Node::Element(next)) => {
            previous.as_mark().is_some() && previous.as_mark() == next.as_mark()
        }
        _ => false,
    };
    if !merge {
        out.push(node);
        return;
    }
    match (out.last_mut(), node) {
        (Some(Node::Text(previous)), Node::Text(text)) => previous.push_str(&text),
        (Some(Node::Element(previous)), Node::Element(next)) => {
            for child in next.children {
                push_node(&mut previous.children, child);
            }
        }
        _ => {}
    }
}
