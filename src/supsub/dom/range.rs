//! Range operations over a [`Document`]
//!
//! Both operations walk down from the range's common ancestor carrying the two boundary
//! points relative to the element being visited. A child that neither boundary descends into
//! is wholly contained; a child one boundary descends into is partially contained and gets
//! visited recursively (or sliced, for text).

use super::document::{Document, NodeRef};
use super::node::{byte_index, char_slice, Element, Node};
use super::position::{NodePath, Position, Range};

/// A boundary point relative to some element: remaining path plus offset. `None` means the
/// range extends past the element on that side.
type Bound<'a> = Option<(&'a [usize], usize)>;

/// A top-level node of a cloned range, with the path of the live node it was copied from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cloned {
    pub source: NodePath,
    pub node: Node,
}

fn descend(bound: Bound<'_>, index: usize) -> Bound<'_> {
    match bound {
        Some(([first, rest @ ..], offset)) if *first == index => Some((rest, offset)),
        _ => None,
    }
}

/// Indices of the children of a `len`-child element that the bounds touch.
fn child_span(start: Bound<'_>, end: Bound<'_>, len: usize) -> std::ops::Range<usize> {
    let first = match start {
        None => 0,
        Some(([], offset)) => offset,
        Some(([index, ..], _)) => *index,
    };
    let last = match end {
        None => len,
        Some(([], offset)) => offset,
        Some(([index, ..], _)) => index + 1,
    };
    first.min(len)..last.min(len)
}

fn split(range: &Range) -> (NodePath, Bound<'_>, Bound<'_>) {
    let ancestor = range.common_ancestor();
    let depth = ancestor.len();
    let start = Some((&range.start.node[depth..], range.start.offset));
    let end = Some((&range.end.node[depth..], range.end.offset));
    (ancestor, start, end)
}

/// Structural copy of the selected content, like `Range.cloneContents`.
///
/// Partially selected elements are copied shallowly with only their selected descendants.
pub fn clone_contents(document: &Document, range: &Range) -> Vec<Cloned> {
    let (ancestor, start, end) = split(range);
    match document.resolve(&ancestor) {
        Some(NodeRef::Text(text)) => vec![Cloned {
            node: Node::text(char_slice(text, range.start.offset, range.end.offset)),
            source: ancestor,
        }],
        Some(NodeRef::Element(element)) => {
            let mut path = ancestor;
            clone_between(element, &mut path, start, end)
        }
        None => Vec::new(),
    }
}

fn clone_between(element: &Element, path: &mut NodePath, start: Bound<'_>, end: Bound<'_>) -> Vec<Cloned> {
    let mut out = Vec::new();
    for index in child_span(start, end, element.children.len()) {
        let inner_start = descend(start, index);
        let inner_end = descend(end, index);
        path.push(index);
        let node = match &element.children[index] {
            Node::Text(text) => {
                let from = inner_start.map_or(0, |(_, offset)| offset);
                let to = inner_end.map_or(usize::MAX, |(_, offset)| offset);
                Node::text(char_slice(text, from, to))
            }
            Node::Element(child) if inner_start.is_none() && inner_end.is_none() => {
                Node::Element(child.clone())
            }
            Node::Element(child) => {
                let mut copy = child.shallow_clone();
                copy.children = clone_between(child, path, inner_start, inner_end)
                    .into_iter()
                    .map(|cloned| cloned.node)
                    .collect();
                Node::Element(copy)
            }
        };
        out.push(Cloned {
            source: path.clone(),
            node,
        });
        path.pop();
    }
    out
}

/// Selected text, like `Range.toString`.
pub fn range_text(document: &Document, range: &Range) -> String {
    clone_contents(document, range)
        .iter()
        .map(|cloned| cloned.node.text_content())
        .collect()
}

/// Remove the selected content, like `Range.deleteContents`, and return the collapse point.
///
/// Partially selected nodes stay in the tree, trimmed, even when that leaves them empty.
pub fn delete_contents(document: &mut Document, range: &Range) -> Position {
    let (ancestor, start, end) = split(range);
    let collapse = if range.end.node.starts_with(&range.start.node) {
        range.start.clone()
    } else {
        Position::new(ancestor.clone(), range.start.node[ancestor.len()] + 1)
    };

    if let Some(text) = document.text_mut(&ancestor) {
        let from = byte_index(text, range.start.offset);
        let to = byte_index(text, range.end.offset).max(from);
        text.replace_range(from..to, "");
    } else if let Some(element) = document.element_mut(&ancestor) {
        delete_between(element, start, end);
    }
    collapse
}

fn delete_between(element: &mut Element, start: Bound<'_>, end: Bound<'_>) {
    let mut contained = Vec::new();
    for index in child_span(start, end, element.children.len()) {
        let inner_start = descend(start, index);
        let inner_end = descend(end, index);
        if inner_start.is_none() && inner_end.is_none() {
            contained.push(index);
            continue;
        }
        match &mut element.children[index] {
            Node::Text(text) => {
                let from = inner_start.map_or(0, |(_, offset)| byte_index(text, offset));
                let to = inner_end.map_or(text.len(), |(_, offset)| byte_index(text, offset));
                if from < to {
                    text.replace_range(from..to, "");
                }
            }
            Node::Element(child) => delete_between(child, inner_start, inner_end),
        }
    }
    for index in contained.into_iter().rev() {
        element.children.remove(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supsub::testing::parse_fixture;

    fn range_of(fixture: &str) -> (Document, Range) {
        let (document, selection) = parse_fixture(fixture);
        let selection = selection.expect("fixture carries a selection");
        let range = document.range_of(&selection).expect("selection resolves");
        (document, range)
    }

    #[test]
    fn test_clone_within_text() {
        let (document, range) = range_of("<sub>x[y]z</sub>");
        let cloned = clone_contents(&document, &range);
        assert_eq!(cloned, vec![Cloned { source: vec![0, 0], node: Node::text("y") }]);
    }

    #[test]
    fn test_clone_partial_element() {
        let (document, range) = range_of("a[b<sup>c]d</sup>");
        let cloned = clone_contents(&document, &range);
        assert_eq!(cloned.len(), 2);
        assert_eq!(cloned[0].node, Node::text("b"));
        assert_eq!(cloned[1].source, vec![1]);
        assert_eq!(cloned[1].node.text_content(), "c");
        assert_eq!(range_text(&document, &range), "bc");
    }

    #[test]
    fn test_delete_across_elements() {
        let (mut document, range) = range_of("a[b<sup>c]d</sup>e");
        let collapse = delete_contents(&mut document, &range);
        assert_eq!(document.inner_html(), "a<sup>d</sup>e");
        assert_eq!(collapse, Position::new(vec![], 1));
    }

    #[test]
    fn test_delete_keeps_emptied_partial_nodes() {
        let (mut document, range) = range_of("<sup>[ab</sup>c]");
        let collapse = delete_contents(&mut document, &range);
        assert_eq!(document.children().len(), 2);
        assert_eq!(document.text_content(), "");
        assert_eq!(collapse, Position::new(vec![], 1));
    }

    #[test]
    fn test_delete_within_text() {
        let (mut document, range) = range_of("x[yz]");
        let collapse = delete_contents(&mut document, &range);
        assert_eq!(document.inner_html(), "x");
        assert_eq!(collapse, Position::new(vec![0], 1));
    }
}
