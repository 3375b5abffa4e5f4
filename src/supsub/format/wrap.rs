//! Wrapping a selection in a mark
//!
//! The selection is flattened to its text, removed, and put back as a single run of the
//! requested mark. Runs of the same mark touching the insertion point are absorbed into it.

use super::{child, drop_blank_neighbours, split_path};
use crate::supsub::dom::node::char_len;
use crate::supsub::dom::{
    delete_contents, range_text, Document, Element, Node, NodePath, Position, Range, Selection,
};
use crate::supsub::mark::Mark;
use tracing::trace;

pub(super) fn apply(document: &mut Document, range: &Range, mark: Mark) -> Option<Selection> {
    let selected = range_text(document, range);
    if selected.is_empty() {
        trace!("nothing to wrap");
        return None;
    }

    let point = delete_contents(document, range);
    let (mut parent, mut index) = document.split_text_at(&point)?;
    while document.element(&parent).and_then(Element::as_mark).is_some() {
        (parent, index) = hoist(document, &parent, index)?;
    }

    let element = document.element_mut(&parent)?;
    let index = drop_blank_neighbours(&mut element.children, index);

    let absorb_previous = index > 0 && element.children[index - 1].as_mark() == Some(mark);
    let absorb_next = element.children.get(index).and_then(Node::as_mark) == Some(mark);
    let (mut start, mut end) = (index, index);
    let mut text = String::new();
    if absorb_previous {
        start -= 1;
        text = element.children[start].text_content();
    }
    let from = char_len(&text);
    text.push_str(&selected);
    let to = char_len(&text);
    if absorb_next {
        text.push_str(&element.children[index].text_content());
        end += 1;
    }
    element
        .children
        .splice(start..end, [Node::Element(Element::mark(mark, text))]);

    let run = child(&child(&parent, start), 0);
    Some(Selection::new(Position::new(run.clone(), from), Position::new(run, to)))
}

/// Split the mark element at `mark_path` before child `index`. Returns the boundary between
/// the two halves in the mark's parent; empty halves are dropped.
fn hoist(document: &mut Document, mark_path: &[usize], index: usize) -> Option<(NodePath, usize)> {
    let (parent, position) = split_path(mark_path)?;
    let element = document.element(mark_path)?;
    let index = index.min(element.children.len());

    let mut left = element.shallow_clone();
    left.children = element.children[..index].to_vec();
    let mut right = element.shallow_clone();
    right.children = element.children[index..].to_vec();

    let boundary = position + usize::from(left.text_len() > 0);
    let halves = [left, right]
        .into_iter()
        .filter(|half| half.text_len() > 0)
        .map(Node::Element)
        .collect();
    document.replace_child(&parent, position, halves)?;
    Some((parent, boundary))
}
