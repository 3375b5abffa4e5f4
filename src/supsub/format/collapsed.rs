//! Caret formatting
//!
//! With nothing selected there is no text to wrap, so formatting means changing what the
//! next typed character will be: a placeholder character is placed where the caret goes and
//! the caret is parked right after it.

use super::{around, child, drop_blank_neighbours, split_path};
use crate::supsub::dom::node::{char_len, char_slice};
use crate::supsub::dom::{Document, Element, Node, NodePath, Position, Selection, PLACEHOLDER};
use crate::supsub::mark::Mark;

pub(super) fn apply(document: &mut Document, caret: &Position, mark: Mark) -> Option<Selection> {
    let container = document.containing_element(&caret.node)?;
    match document.element(&container).and_then(Element::as_mark) {
        Some(current) if current == mark => leave(document, caret, &container, mark),
        Some(current) => {
            // Exit the other mark first so the new one lands beside it, not inside.
            let (parent, index) = split_mark(document, caret, &container, current)?;
            insert_run(document, &parent, index, mark)
        }
        None => {
            let (parent, index) = document.split_text_at(caret)?;
            insert_run(document, &parent, index, mark)
        }
    }
}

/// Text of `container` before and after the caret.
fn halves(document: &Document, caret: &Position, container: &[usize]) -> Option<(String, String)> {
    let text = document.element(container)?.text_content();
    let offset = document.offset_within(container, caret);
    Some((
        char_slice(&text, 0, offset).to_owned(),
        char_slice(&text, offset, usize::MAX).to_owned(),
    ))
}

/// Split the mark the caret is in and park the caret on a bare placeholder between the halves.
fn leave(document: &mut Document, caret: &Position, container: &[usize], mark: Mark) -> Option<Selection> {
    let (before, after) = halves(document, caret, container)?;
    let (parent, index) = split_path(container)?;
    let (nodes, at) = around(mark, &before, Node::text(PLACEHOLDER), &after);
    document.replace_child(&parent, index, nodes)?;
    Some(Selection::caret(Position::new(child(&parent, index + at), 1)))
}

/// Split `container`, a run of `current`, at the caret. Returns the boundary between the halves.
fn split_mark(
    document: &mut Document,
    caret: &Position,
    container: &[usize],
    current: Mark,
) -> Option<(NodePath, usize)> {
    let (before, after) = halves(document, caret, container)?;
    let (parent, index) = split_path(container)?;
    let mut nodes = Vec::with_capacity(2);
    if !before.is_empty() {
        nodes.push(Node::Element(Element::mark(current, before)));
    }
    let boundary = index + nodes.len();
    if !after.is_empty() {
        nodes.push(Node::Element(Element::mark(current, after)));
    }
    document.replace_child(&parent, index, nodes)?;
    Some((parent, boundary))
}

/// Open a placeholder run of `mark` at child `index` of `parent`.
///
/// A neighbouring run of the same mark is extended instead, so two runs never end up side by
/// side; with runs on both sides, the three are joined into one.
fn insert_run(document: &mut Document, parent: &[usize], index: usize, mark: Mark) -> Option<Selection> {
    let element = document.element_mut(parent)?;
    let index = drop_blank_neighbours(&mut element.children, index);
    let extend_previous = index > 0 && element.children[index - 1].as_mark() == Some(mark);
    let extend_next = element.children.get(index).and_then(Node::as_mark) == Some(mark);

    let (mut start, mut end) = (index, index);
    let mut text = String::new();
    if extend_previous {
        start -= 1;
        text = element.children[start].text_content();
    }
    text.push(PLACEHOLDER);
    let offset = char_len(&text);
    if extend_next {
        text.push_str(&element.children[index].text_content());
        end += 1;
    }
    element
        .children
        .splice(start..end, [Node::Element(Element::mark(mark, text))]);

    let run = child(&child(parent, start), 0);
    Some(Selection::caret(Position::new(run, offset)))
}
