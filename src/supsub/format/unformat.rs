//! Removing a mark from part of a run

use super::{around, child, split_path};
use crate::supsub::dom::node::{char_len, char_slice};
use crate::supsub::dom::{Document, Node, Position, Range, Selection};
use tracing::trace;

/// Turn the part of the mark element at `element` covered by `range` into plain text, keeping
/// whatever lies outside the range in the mark. The plain text ends up selected.
pub(super) fn apply(document: &mut Document, range: &Range, element: &[usize]) -> Option<Selection> {
    let target = document.element(element)?;
    let Some(mark) = target.as_mark() else {
        trace!(?element, "unformat target is not a mark");
        return None;
    };
    let text = target.text_content();
    let from = document.offset_within(element, &range.start);
    let to = document.offset_within(element, &range.end).max(from);
    let selected = char_slice(&text, from, to).to_owned();
    let selected_len = char_len(&selected);

    let (parent, index) = split_path(element)?;
    let (nodes, at) = around(
        mark,
        char_slice(&text, 0, from),
        Node::Text(selected),
        char_slice(&text, to, usize::MAX),
    );
    document.replace_child(&parent, index, nodes)?;

    let plain = child(&parent, index + at);
    Some(Selection::new(
        Position::new(plain.clone(), 0),
        Position::new(plain, selected_len),
    ))
}
