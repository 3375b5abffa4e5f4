//! Format engine
//!
//! Applies or removes a mark at the current selection. The branch is picked from the
//! selection shape and its [`Classification`]:
//!
//! | selection | classification | branch |
//! |---|---|---|
//! | caret | any | [`collapsed`]: open or leave a mark at the caret |
//! | range | `RangeWhollyInMark` | [`unformat`]: pull the selected text out of its mark |
//! | range | `RangeMixed`, `NotInMark` | [`wrap`]: flatten the selection into one mark run |
//!
//! Every branch leaves the document with marks only containing text, never nested in
//! themselves and never adjacent to a run of the same mark, and returns the selection the
//! user should see next. Stale or missing selections are no-ops.

pub mod collapsed;
pub mod unformat;
pub mod wrap;

use crate::supsub::classifier::Classification;
use crate::supsub::dom::{Document, Element, Node, NodePath, Selection};
use crate::supsub::mark::Mark;
use tracing::{debug, trace};

pub fn apply(
    document: &mut Document,
    selection: Option<&Selection>,
    mark: Mark,
    classification: &Classification,
) -> Option<Selection> {
    let Some(range) = selection.and_then(|selection| document.range_of(selection)) else {
        trace!(%mark, "no selection to format");
        return None;
    };

    let result = if range.is_collapsed() {
        debug!(%mark, "format caret");
        collapsed::apply(document, &range.start, mark)
    } else {
        match classification {
            Classification::RangeWhollyInMark(element) => {
                debug!(?element, "unformat range");
                unformat::apply(document, &range, element)
            }
            _ => {
                debug!(%mark, "wrap range");
                wrap::apply(document, &range, mark)
            }
        }
    };

    let mut selection = result?;
    document.remove_empty_root_nodes(&mut selection);
    Some(selection)
}

/// `(parent, index)` of a non-root path.
fn split_path(path: &[usize]) -> Option<(NodePath, usize)> {
    let (index, parent) = path.split_last()?;
    Some((parent.to_vec(), *index))
}

fn child(parent: &[usize], index: usize) -> NodePath {
    let mut path = parent.to_vec();
    path.push(index);
    path
}

/// Remove the blank siblings touching the gap before `children[index]` and return the gap's
/// new index. Blanks are the leftovers of a deletion: empty text and emptied marks. Left in
/// place they hide a same-mark run from the neighbour checks.
fn drop_blank_neighbours(children: &mut Vec<Node>, mut index: usize) -> usize {
    index = index.min(children.len());
    while index > 0 && is_blank(&children[index - 1]) {
        children.remove(index - 1);
        index -= 1;
    }
    while children.get(index).is_some_and(is_blank) {
        children.remove(index);
    }
    index
}

fn is_blank(node: &Node) -> bool {
    node.text_len() == 0 && (node.is_text() || node.as_mark().is_some())
}

/// `[mark(before)?, middle, mark(after)?]` with the index of `middle`; empty sides are omitted.
fn around(mark: Mark, before: &str, middle: Node, after: &str) -> (Vec<Node>, usize) {
    let mut nodes = Vec::with_capacity(3);
    if !before.is_empty() {
        nodes.push(Node::Element(Element::mark(mark, before)));
    }
    let at = nodes.len();
    nodes.push(middle);
    if !after.is_empty() {
        nodes.push(Node::Element(Element::mark(mark, after)));
    }
    (nodes, at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supsub::classifier::classify;
    use crate::supsub::testing::{parse_fixture, render};
    use rstest::rstest;

    fn format(fixture: &str, mark: Mark) -> String {
        let (mut document, selection) = parse_fixture(fixture);
        let classification = classify(&document, selection.as_ref());
        let selection = apply(&mut document, selection.as_ref(), mark, &classification);
        render(&document, selection.as_ref())
    }

    #[rstest(
        fixture,
        mark,
        expected,
        // caret
        case("<sup>a|b</sup>", Mark::Superscript, "<sup>a</sup>\u{FEFF}|<sup>b</sup>"),
        case("<sup>ab|</sup>", Mark::Superscript, "<sup>ab</sup>\u{FEFF}|"),
        case("x|y", Mark::Subscript, "x<sub>\u{FEFF}|</sub>y"),
        case("<sup>a|b</sup>", Mark::Subscript, "<sup>a</sup><sub>\u{FEFF}|</sub><sup>b</sup>"),
        case("<sup>a</sup>|b", Mark::Superscript, "<sup>a\u{FEFF}|</sup>b"),
        // unformat
        case("<sub>x[y]z</sub>", Mark::Subscript, "<sub>x</sub>[y]<sub>z</sub>"),
        case("a[<sup>bc</sup>]d", Mark::Subscript, "a[bc]d"),
        // wrap
        case("a[b]c", Mark::Superscript, "a<sup>[b]</sup>c"),
        case("<sup>A</sup>[b]c", Mark::Superscript, "<sup>A[b]</sup>c"),
        case("[a<sub>b]c</sub>", Mark::Superscript, "<sup>[ab]</sup><sub>c</sub>"),
        case("<sup>a[b</sup>c<sup>d]e</sup>", Mark::Superscript, "<sup>a[bcd]e</sup>"),
        case("<sup>a[b</sup>c<sup>d]e</sup>", Mark::Subscript, "<sup>a</sup><sub>[bcd]</sub><sup>e</sup>"),
    )]
    fn test_apply(fixture: &str, mark: Mark, expected: &str) {
        assert_eq!(format(fixture, mark), expected);
    }

    #[test]
    fn test_caret_joins_run_behind_empty_text() {
        // What typing over a selection can leave behind: an empty text node between the
        // caret and a superscript run.
        let mut document = Document::from_nodes(vec![
            Node::text("a"),
            Node::text(""),
            Node::Element(Element::mark(Mark::Superscript, "2")),
        ]);
        let caret = Selection::caret(crate::supsub::dom::Position::new(vec![0], 1));
        let selection = apply(&mut document, Some(&caret), Mark::Superscript, &Classification::NotInMark);

        assert_eq!(document.inner_html(), "a<sup>\u{FEFF}2</sup>");
        assert_eq!(render(&document, selection.as_ref()), "a<sup>\u{FEFF}|2</sup>");
    }

    #[test]
    fn test_no_selection_is_noop() {
        let (mut document, _) = parse_fixture("<sup>a</sup>");
        let before = document.clone();
        assert_eq!(apply(&mut document, None, Mark::Superscript, &Classification::NotInMark), None);
        assert_eq!(document, before);
    }
}
