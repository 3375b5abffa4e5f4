//! Selection-annotated fixtures
//!
//! Tests describe a document and a selection in one string: `[` and `]` mark the anchor and
//! focus of a range, `|` marks a caret. Everything else is HTML.
//!
//! ```text
//! <sup>a|b</sup>        caret inside the run, after "a"
//! x[y<sub>z]</sub>      range from after "x" into the subscript
//! [<sup>b</sup>]        range over the whole element, anchored at element boundaries
//! ```
//!
//! [`render`] produces the same notation from a document and selection, so expected results can
//! be written the same way.

use crate::supsub::dom::node::char_len;
use crate::supsub::dom::{html, Document, Element, Node, NodePath, Position, Selection};

const ANCHOR: char = '\u{E000}';
const FOCUS: char = '\u{E001}';
const CARET: char = '\u{E002}';

#[derive(Default)]
struct Markers {
    anchor: Option<Position>,
    focus: Option<Position>,
    caret: Option<Position>,
}

impl Markers {
    fn record(&mut self, marker: char, position: Position) {
        match marker {
            ANCHOR => self.anchor = Some(position),
            FOCUS => self.focus = Some(position),
            _ => self.caret = Some(position),
        }
    }
}

fn to_private(fixture: &str) -> String {
    fixture
        .chars()
        .map(|c| match c {
            '[' => ANCHOR,
            ']' => FOCUS,
            '|' => CARET,
            _ => c,
        })
        .collect()
}

fn from_private(html: &str) -> String {
    html.chars()
        .map(|c| match c {
            ANCHOR => '[',
            FOCUS => ']',
            CARET => '|',
            _ => c,
        })
        .collect()
}

fn is_marker(c: char) -> bool {
    matches!(c, ANCHOR | FOCUS | CARET)
}

/// Parse an annotated fixture into a document and the selection it describes.
///
/// A marker that is the only content of a text node becomes an element boundary point; the
/// text node itself is dropped.
pub fn parse_fixture(fixture: &str) -> (Document, Option<Selection>) {
    let mut markers = Markers::default();
    let mut path = Vec::new();
    let parsed = html::parse_fragment(&to_private(fixture));
    let document = Document::from_nodes(strip_markers(parsed, &mut path, &mut markers));

    let selection = match markers {
        Markers {
            caret: Some(caret), ..
        } => Some(Selection::caret(caret)),
        Markers {
            anchor: Some(anchor),
            focus: Some(focus),
            ..
        } => Some(Selection::new(anchor, focus)),
        _ => None,
    };
    (document, selection)
}

fn strip_markers(nodes: Vec<Node>, path: &mut NodePath, markers: &mut Markers) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        let index = out.len();
        match node {
            Node::Text(text) if text.chars().any(is_marker) => {
                let mut stripped = String::new();
                let mut found = Vec::new();
                for c in text.chars() {
                    if is_marker(c) {
                        found.push((c, char_len(&stripped)));
                    } else {
                        stripped.push(c);
                    }
                }
                if stripped.is_empty() {
                    for (marker, _) in found {
                        markers.record(marker, Position::new(path.clone(), index));
                    }
                } else {
                    path.push(index);
                    for (marker, offset) in found {
                        markers.record(marker, Position::new(path.clone(), offset));
                    }
                    path.pop();
                    out.push(Node::Text(stripped));
                }
            }
            Node::Element(element) => {
                path.push(index);
                let children = strip_markers(element.children, path, markers);
                path.pop();
                out.push(Node::Element(Element {
                    children,
                    ..element
                }));
            }
            node => out.push(node),
        }
    }
    out
}

/// Render a document in fixture notation.
pub fn render(document: &Document, selection: Option<&Selection>) -> String {
    let mut annotated = document.clone();
    if let Some(range) = selection.and_then(|selection| document.range_of(selection)) {
        if range.is_collapsed() {
            annotated.insert_text(&range.start, &CARET.to_string());
        } else {
            // End first, so inserting it cannot shift the start.
            annotated.insert_text(&range.end, &FOCUS.to_string());
            annotated.insert_text(&range.start, &ANCHOR.to_string());
        }
    }
    from_private(&annotated.inner_html())
}
