//! Selection classification
//!
//! Decides how the current selection relates to the existing marks, which is all the format
//! engine needs to pick a branch. Classification only reads the document.

use crate::supsub::dom::{clone_contents, Document, NodePath, Node, Selection};
use crate::supsub::mark::Mark;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// No selection, or a caret outside every mark.
    NotInMark,
    /// A caret inside a mark element.
    CollapsedInMark(Mark),
    /// A range whose content is one run of a single mark; carries the path of that element.
    RangeWhollyInMark(NodePath),
    /// A range over heterogeneous content.
    RangeMixed,
}

pub fn classify(document: &Document, selection: Option<&Selection>) -> Classification {
    let Some(range) = selection.and_then(|selection| document.range_of(selection)) else {
        return Classification::NotInMark;
    };

    if range.is_collapsed() {
        let mark = document
            .containing_element(&range.start.node)
            .and_then(|path| document.element(&path))
            .and_then(|element| element.as_mark());
        return match mark {
            Some(mark) => Classification::CollapsedInMark(mark),
            None => Classification::NotInMark,
        };
    }

    let Some(context) = document.containing_element(&range.common_ancestor()) else {
        return Classification::NotInMark;
    };
    let context_is_mark = document.element(&context).and_then(|e| e.as_mark()).is_some();

    let cloned = clone_contents(document, &range);
    let mut reference: Option<(&Node, &NodePath)> = None;
    for item in &cloned {
        if item.node.text_len() == 0 {
            continue;
        }
        if item.node.is_text() && !context_is_mark {
            trace!("text outside a mark in selection");
            return Classification::RangeMixed;
        }
        match reference {
            None => reference = Some((&item.node, &item.source)),
            Some((first, _)) if !first.is_equal_node(&item.node) => {
                return Classification::RangeMixed;
            }
            Some(_) => {}
        }
    }

    match reference {
        None => Classification::RangeMixed,
        Some((node, _)) if node.is_text() || context_is_mark => {
            Classification::RangeWhollyInMark(context)
        }
        Some((node, source)) if node.as_mark().is_some() => {
            Classification::RangeWhollyInMark(source.clone())
        }
        Some(_) => Classification::RangeMixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supsub::testing::parse_fixture;
    use rstest::rstest;

    fn classify_fixture(fixture: &str) -> Classification {
        let (document, selection) = parse_fixture(fixture);
        classify(&document, selection.as_ref())
    }

    #[rstest(
        fixture,
        expected,
        case("ab", Classification::NotInMark),
        case("a|b", Classification::NotInMark),
        case("<sup>a|b</sup>", Classification::CollapsedInMark(Mark::Superscript)),
        case("x<sub>|b</sub>", Classification::CollapsedInMark(Mark::Subscript)),
        case("<sub>x[y]z</sub>", Classification::RangeWhollyInMark(vec![0])),
        case("a[<sup>bc</sup>]d", Classification::RangeWhollyInMark(vec![1])),
        case("a<sup>[bc]</sup>d", Classification::RangeWhollyInMark(vec![1])),
        case("[a<sup>b]c</sup>", Classification::RangeMixed),
        case("[ab]", Classification::RangeMixed),
        case("<sup>[a</sup><sub>b]</sub>", Classification::RangeMixed),
    )]
    fn test_classify(fixture: &str, expected: Classification) {
        assert_eq!(classify_fixture(fixture), expected);
    }

    #[test]
    fn test_no_selection() {
        let (document, _) = parse_fixture("<sup>a</sup>");
        assert_eq!(classify(&document, None), Classification::NotInMark);
    }

    #[test]
    fn test_classification_does_not_mutate() {
        let (document, selection) = parse_fixture("a[<sup>b</sup>c]");
        let before = document.clone();
        classify(&document, selection.as_ref());
        assert_eq!(document, before);
    }
}
