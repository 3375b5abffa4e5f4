//! Property-based tests for the sanitizer, format engine, classifier, history and editor

use proptest::prelude::*;
use std::collections::HashMap;
use supsub::supsub::classifier::classify;
use supsub::supsub::dom::{Document, Node, Selection, PLACEHOLDER};
use supsub::supsub::editor::{ClipboardPayload, Editor, EditorSettings, Key, KeyEvent};
use supsub::supsub::format;
use supsub::supsub::history::History;
use supsub::supsub::mark::{Mark, MarkMode};
use supsub::supsub::sanitizer::clean;

const FRAGMENTS: &[&str] = &[
    "<sup>",
    "</sup>",
    "<sub>",
    "</sub>",
    "<span>",
    "</span>",
    "<span class=\"x\">",
    "<p>",
    "</p>",
    "<br>",
    "<b>",
    "</b>",
    "&nbsp;",
    " ",
    "\u{FEFF}",
    "a",
    "2",
    "<!--",
    "-->",
];

fn html_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..12).prop_map(|parts| parts.concat())
}

fn mark_strategy() -> impl Strategy<Value = Mark> {
    prop::sample::select(Mark::ALL.to_vec())
}

/// `(mark, anchor, focus)` with offsets into the document text.
fn ops_strategy() -> impl Strategy<Value = Vec<(Mark, usize, usize)>> {
    prop::collection::vec((mark_strategy(), 0..8usize, 0..8usize), 1..6)
}

#[derive(Debug, Clone)]
enum HistoryOp {
    Save(u8),
    Undo,
    Redo,
}

fn history_ops() -> impl Strategy<Value = Vec<HistoryOp>> {
    prop::collection::vec(
        prop_oneof![
            (0..4u8).prop_map(HistoryOp::Save),
            Just(HistoryOp::Undo),
            Just(HistoryOp::Redo),
        ],
        0..24,
    )
}

/// One step of an editing session. Offsets select text before the step runs.
#[derive(Debug, Clone)]
enum EditOp {
    Click(Mark, usize, usize),
    Hotkey(Mark, usize, usize),
    Type(&'static str, usize, usize),
    PasteText(&'static str, usize, usize),
    PasteHtml(&'static str, usize, usize),
    Undo,
}

fn edit_ops() -> impl Strategy<Value = Vec<EditOp>> {
    let typed = prop::sample::select(vec!["", "x", "yz"]);
    let pasted = prop::sample::select(vec!["<sup>2</sup>", "<sub>i</sub>q", "<b>w</b>"]);
    prop::collection::vec(
        prop_oneof![
            (mark_strategy(), 0..8usize, 0..8usize).prop_map(|(m, a, f)| EditOp::Click(m, a, f)),
            (mark_strategy(), 0..8usize, 0..8usize).prop_map(|(m, a, f)| EditOp::Hotkey(m, a, f)),
            (typed.clone(), 0..8usize, 0..8usize).prop_map(|(t, a, f)| EditOp::Type(t, a, f)),
            (typed, 0..8usize, 0..8usize).prop_map(|(t, a, f)| EditOp::PasteText(t, a, f)),
            (pasted, 0..8usize, 0..8usize).prop_map(|(h, a, f)| EditOp::PasteHtml(h, a, f)),
            Just(EditOp::Undo),
        ],
        1..10,
    )
}

/// Top level holds only text and marks, and marks hold only text.
fn is_flat(document: &Document) -> bool {
    document.children().iter().all(|node| match node {
        Node::Text(_) => true,
        Node::Element(element) => {
            element.as_mark().is_some() && element.children.iter().all(Node::is_text)
        }
    })
}

/// No two sibling runs of the same mark touch.
fn no_adjacent_runs(document: &Document) -> bool {
    document
        .children()
        .windows(2)
        .all(|pair| pair[0].as_mark().is_none() || pair[0].as_mark() != pair[1].as_mark())
}

fn visible_text(document: &Document) -> String {
    document.text_content().replace(PLACEHOLDER, "")
}

fn selection_at(document: &Document, anchor: usize, focus: usize) -> Selection {
    let len = document.text_content().chars().count();
    Selection::new(
        document.position_at_text_offset(anchor.min(len)),
        document.position_at_text_offset(focus.min(len)),
    )
}

proptest! {
    #[test]
    fn test_clean_is_idempotent(input in html_strategy()) {
        let once = clean(&input);
        prop_assert_eq!(clean(&once), once.clone());
        prop_assert!(!once.contains(PLACEHOLDER));
        prop_assert!(!once.to_ascii_lowercase().contains("&nbsp;"));
    }

    #[test]
    fn test_marks_stay_exclusive(ops in ops_strategy()) {
        let mut document = Document::from_html("abcdef");
        for (mark, anchor, focus) in ops {
            let selection = selection_at(&document, anchor, focus);
            let classification = classify(&document, Some(&selection));
            format::apply(&mut document, Some(&selection), mark, &classification);
            prop_assert!(is_flat(&document), "nested marks in {}", document.inner_html());
            prop_assert!(no_adjacent_runs(&document), "touching runs in {}", document.inner_html());
            prop_assert_eq!(visible_text(&document), "abcdef");
        }
    }

    #[test]
    fn test_editing_keeps_runs_apart(ops in edit_ops()) {
        let fields = HashMap::from([("answer".to_string(), "abcdef".to_string())]);
        let mut editor = Editor::attach(EditorSettings::new("answer", MarkMode::Both), &fields)
            .expect("field exists");
        for op in ops {
            let select = |editor: &mut Editor, anchor, focus| {
                let selection = selection_at(editor.document(), anchor, focus);
                editor.set_selection(Some(selection));
            };
            match op {
                EditOp::Click(mark, anchor, focus) => {
                    select(&mut editor, anchor, focus);
                    editor.click_button(mark);
                }
                EditOp::Hotkey(mark, anchor, focus) => {
                    select(&mut editor, anchor, focus);
                    let key = match mark {
                        Mark::Superscript => Key::ArrowUp,
                        Mark::Subscript => Key::ArrowDown,
                    };
                    editor.handle_key(KeyEvent::new(key));
                }
                EditOp::Type(text, anchor, focus) => {
                    select(&mut editor, anchor, focus);
                    editor.insert_text(text);
                }
                EditOp::PasteText(text, anchor, focus) => {
                    select(&mut editor, anchor, focus);
                    editor.paste(&ClipboardPayload::text(text));
                }
                EditOp::PasteHtml(html, anchor, focus) => {
                    select(&mut editor, anchor, focus);
                    editor.paste(&ClipboardPayload::html(html));
                }
                EditOp::Undo => {
                    editor.undo();
                }
            }
            let document = editor.document();
            prop_assert!(is_flat(document), "nested marks in {}", document.inner_html());
            prop_assert!(no_adjacent_runs(document), "touching runs in {}", document.inner_html());
        }
    }

    #[test]
    fn test_classify_is_pure(ops in ops_strategy(), anchor in 0..8usize, focus in 0..8usize) {
        let mut document = Document::from_html("abcdef");
        for (mark, a, f) in ops {
            let selection = selection_at(&document, a, f);
            let classification = classify(&document, Some(&selection));
            format::apply(&mut document, Some(&selection), mark, &classification);
        }
        let before = document.clone();
        let selection = selection_at(&document, anchor, focus);
        let first = classify(&document, Some(&selection));
        prop_assert_eq!(classify(&document, Some(&selection)), first);
        prop_assert_eq!(document, before);
    }

    #[test]
    fn test_history_stays_linear(ops in history_ops()) {
        let mut history = History::new();
        history.save("initial");
        for op in ops {
            match op {
                HistoryOp::Save(value) => {
                    let snapshot = value.to_string();
                    let changed = history.save(snapshot.clone());
                    prop_assert_eq!(history.current(), Some(snapshot.as_str()));
                    if changed {
                        prop_assert!(!history.can_redo());
                        prop_assert_eq!(history.index(), Some(history.len() - 1));
                    }
                }
                HistoryOp::Undo => {
                    let could = history.can_undo();
                    prop_assert_eq!(history.undo().is_some(), could);
                }
                HistoryOp::Redo => {
                    let could = history.can_redo();
                    prop_assert_eq!(history.redo().is_some(), could);
                }
            }
            prop_assert_eq!(history.snapshots()[0].as_str(), "initial");
            prop_assert!(history.index().is_some_and(|index| index < history.len()));
        }
    }
}
