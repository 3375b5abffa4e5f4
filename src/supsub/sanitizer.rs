//! Markup sanitizer
//!
//! Pure string-to-string rewriting that reduces arbitrary HTML to the editor's mirror format:
//! text plus bare `<sup>`/`<sub>` tags. Three entry points:
//!
//! - [`clean`]: the rule pipeline, used on every snapshot.
//! - [`clean_paste`]: clipboard HTML, with artifact stripping and a structural round trip.
//! - [`clean_snapshot`]: the serialized live document, with the visually-empty shortcuts.
//!
//! None of them can fail. The rule tables live in [`rules`].

pub mod rules;

use crate::supsub::dom::{html, Document};
use rules::{CLEAN, PASTE_ARTIFACTS, VENDOR};
use tracing::{trace, warn};

/// Upper bound on pipeline passes in [`clean`].
pub const MAX_PASSES: usize = 64;

/// Serializations of a document that looks empty to the user.
pub const EMPTY_CONTENTS: &[&str] = &[
    "<p></p>",
    "<p><br></p>",
    "<br>",
    "<p dir=\"rtl\" style=\"text-align: right;\"></p>",
    "<p dir=\"rtl\" style=\"text-align: right;\"><br></p>",
    "<p dir=\"ltr\" style=\"text-align: left;\"></p>",
    "<p dir=\"ltr\" style=\"text-align: left;\"><br></p>",
    "<p>&nbsp;</p>",
    "<p><br>&nbsp;</p>",
    "<p dir=\"rtl\" style=\"text-align: right;\">&nbsp;</p>",
    "<p dir=\"rtl\" style=\"text-align: right;\"><br>&nbsp;</p>",
    "<p dir=\"ltr\" style=\"text-align: left;\">&nbsp;</p>",
    "<p dir=\"ltr\" style=\"text-align: left;\"><br>&nbsp;</p>",
];

/// Run the clean pipeline until it stops changing the string.
///
/// A single pass can expose new matches for earlier rules (unwrapping a span can make two
/// `<sup>` runs adjacent, for instance), so one pass alone is not idempotent.
pub fn clean(html: &str) -> String {
    let mut current = html.to_owned();
    for _ in 0..MAX_PASSES {
        let next = CLEAN.apply(&current);
        if next == current {
            return current;
        }
        current = next;
    }
    warn!(passes = MAX_PASSES, "clean did not settle");
    current
}

/// Clean clipboard HTML for insertion.
///
/// Whitespace-only results of the first clean skip the round trip and are returned as they
/// are; a failed round trip falls back to that first clean.
pub fn clean_paste(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let cleaned = clean(&PASTE_ARTIFACTS.apply(html));
    if cleaned.chars().all(is_whitespace) {
        trace!("paste is blank after cleaning");
        return cleaned;
    }

    let repaired = match html::reserialize(&cleaned) {
        Ok(repaired) => repaired,
        Err(err) => {
            warn!(%err, "paste round trip failed");
            return cleaned;
        }
    };
    clean(&VENDOR.apply(&repaired))
}

/// The sanitized snapshot of a document, as stored in history and the mirror field.
pub fn clean_snapshot(document: &Document) -> String {
    let html = document.inner_html();
    if EMPTY_CONTENTS.contains(&html.as_str()) {
        return String::new();
    }
    clean(&html)
}

fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || c == crate::supsub::dom::PLACEHOLDER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_is_total_on_plain_text() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("x^2"), "x^2");
    }

    #[test]
    fn test_clean_converges_on_nested_spans() {
        assert_eq!(clean("<span><span><sup>1</sup></span></span><sup>2</sup>"), "<sup>12</sup>");
    }

    #[test]
    fn test_empty_document_snapshot() {
        for html in EMPTY_CONTENTS {
            let document = Document::from_html(html);
            assert_eq!(clean_snapshot(&document), "", "{html}");
        }
    }

    #[test]
    fn test_paste_blank() {
        assert_eq!(clean_paste(""), "");
        assert_eq!(clean_paste("<p>&nbsp;</p> "), " ");
    }
}
