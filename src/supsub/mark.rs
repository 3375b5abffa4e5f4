//! The two inline marks
//!
//! A mark is bound to a tag name (`sup`/`sub`) and to the CSS class of its toolbar button.
//! The set is closed: nothing else is ever allowed to survive sanitization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two supported inline styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Superscript,
    Subscript,
}

impl Mark {
    pub const ALL: [Mark; 2] = [Mark::Superscript, Mark::Subscript];

    /// Tag name used in the markup.
    pub fn tag(self) -> &'static str {
        match self {
            Mark::Superscript => "sup",
            Mark::Subscript => "sub",
        }
    }

    /// Human readable name, also the key of the button settings.
    pub fn name(self) -> &'static str {
        match self {
            Mark::Superscript => "superscript",
            Mark::Subscript => "subscript",
        }
    }

    /// CSS class carried by the toolbar button for this mark.
    pub fn button_class(self) -> &'static str {
        match self {
            Mark::Superscript => "ousupsub_superscript_button_superscript",
            Mark::Subscript => "ousupsub_subscript_button_subscript",
        }
    }

    pub fn other(self) -> Mark {
        match self {
            Mark::Superscript => Mark::Subscript,
            Mark::Subscript => Mark::Superscript,
        }
    }

    /// Resolve a tag name (case-insensitive) to a mark.
    pub fn from_tag(tag: &str) -> Option<Mark> {
        if tag.eq_ignore_ascii_case("sup") {
            Some(Mark::Superscript)
        } else if tag.eq_ignore_ascii_case("sub") {
            Some(Mark::Subscript)
        } else {
            None
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Which marks an editor instance offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkMode {
    #[default]
    Both,
    Sup,
    Sub,
}

impl MarkMode {
    pub fn supports(self, mark: Mark) -> bool {
        match self {
            MarkMode::Both => true,
            MarkMode::Sup => mark == Mark::Superscript,
            MarkMode::Sub => mark == Mark::Subscript,
        }
    }

    /// Marks in toolbar order.
    pub fn marks(self) -> Vec<Mark> {
        Mark::ALL.into_iter().filter(|m| self.supports(*m)).collect()
    }
}
