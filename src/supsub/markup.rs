//! Mirror-format tokenizer and validator
//!
//! The mirror field holds text plus bare `<sup>`/`<sub>` tags and nothing else. This module
//! tokenizes such a string with logos and reports every place where it departs from that
//! format, with byte spans into the input.

use crate::supsub::dom::PLACEHOLDER;
use crate::supsub::mark::Mark;
use logos::Logos;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    #[token("<sup>", ignore(ascii_case))]
    OpenSup,
    #[token("</sup>", ignore(ascii_case))]
    CloseSup,
    #[token("<sub>", ignore(ascii_case))]
    OpenSub,
    #[token("</sub>", ignore(ascii_case))]
    CloseSub,

    // Any other tag, including an unterminated `<`
    #[regex(r"<[^>]*>?")]
    Tag,

    #[regex(r"[^<]+")]
    Text,
}

impl Token {
    pub fn opens(self) -> Option<Mark> {
        match self {
            Token::OpenSup => Some(Mark::Superscript),
            Token::OpenSub => Some(Mark::Subscript),
            _ => None,
        }
    }

    pub fn closes(self) -> Option<Mark> {
        match self {
            Token::CloseSup => Some(Mark::Superscript),
            Token::CloseSub => Some(Mark::Subscript),
            _ => None,
        }
    }
}

/// Tokens with their byte spans.
pub fn tokenize(input: &str) -> Vec<(Token, Range<usize>)> {
    Token::lexer(input)
        .spanned()
        .map(|(token, span)| (token.unwrap_or(Token::Text), span))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A tag other than a bare mark tag.
    DisallowedTag,
    /// A closing mark tag that does not match the innermost open mark.
    UnbalancedClose,
    /// A mark still open at the end of input.
    UnclosedMark,
    /// A mark opened inside itself.
    NestedMark,
    /// A mark opened right where the same mark just closed.
    AdjacentMarks,
    /// A placeholder character that should have been stripped.
    StrayPlaceholder,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ViolationKind::DisallowedTag => "disallowed tag",
            ViolationKind::UnbalancedClose => "unbalanced closing tag",
            ViolationKind::UnclosedMark => "unclosed mark",
            ViolationKind::NestedMark => "mark nested in itself",
            ViolationKind::AdjacentMarks => "adjacent marks of the same kind",
            ViolationKind::StrayPlaceholder => "stray placeholder character",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub span: Range<usize>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.kind, self.span.start, self.span.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupError {
    pub violations: Vec<Violation>,
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for MarkupError {}

/// Check that `input` is in mirror format.
pub fn validate(input: &str) -> Result<(), MarkupError> {
    let mut violations = Vec::new();
    let mut open: Vec<(Mark, Range<usize>)> = Vec::new();
    let mut last_close: Option<(Mark, usize)> = None;

    for (token, span) in tokenize(input) {
        let mut report = |kind: ViolationKind, span: Range<usize>| violations.push(Violation { kind, span });
        if let Some(mark) = token.opens() {
            if open.iter().any(|(m, _)| *m == mark) {
                report(ViolationKind::NestedMark, span.clone());
            }
            if last_close == Some((mark, span.start)) {
                report(ViolationKind::AdjacentMarks, span.clone());
            }
            open.push((mark, span.clone()));
        } else if let Some(mark) = token.closes() {
            match open.last() {
                Some((m, _)) if *m == mark => {
                    open.pop();
                }
                _ => report(ViolationKind::UnbalancedClose, span.clone()),
            }
            last_close = Some((mark, span.end));
            continue;
        } else if token == Token::Tag {
            report(ViolationKind::DisallowedTag, span.clone());
        } else {
            for (at, c) in input[span.clone()].char_indices() {
                if c == PLACEHOLDER {
                    let start = span.start + at;
                    report(ViolationKind::StrayPlaceholder, start..start + c.len_utf8());
                }
            }
        }
        last_close = None;
    }

    for (_, span) in open {
        violations.push(Violation {
            kind: ViolationKind::UnclosedMark,
            span,
        });
    }
    violations.sort_by_key(|v| (v.span.start, v.span.end));

    if violations.is_empty() {
        Ok(())
    } else {
        Err(MarkupError { violations })
    }
}
