//! # supsub
//!
//! Formatting engine for a rich-text micro-editor that knows exactly two inline styles,
//! superscript and subscript, and mirrors its content into a plain form field.
//!
//! File Layout
//!
//!     The engine is split leaf-first, each layer only depending on the ones above it:
//!
//!     src/supsub
//!       ├── mark          The two marks and the mode an editor offers
//!       ├── dom           Owned editable node tree, boundary points, ranges, HTML I/O
//!       ├── sanitizer     Ordered rule tables: clean, clean_paste, clean_snapshot
//!       ├── markup        Tokenizer/validator for the mirrored sup/sub format
//!       ├── classifier    Selection vs. mark classification (read only)
//!       ├── format        The mark apply/remove state machine
//!       ├── history       Linear undo/redo over snapshots
//!       ├── editor        Headless controller, registry, selection observer
//!       └── testing       Bracket-annotated fixtures for tests
//!
//!     Everything above `editor` is pure with respect to its inputs: the document and
//!     selection are passed in explicitly and nothing is cached across calls.
//!
//! For testing helpers, see the [testing module](supsub::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod supsub;
