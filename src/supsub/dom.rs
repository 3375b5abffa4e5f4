//! Document model
//!
//! An owned stand-in for the editable DOM subtree: a node tree, boundary-point selections
//! over it, the range operations the format engine needs, and HTML parsing/serialization.

pub mod document;
pub mod html;
pub mod node;
pub mod position;
pub mod range;

pub use document::{Document, NodeRef};
pub use node::{Element, Node, PLACEHOLDER};
pub use position::{NodePath, Position, Range, Selection};
pub use range::{clone_contents, delete_contents, range_text, Cloned};
