//! Main module for supsub library functionality

pub mod classifier;
pub mod dom;
pub mod editor;
pub mod format;
pub mod history;
pub mod mark;
pub mod markup;
pub mod sanitizer;
pub mod testing;
