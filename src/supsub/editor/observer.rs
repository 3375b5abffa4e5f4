//! Selection-change routing
//!
//! The host has one selection-change channel for the whole page. Instead of every editor
//! listening to it and filtering, editors subscribe here and a change is dispatched only to
//! the editor whose content holds the selection anchor.

use crate::supsub::dom::Selection;
use std::collections::BTreeSet;
use tracing::trace;

/// A selection change as published by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    /// Editor whose content holds the anchor; `None` when it is outside every editor.
    pub owner: Option<String>,
    pub selection: Option<Selection>,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionObserver {
    subscribers: BTreeSet<String>,
}

impl SelectionObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, id: &str) -> bool {
        self.subscribers.insert(id.to_owned())
    }

    pub fn unsubscribe(&mut self, id: &str) -> bool {
        self.subscribers.remove(id)
    }

    pub fn is_subscribed(&self, id: &str) -> bool {
        self.subscribers.contains(id)
    }

    /// The subscriber a change should go to, if any.
    pub fn route<'a>(&self, change: &'a SelectionChange) -> Option<&'a str> {
        let owner = change.owner.as_deref()?;
        if self.is_subscribed(owner) {
            Some(owner)
        } else {
            trace!(owner, "selection change for unsubscribed editor");
            None
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(owner: Option<&str>) -> SelectionChange {
        SelectionChange {
            owner: owner.map(str::to_owned),
            selection: None,
        }
    }

    #[test]
    fn test_routes_only_to_owner() {
        let mut observer = SelectionObserver::new();
        observer.subscribe("a");
        observer.subscribe("b");
        assert_eq!(observer.route(&change(Some("b"))), Some("b"));
        assert_eq!(observer.route(&change(Some("c"))), None);
        assert_eq!(observer.route(&change(None)), None);
    }

    #[test]
    fn test_unsubscribe() {
        let mut observer = SelectionObserver::new();
        assert!(observer.subscribe("a"));
        assert!(!observer.subscribe("a"));
        assert!(observer.unsubscribe("a"));
        assert!(observer.is_empty());
        assert_eq!(observer.route(&change(Some("a"))), None);
    }
}
