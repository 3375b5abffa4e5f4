//! Linear undo/redo history over sanitized snapshots
//!
//! A branch-on-write stack: saving after an undo discards the undone snapshots, and saving a
//! snapshot equal to the current one is ignored. Undo never goes below the first snapshot, so
//! the content an editor was attached with can always be restored but never removed.

use tracing::{debug, trace};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    snapshots: Vec<String>,
    /// `None` until the first save.
    index: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `snapshot` as the new current state. Returns `false` when it equals the current
    /// snapshot and nothing was stored.
    pub fn save(&mut self, snapshot: impl Into<String>) -> bool {
        let snapshot = snapshot.into();
        if self.current() == Some(snapshot.as_str()) {
            trace!("history unchanged");
            return false;
        }
        let keep = self.index.map_or(0, |index| index + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push(snapshot);
        self.index = Some(keep);
        debug!(index = keep, "history saved");
        true
    }

    pub fn undo(&mut self) -> Option<&str> {
        match self.index {
            Some(index) if index > 0 => {
                self.index = Some(index - 1);
                self.current()
            }
            _ => None,
        }
    }

    pub fn redo(&mut self) -> Option<&str> {
        match self.index {
            Some(index) if index + 1 < self.snapshots.len() => {
                self.index = Some(index + 1);
                self.current()
            }
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.index.map(|index| self.snapshots[index].as_str())
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.index, Some(index) if index > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.index, Some(index) if index + 1 < self.snapshots.len())
    }

    pub fn snapshots(&self) -> &[String] {
        &self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        let mut history = History::new();
        assert_eq!(history.index(), None);
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        assert!(history.is_empty());
    }

    #[test]
    fn test_save_dedups_current() {
        let mut history = History::new();
        assert!(history.save("a"));
        assert!(!history.save("a"));
        assert!(history.save("b"));
        assert!(history.save("a"));
        assert_eq!(history.snapshots(), &["a", "b", "a"]);
    }

    #[test]
    fn test_undo_stops_at_first_snapshot() {
        let mut history = History::new();
        history.save("a");
        history.save("b");
        assert_eq!(history.undo(), Some("a"));
        assert_eq!(history.undo(), None);
        assert_eq!(history.current(), Some("a"));
        assert!(!history.can_undo());
        assert!(history.can_redo());
    }

    #[test]
    fn test_save_after_undo_truncates_branch() {
        let mut history = History::new();
        history.save("a");
        history.save("b");
        history.save("c");
        history.undo();
        history.undo();
        assert!(history.save("d"));
        assert_eq!(history.snapshots(), &["a", "d"]);
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_redo() {
        let mut history = History::new();
        history.save("a");
        history.save("b");
        history.undo();
        assert_eq!(history.redo(), Some("b"));
        assert_eq!(history.redo(), None);
        assert_eq!(history.index(), Some(1));
    }
}
