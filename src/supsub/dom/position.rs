//! Boundary points, selections and ranges
//!
//!     A position is a DOM boundary point: a path from the editable root to a node plus an
//!     offset. Inside a text node the offset counts characters; inside an element it counts
//!     children, so `(element, 2)` sits between the second and third child.
//!
//!     Document order falls out of a single key: `path ++ [offset]` compared
//!     lexicographically. A point before child `i` of an element is a prefix of every point
//!     inside that child and therefore sorts first, and a point after it sorts last.

use std::cmp::Ordering;

/// Child indices from the editable root down to a node. The empty path is the root.
pub type NodePath = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub node: NodePath,
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodePath, offset: usize) -> Self {
        Self { node, offset }
    }

    fn key(&self) -> impl Iterator<Item = usize> + '_ {
        self.node.iter().copied().chain(std::iter::once(self.offset))
    }

    /// Keep this point valid after child `index` of the element at `parent` was removed.
    ///
    /// A point inside the removed node collapses onto the gap the node leaves behind.
    pub fn adjust_for_removal(&mut self, parent: &[usize], index: usize) {
        if self.node.len() > parent.len() && self.node.starts_with(parent) {
            let child = self.node[parent.len()];
            if child == index {
                *self = Position::new(parent.to_vec(), index);
            } else if child > index {
                self.node[parent.len()] -= 1;
            }
        } else if self.node == parent && self.offset > index {
            self.offset -= 1;
        }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(other.key())
    }
}

/// The user's selection: where it started (anchor) and where it ends (focus).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    pub fn caret(position: Position) -> Self {
        Self {
            anchor: position.clone(),
            focus: position,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The selection as a range in document order.
    pub fn range(&self) -> Range {
        if self.anchor <= self.focus {
            Range::new(self.anchor.clone(), self.focus.clone())
        } else {
            Range::new(self.focus.clone(), self.anchor.clone())
        }
    }

    pub fn adjust_for_removal(&mut self, parent: &[usize], index: usize) {
        self.anchor.adjust_for_removal(parent, index);
        self.focus.adjust_for_removal(parent, index);
    }
}

/// An ordered pair of boundary points, `start <= end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Deepest node containing both boundary points.
    pub fn common_ancestor(&self) -> NodePath {
        self.start
            .node
            .iter()
            .zip(&self.end.node)
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| *a)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(node: &[usize], offset: usize) -> Position {
        Position::new(node.to_vec(), offset)
    }

    #[test]
    fn test_document_order() {
        // Before child 0 of the root comes before anything inside child 0.
        assert!(pos(&[], 0) < pos(&[0], 3));
        // After child 0 of the root comes after anything inside child 0.
        assert!(pos(&[], 1) > pos(&[0, 0], 9));
        assert!(pos(&[0, 0], 1) < pos(&[0, 0], 2));
        assert!(pos(&[0], 5) < pos(&[1], 0));
    }

    #[test]
    fn test_range_orders_backward_selection() {
        let selection = Selection::new(pos(&[2], 1), pos(&[0], 0));
        let range = selection.range();
        assert_eq!(range.start, pos(&[0], 0));
        assert_eq!(range.end, pos(&[2], 1));
    }

    #[test]
    fn test_common_ancestor() {
        let range = Range::new(pos(&[1, 0], 1), pos(&[1, 0], 2));
        assert_eq!(range.common_ancestor(), vec![1, 0]);
        let range = Range::new(pos(&[0, 0], 1), pos(&[2], 0));
        assert_eq!(range.common_ancestor(), Vec::<usize>::new());
    }

    #[test]
    fn test_adjust_for_removal() {
        let mut inside_removed = pos(&[1, 0], 2);
        inside_removed.adjust_for_removal(&[], 1);
        assert_eq!(inside_removed, pos(&[], 1));

        let mut later_sibling = pos(&[3, 0], 1);
        later_sibling.adjust_for_removal(&[], 1);
        assert_eq!(later_sibling, pos(&[2, 0], 1));

        let mut boundary = pos(&[], 3);
        boundary.adjust_for_removal(&[], 0);
        assert_eq!(boundary, pos(&[], 2));

        let mut untouched = pos(&[0], 1);
        untouched.adjust_for_removal(&[], 1);
        assert_eq!(untouched, pos(&[0], 1));
    }
}
