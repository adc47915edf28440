//! Linear undo/redo over immutable line-list snapshots.
//!
//! Snapshots live in an arena indexed by a cursor. Committing after an
//! undo truncates everything past the cursor, so history never branches.

use roofline_core::models::Edge;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Arc<Vec<Edge>>>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_initial(Vec::new())
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// History whose oldest reachable state is `lines`
    pub fn with_initial(lines: Vec<Edge>) -> Self {
        Self { snapshots: vec![Arc::new(lines)], cursor: 0 }
    }

    pub fn current(&self) -> &Arc<Vec<Edge>> {
        &self.snapshots[self.cursor]
    }

    /// Make `lines` the current state and drop any redo states
    pub fn commit(&mut self, lines: Vec<Edge>) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(Arc::new(lines));
        self.cursor += 1;
    }

    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    pub fn redo_depth(&self) -> usize {
        self.snapshots.len() - self.cursor - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roofline_core::models::{EdgeId, PixelPoint, PixelScale};

    fn lines(n: u64) -> Vec<Edge> {
        (0..n)
            .map(|i| {
                Edge::new(
                    EdgeId(i),
                    PixelPoint::new(0.0, i as f64),
                    PixelPoint::new(10.0, i as f64),
                    PixelScale::default(),
                )
            })
            .collect()
    }

    #[test]
    fn test_undo_redo_cursor() {
        let mut history = History::new();
        history.commit(lines(1));
        history.commit(lines(2));

        assert!(history.undo());
        assert_eq!(history.current().len(), 1);
        assert!(history.redo());
        assert_eq!(history.current().len(), 2);
        assert!(!history.redo());
    }

    #[test]
    fn test_commit_after_undo_truncates() {
        let mut history = History::new();
        history.commit(lines(1));
        history.commit(lines(2));
        history.undo();
        history.commit(lines(5));

        assert!(!history.can_redo());
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.current().len(), 5);
    }

    #[test]
    fn test_initial_state_is_not_undoable() {
        let mut history = History::with_initial(lines(3));
        assert!(!history.undo());
        assert_eq!(history.current().len(), 3);
        assert_eq!(history.redo_depth(), 0);
    }
}
