//! # Undo/Redo Document Store
//!
//! [`EditorState`] is the single source of truth for an in-progress design:
//! the current [`Document`], a linear history of past documents, a future
//! stack of undone documents, and the (unrecorded) node selection.
//!
//! ## Transitions
//!
//! ```text
//! apply(doc):  history.push(current); future.clear(); current = doc
//! undo():      future.push(current);  current = history.pop()   (no-op if empty)
//! redo():      history.push(current); current = future.pop()    (no-op if empty)
//! ```
//!
//! History is linear: applying after an undo discards the future stack, so a
//! redo after a fresh edit has nothing to restore.
//!
//! ## Snapshots
//!
//! Snapshots are shared through `Rc<Document>`. Undo and redo only move
//! pointers between stacks; a snapshot is never mutated once pushed.
//!
//! ## Selection
//!
//! `select` rejects indexes outside the current document. Whenever the current
//! document changes, a selection that no longer points at a node is cleared.
//!
//! Every operation is total. Malformed nodes are rejected before they reach
//! this store (see [`crate::edit`] and [`crate::validation`]).

use crate::model::{Document, Node};
use std::rc::Rc;
use tracing::{debug, warn};

/// Which of the undo/redo controls are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus {
    Fresh,
    HasUndo,
    HasRedo,
    Both,
}

#[derive(Debug, Clone, Default)]
pub struct EditorState {
    current: Rc<Document>,
    history: Vec<Rc<Document>>,
    future: Vec<Rc<Document>>,
    selected: Option<usize>,
    limit: Option<usize>,
}

impl EditorState {
    /// Fresh state over an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state seeded with a loaded document. The seed is not undoable.
    pub fn with_document(document: Document) -> Self {
        Self {
            current: Rc::new(document),
            ..Self::default()
        }
    }

    /// Caps the number of undo steps kept. `None` keeps everything.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self.trim_history();
        self
    }

    pub fn document(&self) -> &Document {
        &self.current
    }

    pub fn apply(&mut self, document: Document) {
        let previous = std::mem::replace(&mut self.current, Rc::new(document));
        self.history.push(previous);
        self.future.clear();
        self.trim_history();
        self.reconcile_selection();
        debug!(
            nodes = self.current.len(),
            undo_depth = self.history.len(),
            "applied document"
        );
    }

    /// Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, previous);
        self.future.push(current);
        self.reconcile_selection();
        debug!(
            undo_depth = self.history.len(),
            redo_depth = self.future.len(),
            "undo"
        );
        true
    }

    /// Returns `false` when there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, next);
        self.history.push(current);
        self.trim_history();
        self.reconcile_selection();
        debug!(
            undo_depth = self.history.len(),
            redo_depth = self.future.len(),
            "redo"
        );
        true
    }

    /// Sets or clears the selection. Out-of-range indexes are rejected and
    /// leave the selection untouched.
    pub fn select(&mut self, index: Option<usize>) -> bool {
        match index {
            Some(i) if i >= self.current.len() => {
                warn!(index = i, nodes = self.current.len(), "selection out of range");
                false
            }
            _ => {
                self.selected = index;
                true
            }
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.and_then(|i| self.current.get(i))
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn status(&self) -> HistoryStatus {
        match (self.can_undo(), self.can_redo()) {
            (false, false) => HistoryStatus::Fresh,
            (true, false) => HistoryStatus::HasUndo,
            (false, true) => HistoryStatus::HasRedo,
            (true, true) => HistoryStatus::Both,
        }
    }

    /// Consumes the state, keeping only the current document.
    pub fn into_document(self) -> Document {
        Rc::try_unwrap(self.current).unwrap_or_else(|shared| (*shared).clone())
    }

    fn trim_history(&mut self) {
        if let Some(limit) = self.limit {
            if self.history.len() > limit {
                let excess = self.history.len() - limit;
                self.history.drain(..excess);
            }
        }
    }

    fn reconcile_selection(&mut self) {
        if let Some(i) = self.selected {
            if i >= self.current.len() {
                self.selected = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Geometry;

    fn node(label: &str) -> Node {
        Node::text(Geometry::new(0.0, 0.0, 10.0, 10.0), label)
    }

    fn doc(labels: &[&str]) -> Document {
        Document::from_nodes(labels.iter().map(|l| node(l)).collect())
    }

    #[test]
    fn new_state_is_fresh() {
        let state = EditorState::new();
        assert!(state.document().is_empty());
        assert_eq!(state.status(), HistoryStatus::Fresh);
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn undo_and_redo_walk_the_scenario() {
        let mut state = EditorState::new();
        state.apply(doc(&["A"]));
        state.apply(doc(&["A", "B"]));

        assert!(state.undo());
        assert_eq!(state.document(), &doc(&["A"]));
        assert!(state.undo());
        assert_eq!(state.document(), &doc(&[]));
        assert!(state.redo());
        assert_eq!(state.document(), &doc(&["A"]));
        assert!(state.redo());
        assert_eq!(state.document(), &doc(&["A", "B"]));

        assert!(!state.redo());
        assert_eq!(state.document(), &doc(&["A", "B"]));
    }

    #[test]
    fn undoing_every_apply_restores_the_seed() {
        let seed = doc(&["seed"]);
        let mut state = EditorState::with_document(seed.clone());
        for i in 0..25 {
            let label = format!("n{}", i);
            let mut nodes = state.document().nodes().to_vec();
            nodes.push(node(&label));
            state.apply(Document::from_nodes(nodes));
        }
        for _ in 0..25 {
            assert!(state.undo());
        }
        assert_eq!(state.document(), &seed);
        assert!(!state.can_undo());
    }

    #[test]
    fn redo_restores_the_exact_undone_document() {
        let mut state = EditorState::new();
        state.apply(doc(&["A"]));
        let before = state.document().clone();
        state.undo();
        state.redo();
        assert_eq!(state.document(), &before);
    }

    #[test]
    fn apply_after_undo_discards_future() {
        let mut state = EditorState::new();
        state.apply(doc(&["A"]));
        state.apply(doc(&["A", "B"]));
        state.undo();
        assert!(state.can_redo());

        state.apply(doc(&["X"]));
        assert!(!state.can_redo());
        assert!(!state.redo());
        assert_eq!(state.document(), &doc(&["X"]));
    }

    #[test]
    fn undo_on_empty_history_changes_nothing() {
        let mut state = EditorState::with_document(doc(&["A"]));
        assert!(!state.undo());
        assert_eq!(state.document(), &doc(&["A"]));
        assert_eq!(state.redo_depth(), 0);
    }

    #[test]
    fn undo_on_empty_history_keeps_future() {
        let mut state = EditorState::new();
        state.apply(doc(&["A"]));
        state.undo();
        assert_eq!(state.redo_depth(), 1);
        assert!(!state.undo());
        assert_eq!(state.redo_depth(), 1);
        assert_eq!(state.document(), &doc(&[]));
    }

    #[test]
    fn identical_applies_still_grow_history() {
        let mut state = EditorState::new();
        state.apply(doc(&["A"]));
        state.apply(doc(&["A"]));
        assert_eq!(state.undo_depth(), 2);
    }

    #[test]
    fn status_tracks_both_stacks() {
        let mut state = EditorState::new();
        state.apply(doc(&["A"]));
        assert_eq!(state.status(), HistoryStatus::HasUndo);
        state.apply(doc(&["A", "B"]));
        state.undo();
        assert_eq!(state.status(), HistoryStatus::Both);
        state.undo();
        assert_eq!(state.status(), HistoryStatus::HasRedo);
    }

    #[test]
    fn select_rejects_out_of_range() {
        let mut state = EditorState::with_document(doc(&["A", "B"]));
        assert!(state.select(Some(1)));
        assert!(!state.select(Some(2)));
        assert_eq!(state.selected(), Some(1));
        assert!(state.select(None));
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn selection_is_cleared_when_undo_removes_the_node() {
        let mut state = EditorState::new();
        state.apply(doc(&["A"]));
        state.apply(doc(&["A", "B"]));
        state.select(Some(1));
        state.undo();
        assert_eq!(state.selected(), None);
        assert!(state.selected_node().is_none());
    }

    #[test]
    fn selection_survives_when_node_still_exists() {
        let mut state = EditorState::new();
        state.apply(doc(&["A", "B"]));
        state.select(Some(0));
        state.apply(doc(&["A", "B", "C"]));
        assert_eq!(state.selected(), Some(0));
        assert_eq!(state.selected_node(), Some(&node("A")));
    }

    #[test]
    fn limit_drops_oldest_entries() {
        let mut state = EditorState::new().with_limit(Some(2));
        state.apply(doc(&["A"]));
        state.apply(doc(&["B"]));
        state.apply(doc(&["C"]));
        assert_eq!(state.undo_depth(), 2);
        state.undo();
        state.undo();
        assert_eq!(state.document(), &doc(&["A"]));
        assert!(!state.undo());
    }

    #[test]
    fn into_document_returns_current() {
        let mut state = EditorState::new();
        state.apply(doc(&["A"]));
        state.apply(doc(&["B"]));
        state.undo();
        assert_eq!(state.into_document(), doc(&["A"]));
    }
}
