//! An editing session over one template.
//!
//! Pairs the template's metadata with an [`EditorState`] seeded from the
//! stored document. Sessions live only as long as the caller keeps them; the
//! result is written back explicitly via [`Session::into_template`] and the
//! template store.

use crate::coords::Surface;
use crate::edit::EditOp;
use crate::error::Result;
use crate::history::EditorState;
use crate::model::{Document, Metadata, Template};
use chrono::Utc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Undone,
    Redone,
    Selected,
    /// Undo/redo with an empty stack, or a rejected selection.
    Unchanged,
}

pub struct Session {
    metadata: Metadata,
    baseline: Document,
    state: EditorState,
}

impl Session {
    pub fn open(template: Template, history_limit: Option<usize>) -> Self {
        let Template { metadata, document } = template;
        debug!(template = %metadata.id, nodes = document.len(), "session opened");
        Self {
            metadata,
            state: EditorState::with_document(document.clone()).with_limit(history_limit),
            baseline: document,
        }
    }

    pub fn perform(&mut self, op: &EditOp) -> Result<Outcome> {
        let outcome = match op {
            EditOp::Undo => {
                if self.state.undo() {
                    Outcome::Undone
                } else {
                    Outcome::Unchanged
                }
            }
            EditOp::Redo => {
                if self.state.redo() {
                    Outcome::Redone
                } else {
                    Outcome::Unchanged
                }
            }
            EditOp::Select { index } => {
                if self.state.select(*index) {
                    Outcome::Selected
                } else {
                    Outcome::Unchanged
                }
            }
            _ => match op.transform(self.state.document())? {
                Some(document) => {
                    self.state.apply(document);
                    Outcome::Applied
                }
                None => Outcome::Unchanged,
            },
        };
        Ok(outcome)
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn surface(&self) -> Surface {
        Surface::from_metadata(&self.metadata)
    }

    /// True when the current document differs from the one the session opened with.
    pub fn is_dirty(&self) -> bool {
        self.state.document() != &self.baseline
    }

    /// Ends the session, producing the template to save.
    pub fn into_template(self) -> Template {
        let dirty = self.is_dirty();
        let mut metadata = self.metadata;
        if dirty {
            metadata.updated_at = Utc::now();
        }
        Template {
            metadata,
            document: self.state.into_document(),
        }
    }
}
