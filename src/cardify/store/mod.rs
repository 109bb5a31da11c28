//! # Storage Layer
//!
//! Templates are persisted behind the [`TemplateStore`] trait so the command
//! layer never knows whether it talks to the filesystem or to memory.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production file-based storage
//!   - Metadata for all templates in `index.json`
//!   - One document file per template: `template-{uuid}.json`
//!   - Writes go through a temp file and a rename
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!
//! ## Scope Pattern
//!
//! All operations take a [`Scope`]:
//! - `Scope::Project`: `.cardify/` directory in the current project
//! - `Scope::Global`: the user-wide template library
//!
//! ## Storage Format
//!
//! ```text
//! .cardify/
//! ├── index.json                # uuid -> Metadata map
//! ├── template-{uuid}.json      # Document (array of nodes)
//! └── config.json               # Scope configuration
//! ```
//!
//! Metadata and documents live apart so listing templates doesn't parse
//! every document.

use crate::error::Result;
use crate::model::{Document, Scope, Template};
use chrono::Utc;
use std::path::PathBuf;
use uuid::Uuid;

pub mod fs;
pub mod memory;

/// Report from the `doctor` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub fixed_missing_files: usize,
    pub recovered_files: usize,
    pub unreadable_files: Vec<PathBuf>,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        self.fixed_missing_files == 0
            && self.recovered_files == 0
            && self.unreadable_files.is_empty()
    }
}

/// Abstract interface for template storage.
pub trait TemplateStore {
    /// Save a template (create or update)
    fn save_template(&mut self, template: &Template, scope: Scope) -> Result<()>;

    fn get_template(&self, id: &Uuid, scope: Scope) -> Result<Template>;

    fn list_templates(&self, scope: Scope) -> Result<Vec<Template>>;

    fn delete_template(&mut self, id: &Uuid, scope: Scope) -> Result<()>;

    /// Location of the template's document (virtual for non-file stores)
    fn template_path(&self, id: &Uuid, scope: Scope) -> Result<PathBuf>;

    /// Verify and fix consistency issues
    fn doctor(&mut self, scope: Scope) -> Result<DoctorReport>;

    /// The editor's view of a stored template: just its document.
    fn load_document(&self, id: &Uuid, scope: Scope) -> Result<Document> {
        Ok(self.get_template(id, scope)?.document)
    }

    /// Replaces a stored template's document, keeping its metadata.
    fn save_document(&mut self, id: &Uuid, scope: Scope, document: Document) -> Result<()> {
        let mut template = self.get_template(id, scope)?;
        template.document = document;
        template.metadata.updated_at = Utc::now();
        self.save_template(&template, scope)
    }
}
