use super::{DoctorReport, TemplateStore};
use crate::error::{CardifyError, Result};
use crate::model::{Document, Metadata, Scope, Template, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

const INDEX_FILENAME: &str = "index.json";
const TEMPLATE_PREFIX: &str = "template-";
const TEMPLATE_EXT: &str = ".json";

pub struct FileStore {
    project_root: Option<PathBuf>,
    global_root: PathBuf,
}

impl FileStore {
    pub fn new(project_root: Option<PathBuf>, global_root: PathBuf) -> Self {
        Self {
            project_root,
            global_root,
        }
    }

    fn template_filename(id: &Uuid) -> String {
        format!("{}{}{}", TEMPLATE_PREFIX, id, TEMPLATE_EXT)
    }

    /// Inverse of `template_filename`; `None` for unrelated files.
    fn id_from_filename(name: &str) -> Option<Uuid> {
        let stem = name.strip_prefix(TEMPLATE_PREFIX)?.strip_suffix(TEMPLATE_EXT)?;
        Uuid::parse_str(stem).ok()
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(CardifyError::Io)?;
        }
        Ok(())
    }

    fn get_store_path(&self, scope: Scope) -> Result<PathBuf> {
        let root = match scope {
            Scope::Project => self.project_root.as_ref().ok_or_else(|| {
                CardifyError::Store("No project scope available (run `cardify init`?)".to_string())
            })?,
            Scope::Global => &self.global_root,
        };
        Ok(root.clone())
    }

    fn load_index(&self, store_path: &Path) -> Result<HashMap<Uuid, Metadata>> {
        let index_file = store_path.join(INDEX_FILENAME);
        if !index_file.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(index_file).map_err(CardifyError::Io)?;
        let index: HashMap<Uuid, Metadata> =
            serde_json::from_str(&content).map_err(CardifyError::Serialization)?;
        Ok(index)
    }

    fn save_index(&self, store_path: &Path, index: &HashMap<Uuid, Metadata>) -> Result<()> {
        let content = serde_json::to_string_pretty(index).map_err(CardifyError::Serialization)?;
        write_atomic(&store_path.join(INDEX_FILENAME), &content)
    }

    fn read_document(&self, path: &Path) -> Result<Document> {
        let content = fs::read_to_string(path).map_err(CardifyError::Io)?;
        serde_json::from_str(&content).map_err(CardifyError::Serialization)
    }

    fn load_template(&self, root: &Path, metadata: Metadata) -> Result<Template> {
        let path = root.join(Self::template_filename(&metadata.id));
        let document = if path.exists() {
            self.read_document(&path)?
        } else {
            Document::new()
        };
        Ok(Template { metadata, document })
    }
}

/// Writes through a sibling temp file so readers never see a partial file.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    fs::write(&tmp_path, content).map_err(CardifyError::Io)?;
    fs::rename(&tmp_path, path).map_err(CardifyError::Io)?;
    Ok(())
}

impl TemplateStore for FileStore {
    fn save_template(&mut self, template: &Template, scope: Scope) -> Result<()> {
        let root = self.get_store_path(scope)?;
        self.ensure_dir(&root)?;

        // Document first, so the index never points at a file that isn't there
        let path = root.join(Self::template_filename(&template.metadata.id));
        let content =
            serde_json::to_string_pretty(&template.document).map_err(CardifyError::Serialization)?;
        write_atomic(&path, &content)?;

        let mut index = self.load_index(&root)?;
        index.insert(template.metadata.id, template.metadata.clone());
        self.save_index(&root, &index)?;

        info!(
            id = %template.metadata.id,
            name = %template.metadata.name,
            nodes = template.document.len(),
            "template saved"
        );
        Ok(())
    }

    fn get_template(&self, id: &Uuid, scope: Scope) -> Result<Template> {
        let root = self.get_store_path(scope)?;
        let index = self.load_index(&root)?;
        let metadata = index
            .get(id)
            .ok_or(CardifyError::TemplateNotFound(*id))?
            .clone();
        self.load_template(&root, metadata)
    }

    fn list_templates(&self, scope: Scope) -> Result<Vec<Template>> {
        let root = self.get_store_path(scope)?;
        if !root.exists() {
            return Ok(Vec::new());
        }

        let index = self.load_index(&root)?;
        let mut templates = Vec::with_capacity(index.len());
        for metadata in index.into_values() {
            templates.push(self.load_template(&root, metadata)?);
        }
        debug!(count = templates.len(), ?scope, "listed templates");
        Ok(templates)
    }

    fn delete_template(&mut self, id: &Uuid, scope: Scope) -> Result<()> {
        let root = self.get_store_path(scope)?;

        let mut index = self.load_index(&root)?;
        if index.remove(id).is_none() {
            return Err(CardifyError::TemplateNotFound(*id));
        }
        self.save_index(&root, &index)?;

        let path = root.join(Self::template_filename(id));
        if path.exists() {
            fs::remove_file(path).map_err(CardifyError::Io)?;
        }
        info!(%id, "template deleted");
        Ok(())
    }

    fn template_path(&self, id: &Uuid, scope: Scope) -> Result<PathBuf> {
        let root = self.get_store_path(scope)?;
        Ok(root.join(Self::template_filename(id)))
    }

    fn doctor(&mut self, scope: Scope) -> Result<DoctorReport> {
        let root = self.get_store_path(scope)?;
        let mut report = DoctorReport::default();
        if !root.exists() {
            return Ok(report);
        }

        let mut index = self.load_index(&root)?;
        let mut changed = false;

        // 1. Index entries whose document is gone
        let missing: Vec<Uuid> = index
            .keys()
            .filter(|id| !root.join(Self::template_filename(id)).exists())
            .copied()
            .collect();
        for id in missing {
            warn!(%id, "removing index entry with no document file");
            index.remove(&id);
            report.fixed_missing_files += 1;
            changed = true;
        }

        // 2. Document files the index doesn't know, and unreadable documents
        for entry in fs::read_dir(&root).map_err(CardifyError::Io)? {
            let path = entry.map_err(CardifyError::Io)?.path();
            let Some(id) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(Self::id_from_filename)
            else {
                continue;
            };

            match self.read_document(&path) {
                Ok(_) if index.contains_key(&id) => {}
                Ok(_) => {
                    let short = id.to_string()[..8].to_string();
                    let mut metadata = Metadata::new(
                        format!("Recovered {}", short),
                        DEFAULT_WIDTH,
                        DEFAULT_HEIGHT,
                        false,
                    );
                    metadata.id = id;
                    warn!(%id, "recovered document missing from index");
                    index.insert(id, metadata);
                    report.recovered_files += 1;
                    changed = true;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "unreadable template document");
                    report.unreadable_files.push(path);
                }
            }
        }

        if changed {
            self.save_index(&root, &index)?;
        }
        Ok(report)
    }
}
