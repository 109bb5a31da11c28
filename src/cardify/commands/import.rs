use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CardifyError, Result};
use crate::model::{Scope, Template};
use crate::store::TemplateStore;
use crate::validation::parse_template;
use chrono::Utc;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

const BUNDLE_SUFFIX: &str = ".tar.gz";

/// Imports template JSON files, directories of them, and export bundles.
///
/// Every imported template gets a fresh id, so importing a bundle back into
/// the store it came from duplicates rather than overwrites.
pub fn run<S: TemplateStore>(
    store: &mut S,
    scope: Scope,
    paths: Vec<PathBuf>,
    import_exts: &[String],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut imported = Vec::new();

    for path in paths {
        if path.is_dir() {
            let entries = fs::read_dir(&path).map_err(CardifyError::Io)?;
            let mut files: Vec<PathBuf> = Vec::new();
            for entry in entries {
                let sub_path = entry.map_err(CardifyError::Io)?.path();
                if sub_path.is_file() && has_import_ext(&sub_path, import_exts) {
                    files.push(sub_path);
                }
            }
            files.sort();
            for file in files {
                import_path(store, scope, &file, &mut result, &mut imported);
            }
        } else if path.is_file() {
            import_path(store, scope, &path, &mut result, &mut imported);
        } else {
            result.add_message(CmdMessage::warning(format!(
                "Path not found: {}",
                path.display()
            )));
        }
    }

    result.add_message(CmdMessage::success(format!(
        "Total imported: {}",
        imported.len()
    )));
    Ok(result.with_affected_templates(imported))
}

fn import_path<S: TemplateStore>(
    store: &mut S,
    scope: Scope,
    path: &Path,
    result: &mut CmdResult,
    imported: &mut Vec<Template>,
) {
    let outcome = if is_bundle(path) {
        import_bundle(store, scope, path)
    } else {
        import_file(store, scope, path).map(|t| vec![t])
    };

    match outcome {
        Ok(templates) => {
            for template in &templates {
                result.add_message(CmdMessage::info(format!(
                    "Imported: {} ({})",
                    template.metadata.name,
                    path.display()
                )));
            }
            imported.extend(templates);
        }
        Err(e) => result.add_message(CmdMessage::warning(format!(
            "Failed to import {}: {}",
            path.display(),
            e
        ))),
    }
}

fn import_file<S: TemplateStore>(store: &mut S, scope: Scope, path: &Path) -> Result<Template> {
    let content = fs::read_to_string(path).map_err(CardifyError::Io)?;
    save_fresh(store, scope, parse_template(&content)?)
}

/// All-or-nothing: a bundle with one bad entry imports nothing, and a save
/// that fails part way removes the entries already written.
fn import_bundle<S: TemplateStore>(store: &mut S, scope: Scope, path: &Path) -> Result<Vec<Template>> {
    let file = File::open(path).map_err(CardifyError::Io)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    let mut contents = Vec::new();
    for entry in archive.entries().map_err(CardifyError::Io)? {
        let mut entry = entry.map_err(CardifyError::Io)?;
        let name = entry.path().map_err(CardifyError::Io)?.display().to_string();
        if !name.ends_with(".json") {
            debug!(entry = %name, "skipping non-template bundle entry");
            continue;
        }
        let mut body = String::new();
        entry.read_to_string(&mut body).map_err(CardifyError::Io)?;
        contents.push(body);
    }

    let parsed: Vec<Template> = contents
        .iter()
        .map(|body| parse_template(body))
        .collect::<Result<_>>()?;

    let mut saved: Vec<Template> = Vec::with_capacity(parsed.len());
    for template in parsed {
        match save_fresh(store, scope, template) {
            Ok(template) => saved.push(template),
            Err(e) => {
                for template in &saved {
                    if let Err(cleanup) = store.delete_template(&template.metadata.id, scope) {
                        warn!(
                            id = %template.metadata.id,
                            error = %cleanup,
                            "could not roll back bundle entry"
                        );
                    }
                }
                return Err(e);
            }
        }
    }
    Ok(saved)
}

fn save_fresh<S: TemplateStore>(store: &mut S, scope: Scope, mut template: Template) -> Result<Template> {
    let now = Utc::now();
    template.metadata.id = Uuid::new_v4();
    template.metadata.created_at = now;
    template.metadata.updated_at = now;
    store.save_template(&template, scope)?;
    Ok(template)
}

fn is_bundle(path: &Path) -> bool {
    path.to_string_lossy().ends_with(BUNDLE_SUFFIX)
}

fn has_import_ext(path: &Path, import_exts: &[String]) -> bool {
    if is_bundle(path) {
        return true;
    }
    path.extension()
        .map(|ext| import_exts.contains(&format!(".{}", ext.to_string_lossy())))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::export;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use tempfile::TempDir;

    const CARD: &str = r#"{
        "metadata": {"name": "Imported", "width": 1050, "height": 600},
        "document": [
            {"type": "text", "geometry": {"x": 10, "y": 10, "width": 200, "height": 30}, "content": "Hi"}
        ]
    }"#;

    fn exts() -> Vec<String> {
        vec![".json".to_string()]
    }

    #[test]
    fn imports_single_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("card.json");
        fs::write(&path, CARD).unwrap();

        let mut store = InMemoryStore::new();
        let result = run(&mut store, Scope::Project, vec![path], &exts()).unwrap();
        assert_eq!(result.affected_templates.len(), 1);

        let stored = store.list_templates(Scope::Project).unwrap();
        assert_eq!(stored[0].metadata.name, "Imported");
        assert_eq!(stored[0].document.len(), 1);
    }

    #[test]
    fn directory_import_filters_by_extension() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.json"), CARD).unwrap();
        fs::write(temp.path().join("notes.txt"), "not a card").unwrap();

        let mut store = InMemoryStore::new();
        run(&mut store, Scope::Project, vec![temp.path().to_path_buf()], &exts()).unwrap();
        assert_eq!(store.list_templates(Scope::Project).unwrap().len(), 1);
    }

    #[test]
    fn invalid_file_warns_and_imports_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, r#"{"metadata": {"name": "Bad", "width": -1, "height": 5}}"#).unwrap();

        let mut store = InMemoryStore::new();
        let result = run(&mut store, Scope::Project, vec![path], &exts()).unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.starts_with("Failed to import")));
        assert!(store.list_templates(Scope::Project).unwrap().is_empty());
    }

    #[test]
    fn exported_bundle_round_trips_with_new_ids() {
        let temp = TempDir::new().unwrap();
        let bundle = temp.path().join("out.tar.gz");
        let fixture = StoreFixture::new()
            .with_sample_card("Badge", Scope::Project)
            .with_relative_card("Rel", Scope::Project);
        export::run(&fixture.store, Scope::Project, &[], Some(bundle.clone())).unwrap();

        let mut target = InMemoryStore::new();
        run(&mut target, Scope::Global, vec![bundle], &exts()).unwrap();

        let originals = fixture.store.list_templates(Scope::Project).unwrap();
        let imported = target.list_templates(Scope::Global).unwrap();
        assert_eq!(imported.len(), 2);
        for template in &imported {
            assert!(originals.iter().all(|o| o.metadata.id != template.metadata.id));
            let source = originals
                .iter()
                .find(|o| o.metadata.name == template.metadata.name)
                .unwrap();
            assert_eq!(source.document, template.document);
        }
    }

    #[test]
    fn bundle_save_failure_rolls_back_earlier_entries() {
        let temp = TempDir::new().unwrap();
        let bundle = temp.path().join("out.tar.gz");
        let fixture = StoreFixture::new().with_templates(3, Scope::Project);
        export::run(&fixture.store, Scope::Project, &[], Some(bundle.clone())).unwrap();

        let mut target = InMemoryStore::new();
        target.fail_writes_after(2);
        let result = run(&mut target, Scope::Project, vec![bundle], &exts()).unwrap();

        assert!(result.affected_templates.is_empty());
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.starts_with("Failed to import")));
        assert!(target.list_templates(Scope::Project).unwrap().is_empty());
    }

    #[test]
    fn missing_path_warns() {
        let mut store = InMemoryStore::new();
        let result = run(
            &mut store,
            Scope::Project,
            vec![PathBuf::from("/definitely/not/here.json")],
            &exts(),
        )
        .unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.starts_with("Path not found")));
    }
}
