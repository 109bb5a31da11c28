//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! cardify operation, whatever the UI.
//!
//! The facade dispatches to `commands::*::run`, turning user-typed selectors
//! (`"2"`, a UUID, a name) into [`TemplateSelector`]s on the way. It holds no
//! business logic and never prints.
//!
//! `CardifyApi<S: TemplateStore>` is generic over the storage backend:
//! `CardifyApi<FileStore>` in production, `CardifyApi<InMemoryStore>` in tests.

use crate::commands;
use crate::edit::EditOp;
use crate::error::{CardifyError, Result};
use crate::index::TemplateSelector;
use crate::model::Scope;
use crate::store::TemplateStore;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct CardifyApi<S: TemplateStore> {
    store: S,
    paths: commands::CardifyPaths,
}

impl<S: TemplateStore> CardifyApi<S> {
    pub fn new(store: S, paths: commands::CardifyPaths) -> Self {
        Self { store, paths }
    }

    pub fn create_template(
        &mut self,
        scope: Scope,
        name: String,
        width: f64,
        height: f64,
        relative: bool,
    ) -> Result<commands::CmdResult> {
        commands::create::run(&mut self.store, scope, name, width, height, relative)
    }

    pub fn list_templates(&self, scope: Scope, search: Option<&str>) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, scope, search)
    }

    pub fn view_templates<I: AsRef<str>>(
        &self,
        scope: Scope,
        selectors: &[I],
    ) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::view::run(&self.store, scope, &selectors)
    }

    pub fn rename_template(
        &mut self,
        scope: Scope,
        selector: &str,
        new_name: String,
    ) -> Result<commands::CmdResult> {
        let selector = TemplateSelector::from_str(selector)?;
        commands::rename::run(&mut self.store, scope, &selector, new_name)
    }

    pub fn delete_templates<I: AsRef<str>>(
        &mut self,
        scope: Scope,
        selectors: &[I],
    ) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::delete::run(&mut self.store, scope, &selectors)
    }

    pub fn edit_template(
        &mut self,
        scope: Scope,
        selector: &str,
        ops: &[EditOp],
        history_limit: Option<usize>,
        dry_run: bool,
    ) -> Result<commands::CmdResult> {
        let selector = TemplateSelector::from_str(selector)?;
        commands::edit::run(&mut self.store, scope, &selector, ops, history_limit, dry_run)
    }

    pub fn layout(&self, scope: Scope, selector: &str) -> Result<commands::CmdResult> {
        let selector = TemplateSelector::from_str(selector)?;
        commands::layout::run(&self.store, scope, &selector)
    }

    pub fn validate_templates<I: AsRef<str>>(
        &self,
        scope: Scope,
        selectors: &[I],
    ) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::validate::run(&self.store, scope, &selectors)
    }

    pub fn validate_file(&self, path: &Path) -> Result<commands::CmdResult> {
        commands::validate::run_file(path)
    }

    pub fn export_templates<I: AsRef<str>>(
        &self,
        scope: Scope,
        selectors: &[I],
        output: Option<PathBuf>,
    ) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::export::run(&self.store, scope, &selectors, output)
    }

    pub fn import_templates(
        &mut self,
        scope: Scope,
        paths: Vec<PathBuf>,
        import_exts: &[String],
    ) -> Result<commands::CmdResult> {
        commands::import::run(&mut self.store, scope, paths, import_exts)
    }

    pub fn doctor(&mut self, scope: Scope) -> Result<commands::CmdResult> {
        commands::doctor::run(&mut self.store, scope)
    }

    pub fn template_paths<I: AsRef<str>>(
        &self,
        scope: Scope,
        selectors: &[I],
    ) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::paths::run(&self.store, scope, &selectors)
    }

    pub fn config(&self, scope: Scope, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, scope, action)
    }

    pub fn init(&self, scope: Scope) -> Result<commands::CmdResult> {
        commands::init::run(&self.paths, scope)
    }

    pub fn paths(&self) -> &commands::CardifyPaths {
        &self.paths
    }
}

/// Indexes and UUIDs select one template each. As soon as any word is
/// neither, all words are joined into a single name query, so
/// `view Team Badge` works without quoting.
fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<TemplateSelector>> {
    let parsed = inputs
        .iter()
        .map(|s| TemplateSelector::from_str(s.as_ref()))
        .collect::<Result<Vec<_>>>();

    match parsed {
        Ok(selectors) if !selectors.iter().any(|s| matches!(s, TemplateSelector::Name(_))) => {
            Ok(selectors)
        }
        _ => {
            let name = inputs
                .iter()
                .map(|s| s.as_ref().trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<&str>>()
                .join(" ");
            if name.is_empty() {
                return Err(CardifyError::Api("Empty template selector".into()));
            }
            Ok(vec![TemplateSelector::Name(name)])
        }
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CardifyPaths, CmdMessage, CmdResult, MessageLevel, ValidationEntry};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use tempfile::TempDir;

    fn api(temp: &TempDir) -> CardifyApi<InMemoryStore> {
        CardifyApi::new(
            InMemoryStore::new(),
            CardifyPaths {
                project: Some(temp.path().join(".cardify")),
                global: temp.path().join("global"),
            },
        )
    }

    #[test]
    fn parse_selectors_keeps_indexes() {
        let selectors = parse_selectors(&["1", "3"]).unwrap();
        assert_eq!(
            selectors,
            vec![TemplateSelector::Index(1), TemplateSelector::Index(3)]
        );
    }

    #[test]
    fn parse_selectors_joins_words_into_a_name() {
        let selectors = parse_selectors(&["Team", "Badge"]).unwrap();
        assert_eq!(selectors, vec![TemplateSelector::Name("Team Badge".into())]);
    }

    #[test]
    fn zero_falls_back_to_name_query() {
        let selectors = parse_selectors(&["0"]).unwrap();
        assert_eq!(selectors, vec![TemplateSelector::Name("0".into())]);
    }

    #[test]
    fn create_then_view_by_name() {
        let temp = TempDir::new().unwrap();
        let mut api = api(&temp);
        api.create_template(Scope::Project, "Team Badge".into(), 800.0, 400.0, false)
            .unwrap();

        let result = api.view_templates(Scope::Project, &["team", "badge"]).unwrap();
        assert_eq!(result.listed_templates.len(), 1);
        assert_eq!(result.listed_templates[0].template.metadata.width, 800.0);
    }

    #[test]
    fn edit_dispatches_with_selector() {
        let temp = TempDir::new().unwrap();
        let mut api = api(&temp);
        api.create_template(Scope::Project, "Card".into(), 800.0, 400.0, false)
            .unwrap();

        let ops = vec![EditOp::Add {
            node: crate::model::Node::text(crate::model::Geometry::new(1.0, 1.0, 10.0, 10.0), "x"),
        }];
        api.edit_template(Scope::Project, "1", &ops, None, false).unwrap();

        let layout = api.layout(Scope::Project, "card").unwrap();
        assert_eq!(layout.layout.len(), 1);
    }

    #[test]
    fn config_goes_through_paths() {
        let temp = TempDir::new().unwrap();
        let api = api(&temp);
        api.config(
            Scope::Project,
            ConfigAction::Set("relative".into(), "true".into()),
        )
        .unwrap();
        assert!(temp.path().join(".cardify").join("config.json").exists());
    }
}
