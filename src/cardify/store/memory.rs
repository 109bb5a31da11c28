use super::{DoctorReport, TemplateStore};
use crate::error::{CardifyError, Result};
use crate::model::{Scope, Template};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

/// In-memory template storage for tests. Nothing is persisted.
#[derive(Default)]
pub struct InMemoryStore {
    templates: HashMap<(Scope, Uuid), Template>,
    simulate_write_error: bool,
    writes_left: Option<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail, for exercising error paths.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    /// Let `count` more saves succeed, then fail every one after them.
    pub fn fail_writes_after(&mut self, count: usize) {
        self.writes_left = Some(count);
    }
}

impl TemplateStore for InMemoryStore {
    fn save_template(&mut self, template: &Template, scope: Scope) -> Result<()> {
        if self.simulate_write_error || self.writes_left == Some(0) {
            return Err(CardifyError::Store("Simulated write error".to_string()));
        }
        if let Some(left) = self.writes_left.as_mut() {
            *left -= 1;
        }
        self.templates
            .insert((scope, template.metadata.id), template.clone());
        Ok(())
    }

    fn get_template(&self, id: &Uuid, scope: Scope) -> Result<Template> {
        self.templates
            .get(&(scope, *id))
            .cloned()
            .ok_or(CardifyError::TemplateNotFound(*id))
    }

    fn list_templates(&self, scope: Scope) -> Result<Vec<Template>> {
        Ok(self
            .templates
            .iter()
            .filter(|((s, _), _)| *s == scope)
            .map(|(_, t)| t.clone())
            .collect())
    }

    fn delete_template(&mut self, id: &Uuid, scope: Scope) -> Result<()> {
        self.templates
            .remove(&(scope, *id))
            .map(|_| ())
            .ok_or(CardifyError::TemplateNotFound(*id))
    }

    fn template_path(&self, id: &Uuid, scope: Scope) -> Result<PathBuf> {
        let scope_dir = match scope {
            Scope::Project => "project",
            Scope::Global => "global",
        };
        Ok(PathBuf::from("memory")
            .join(scope_dir)
            .join(format!("template-{}.json", id)))
    }

    fn doctor(&mut self, _scope: Scope) -> Result<DoctorReport> {
        Ok(DoctorReport::default())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Geometry, Node, ShapeKind};

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_templates(mut self, count: usize, scope: Scope) -> Self {
            for i in 0..count {
                let template = Template::new(format!("Card {}", i + 1), 1050.0, 600.0, false);
                self.store.save_template(&template, scope).unwrap();
            }
            self
        }

        /// A card with a background, a name and a logo.
        pub fn with_sample_card(mut self, name: &str, scope: Scope) -> Self {
            let mut template = Template::new(name.to_string(), 1050.0, 600.0, false);
            template.document = vec![
                Node::shape(Geometry::new(0.0, 0.0, 1050.0, 600.0), ShapeKind::Rect),
                Node::text(Geometry::new(60.0, 60.0, 500.0, 80.0), "Ada Lovelace"),
                Node::logo(Geometry::new(880.0, 60.0, 110.0, 110.0), "logo.svg"),
            ]
            .into();
            self.store.save_template(&template, scope).unwrap();
            self
        }

        pub fn with_relative_card(mut self, name: &str, scope: Scope) -> Self {
            let mut template = Template::new(name.to_string(), 1000.0, 500.0, true);
            template.document =
                vec![Node::text(Geometry::new(10.0, 20.0, 50.0, 10.0), "Relative")].into();
            self.store.save_template(&template, scope).unwrap();
            self
        }
    }
}
