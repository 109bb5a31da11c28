use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CardifyError, Result};
use crate::model::{Scope, Template};
use crate::store::TemplateStore;

pub fn run<S: TemplateStore>(
    store: &mut S,
    scope: Scope,
    name: String,
    width: f64,
    height: f64,
    relative: bool,
) -> Result<CmdResult> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(CardifyError::Api("Template name cannot be empty".into()));
    }
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(CardifyError::Api(format!(
            "Surface size must be positive (got {} x {})",
            width, height
        )));
    }

    let template = Template::new(name, width, height, relative);
    store.save_template(&template, scope)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Template created: {} ({} x {}{})",
        template.metadata.name,
        width,
        height,
        if relative { ", relative" } else { "" }
    )));
    result.affected_templates.push(template);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn creates_empty_template() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store, Scope::Project, "Studio".into(), 1050.0, 600.0, false).unwrap();
        assert_eq!(result.affected_templates.len(), 1);

        let stored = store.list_templates(Scope::Project).unwrap();
        assert_eq!(stored[0].metadata.name, "Studio");
        assert!(stored[0].document.is_empty());
    }

    #[test]
    fn trims_and_rejects_blank_names() {
        let mut store = InMemoryStore::new();
        assert!(run(&mut store, Scope::Project, "   ".into(), 10.0, 10.0, false).is_err());
    }

    #[test]
    fn rejects_degenerate_surface() {
        let mut store = InMemoryStore::new();
        assert!(run(&mut store, Scope::Project, "x".into(), 0.0, 10.0, false).is_err());
        assert!(run(&mut store, Scope::Project, "x".into(), 10.0, f64::NAN, false).is_err());
    }
}
