use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CardifyError, Result};
use crate::index::TemplateSelector;
use crate::model::Scope;
use crate::store::TemplateStore;
use chrono::Utc;

use super::helpers::templates_by_selectors;

pub fn run<S: TemplateStore>(
    store: &mut S,
    scope: Scope,
    selector: &TemplateSelector,
    new_name: String,
) -> Result<CmdResult> {
    let new_name = new_name.trim().to_string();
    if new_name.is_empty() {
        return Err(CardifyError::Api("Template name cannot be empty".into()));
    }

    let resolved = templates_by_selectors(store, scope, std::slice::from_ref(selector))?;
    let mut template = resolved
        .into_iter()
        .next()
        .map(|dt| dt.template)
        .ok_or_else(|| CardifyError::Api(format!("No template matches {}", selector)))?;

    let old_name = std::mem::replace(&mut template.metadata.name, new_name);
    template.metadata.updated_at = Utc::now();
    store.save_template(&template, scope)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Template renamed: {} -> {}",
        old_name, template.metadata.name
    )));
    result.affected_templates.push(template);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn renames_in_place() {
        let mut fixture = StoreFixture::new().with_sample_card("Draft", Scope::Project);
        run(
            &mut fixture.store,
            Scope::Project,
            &TemplateSelector::Index(1),
            "Final".into(),
        )
        .unwrap();

        let all = fixture.store.list_templates(Scope::Project).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].metadata.name, "Final");
        assert_eq!(all[0].document.len(), 3);
    }
}
