use crate::commands::CmdResult;
use crate::coords::layout;
use crate::error::{CardifyError, Result};
use crate::index::TemplateSelector;
use crate::model::Scope;
use crate::store::TemplateStore;

use super::helpers::templates_by_selectors;

/// Resolves every node of a template to pixel bounds on its surface.
pub fn run<S: TemplateStore>(
    store: &S,
    scope: Scope,
    selector: &TemplateSelector,
) -> Result<CmdResult> {
    let dt = templates_by_selectors(store, scope, std::slice::from_ref(selector))?
        .into_iter()
        .next()
        .ok_or_else(|| CardifyError::Api(format!("No template matches {}", selector)))?;

    let placed = layout(&dt.template.document, dt.template.surface());
    Ok(CmdResult::default()
        .with_layout(placed)
        .with_listed_templates(vec![dt]))
}
