use crate::error::Result;
use crate::index::{index_templates, resolve, DisplayTemplate, TemplateSelector};
use crate::model::Scope;
use crate::store::TemplateStore;

pub fn indexed_templates<S: TemplateStore>(store: &S, scope: Scope) -> Result<Vec<DisplayTemplate>> {
    let templates = store.list_templates(scope)?;
    Ok(index_templates(templates))
}

/// Resolves selectors against one listing, so indexes refer to the same
/// snapshot even when several are given.
pub fn templates_by_selectors<S: TemplateStore>(
    store: &S,
    scope: Scope,
    selectors: &[TemplateSelector],
) -> Result<Vec<DisplayTemplate>> {
    let indexed = indexed_templates(store, scope)?;
    selectors
        .iter()
        .map(|selector| resolve(&indexed, selector).cloned())
        .collect()
}
