use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::TemplateSelector;
use crate::model::Scope;
use crate::store::TemplateStore;

use super::helpers::templates_by_selectors;

pub fn run<S: TemplateStore>(
    store: &S,
    scope: Scope,
    selectors: &[TemplateSelector],
) -> Result<CmdResult> {
    let templates = templates_by_selectors(store, scope, selectors)?;
    Ok(CmdResult::default().with_listed_templates(templates))
}
