use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::TemplateSelector;
use crate::model::Scope;
use crate::store::TemplateStore;

use super::helpers::templates_by_selectors;

pub fn run<S: TemplateStore>(
    store: &mut S,
    scope: Scope,
    selectors: &[TemplateSelector],
) -> Result<CmdResult> {
    // Resolve everything up front: indexes shift once the first delete lands
    let resolved = templates_by_selectors(store, scope, selectors)?;
    let mut result = CmdResult::default();

    for dt in resolved {
        store.delete_template(&dt.template.metadata.id, scope)?;
        result.add_message(CmdMessage::success(format!(
            "Template deleted ({}): {}",
            dt.index, dt.template.metadata.name
        )));
        result.affected_templates.push(dt.template);
    }

    Ok(result)
}
