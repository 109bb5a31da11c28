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
    let resolved = templates_by_selectors(store, scope, selectors)?;
    let paths = resolved
        .iter()
        .map(|dt| store.template_path(&dt.template.metadata.id, scope))
        .collect::<Result<Vec<_>>>()?;
    Ok(CmdResult::default().with_template_paths(paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn returns_one_path_per_selector() {
        let fixture = StoreFixture::new().with_templates(2, Scope::Global);
        let res = run(
            &fixture.store,
            Scope::Global,
            &[TemplateSelector::Index(1), TemplateSelector::Index(2)],
        )
        .unwrap();
        assert_eq!(res.template_paths.len(), 2);
        assert!(res.template_paths[0].starts_with("memory/global"));
    }
}
