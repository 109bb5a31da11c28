use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::Scope;
use crate::store::TemplateStore;

use super::helpers::indexed_templates;

/// Lists templates, optionally keeping only those whose name contains `search`.
/// Filtered entries keep their unfiltered display index.
pub fn run<S: TemplateStore>(store: &S, scope: Scope, search: Option<&str>) -> Result<CmdResult> {
    let mut listed = indexed_templates(store, scope)?;
    if let Some(term) = search {
        let needle = term.to_lowercase();
        listed.retain(|dt| dt.template.metadata.name.to_lowercase().contains(&needle));
    }
    Ok(CmdResult::default().with_listed_templates(listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn lists_everything_in_scope() {
        let fixture = StoreFixture::new().with_templates(3, Scope::Project);
        let result = run(&fixture.store, Scope::Project, None).unwrap();
        assert_eq!(result.listed_templates.len(), 3);
        let indexes: Vec<usize> = result.listed_templates.iter().map(|d| d.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
    }

    #[test]
    fn search_filters_by_name() {
        let fixture = StoreFixture::new()
            .with_sample_card("Bakery", Scope::Project)
            .with_sample_card("Studio", Scope::Project);
        let result = run(&fixture.store, Scope::Project, Some("BAK")).unwrap();
        assert_eq!(result.listed_templates.len(), 1);
        assert_eq!(result.listed_templates[0].template.metadata.name, "Bakery");
    }
}
