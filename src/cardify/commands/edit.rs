use crate::commands::{CmdMessage, CmdResult};
use crate::edit::EditOp;
use crate::error::{CardifyError, Result};
use crate::index::TemplateSelector;
use crate::model::Scope;
use crate::session::{Outcome, Session};
use crate::store::TemplateStore;
use crate::validation::validate_template;
use tracing::info;

use super::helpers::templates_by_selectors;

/// Plays a script of edit ops against one template in a fresh session.
///
/// The first rejected op aborts the whole run and nothing is written.
/// Otherwise the final document is validated and, unless `dry_run` is set or
/// the ops cancelled each other out, saved back.
pub fn run<S: TemplateStore>(
    store: &mut S,
    scope: Scope,
    selector: &TemplateSelector,
    ops: &[EditOp],
    history_limit: Option<usize>,
    dry_run: bool,
) -> Result<CmdResult> {
    let resolved = templates_by_selectors(store, scope, std::slice::from_ref(selector))?;
    let template = resolved
        .into_iter()
        .next()
        .map(|dt| dt.template)
        .ok_or_else(|| CardifyError::Api(format!("No template matches {}", selector)))?;

    let id = template.metadata.id;
    let mut session = Session::open(template, history_limit);
    let mut result = CmdResult::default();

    for (step, op) in ops.iter().enumerate() {
        let outcome = session.perform(op).map_err(|e| match e {
            CardifyError::Edit(msg) => CardifyError::Edit(format!("step {}: {}", step + 1, msg)),
            other => other,
        })?;
        if let Some(message) = describe(op, outcome) {
            result.add_message(message);
        }
    }

    let applied = session.state().undo_depth();
    let dirty = session.is_dirty();
    let template = session.into_template();

    if !dirty {
        result.add_message(CmdMessage::info("No changes to save."));
        result.affected_templates.push(template);
        return Ok(result);
    }

    let report = validate_template(&template);
    if !report.valid {
        return Err(CardifyError::Validation(report));
    }

    if dry_run {
        result.add_message(CmdMessage::info(format!(
            "Dry run: {} edit(s) on {} not saved.",
            applied, template.metadata.name
        )));
    } else {
        store.save_document(&id, scope, template.document.clone())?;
        info!(template = %id, edits = applied, "template edited");
        result.add_message(CmdMessage::success(format!(
            "Template saved: {} ({} edit(s), {} node(s))",
            template.metadata.name,
            applied,
            template.document.len()
        )));
    }

    result.affected_templates.push(template);
    Ok(result)
}

fn describe(op: &EditOp, outcome: Outcome) -> Option<CmdMessage> {
    match (op, outcome) {
        (EditOp::Undo, Outcome::Unchanged) => Some(CmdMessage::info("Nothing to undo")),
        (EditOp::Redo, Outcome::Unchanged) => Some(CmdMessage::info("Nothing to redo")),
        (EditOp::Select { index: Some(i) }, Outcome::Unchanged) => Some(CmdMessage::warning(
            format!("Cannot select node {}: out of range", i),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Geometry, Node};
    use crate::store::memory::fixtures::StoreFixture;

    fn sample() -> StoreFixture {
        StoreFixture::new().with_sample_card("Badge", Scope::Project)
    }

    fn stored(fixture: &StoreFixture) -> crate::model::Template {
        fixture.store.list_templates(Scope::Project).unwrap().remove(0)
    }

    #[test]
    fn applies_and_saves() {
        let mut fixture = sample();
        let ops = vec![
            EditOp::Move {
                index: 1,
                dx: 10.0,
                dy: 0.0,
            },
            EditOp::Add {
                node: Node::text(Geometry::new(60.0, 200.0, 300.0, 40.0), "Engineer"),
            },
        ];
        let result = run(
            &mut fixture.store,
            Scope::Project,
            &TemplateSelector::Index(1),
            &ops,
            None,
            false,
        )
        .unwrap();
        assert!(!result.has_errors());

        let saved = stored(&fixture);
        assert_eq!(saved.document.len(), 4);
        assert_eq!(saved.document.get(1).unwrap().geometry().x, 70.0);
    }

    #[test]
    fn undo_back_to_start_saves_nothing() {
        let mut fixture = sample();
        let before = stored(&fixture);
        let ops = vec![EditOp::Remove { index: 0 }, EditOp::Undo];
        let result = run(
            &mut fixture.store,
            Scope::Project,
            &TemplateSelector::Index(1),
            &ops,
            None,
            false,
        )
        .unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == "No changes to save."));
        assert_eq!(stored(&fixture).metadata.updated_at, before.metadata.updated_at);
    }

    #[test]
    fn empty_undo_is_reported_not_fatal() {
        let mut fixture = sample();
        let result = run(
            &mut fixture.store,
            Scope::Project,
            &TemplateSelector::Index(1),
            &[EditOp::Undo, EditOp::Redo],
            None,
            false,
        )
        .unwrap();
        let contents: Vec<&str> = result.messages.iter().map(|m| m.content.as_str()).collect();
        assert!(contents.contains(&"Nothing to undo"));
        assert!(contents.contains(&"Nothing to redo"));
    }

    #[test]
    fn rejected_op_aborts_without_writing() {
        let mut fixture = sample();
        let ops = vec![
            EditOp::Remove { index: 0 },
            EditOp::Remove { index: 42 },
        ];
        let err = run(
            &mut fixture.store,
            Scope::Project,
            &TemplateSelector::Index(1),
            &ops,
            None,
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("step 2"));
        assert_eq!(stored(&fixture).document.len(), 3);
    }

    #[test]
    fn dry_run_leaves_store_untouched() {
        let mut fixture = sample();
        run(
            &mut fixture.store,
            Scope::Project,
            &TemplateSelector::Index(1),
            &[EditOp::Remove { index: 2 }],
            None,
            true,
        )
        .unwrap();
        assert_eq!(stored(&fixture).document.len(), 3);
    }

    #[test]
    fn invalid_result_is_not_saved() {
        let mut fixture = sample();
        let ops = vec![EditOp::Add {
            node: Node::image(Geometry::new(0.0, 0.0, 10.0, 10.0), ""),
        }];
        let err = run(
            &mut fixture.store,
            Scope::Project,
            &TemplateSelector::Index(1),
            &ops,
            None,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CardifyError::Validation(_)));
        assert_eq!(stored(&fixture).document.len(), 3);
    }
}
