use crate::commands::{CmdMessage, CmdResult, ValidationEntry};
use crate::error::{CardifyError, Result};
use crate::index::TemplateSelector;
use crate::model::Scope;
use crate::store::TemplateStore;
use crate::validation::{validate, validate_template, ValidationIssue, ValidationReport};
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::helpers::{indexed_templates, templates_by_selectors};

/// Validates stored templates; all of them when no selector is given.
pub fn run<S: TemplateStore>(
    store: &S,
    scope: Scope,
    selectors: &[TemplateSelector],
) -> Result<CmdResult> {
    let templates = if selectors.is_empty() {
        indexed_templates(store, scope)?
    } else {
        templates_by_selectors(store, scope, selectors)?
    };

    let entries = templates
        .iter()
        .map(|dt| ValidationEntry {
            label: format!("{}. {}", dt.index, dt.template.metadata.name),
            report: validate_template(&dt.template),
        })
        .collect();
    Ok(summarize(entries))
}

/// Validates a template JSON file without importing it.
pub fn run_file(path: &Path) -> Result<CmdResult> {
    let content = fs::read_to_string(path).map_err(CardifyError::Io)?;
    let report = match serde_json::from_str::<Value>(&content) {
        Ok(value) => validate(&value),
        Err(e) => ValidationReport {
            valid: false,
            errors: vec![ValidationIssue {
                field: String::new(),
                message: format!("not valid JSON: {}", e),
                path: String::new(),
            }],
        },
    };
    Ok(summarize(vec![ValidationEntry {
        label: path.display().to_string(),
        report,
    }]))
}

fn summarize(entries: Vec<ValidationEntry>) -> CmdResult {
    let mut result = CmdResult::default();
    let invalid = entries.iter().filter(|e| !e.report.valid).count();

    if entries.is_empty() {
        result.add_message(CmdMessage::info("No templates to validate."));
    } else if invalid == 0 {
        result.add_message(CmdMessage::success(format!(
            "{} template(s) valid.",
            entries.len()
        )));
    } else {
        result.add_message(CmdMessage::error(format!(
            "{} of {} template(s) invalid.",
            invalid,
            entries.len()
        )));
    }

    result.validations = entries;
    result
}
