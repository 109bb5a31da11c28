use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CardifyError, Result};
use crate::index::{DisplayTemplate, TemplateSelector};
use crate::model::Scope;
use crate::store::TemplateStore;
use crate::validation::validate_template;
use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

use super::helpers::{indexed_templates, templates_by_selectors};

/// Bundles templates into a `.tar.gz`; every template when no selector is given.
///
/// Templates that fail validation are left out with a warning, so a bundle
/// only ever carries files `import` will accept.
pub fn run<S: TemplateStore>(
    store: &S,
    scope: Scope,
    selectors: &[TemplateSelector],
    output: Option<PathBuf>,
) -> Result<CmdResult> {
    let candidates = if selectors.is_empty() {
        indexed_templates(store, scope)?
    } else {
        templates_by_selectors(store, scope, selectors)?
    };

    let mut result = CmdResult::default();
    let mut templates = Vec::with_capacity(candidates.len());
    for dt in candidates {
        let report = validate_template(&dt.template);
        if report.valid {
            templates.push(dt);
        } else {
            warn!(template = %dt.template.metadata.id, "skipping invalid template on export");
            result.add_message(CmdMessage::warning(format!(
                "Skipped {}: {}",
                dt.template.metadata.name,
                report.summary()
            )));
        }
    }

    if templates.is_empty() {
        result.add_message(CmdMessage::info("No templates to export."));
        return Ok(result);
    }

    let filename = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "cardify-{}.tar.gz",
            Utc::now().format("%Y-%m-%d_%H-%M-%S")
        ))
    });
    let file = File::create(&filename).map_err(CardifyError::Io)?;
    write_archive(file, &templates)?;

    result.add_message(CmdMessage::success(format!(
        "Exported {} template(s) to {}",
        templates.len(),
        filename.display()
    )));
    Ok(result.with_template_paths(vec![filename]))
}

fn write_archive<W: Write>(writer: W, templates: &[DisplayTemplate]) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    for dt in templates {
        let metadata = &dt.template.metadata;
        let entry_name = format!(
            "cardify/{}-{}.json",
            sanitize_filename(&metadata.name),
            &metadata.id.to_string()[..8]
        );
        let content = serde_json::to_vec_pretty(&dt.template)?;

        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();

        tar.append_data(&mut header, entry_name, content.as_slice())
            .map_err(CardifyError::Io)?;
    }

    tar.into_inner()
        .map_err(CardifyError::Io)?
        .finish()
        .map_err(CardifyError::Io)?;
    Ok(())
}

fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "template".to_string()
    } else {
        trimmed.to_string()
    }
}
