//! # Display Indexes
//!
//! Templates are identified by UUIDs in storage, which are unpleasant to type.
//! Listings assign each template a 1-based display index (newest first), and
//! commands accept any of:
//!
//! - a display index: `2`
//! - a UUID: `4f0c6d3e-...`
//! - a name (case-insensitive; a unique substring is enough): `studio`
//!
//! Display indexes are recomputed on every listing, so they are only stable
//! while the set of templates doesn't change.

use crate::error::{CardifyError, Result};
use crate::model::Template;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSelector {
    Index(usize),
    Id(Uuid),
    Name(String),
}

impl FromStr for TemplateSelector {
    type Err = CardifyError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CardifyError::Api("Empty template selector".into()));
        }
        if let Ok(n) = s.parse::<usize>() {
            if n == 0 {
                return Err(CardifyError::Api("Indexes start at 1".into()));
            }
            return Ok(TemplateSelector::Index(n));
        }
        if let Ok(id) = Uuid::parse_str(s) {
            return Ok(TemplateSelector::Id(id));
        }
        Ok(TemplateSelector::Name(s.to_string()))
    }
}

impl std::fmt::Display for TemplateSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSelector::Index(i) => write!(f, "{}", i),
            TemplateSelector::Id(id) => write!(f, "{}", id),
            TemplateSelector::Name(name) => write!(f, "\"{}\"", name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DisplayTemplate {
    pub template: Template,
    pub index: usize,
}

/// Assigns display indexes, newest first. Ties break on name for stability.
pub fn index_templates(mut templates: Vec<Template>) -> Vec<DisplayTemplate> {
    templates.sort_by(|a, b| {
        b.metadata
            .created_at
            .cmp(&a.metadata.created_at)
            .then_with(|| a.metadata.name.cmp(&b.metadata.name))
    });
    templates
        .into_iter()
        .enumerate()
        .map(|(i, template)| DisplayTemplate {
            template,
            index: i + 1,
        })
        .collect()
}

/// Finds the single entry a selector refers to.
pub fn resolve<'a>(
    indexed: &'a [DisplayTemplate],
    selector: &TemplateSelector,
) -> Result<&'a DisplayTemplate> {
    match selector {
        TemplateSelector::Index(i) => indexed
            .iter()
            .find(|dt| dt.index == *i)
            .ok_or_else(|| CardifyError::Api(format!("Index {} not found in current scope", i))),
        TemplateSelector::Id(id) => indexed
            .iter()
            .find(|dt| dt.template.metadata.id == *id)
            .ok_or(CardifyError::TemplateNotFound(*id)),
        TemplateSelector::Name(name) => {
            let needle = name.to_lowercase();
            let exact: Vec<_> = indexed
                .iter()
                .filter(|dt| dt.template.metadata.name.to_lowercase() == needle)
                .collect();
            let candidates = if exact.is_empty() {
                indexed
                    .iter()
                    .filter(|dt| dt.template.metadata.name.to_lowercase().contains(&needle))
                    .collect()
            } else {
                exact
            };
            match candidates.as_slice() {
                [single] => Ok(*single),
                [] => Err(CardifyError::Api(format!("No template matches {}", selector))),
                many => Err(CardifyError::Api(format!(
                    "{} matches {} templates; use an index instead",
                    selector,
                    many.len()
                ))),
            }
        }
    }
}
