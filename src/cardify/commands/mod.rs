use crate::config::CardifyConfig;
use crate::coords::PlacedNode;
use crate::error::{CardifyError, Result};
use crate::index::DisplayTemplate;
use crate::model::{Scope, Template};
use crate::validation::ValidationReport;
use std::path::PathBuf;

pub mod config;
pub mod create;
pub mod delete;
pub mod doctor;
pub mod edit;
pub mod export;
pub mod helpers;
pub mod import;
pub mod init;
pub mod layout;
pub mod list;
pub mod paths;
pub mod rename;
pub mod validate;
pub mod view;

#[derive(Debug, Clone)]
pub struct CardifyPaths {
    pub project: Option<PathBuf>,
    pub global: PathBuf,
}

impl CardifyPaths {
    pub fn scope_dir(&self, scope: Scope) -> Result<PathBuf> {
        match scope {
            Scope::Project => self
                .project
                .clone()
                .ok_or_else(|| CardifyError::Store("Project scope is not available".to_string())),
            Scope::Global => Ok(self.global.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A validation report with the template or file it belongs to.
#[derive(Debug, Clone)]
pub struct ValidationEntry {
    pub label: String,
    pub report: ValidationReport,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_templates: Vec<Template>,
    pub listed_templates: Vec<DisplayTemplate>,
    pub template_paths: Vec<PathBuf>,
    pub config: Option<CardifyConfig>,
    pub validations: Vec<ValidationEntry>,
    pub layout: Vec<PlacedNode>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_templates(mut self, templates: Vec<Template>) -> Self {
        self.affected_templates = templates;
        self
    }

    pub fn with_listed_templates(mut self, templates: Vec<DisplayTemplate>) -> Self {
        self.listed_templates = templates;
        self
    }

    pub fn with_template_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.template_paths = paths;
        self
    }

    pub fn with_config(mut self, config: CardifyConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_layout(mut self, layout: Vec<PlacedNode>) -> Self {
        self.layout = layout;
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
            || self.validations.iter().any(|v| !v.report.valid)
    }
}
