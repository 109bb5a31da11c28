use crate::validation::ValidationReport;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CardifyError {
    #[error("Template not found: {0}")]
    TemplateNotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid template: {}", .0.summary())]
    Validation(ValidationReport),

    #[error("Edit rejected: {0}")]
    Edit(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, CardifyError>;
