use thiserror::Error;

/// Caller-supplied data rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    /// Offending field names, in the order they were checked.
    pub fields: Vec<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, fields: Vec<String>) -> Self {
        Self { message: message.into(), fields }
    }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::new(message, vec![field.to_string()])
    }

    pub fn missing(fields: &[&str]) -> Self {
        Self::new(
            format!("missing required field(s): {}", fields.join(", ")),
            fields.iter().map(|f| f.to_string()).collect(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("database error: {0}")]
    Db(String),
}

impl From<sea_orm::DbErr> for ModelError {
    fn from(e: sea_orm::DbErr) -> Self {
        ModelError::Db(e.to_string())
    }
}
