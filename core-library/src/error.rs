use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LibraryError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn record_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "MediaRecord".to_string(),
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
