use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Null default for '{key}'; use a lazy default if null is intended")]
    NullDefault { key: String },

    #[error("Invalid range for '{key}': minimum {min} is not less than or equal to maximum {max}")]
    InvalidRange { key: String, min: String, max: String },

    #[error("Path conflict at '{key}': {reason}")]
    PathConflict { key: String, reason: String },

    #[error("No entry defined at '{0}'")]
    NotDefined(String),

    #[error("Cannot represent {what} as {target}")]
    Unrepresentable { what: String, target: &'static str },
}
