//! Error types for the schema chain

use thiserror::Error;

use crate::type_ref::TypeReference;
use crate::version::DataVersion;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Configuration and lookup errors.
///
/// Everything here except `UnrecognizedVariant` indicates a broken schema graph
/// rather than a data problem.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema version {version} does not follow its parent {parent}")]
    NonMonotonicVersion {
        parent: DataVersion,
        version: DataVersion,
    },

    #[error("Type reference '{type_ref}' is not registered at version {version} or any ancestor")]
    UnresolvedTypeReference {
        type_ref: TypeReference,
        version: DataVersion,
    },

    #[error("Unrecognized variant '{id}' for '{type_ref}' at version {version}")]
    UnrecognizedVariant {
        type_ref: TypeReference,
        id: String,
        version: DataVersion,
    },

    #[error("Type reference '{type_ref}' is not a tagged union at version {version}")]
    NotAChoiceType {
        type_ref: TypeReference,
        version: DataVersion,
    },

    #[error("Cannot rename unknown {registry} id '{id}' at version {version}")]
    UnknownRenameSource {
        registry: &'static str,
        id: String,
        version: DataVersion,
    },

    #[error("Dangling reference at version {version}: {from} -> {to}")]
    DanglingReference {
        version: DataVersion,
        from: String,
        to: TypeReference,
    },

    #[error("Unknown schema version: {0}")]
    UnknownVersion(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Unknown type reference: {0}")]
    UnknownTypeReference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

/// Failures while walking a concrete value against a template.
///
/// `path` uses the `.Field[index]` notation from [`crate::template::walk::format_path`].
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("Missing required field '{field}' at {path}")]
    MissingField { path: String, field: String },

    #[error("Expected {expected} at {path}, found {found}")]
    KindMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Unrecognized variant '{tag}' at {path}")]
    UnrecognizedVariant { path: String, tag: String },

    #[error("No alternative matched at {path}")]
    NoAlternativeMatched { path: String },

    #[error("Template nesting exceeded {limit} at {path}")]
    TooDeep { path: String, limit: usize },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
