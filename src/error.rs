//! Error types for the collaborator-facing edges of generation.
//!
//! Type mapping itself never fails: unresolvable types become placeholder
//! text plus a recorded [`Warning`](crate::registry::Warning). Only reading
//! models and configuration, and persisting documents, can abort a run.

use std::io;

/// A type reference string that does not follow the reference grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid type reference `{text}` at offset {offset}: {message}")]
pub struct TypeRefParseError {
    pub text: String,
    pub offset: usize,
    pub message: String,
}

/// The semantic resolver could not identify a reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no type named `{0}` is visible")]
    UnknownSymbol(String),
    #[error("`{name}` is ambiguous between {}", candidates.join(", "))]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid model: {0}")]
    Json(#[from] serde_json::Error),
    #[error("type `{0}` is declared more than once")]
    Duplicate(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid document path segment `{0}`")]
    InvalidPath(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("`{0}` does not derive from a SignalR hub")]
    NotAHub(String),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
