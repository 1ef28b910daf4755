//! Error types for registry operations

use glot_language_api::{DescriptorError, LoadError};
use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors produced by the language registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error(transparent)]
    InvalidDescriptor(#[from] DescriptorError),

    #[error("Language '{id}' is already registered")]
    DuplicateLanguage { id: String },

    #[error("Unknown language '{id}'")]
    UnknownLanguage { id: String },

    #[error("No registered language matches '{path}'")]
    NoLanguageForPath { path: String },

    #[error("Failed to load language '{id}'")]
    Load {
        id: String,
        #[source]
        source: LoadError,
    },
}

impl RegistryError {
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateLanguage { id: id.into() }
    }

    pub fn unknown(id: impl Into<String>) -> Self {
        Self::UnknownLanguage { id: id.into() }
    }

    pub fn no_language_for_path(path: impl Into<String>) -> Self {
        Self::NoLanguageForPath { path: path.into() }
    }

    pub fn load(id: impl Into<String>, source: LoadError) -> Self {
        Self::Load {
            id: id.into(),
            source,
        }
    }
}
