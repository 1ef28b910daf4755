//! Core API for language registration
//!
//! This crate defines the types a language contribution hands to the editor host:
//! a [`LanguageDescriptor`] naming the language, its file extensions and aliases, and a
//! [`LanguageLoader`] that fetches the full definition module only when it is first needed.
//!
//! # Architecture
//!
//! The API layer has no knowledge of any concrete registry. Registries live in
//! `glot-registry`; concrete languages live under `languages/` and self-register with
//! [`glot_language!`] so a bundle crate can discover them at link time.

use serde::{Deserialize, Serialize};

// ============================================================================
// Module Declarations
// ============================================================================

pub mod contribution;
pub mod descriptor;
pub mod loader;
pub mod resolver;

// Re-exports
pub use contribution::{iter_contributions, LanguageContribution};
pub use descriptor::{LanguageDescriptor, LanguageInfo};
pub use loader::{LanguageLoader, LanguageModule};
pub use resolver::{FsModuleResolver, ModuleResolver, StaticModuleResolver};
// Note: glot_language! macro is exported at crate root due to #[macro_export]

// ============================================================================
// Error Types
// ============================================================================

/// Result type for definition loads
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors raised while resolving a language definition module
///
/// Errors are `Clone` because a registry caches the settled outcome of a load and hands the
/// same failure to every caller that asks for the module afterwards.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// No resolver location provides the module
    #[error("Language module '{module}' not found (searched: {})", .searched.join(", "))]
    ModuleNotFound {
        module: String,
        /// Locations that were searched, in order
        searched: Vec<String>,
    },

    /// The module exists but could not be read
    #[error("Failed to read language module '{module}': {message}")]
    Io { module: String, message: String },

    /// The module was read but is not a valid definition
    #[error("Malformed language module '{module}': {message}")]
    Malformed { module: String, message: String },

    /// Any other loader failure
    #[error("Failed to load language module '{module}': {message}")]
    Failed { module: String, message: String },
}

impl LoadError {
    /// Create a not-found error
    pub fn not_found(module: impl Into<String>, searched: Vec<String>) -> Self {
        Self::ModuleNotFound {
            module: module.into(),
            searched,
        }
    }

    /// Create an I/O error
    pub fn io(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            module: module.into(),
            message: message.into(),
        }
    }

    /// Create a malformed-module error
    pub fn malformed(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            module: module.into(),
            message: message.into(),
        }
    }

    /// Create a generic loader failure
    pub fn failed(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            module: module.into(),
            message: message.into(),
        }
    }

    /// Name of the module the failure refers to
    pub fn module(&self) -> &str {
        match self {
            Self::ModuleNotFound { module, .. }
            | Self::Io { module, .. }
            | Self::Malformed { module, .. }
            | Self::Failed { module, .. } => module,
        }
    }
}

/// A descriptor failed validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid language descriptor '{id}': {reason}")]
pub struct DescriptorError {
    pub id: String,
    pub reason: String,
}

impl DescriptorError {
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Registry Policy
// ============================================================================

/// What a registry does when a descriptor arrives for an id it already holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Union the metadata into the existing entry, keeping its loader
    #[default]
    Merge,
    /// Swap in the new descriptor and drop any cached module
    Replace,
    /// Keep the existing entry untouched
    Ignore,
    /// Fail the registration
    Reject,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::Merge => "merge",
            DuplicatePolicy::Replace => "replace",
            DuplicatePolicy::Ignore => "ignore",
            DuplicatePolicy::Reject => "reject",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_not_found_lists_searched_locations() {
        let err = LoadError::not_found("solidity", vec!["/a".into(), "/b".into()]);
        assert_eq!(
            err.to_string(),
            "Language module 'solidity' not found (searched: /a, /b)"
        );
        assert_eq!(err.module(), "solidity");
    }

    #[test]
    fn test_error_module_accessor() {
        assert_eq!(LoadError::io("a", "denied").module(), "a");
        assert_eq!(LoadError::malformed("b", "eof").module(), "b");
        assert_eq!(LoadError::failed("c", "boom").module(), "c");
    }

    #[test]
    fn test_duplicate_policy_serde_names() {
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Merge);
        let json = serde_json::to_string(&DuplicatePolicy::Reject).unwrap();
        assert_eq!(json, "\"reject\"");
        let policy: DuplicatePolicy = serde_json::from_str("\"replace\"").unwrap();
        assert_eq!(policy, DuplicatePolicy::Replace);
        assert_eq!(policy.as_str(), "replace");
    }
}
