//! Language registry for the glot editor host
//!
//! The registry is an explicit value handed to language contributions at initialization.
//! It owns every registered descriptor, answers lookups by id, alias, extension and file
//! name, and activates a language by running its loader at most once, caching the outcome.

pub mod error;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use registry::{LanguageEntry, LanguageRegistry, Registration};

pub use glot_language_api::DuplicatePolicy;
