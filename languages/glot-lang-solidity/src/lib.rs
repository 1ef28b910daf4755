//! Solidity language registration
//!
//! Registers the `sol` language (`.sol` files) with a glot registry. The tokenizer and grammar
//! live in the external `solidity` definition module, which is fetched through the host's
//! module resolver only when a Solidity document is first opened.

use glot_language_api::{glot_language, LanguageDescriptor, LanguageLoader, ModuleResolver};
use glot_registry::{LanguageRegistry, Registration, RegistryResult};
use std::sync::Arc;
use tracing::debug;

/// Registry id of the language
pub const LANGUAGE_ID: &str = "sol";

/// File extensions mapped to the language
pub const EXTENSIONS: &[&str] = &[".sol"];

/// Display names, canonical first
pub const ALIASES: &[&str] = &["sol", "solidity", "Solidity"];

/// Name of the definition module the loader resolves
pub const MODULE_NAME: &str = "solidity";

// Self-register the language with the glot contribution collection.
glot_language! {
    id: LANGUAGE_ID,
    descriptor: SolidityLanguage::descriptor
}

/// Solidity language contribution
pub struct SolidityLanguage;

impl SolidityLanguage {
    /// Build the descriptor; its loader resolves [`MODULE_NAME`] through `resolver`
    pub fn descriptor(resolver: Arc<dyn ModuleResolver>) -> LanguageDescriptor {
        LanguageDescriptor::new(LANGUAGE_ID, LanguageLoader::from_resolver(resolver, MODULE_NAME))
            .with_extensions(EXTENSIONS.iter().copied())
            .with_aliases(ALIASES.iter().copied())
    }
}

/// Register Solidity with `registry`
///
/// Registration is synchronous and never awaits the loader. A load failure surfaces only to
/// whoever later activates the language.
pub fn register(
    registry: &LanguageRegistry,
    resolver: Arc<dyn ModuleResolver>,
) -> RegistryResult<Registration> {
    debug!(language = LANGUAGE_ID, "Registering Solidity");
    registry.register(SolidityLanguage::descriptor(resolver))
}
