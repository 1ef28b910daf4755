//! Language Bundle
//!
//! Single collection point for every language contribution in glot. The application depends
//! on this crate and calls [`register_all`]; core crates stay independent of concrete
//! languages.

use glot_language_api::{iter_contributions, ModuleResolver};
use glot_registry::{LanguageRegistry, Registration, RegistryResult};
use std::sync::Arc;

// Reference each language crate so the linker keeps its inventory submission.
#[cfg(feature = "lang-solidity")]
use glot_lang_solidity::SolidityLanguage;

#[allow(dead_code)]
fn _force_language_linkage() {
    #[cfg(feature = "lang-solidity")]
    let _: Option<SolidityLanguage> = None;
}

/// Register every linked language contribution with `registry`.
///
/// Returns how many descriptors were added or merged. The first registration error aborts the
/// walk and is returned.
pub fn register_all(
    registry: &LanguageRegistry,
    resolver: Arc<dyn ModuleResolver>,
) -> RegistryResult<usize> {
    let mut registered = 0;

    for contribution in iter_contributions() {
        tracing::debug!(
            language = contribution.id,
            "Discovered language contribution via inventory"
        );
        let descriptor = (contribution.descriptor)(Arc::clone(&resolver));
        if registry.register(descriptor)? != Registration::Ignored {
            registered += 1;
        }
    }

    tracing::info!(
        language_count = registered,
        "Language bundle registration complete"
    );

    if registered == 0 {
        tracing::warn!("No language contributions discovered - inventory linkage may be broken");
    }

    Ok(registered)
}
