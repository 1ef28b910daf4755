//! Static language contributions
//!
//! Each language crate submits a [`LanguageContribution`] with [`glot_language!`]. The
//! `inventory` crate gathers them at link time so a bundle can register every linked
//! language into an explicit registry without a hand-maintained list.

use crate::{LanguageDescriptor, ModuleResolver};
use std::sync::Arc;

// Re-export inventory for the macro.
pub use inventory;

/// Describes a language contribution to the core system.
///
/// Created by the `glot_language!` macro and collected at link time.
pub struct LanguageContribution {
    /// Language id the descriptor will carry
    pub id: &'static str,
    /// Builds the descriptor; module lookups go through the supplied resolver
    pub descriptor: fn(Arc<dyn ModuleResolver>) -> LanguageDescriptor,
}

inventory::collect!(LanguageContribution);

/// Returns an iterator over all linked language contributions.
pub fn iter_contributions() -> impl Iterator<Item = &'static LanguageContribution> {
    inventory::iter::<LanguageContribution>.into_iter()
}

/// Submit a language contribution to the static collection.
///
/// ```ignore
/// glot_language! {
///     id: "sol",
///     descriptor: my_lang::descriptor
/// }
/// ```
#[macro_export]
macro_rules! glot_language {
    (
        id: $id:expr,
        descriptor: $descriptor:expr
    ) => {
        $crate::contribution::inventory::submit! {
            $crate::LanguageContribution {
                id: $id,
                descriptor: $descriptor,
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LanguageLoader, StaticModuleResolver};

    fn test_descriptor(resolver: Arc<dyn ModuleResolver>) -> LanguageDescriptor {
        LanguageDescriptor::new("inventory-test", LanguageLoader::from_resolver(resolver, "inventory-test"))
            .with_extensions([".invtest"])
    }

    crate::glot_language! {
        id: "inventory-test",
        descriptor: test_descriptor
    }

    #[test]
    fn test_submitted_contribution_is_collected() {
        let contribution = iter_contributions()
            .find(|c| c.id == "inventory-test")
            .expect("contribution should be collected");

        let resolver: Arc<dyn ModuleResolver> = Arc::new(StaticModuleResolver::new());
        let descriptor = (contribution.descriptor)(resolver);
        assert_eq!(descriptor.id(), "inventory-test");
        assert!(descriptor.extensions().contains(".invtest"));
    }
}
