//! Deferred loading of language definition modules

use crate::{LoadResult, ModuleResolver};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A resolved language definition module
///
/// The payload (tokenizer rules, brackets, comment markers, ...) is opaque to the registry.
/// It is stored as JSON so any definition format the host understands can flow through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageModule {
    /// Module name the loader resolved (e.g. "solidity")
    pub name: String,

    /// Definition payload
    pub definition: Value,
}

impl LanguageModule {
    pub fn new(name: impl Into<String>, definition: Value) -> Self {
        Self {
            name: name.into(),
            definition,
        }
    }
}

type LoadFn = dyn Fn() -> BoxFuture<'static, LoadResult<LanguageModule>> + Send + Sync;

/// Zero-argument capability producing a language definition module on demand
///
/// Calling [`load`](Self::load) only builds the future; nothing is fetched until the future is
/// polled. Loaders are cheap to clone and may be invoked any number of times; deduplicating
/// invocations is the registry's job.
#[derive(Clone)]
pub struct LanguageLoader {
    inner: Arc<LoadFn>,
}

impl LanguageLoader {
    /// Wrap a future-returning closure
    pub fn new<F>(load: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, LoadResult<LanguageModule>> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(load),
        }
    }

    /// Loader that asks `resolver` for the module called `module_name`
    pub fn from_resolver(resolver: Arc<dyn ModuleResolver>, module_name: &'static str) -> Self {
        Self::new(move || {
            let resolver = Arc::clone(&resolver);
            async move {
                tracing::debug!(module = module_name, "Resolving language module");
                resolver.resolve(module_name).await
            }
            .boxed()
        })
    }

    /// Produce the deferred module
    pub fn load(&self) -> BoxFuture<'static, LoadResult<LanguageModule>> {
        (self.inner)()
    }
}

impl fmt::Debug for LanguageLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageLoader").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoadError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingResolver {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ModuleResolver for CountingResolver {
        async fn resolve(&self, name: &str) -> LoadResult<LanguageModule> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LanguageModule::new(name, json!({ "tokenizer": {} })))
        }
    }

    #[tokio::test]
    async fn test_load_is_deferred_until_awaited() {
        let resolver = Arc::new(CountingResolver {
            calls: AtomicUsize::new(0),
        });
        let loader = LanguageLoader::from_resolver(resolver.clone(), "solidity");

        let pending = loader.load();
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);

        let module = pending.await.unwrap();
        assert_eq!(module.name, "solidity");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loader_can_be_invoked_repeatedly() {
        let resolver = Arc::new(CountingResolver {
            calls: AtomicUsize::new(0),
        });
        let loader = LanguageLoader::from_resolver(resolver.clone(), "solidity");
        let cloned = loader.clone();

        loader.load().await.unwrap();
        cloned.load().await.unwrap();
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_is_returned_untouched() {
        let loader =
            LanguageLoader::new(|| async { Err(LoadError::failed("solidity", "network down")) }.boxed());

        let err = loader.load().await.unwrap_err();
        assert_eq!(err, LoadError::failed("solidity", "network down"));
    }
}
