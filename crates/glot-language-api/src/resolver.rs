//! Module resolvers
//!
//! A resolver maps a module name (e.g. "solidity") to its definition. Loaders built with
//! [`LanguageLoader::from_resolver`](crate::LanguageLoader::from_resolver) defer to one.

use crate::{LanguageModule, LoadError, LoadResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Locates language definition modules by name
#[async_trait]
pub trait ModuleResolver: Send + Sync {
    /// Resolve the module called `name`
    async fn resolve(&self, name: &str) -> LoadResult<LanguageModule>;
}

/// Resolver backed by an in-memory table
#[derive(Debug, Clone, Default)]
pub struct StaticModuleResolver {
    modules: HashMap<String, Value>,
}

impl StaticModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a module definition
    pub fn with_module(mut self, name: impl Into<String>, definition: Value) -> Self {
        self.modules.insert(name.into(), definition);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }
}

#[async_trait]
impl ModuleResolver for StaticModuleResolver {
    async fn resolve(&self, name: &str) -> LoadResult<LanguageModule> {
        self.modules
            .get(name)
            .map(|definition| LanguageModule::new(name, definition.clone()))
            .ok_or_else(|| LoadError::not_found(name, vec!["<static>".to_string()]))
    }
}

/// Resolver reading `<name>.json` from an ordered list of directories
///
/// The first directory holding the file wins.
#[derive(Debug, Clone)]
pub struct FsModuleResolver {
    search_paths: Vec<PathBuf>,
}

impl FsModuleResolver {
    pub fn new<I, P>(search_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_paths: search_paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    fn searched(&self) -> Vec<String> {
        self.search_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect()
    }
}

/// Module names are bare identifiers; anything that could escape a search directory is refused.
fn is_plain_module_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).components().count() == 1
}

#[async_trait]
impl ModuleResolver for FsModuleResolver {
    async fn resolve(&self, name: &str) -> LoadResult<LanguageModule> {
        if !is_plain_module_name(name) {
            warn!(module = %name, "Refusing to resolve module name with path components");
            return Err(LoadError::not_found(name, self.searched()));
        }

        let file_name = format!("{}.json", name);
        for dir in &self.search_paths {
            let candidate = dir.join(&file_name);
            let content = match tokio::fs::read_to_string(&candidate).await {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(path = %candidate.display(), "Module not present in search path");
                    continue;
                }
                Err(e) => {
                    return Err(LoadError::io(
                        name,
                        format!("{}: {}", candidate.display(), e),
                    ))
                }
            };

            let definition: Value = serde_json::from_str(&content).map_err(|e| {
                LoadError::malformed(name, format!("{}: {}", candidate.display(), e))
            })?;

            debug!(module = %name, path = %candidate.display(), "Resolved language module");
            return Ok(LanguageModule::new(name, definition));
        }

        Err(LoadError::not_found(name, self.searched()))
    }
}
