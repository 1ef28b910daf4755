//! Language registry for managing registered languages

use crate::{RegistryError, RegistryResult};
use glot_language_api::{DuplicatePolicy, LanguageDescriptor, LanguageInfo, LanguageModule, LoadResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

type ModuleCell = OnceCell<LoadResult<Arc<LanguageModule>>>;

/// Outcome of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The id was new
    Added,
    /// Metadata was unioned into the existing entry
    Merged,
    /// The existing entry was swapped out
    Replaced,
    /// The existing entry was kept and the descriptor dropped
    Ignored,
}

/// A registered language: its descriptor plus the cached result of its loader
pub struct LanguageEntry {
    descriptor: LanguageDescriptor,
    module: Arc<ModuleCell>,
}

impl LanguageEntry {
    fn new(descriptor: LanguageDescriptor) -> Self {
        Self {
            descriptor,
            module: Arc::new(OnceCell::new()),
        }
    }

    pub fn id(&self) -> &str {
        self.descriptor.id()
    }

    pub fn descriptor(&self) -> &LanguageDescriptor {
        &self.descriptor
    }

    /// True once the loader has settled successfully
    pub fn is_loaded(&self) -> bool {
        matches!(self.module.get(), Some(Ok(_)))
    }

    /// Run the loader on first call and return the settled result to every caller.
    ///
    /// Concurrent callers wait on the same in-flight load. A failure is cached like a
    /// success; the loader is never re-invoked for this entry.
    pub async fn module(&self) -> LoadResult<Arc<LanguageModule>> {
        self.module
            .get_or_init(|| async {
                info!(language = %self.id(), "Loading language definition");
                match self.descriptor.loader().load().await {
                    Ok(module) => {
                        debug!(language = %self.id(), module = %module.name, "Language definition loaded");
                        Ok(Arc::new(module))
                    }
                    Err(e) => {
                        warn!(language = %self.id(), error = %e, "Language definition failed to load");
                        Err(e)
                    }
                }
            })
            .await
            .clone()
    }
}

#[derive(Default)]
struct RegistryState {
    /// Map of language id to entry
    entries: HashMap<String, Arc<LanguageEntry>>,
    /// Ids in first-registration order
    order: Vec<String>,
    /// Lowercase extension (with dot) to ids, in registration order
    extension_map: HashMap<String, Vec<String>>,
    /// Lowercase alias or id to the first id that declared it
    alias_map: HashMap<String, String>,
    /// Lowercase exact file name to the first id that declared it
    filename_map: HashMap<String, String>,
}

impl RegistryState {
    fn rebuild_indexes(&mut self) {
        self.extension_map.clear();
        self.alias_map.clear();
        self.filename_map.clear();

        for id in &self.order {
            let Some(entry) = self.entries.get(id) else {
                continue;
            };
            let descriptor = entry.descriptor();

            for extension in descriptor.extensions() {
                self.extension_map
                    .entry(extension.to_lowercase())
                    .or_default()
                    .push(id.clone());
            }

            self.alias_map
                .entry(id.to_lowercase())
                .or_insert_with(|| id.clone());
            for alias in descriptor.aliases() {
                self.alias_map
                    .entry(alias.to_lowercase())
                    .or_insert_with(|| id.clone());
            }

            for filename in descriptor.filenames() {
                self.filename_map
                    .entry(filename.to_lowercase())
                    .or_insert_with(|| id.clone());
            }
        }
    }
}

/// Registry of languages known to the editor host
///
/// Registration is synchronous and internally serialized; lookups may run concurrently from
/// any thread. Share it with `Arc<LanguageRegistry>`.
pub struct LanguageRegistry {
    state: RwLock<RegistryState>,
    policy: DuplicatePolicy,
}

impl LanguageRegistry {
    /// Create an empty registry with the given duplicate-id policy
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            policy,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a language descriptor
    ///
    /// The descriptor is validated first. When the id is already present the registry's
    /// [`DuplicatePolicy`] decides the outcome; only [`DuplicatePolicy::Reject`] returns an
    /// error for a duplicate.
    pub fn register(&self, descriptor: LanguageDescriptor) -> RegistryResult<Registration> {
        descriptor.validate()?;

        let id = descriptor.id().to_string();
        let mut state = self.write();
        let existing = state.entries.get(&id).cloned();

        let outcome = match existing {
            None => {
                state.order.push(id.clone());
                state
                    .entries
                    .insert(id.clone(), Arc::new(LanguageEntry::new(descriptor)));
                Registration::Added
            }
            Some(existing) => match self.policy {
                DuplicatePolicy::Merge => {
                    let merged = LanguageEntry {
                        descriptor: existing.descriptor.merged_with(&descriptor),
                        module: Arc::clone(&existing.module),
                    };
                    state.entries.insert(id.clone(), Arc::new(merged));
                    Registration::Merged
                }
                DuplicatePolicy::Replace => {
                    state
                        .entries
                        .insert(id.clone(), Arc::new(LanguageEntry::new(descriptor)));
                    Registration::Replaced
                }
                DuplicatePolicy::Ignore => Registration::Ignored,
                DuplicatePolicy::Reject => {
                    warn!(language = %id, "Rejecting duplicate language registration");
                    return Err(RegistryError::duplicate(id));
                }
            },
        };

        if outcome != Registration::Ignored {
            state.rebuild_indexes();
        }

        match outcome {
            Registration::Added => info!(language = %id, "Registered language"),
            other => info!(language = %id, outcome = ?other, "Language '{}' is already registered", id),
        }
        Ok(outcome)
    }

    /// Get the entry for a language id
    pub fn get(&self, id: &str) -> Option<Arc<LanguageEntry>> {
        self.read().entries.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    /// Registered ids in registration order
    pub fn ids(&self) -> Vec<String> {
        self.read().order.clone()
    }

    /// Metadata for every registered language, in registration order
    pub fn languages(&self) -> Vec<LanguageInfo> {
        let state = self.read();
        state
            .order
            .iter()
            .filter_map(|id| state.entries.get(id))
            .map(|entry| entry.descriptor().info())
            .collect()
    }

    /// Ids of languages declaring `extension` (with or without the leading dot)
    pub fn find_by_extension(&self, extension: &str) -> Vec<String> {
        let key = if extension.starts_with('.') {
            extension.to_lowercase()
        } else {
            format!(".{}", extension.to_lowercase())
        };
        self.read()
            .extension_map
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    /// Id of the language whose id or alias matches `name`, ignoring case
    pub fn find_by_alias(&self, name: &str) -> Option<String> {
        self.read().alias_map.get(&name.to_lowercase()).cloned()
    }

    /// Language for a file path
    ///
    /// An exact file name match wins; otherwise the longest registered extension the file
    /// name ends with is used. Matching ignores case.
    pub fn language_for_path(&self, path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_str()?.to_lowercase();
        let state = self.read();

        if let Some(id) = state.filename_map.get(&file_name) {
            debug!(path = %path.display(), language = %id, "Matched language by file name");
            return Some(id.clone());
        }

        let (extension, ids) = state
            .extension_map
            .iter()
            .filter(|(extension, _)| file_name.ends_with(extension.as_str()))
            .max_by_key(|(extension, _)| extension.len())?;

        let id = ids.first()?.clone();
        debug!(path = %path.display(), language = %id, extension = %extension, "Matched language by extension");
        Some(id)
    }

    /// Activate a language: load its definition module, or return the cached result
    pub async fn load(&self, id: &str) -> RegistryResult<Arc<LanguageModule>> {
        // Lock is released before awaiting the loader.
        let entry = self.get(id).ok_or_else(|| RegistryError::unknown(id))?;
        entry
            .module()
            .await
            .map_err(|source| RegistryError::load(id, source))
    }

    /// Activate whichever language handles `path`
    pub async fn load_for_path(&self, path: &Path) -> RegistryResult<Arc<LanguageModule>> {
        let id = self
            .language_for_path(path)
            .ok_or_else(|| RegistryError::no_language_for_path(path.display().to_string()))?;
        self.load(&id).await
    }

    /// True once the language's definition has loaded successfully
    pub fn is_loaded(&self, id: &str) -> bool {
        self.get(id).map(|entry| entry.is_loaded()).unwrap_or(false)
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new(DuplicatePolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use glot_language_api::{LanguageLoader, LoadError};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn loader_for(name: &'static str) -> LanguageLoader {
        LanguageLoader::new(move || async move { Ok(LanguageModule::new(name, json!({}))) }.boxed())
    }

    fn descriptor(id: &str, extensions: &[&str], aliases: &[&str]) -> LanguageDescriptor {
        LanguageDescriptor::new(id, loader_for("module"))
            .with_extensions(extensions.iter().copied())
            .with_aliases(aliases.iter().copied())
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = LanguageRegistry::default();
        assert!(registry.is_empty());

        let outcome = registry
            .register(descriptor("sol", &[".sol"], &["sol", "solidity", "Solidity"]))
            .unwrap();
        assert_eq!(outcome, Registration::Added);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("sol"));

        let entry = registry.get("sol").unwrap();
        assert_eq!(entry.id(), "sol");
        assert_eq!(entry.descriptor().aliases(), ["sol", "solidity", "Solidity"]);
        assert!(!entry.is_loaded());
    }

    #[test]
    fn test_invalid_descriptor_is_not_registered() {
        let registry = LanguageRegistry::default();
        let err = registry
            .register(descriptor("sol", &["sol"], &[]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDescriptor(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_merge_unions_metadata() {
        let registry = LanguageRegistry::new(DuplicatePolicy::Merge);
        registry
            .register(descriptor("sol", &[".sol"], &["sol", "solidity"]))
            .unwrap();
        let outcome = registry
            .register(descriptor("sol", &[".solidity"], &["Solidity"]))
            .unwrap();

        assert_eq!(outcome, Registration::Merged);
        assert_eq!(registry.len(), 1);
        let info = &registry.languages()[0];
        assert_eq!(info.extensions, vec![".sol", ".solidity"]);
        assert_eq!(info.aliases, vec!["sol", "solidity", "Solidity"]);
        assert_eq!(registry.find_by_extension("solidity"), vec!["sol"]);
    }

    #[test]
    fn test_duplicate_replace_swaps_descriptor() {
        let registry = LanguageRegistry::new(DuplicatePolicy::Replace);
        registry.register(descriptor("sol", &[".sol"], &["sol"])).unwrap();
        let outcome = registry
            .register(descriptor("sol", &[".solidity"], &["Solidity"]))
            .unwrap();

        assert_eq!(outcome, Registration::Replaced);
        assert!(registry.find_by_extension(".sol").is_empty());
        assert_eq!(registry.find_by_alias("solidity"), Some("sol".to_string()));
    }

    #[test]
    fn test_duplicate_ignore_keeps_first() {
        let registry = LanguageRegistry::new(DuplicatePolicy::Ignore);
        registry.register(descriptor("sol", &[".sol"], &["sol"])).unwrap();
        let outcome = registry
            .register(descriptor("sol", &[".solidity"], &["Solidity"]))
            .unwrap();

        assert_eq!(outcome, Registration::Ignored);
        assert_eq!(registry.languages()[0].extensions, vec![".sol"]);
        assert!(registry.find_by_extension(".solidity").is_empty());
    }

    #[test]
    fn test_duplicate_reject_errors_without_changes() {
        let registry = LanguageRegistry::new(DuplicatePolicy::Reject);
        registry.register(descriptor("sol", &[".sol"], &["sol"])).unwrap();
        let err = registry
            .register(descriptor("sol", &[".solidity"], &[]))
            .unwrap_err();

        assert_eq!(err, RegistryError::duplicate("sol"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.languages()[0].extensions, vec![".sol"]);
    }

    #[test]
    fn test_extension_lookup_ignores_case_and_dot() {
        let registry = LanguageRegistry::default();
        registry.register(descriptor("sol", &[".sol"], &[])).unwrap();
        registry.register(descriptor("yul", &[".yul", ".SOL"], &[])).unwrap();

        assert_eq!(registry.find_by_extension("sol"), vec!["sol", "yul"]);
        assert_eq!(registry.find_by_extension(".SOL"), vec!["sol", "yul"]);
        assert!(registry.find_by_extension("rs").is_empty());
    }

    #[test]
    fn test_alias_lookup() {
        let registry = LanguageRegistry::default();
        registry
            .register(descriptor("sol", &[".sol"], &["sol", "solidity", "Solidity"]))
            .unwrap();

        assert_eq!(registry.find_by_alias("SOLIDITY"), Some("sol".to_string()));
        assert_eq!(registry.find_by_alias("sol"), Some("sol".to_string()));
        assert_eq!(registry.find_by_alias("vyper"), None);
    }

    #[test]
    fn test_language_for_path_prefers_filename_then_longest_extension() {
        let registry = LanguageRegistry::default();
        registry
            .register(descriptor("typescript", &[".ts"], &[]))
            .unwrap();
        registry
            .register(descriptor("typescript-declaration", &[".d.ts"], &[]))
            .unwrap();
        registry
            .register(
                LanguageDescriptor::new("makefile", loader_for("makefile"))
                    .with_filenames(["Makefile"]),
            )
            .unwrap();

        assert_eq!(
            registry.language_for_path(Path::new("src/app.ts")),
            Some("typescript".to_string())
        );
        assert_eq!(
            registry.language_for_path(Path::new("types/index.D.TS")),
            Some("typescript-declaration".to_string())
        );
        assert_eq!(
            registry.language_for_path(Path::new("build/makefile")),
            Some("makefile".to_string())
        );
        assert_eq!(registry.language_for_path(Path::new("README")), None);
    }

    #[test]
    fn test_language_for_path_matches_extension_suffix_only() {
        let registry = LanguageRegistry::default();
        registry
            .register(descriptor("sol", &[".sol"], &["sol"]))
            .unwrap();

        // A file named exactly like the extension still ends with it.
        assert_eq!(
            registry.language_for_path(Path::new("contracts/.sol")),
            Some("sol".to_string())
        );
        assert_eq!(registry.language_for_path(Path::new("sol")), None);
        assert_eq!(registry.language_for_path(Path::new("x.notsol")), None);
    }

    #[tokio::test]
    async fn test_load_unknown_language() {
        let registry = LanguageRegistry::default();
        let err = registry.load("sol").await.unwrap_err();
        assert_eq!(err, RegistryError::unknown("sol"));
    }

    #[tokio::test]
    async fn test_load_failure_propagates_with_source() {
        let registry = LanguageRegistry::default();
        registry
            .register(LanguageDescriptor::new(
                "sol",
                LanguageLoader::new(|| async { Err(LoadError::not_found("solidity", vec![])) }.boxed()),
            ))
            .unwrap();

        let err = registry.load("sol").await.unwrap_err();
        assert_eq!(
            err,
            RegistryError::load("sol", LoadError::not_found("solidity", vec![]))
        );
        assert!(!registry.is_loaded("sol"));
    }

    #[tokio::test]
    async fn test_load_for_path() {
        let registry = LanguageRegistry::default();
        registry
            .register(
                LanguageDescriptor::new("sol", loader_for("solidity")).with_extensions([".sol"]),
            )
            .unwrap();

        let module = registry
            .load_for_path(Path::new("contracts/Token.sol"))
            .await
            .unwrap();
        assert_eq!(module.name, "solidity");
        assert!(registry.is_loaded("sol"));

        let err = registry
            .load_for_path(Path::new("notes.txt"))
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::no_language_for_path("notes.txt"));
    }
}
