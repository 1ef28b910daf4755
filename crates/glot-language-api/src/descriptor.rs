//! Language descriptors
//!
//! A descriptor is the static record identifying a language to the editor host. It is built
//! once by a contribution and owned by the registry afterwards; nothing mutates it in place.

use crate::{DescriptorError, LanguageLoader};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Static metadata plus the deferred loader for one language
#[derive(Debug, Clone)]
pub struct LanguageDescriptor {
    id: String,
    extensions: BTreeSet<String>,
    aliases: Vec<String>,
    filenames: Vec<String>,
    mimetypes: Vec<String>,
    loader: LanguageLoader,
}

impl LanguageDescriptor {
    /// Create a descriptor with no extensions, aliases, filenames or MIME types
    pub fn new(id: impl Into<String>, loader: LanguageLoader) -> Self {
        Self {
            id: id.into(),
            extensions: BTreeSet::new(),
            aliases: Vec::new(),
            filenames: Vec::new(),
            mimetypes: Vec::new(),
            loader,
        }
    }

    /// Add file extensions (with the leading dot, e.g. ".sol")
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.extend(extensions.into_iter().map(Into::into));
        self
    }

    /// Append display aliases; the first alias overall is the canonical name
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for alias in aliases {
            push_unique(&mut self.aliases, alias.into());
        }
        self
    }

    /// Add exact file names (e.g. "Makefile")
    pub fn with_filenames<I, S>(mut self, filenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for filename in filenames {
            push_unique(&mut self.filenames, filename.into());
        }
        self
    }

    /// Add MIME types
    pub fn with_mimetypes<I, S>(mut self, mimetypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for mimetype in mimetypes {
            push_unique(&mut self.mimetypes, mimetype.into());
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// First alias, falling back to the id when no alias is declared
    pub fn canonical_alias(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or(&self.id)
    }

    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    pub fn mimetypes(&self) -> &[String] {
        &self.mimetypes
    }

    pub fn loader(&self) -> &LanguageLoader {
        &self.loader
    }

    /// Serializable snapshot of the metadata
    pub fn info(&self) -> LanguageInfo {
        LanguageInfo {
            id: self.id.clone(),
            extensions: self.extensions.iter().cloned().collect(),
            aliases: self.aliases.clone(),
            filenames: self.filenames.clone(),
            mimetypes: self.mimetypes.clone(),
        }
    }

    /// Union `other`'s metadata into a copy of `self`, keeping `self`'s id and loader
    pub fn merged_with(&self, other: &LanguageDescriptor) -> LanguageDescriptor {
        self.clone()
            .with_extensions(other.extensions.iter().cloned())
            .with_aliases(other.aliases.iter().cloned())
            .with_filenames(other.filenames.iter().cloned())
            .with_mimetypes(other.mimetypes.iter().cloned())
    }

    /// Check the descriptor is well formed
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.id.trim().is_empty() {
            return Err(DescriptorError::new(&self.id, "id cannot be empty"));
        }

        for extension in &self.extensions {
            if extension.len() < 2 || !extension.starts_with('.') {
                return Err(DescriptorError::new(
                    &self.id,
                    format!("extension '{}' must start with '.'", extension),
                ));
            }
        }

        if self.aliases.iter().any(|a| a.trim().is_empty()) {
            return Err(DescriptorError::new(&self.id, "aliases cannot be empty"));
        }
        if self.filenames.iter().any(|f| f.trim().is_empty()) {
            return Err(DescriptorError::new(&self.id, "filenames cannot be empty"));
        }
        if self.mimetypes.iter().any(|m| m.trim().is_empty()) {
            return Err(DescriptorError::new(&self.id, "mimetypes cannot be empty"));
        }

        Ok(())
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Language metadata without the loader, suitable for listing and serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub id: String,
    pub extensions: Vec<String>,
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filenames: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mimetypes: Vec<String>,
}
