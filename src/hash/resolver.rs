//! Reverse lookup of identifiers through a string dictionary.
//!
//! The cache starts empty and is built on the first lookup that needs it.
//! Hosts call [`HashResolver::invalidate`] (or swap the source) when the
//! dictionary changes; the next lookup rebuilds from the current source.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::{format_identifier, hash, string_to_identifier, NameTable, NULL_IDENTIFIER};
use crate::util::{Error, Result};

/// Supplier of dictionary strings. Ordering among strings is irrelevant
/// except for hash collisions, where the later string wins.
pub trait DictionarySource: Send + Sync {
    /// Load every string of the dictionary.
    fn load_strings(&self) -> Result<Vec<String>>;

    /// Short description for log messages.
    fn describe(&self) -> String;
}

/// Dictionary stored as a JSON array of strings on disk.
#[derive(Clone, Debug)]
pub struct FileDictionary {
    path: PathBuf,
}

impl FileDictionary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DictionarySource for FileDictionary {
    fn load_strings(&self) -> Result<Vec<String>> {
        let unavailable = |reason: String| Error::DictionaryUnavailable {
            path: self.path.clone(),
            reason,
        };
        let text = std::fs::read_to_string(&self.path).map_err(|e| unavailable(e.to_string()))?;
        serde_json::from_str::<Vec<String>>(&text).map_err(|e| unavailable(e.to_string()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory dictionary.
#[derive(Clone, Debug, Default)]
pub struct StaticDictionary {
    strings: Vec<String>,
}

impl StaticDictionary {
    pub fn new<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { strings: strings.into_iter().map(Into::into).collect() }
    }
}

impl DictionarySource for StaticDictionary {
    fn load_strings(&self) -> Result<Vec<String>> {
        Ok(self.strings.clone())
    }

    fn describe(&self) -> String {
        format!("<{} static strings>", self.strings.len())
    }
}

/// Lazily-built identifier -> name cache.
///
/// Uses `parking_lot::RwLock` so lookups can take `&self`; the intended
/// model is still one load or save at a time.
pub struct HashResolver {
    source: RwLock<Option<Box<dyn DictionarySource>>>,
    cache: RwLock<Option<HashMap<u32, String>>>,
}

impl HashResolver {
    /// Resolver with no dictionary. Every lookup falls back to hex text.
    pub fn new() -> Self {
        Self {
            source: RwLock::new(None),
            cache: RwLock::new(None),
        }
    }

    /// Resolver backed by `source`.
    pub fn with_source(source: impl DictionarySource + 'static) -> Self {
        let resolver = Self::new();
        *resolver.source.write() = Some(Box::new(source));
        resolver
    }

    /// Resolver backed by a JSON dictionary file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::with_source(FileDictionary::new(path))
    }

    /// Replace the dictionary source and drop the current cache.
    pub fn set_source(&self, source: Option<Box<dyn DictionarySource>>) {
        *self.source.write() = source;
        self.invalidate();
    }

    /// Drop the cache; the next lookup rebuilds it.
    pub fn invalidate(&self) {
        *self.cache.write() = None;
    }

    /// True once the cache has been built.
    pub fn is_built(&self) -> bool {
        self.cache.read().is_some()
    }

    /// Number of cached names (0 before the cache is built).
    pub fn len(&self) -> usize {
        self.cache.read().as_ref().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the cache now instead of on first lookup.
    pub fn build(&self) {
        let mut cache = self.cache.write();
        if cache.is_none() {
            *cache = Some(self.load_table());
        }
    }

    /// Known name for `id`. `0` never consults (or builds) the cache.
    pub fn lookup(&self, id: u32) -> Option<String> {
        if id == NULL_IDENTIFIER {
            return None;
        }
        if let Some(table) = self.cache.read().as_ref() {
            return table.get(&id).cloned();
        }
        self.build();
        self.cache.read().as_ref().and_then(|t| t.get(&id).cloned())
    }

    /// Readable text for `id`: the dictionary name, or `0x` + 8 hex digits.
    pub fn resolve(&self, id: u32) -> String {
        self.lookup(id).unwrap_or_else(|| format_identifier(id))
    }

    /// See [`string_to_identifier`](super::string_to_identifier).
    pub fn string_to_identifier(&self, input: &str) -> Result<u32> {
        string_to_identifier(input)
    }

    fn load_table(&self) -> HashMap<u32, String> {
        let source = self.source.read();
        let Some(source) = source.as_ref() else {
            tracing::debug!("no string dictionary configured, names resolve to hex");
            return HashMap::new();
        };
        match source.load_strings() {
            Ok(strings) => {
                let mut table = HashMap::with_capacity(strings.len());
                for s in strings {
                    table.insert(hash(&s), s);
                }
                tracing::debug!("loaded {} names from {}", table.len(), source.describe());
                table
            }
            Err(e) => {
                tracing::warn!("{}", e);
                HashMap::new()
            }
        }
    }
}

impl Default for HashResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HashResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashResolver")
            .field("source", &self.source.read().as_ref().map(|s| s.describe()))
            .field("cached", &self.len())
            .finish()
    }
}

impl NameTable for HashResolver {
    fn to_identifier(&self, text: &str) -> Result<u32> {
        self.string_to_identifier(text)
    }

    fn lookup(&self, id: u32) -> Option<String> {
        HashResolver::lookup(self, id)
    }
}
