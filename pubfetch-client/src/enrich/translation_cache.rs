//! Translations cached by pmid, optionally persisted as a JSON object on disk

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cache::{CacheConfig, MemoryCache};
use crate::error::Result;

#[derive(Clone)]
pub struct TranslationCache {
    memory: MemoryCache<String, String>,
    path: Option<PathBuf>,
}

impl TranslationCache {
    /// Purely in-memory cache
    pub fn new() -> Self {
        Self {
            memory: MemoryCache::new(&CacheConfig::default()),
            path: None,
        }
    }

    /// Cache backed by `path`; existing entries are loaded when the file exists
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let cache = Self {
            memory: MemoryCache::new(&CacheConfig::default()),
            path: Some(path.clone()),
        };

        if path.is_file() {
            let content = fs::read_to_string(&path)?;
            let entries: HashMap<String, String> = if content.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&content)?
            };
            info!(path = %path.display(), entries = entries.len(), "Loaded translation cache");
            cache.memory.extend(entries).await;
        }

        Ok(cache)
    }

    pub async fn get(&self, pmid: &str) -> Option<String> {
        self.memory.get(&pmid.to_string()).await
    }

    pub async fn insert(&self, pmid: &str, translation: &str) {
        self.memory
            .insert(pmid.to_string(), translation.to_string())
            .await;
    }

    pub async fn len(&self) -> u64 {
        self.memory.sync().await;
        self.memory.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Write every entry back to the backing file; no-op for in-memory caches
    pub async fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        self.memory.sync().await;
        let entries: BTreeMap<String, String> = self.memory.entries().into_iter().collect();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&entries)?)?;
        debug!(path = %path.display(), entries = entries.len(), "Saved translation cache");
        Ok(())
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}
