use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    /// Informational only; entries never expire by age.
    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }
}

/// File-backed cache store shared by all repositories.
///
/// Each repository writes only its own entity kind, so distinct kinds never
/// contend for the same file.
pub struct CacheStore {
    cache_dir: PathBuf,
}

impl CacheStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn entry_path(&self, kind: &str, scope: &str) -> PathBuf {
        self.cache_dir.join(format!("{}_{}.json", kind, sanitize(scope)))
    }

    /// Read the cached entry for `scope`, or `None` if nothing is cached.
    pub fn load<T: DeserializeOwned>(&self, kind: &str, scope: &str) -> Result<Option<CachedData<T>>> {
        let path = self.entry_path(kind, scope);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry {kind}/{scope}"))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache entry {kind}/{scope}"))?;

        Ok(Some(cached))
    }

    /// Replace the cached entry for `scope` in one shot.
    ///
    /// Writes to a temp file and renames it over the entry, so concurrent
    /// readers see either the old entry or the new one, never a torn write.
    pub fn save<T: Serialize>(&self, kind: &str, scope: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.entry_path(kind, scope);
        let tmp = path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write cache entry {kind}/{scope}"))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to commit cache entry {kind}/{scope}"))?;
        Ok(())
    }

    /// Drop the cached entry for `scope`, if any.
    pub fn invalidate(&self, kind: &str, scope: &str) -> Result<()> {
        let path = self.entry_path(kind, scope);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove cache entry {kind}/{scope}"))?;
        }
        Ok(())
    }
}

/// Scope keys come from portal identifiers and may contain path characters.
fn sanitize(scope: &str) -> String {
    scope
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
