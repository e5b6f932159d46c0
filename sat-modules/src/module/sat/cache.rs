///! On-disk HTTP response cache
///!
///! Successful GET bodies are stored as JSON files named by the SHA-256 of the
///! request URL. Entries older than the expiry are ignored and removed.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Default lifetime of a cached response
pub const DEFAULT_EXPIRY_HOURS: i64 = 24;

/// Cached response body with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub body: String,
}

/// Response cache keyed by request URL
#[derive(Debug, Clone)]
pub struct ResponseCache {
    cache_dir: PathBuf,
    expire_after: Duration,
}

impl ResponseCache {
    /// Create a new response cache
    ///
    /// # Arguments
    /// * `cache_dir` - directory holding cache entries (created on first store)
    /// * `expire_after` - maximum age of a usable entry
    pub fn new<P: AsRef<Path>>(cache_dir: P, expire_after: Duration) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
            expire_after,
        }
    }

    /// Ensure the cache directory exists
    pub async fn ensure_cache_dir(&self) -> Result<()> {
        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir)
                .await
                .context(format!("Failed to create cache directory: {:?}", self.cache_dir))?;
            info!("Created cache directory: {:?}", self.cache_dir);
        }
        Ok(())
    }

    /// Get the cache file path for a URL
    fn entry_path(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        self.cache_dir.join(format!("{}.json", hex::encode(hasher.finalize())))
    }

    /// Get a fresh cached body, if any
    ///
    /// Unreadable or corrupt entries are treated as misses.
    pub async fn get(&self, url: &str) -> Option<String> {
        let path = self.entry_path(url);

        if !path.exists() {
            debug!("Cache miss for {}", url);
            return None;
        }

        let cached = match self.read_entry(&path).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Ignoring unreadable cache entry {:?}: {:#}", path, e);
                return None;
            }
        };

        if cached.url != url {
            warn!("Cache entry {:?} belongs to {}, ignoring", path, cached.url);
            return None;
        }

        let age = Utc::now() - cached.fetched_at;
        if age > self.expire_after {
            debug!("Cache entry for {} expired ({} minutes old)", url, age.num_minutes());
            if let Err(e) = fs::remove_file(&path).await {
                warn!("Failed to delete expired cache entry {:?}: {}", path, e);
            }
            return None;
        }

        debug!("Cache hit for {} ({} minutes old)", url, age.num_minutes());
        Some(cached.body)
    }

    async fn read_entry(&self, path: &Path) -> Result<CachedResponse> {
        let content = fs::read_to_string(path)
            .await
            .context("Failed to read cache entry")?;
        let cached = serde_json::from_str(&content).context("Failed to parse cache entry")?;
        Ok(cached)
    }

    /// Store a response body, overwriting any previous entry for the URL
    pub async fn store(&self, url: &str, body: &str) -> Result<()> {
        self.ensure_cache_dir().await?;

        let cached = CachedResponse {
            url: url.to_string(),
            fetched_at: Utc::now(),
            body: body.to_string(),
        };
        let content = serde_json::to_string(&cached).context("Failed to serialize cache entry")?;

        let path = self.entry_path(url);
        fs::write(&path, content)
            .await
            .context(format!("Failed to write cache entry: {:?}", path))?;

        debug!("Cached response for {} in {:?}", url, path);
        Ok(())
    }
}
