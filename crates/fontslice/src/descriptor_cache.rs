//! Parsed-stylesheet cache
//!
//! Deduplicated fetch + parse of `@font-face` descriptors, keyed by source
//! identity.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::info;

use fontslice_css::{FontDescriptor, decode_data_url, fnv1a_64, parse_stylesheet};
use fontslice_net::{DedupCache, DedupStats, Fetch, LoadError};

/// Shared list of descriptors parsed from one source
pub type DescriptorList = Arc<Vec<FontDescriptor>>;

/// Cache of parsed stylesheets.
///
/// Two addressing modes share one deduplication mechanism: by URL
/// (`url:` keys) and by inline content (`hash:` keys over an FNV-1a digest
/// of content and base URL; collisions are an accepted risk of that path).
pub struct DescriptorCache {
    fetcher: Arc<dyn Fetch>,
    cache: DedupCache<DescriptorList>,
    published: Mutex<HashMap<String, DescriptorList>>,
    bytes_loaded: Arc<AtomicU64>,
}

impl DescriptorCache {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            fetcher,
            cache: DedupCache::new(),
            published: Mutex::new(HashMap::new()),
            bytes_loaded: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Descriptors for a stylesheet URL.
    ///
    /// `data:` URLs decode locally with no network and no base URL; anything
    /// else is fetched and parsed with the stylesheet URL as base.
    pub async fn load_by_url(&self, url: &str) -> Result<DescriptorList, LoadError> {
        let key = format!("url:{url}");
        let result = if url.starts_with("data:") {
            let url = url.to_string();
            self.cache
                .get_or_load(&key, move || async move {
                    let bytes =
                        decode_data_url(&url).map_err(|e| LoadError::DataUrl(e.to_string()))?;
                    let css = String::from_utf8_lossy(&bytes);
                    Ok(Arc::new(parse_stylesheet(&css, None)))
                })
                .await
        } else {
            let url_owned = url.to_string();
            let fetcher = Arc::clone(&self.fetcher);
            let bytes_loaded = Arc::clone(&self.bytes_loaded);
            self.cache
                .get_or_load(&key, move || async move {
                    info!(url = %url_owned, "loading stylesheet");
                    let fetched = fetcher.fetch(&url_owned).await?;
                    bytes_loaded.fetch_add(fetched.content_length, Ordering::Relaxed);
                    let css = String::from_utf8_lossy(&fetched.bytes);
                    Ok(Arc::new(parse_stylesheet(&css, Some(&url_owned))))
                })
                .await
        };
        self.publish(&key, &result);
        result
    }

    /// Descriptors for inline stylesheet content.
    pub async fn load_by_content(
        &self,
        css: &str,
        base_url: &str,
    ) -> Result<DescriptorList, LoadError> {
        let digest = fnv1a_64(format!("{css}:{base_url}").as_bytes());
        let key = format!("hash:{digest:016x}");
        let css = css.to_string();
        let base_url = base_url.to_string();
        let result = self
            .cache
            .get_or_load(&key, move || async move {
                let base = (!base_url.is_empty()).then_some(base_url.as_str());
                Ok(Arc::new(parse_stylesheet(&css, base)))
            })
            .await;
        self.publish(&key, &result);
        result
    }

    fn publish(&self, key: &str, result: &Result<DescriptorList, LoadError>) {
        if let Ok(list) = result {
            // Last write wins; values for a key are referentially stable
            // once computed, so racing publications are equivalent.
            self.published
                .lock()
                .unwrap()
                .insert(key.to_string(), Arc::clone(list));
        }
    }

    /// Snapshot of every successfully parsed source, by cache key
    pub fn descriptors(&self) -> HashMap<String, DescriptorList> {
        self.published.lock().unwrap().clone()
    }

    /// Bytes fetched over the network so far
    pub fn bytes_loaded(&self) -> u64 {
        self.bytes_loaded.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> DedupStats {
        self.cache.stats()
    }

    /// Drop all cached parses and the published snapshot.
    ///
    /// Loads already in flight complete normally; their results re-enter the
    /// published map when they land.
    pub fn clear(&self) {
        self.cache.clear();
        self.published.lock().unwrap().clear();
    }
}
