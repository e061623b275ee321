//! Font slice cache
//!
//! Deduplicated fetch + decode of font slices, keyed by descriptor identity.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;
use tracing::{debug, info, warn};

use fontslice_css::{FontDescriptor, FontSliceSource, decode_data_url};
use fontslice_net::{BundleLoader, DedupCache, DedupStats, Fetch, LoadError};

use crate::handle::{FontDecoder, FontHandle};

/// Cache of loaded font slices.
///
/// One load per descriptor cache key, however many runs demand it.
pub struct FontSliceCache {
    fetcher: Arc<dyn Fetch>,
    bundle: Arc<dyn BundleLoader>,
    decoder: Arc<dyn FontDecoder>,
    cache: DedupCache<Arc<FontHandle>>,
    bytes_loaded: Arc<AtomicU64>,
}

impl FontSliceCache {
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        bundle: Arc<dyn BundleLoader>,
        decoder: Arc<dyn FontDecoder>,
    ) -> Self {
        Self {
            fetcher,
            bundle,
            decoder,
            cache: DedupCache::new(),
            bytes_loaded: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Load the slice for a descriptor, joining any in-flight load.
    pub async fn get_or_load(
        &self,
        descriptor: &FontDescriptor,
    ) -> Result<Arc<FontHandle>, LoadError> {
        let key = descriptor.cache_key();
        let descriptor = descriptor.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let bundle = Arc::clone(&self.bundle);
        let decoder = Arc::clone(&self.decoder);
        let bytes_loaded = Arc::clone(&self.bytes_loaded);

        self.cache
            .get_or_load(&key, move || async move {
                let identity = descriptor.identity();
                let raw = match &descriptor.source {
                    FontSliceSource::Url(url) if url.starts_with("data:") => {
                        debug!(identity = %identity, "decoding inline font slice");
                        decode_data_url(url).map_err(|e| LoadError::DataUrl(e.to_string()))?
                    }
                    FontSliceSource::Url(url) => {
                        info!(url = %url, "loading font slice");
                        let fetched = fetcher.fetch(url).await?;
                        bytes_loaded.fetch_add(fetched.content_length, Ordering::Relaxed);
                        fetched.bytes
                    }
                    FontSliceSource::Resource(id) => {
                        debug!(resource = %id, "loading bundled font slice");
                        bundle.load(id).await?
                    }
                };
                let handle = decoder.decode(raw, descriptor.weight, descriptor.style, &identity)?;
                Ok(Arc::new(handle))
            })
            .await
    }

    /// Best-effort load of every descriptor; failures are logged, not fatal.
    pub async fn preload(&self, descriptors: &[FontDescriptor]) {
        let loads = descriptors.iter().map(|descriptor| async move {
            if let Err(error) = self.get_or_load(descriptor).await {
                warn!(family = %descriptor.family, %error, "font preload failed");
            }
        });
        join_all(loads).await;
    }

    /// Completed handle for a descriptor, if its load already finished.
    pub fn get_if_loaded(&self, descriptor: &FontDescriptor) -> Option<Arc<FontHandle>> {
        self.cache.peek(&descriptor.cache_key())?.ok()
    }

    /// Bytes fetched over the network so far
    pub fn bytes_loaded(&self) -> u64 {
        self.bytes_loaded.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> DedupStats {
        self.cache.stats()
    }

    /// Forget every cached slice
    pub fn clear(&self) {
        self.cache.clear();
    }
}
