//! fontslice networking seams
//!
//! Injected fetch capabilities and the deduplicating load cache.

mod dedup;

pub use dedup::{DedupCache, DedupStats};

use futures::future::BoxFuture;

/// Raw bytes returned by a fetch
#[derive(Debug, Clone)]
pub struct FetchedBytes {
    pub bytes: Vec<u8>,
    pub content_length: u64,
}

impl FetchedBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        let content_length = bytes.len() as u64;
        Self {
            bytes,
            content_length,
        }
    }
}

/// Network fetch capability supplied by the host environment.
///
/// The cache layer imposes no timeout or retry policy; both belong to the
/// implementation behind this trait.
pub trait Fetch: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<FetchedBytes, LoadError>>;
}

/// Bundled-resource lookup capability supplied by the host environment
pub trait BundleLoader: Send + Sync + 'static {
    fn load(&self, resource_id: &str) -> BoxFuture<'static, Result<Vec<u8>, LoadError>>;
}

/// Load failure surfaced through the caches.
///
/// Clone so one failed computation can deliver the same error to every
/// concurrent awaiter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("network error: {0}")]
    Network(String),

    #[error("resource error: {0}")]
    Resource(String),

    #[error("invalid data URL: {0}")]
    DataUrl(String),

    #[error("font decode error: {0}")]
    Decode(String),
}
