//! In-memory capability doubles shared by the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;

use fontslice::{
    BundleLoader, Fetch, FetchedBytes, FontDecoder, FontHandle, FontStyle, FontWeight, LoadError,
};

pub fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Fetch double serving canned responses, with optional latency and
/// injectable failures.
#[derive(Default)]
pub struct StaticFetcher {
    responses: Mutex<HashMap<String, Vec<u8>>>,
    failing: Mutex<HashSet<String>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn insert(&self, url: &str, bytes: impl Into<Vec<u8>>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), bytes.into());
    }

    pub fn fail(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub fn unfail(&self, url: &str) {
        self.failing.lock().unwrap().remove(url);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetch for StaticFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<FetchedBytes, LoadError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.responses.lock().unwrap().get(url).cloned();
        let failing = self.failing.lock().unwrap().contains(url);
        let delay = self.delay;
        let url = url.to_string();
        Box::pin(async move {
            if let Some(delay) = delay {
                smol::Timer::after(delay).await;
            }
            if failing {
                return Err(LoadError::Network(format!("injected failure for {url}")));
            }
            match response {
                Some(bytes) => Ok(FetchedBytes::new(bytes)),
                None => Err(LoadError::Network(format!("no response for {url}"))),
            }
        })
    }
}

/// Bundle double serving canned resources.
#[derive(Default)]
pub struct StaticBundle {
    resources: Mutex<HashMap<String, Vec<u8>>>,
    calls: AtomicUsize,
}

impl StaticBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, resource_id: &str, bytes: impl Into<Vec<u8>>) {
        self.resources
            .lock()
            .unwrap()
            .insert(resource_id.to_string(), bytes.into());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BundleLoader for StaticBundle {
    fn load(&self, resource_id: &str) -> BoxFuture<'static, Result<Vec<u8>, LoadError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let resource = self.resources.lock().unwrap().get(resource_id).cloned();
        let resource_id = resource_id.to_string();
        Box::pin(async move {
            resource.ok_or_else(|| LoadError::Resource(format!("no resource {resource_id}")))
        })
    }
}

/// Decoder double that accepts any non-empty payload, so tests need no real
/// font binaries.
pub struct RawDecoder;

impl FontDecoder for RawDecoder {
    fn decode(
        &self,
        bytes: Vec<u8>,
        weight: FontWeight,
        style: FontStyle,
        identity: &str,
    ) -> Result<FontHandle, LoadError> {
        if bytes.is_empty() {
            return Err(LoadError::Decode(format!("{identity}: empty payload")));
        }
        Ok(FontHandle {
            identity: identity.to_string(),
            weight,
            style,
            data: Arc::new(bytes),
            glyph_count: 0,
            units_per_em: 1000,
        })
    }
}
