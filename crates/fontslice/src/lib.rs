//! fontslice
//!
//! On-demand, character-precise font loading: parse `@font-face` slices from
//! a stylesheet, work out which slices a piece of text actually needs, fetch
//! only those, and cache both the parsed metadata and the loaded bytes with
//! deduplication of concurrent requests.

mod descriptor_cache;
mod provider;

pub use descriptor_cache::{DescriptorCache, DescriptorList};
pub use provider::{FontSource, ScopedFontProvider};

pub use fontslice_css::{
    FontDescriptor, FontSliceSource, FontSrc, FontStyle, FontWeight, UnicodeRange, char_in_ranges,
    decode_data_url, parse_src, parse_stylesheet, parse_unicode_ranges, resolve_url,
};
pub use fontslice_net::{BundleLoader, DedupStats, Fetch, FetchedBytes, LoadError};
pub use fontslice_text::{
    FontDecoder, FontHandle, FontSliceCache, TextRun, TtfDecoder, build_runs,
};

use std::sync::Arc;

/// A text run paired with its loaded slice, when available
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub run: TextRun,
    /// None until the slice finishes loading; render with the caller's
    /// fallback appearance and prepare again afterwards.
    pub handle: Option<Arc<FontHandle>>,
}

/// Both caches wired into the render data flow.
///
/// Construct once at startup and share; the caches deduplicate across every
/// consumer that holds a clone of the `Arc`s.
pub struct FontSystem {
    descriptors: Arc<DescriptorCache>,
    slices: Arc<FontSliceCache>,
}

impl FontSystem {
    pub fn new(fetcher: Arc<dyn Fetch>, bundle: Arc<dyn BundleLoader>) -> Self {
        Self::with_decoder(fetcher, bundle, Arc::new(TtfDecoder))
    }

    pub fn with_decoder(
        fetcher: Arc<dyn Fetch>,
        bundle: Arc<dyn BundleLoader>,
        decoder: Arc<dyn FontDecoder>,
    ) -> Self {
        Self {
            descriptors: Arc::new(DescriptorCache::new(Arc::clone(&fetcher))),
            slices: Arc::new(FontSliceCache::new(fetcher, bundle, decoder)),
        }
    }

    /// Provider for a descriptor source, bound to this system's cache.
    pub fn provider(&self, source: FontSource) -> ScopedFontProvider {
        ScopedFontProvider::new(source, Arc::clone(&self.descriptors))
    }

    pub fn descriptor_cache(&self) -> &Arc<DescriptorCache> {
        &self.descriptors
    }

    pub fn slice_cache(&self) -> &Arc<FontSliceCache> {
        &self.slices
    }

    /// Build runs for `text` and attach already-loaded slices.
    ///
    /// Slices not yet cached start loading in the background; their runs
    /// carry no handle until a later call finds them loaded, so a first
    /// render never blocks on font I/O.
    pub async fn prepare(
        &self,
        text: &str,
        provider: &ScopedFontProvider,
        weight: Option<FontWeight>,
        style: Option<FontStyle>,
    ) -> Result<Vec<PreparedRun>, LoadError> {
        let descriptors = provider.descriptors().await?;
        let runs = build_runs(text, &descriptors, weight, style);

        let mut prepared = Vec::with_capacity(runs.len());
        for run in runs {
            let handle = match &run.descriptor {
                Some(descriptor) => {
                    let loaded = self.slices.get_if_loaded(descriptor);
                    if loaded.is_none() {
                        self.spawn_load(descriptor.clone());
                    }
                    loaded
                }
                None => None,
            };
            prepared.push(PreparedRun { run, handle });
        }
        Ok(prepared)
    }

    /// Load every slice of the provider's descriptors up front.
    pub async fn preload(&self, provider: &ScopedFontProvider) -> Result<(), LoadError> {
        let descriptors = provider.descriptors().await?;
        self.slices.preload(&descriptors).await;
        Ok(())
    }

    fn spawn_load(&self, descriptor: FontDescriptor) {
        let slices = Arc::clone(&self.slices);
        smol::spawn(async move {
            if let Err(error) = slices.get_or_load(&descriptor).await {
                tracing::warn!(family = %descriptor.family, %error, "background font load failed");
            }
        })
        .detach();
    }
}
