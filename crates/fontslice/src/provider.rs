//! Scoped font providers
//!
//! Binds a descriptor source to a rendering scope.

use std::sync::Arc;

use fontslice_css::FontDescriptor;
use fontslice_net::LoadError;

use crate::descriptor_cache::{DescriptorCache, DescriptorList};

/// Where a provider's descriptors come from
#[derive(Debug, Clone)]
pub enum FontSource {
    /// Remote or `data:` stylesheet URL
    Url(String),
    /// Inline stylesheet content with a base URL for relative sources
    Content { css: String, base_url: String },
    /// Caller-supplied descriptor list, served verbatim
    Static(DescriptorList),
}

impl FontSource {
    pub fn url(url: impl Into<String>) -> Self {
        FontSource::Url(url.into())
    }

    pub fn content(css: impl Into<String>, base_url: impl Into<String>) -> Self {
        FontSource::Content {
            css: css.into(),
            base_url: base_url.into(),
        }
    }

    pub fn static_list(descriptors: Vec<FontDescriptor>) -> Self {
        FontSource::Static(Arc::new(descriptors))
    }
}

/// A descriptor source bound to a rendering scope.
///
/// Callers hold one provider per distinct source and ask it for descriptors
/// once per render; repeated calls hit the descriptor cache.
pub struct ScopedFontProvider {
    source: FontSource,
    cache: Arc<DescriptorCache>,
}

impl ScopedFontProvider {
    pub fn new(source: FontSource, cache: Arc<DescriptorCache>) -> Self {
        Self { source, cache }
    }

    /// Descriptors for this scope's source.
    pub async fn descriptors(&self) -> Result<DescriptorList, LoadError> {
        match &self.source {
            FontSource::Url(url) => self.cache.load_by_url(url).await,
            FontSource::Content { css, base_url } => {
                self.cache.load_by_content(css, base_url).await
            }
            FontSource::Static(list) => Ok(Arc::clone(list)),
        }
    }
}
