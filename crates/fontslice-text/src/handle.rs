//! Loaded font handles and the decode capability

use std::sync::Arc;

use fontslice_css::{FontStyle, FontWeight};
use fontslice_net::LoadError;

/// A decoded, renderable font slice
#[derive(Debug, Clone)]
pub struct FontHandle {
    /// Stable identity derived from the owning descriptor
    pub identity: String,
    pub weight: FontWeight,
    pub style: FontStyle,
    /// Raw font bytes for the platform shaper
    pub data: Arc<Vec<u8>>,
    pub glyph_count: u16,
    pub units_per_em: u16,
}

/// Decode capability turning raw font bytes into a renderable handle.
///
/// Environment-specific; hosts with a platform text engine supply their own
/// implementation.
pub trait FontDecoder: Send + Sync + 'static {
    fn decode(
        &self,
        bytes: Vec<u8>,
        weight: FontWeight,
        style: FontStyle,
        identity: &str,
    ) -> Result<FontHandle, LoadError>;
}

/// Default decoder backed by ttf-parser validation
#[derive(Debug, Default)]
pub struct TtfDecoder;

impl FontDecoder for TtfDecoder {
    fn decode(
        &self,
        bytes: Vec<u8>,
        weight: FontWeight,
        style: FontStyle,
        identity: &str,
    ) -> Result<FontHandle, LoadError> {
        let face = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| LoadError::Decode(format!("{identity}: {e}")))?;
        let glyph_count = face.number_of_glyphs();
        let units_per_em = face.units_per_em();
        Ok(FontHandle {
            identity: identity.to_string(),
            weight,
            style,
            data: Arc::new(bytes),
            glyph_count,
            units_per_em,
        })
    }
}
