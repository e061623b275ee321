//! fontslice text
//!
//! Loaded font slices and partitioning of text into per-descriptor runs.

mod handle;
mod runs;
mod slice_cache;

pub use handle::{FontDecoder, FontHandle, TtfDecoder};
pub use runs::{TextRun, build_runs};
pub use slice_cache::FontSliceCache;
