//! fontslice CSS
//!
//! `@font-face` stylesheet parsing and the font descriptor model.

mod descriptor;
mod hash;
mod parser;
mod unicode_range;
mod urls;

pub use descriptor::{FontDescriptor, FontSliceSource, FontSrc, FontStyle, FontWeight};
pub use hash::fnv1a_64;
pub use parser::{parse_src, parse_stylesheet};
pub use unicode_range::{UnicodeRange, char_in_ranges, parse_unicode_ranges};
pub use urls::{DataUrlError, decode_data_url, resolve_url};
