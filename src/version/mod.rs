//! Version model for release comparison
//!
//! Release hosts publish version strings in whatever shape the author typed
//! ("v2.4.1", "1.0.0-B", "6.0.1beta-1.0", "Build 7"), so parsing is lenient:
//! it never fails, it extracts the first dotted numeric run and the
//! stability tag adjacent to it.
//!
//! # Modules
//!
//! - [`parse`]: The [`Version`] value, its parser and its ordering
//! - [`stability`]: Stability classification derived from the tag

pub mod parse;
pub mod stability;

pub use parse::Version;
pub use stability::Stability;
