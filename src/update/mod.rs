//! Update resolution
//!
//! One resolution pass asks every registered provider for its latest
//! release, picks the winning release under the stability policy and
//! classifies it against the running version.
//!
//! # Modules
//!
//! - [`result`]: [`UpdateResult`] and the [`ResolvedUpdate`] snapshot of a pass
//! - [`resolver`]: [`Resolver`], which owns the providers and the resolved state
//! - [`download`]: [`DownloadManager`], which pulls the winning artifact at most once

pub mod download;
pub mod resolver;
pub mod result;

pub use download::{DownloadManager, DownloadOutcome};
pub use resolver::Resolver;
pub use result::{ActiveRelease, ResolvedUpdate, UpdateResult};
