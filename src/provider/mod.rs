//! Release providers
//!
//! A provider polls one remote release-metadata source and turns its
//! response into a [`Release`]. The resolver only sees the [`Provider`]
//! trait and never branches on which source it is talking to.
//!
//! # Modules
//!
//! - [`traits`]: The [`Provider`] trait
//! - [`release`]: [`Release`] and the per-field [`Field`] marker
//! - [`http`]: Shared HTTP client and response status handling
//! - [`sources`]: Concrete providers (GitHub, Spigot, Spiget, Polymart, Bukkit)

pub mod http;
pub mod release;
pub mod sources;
pub mod traits;

pub use release::{Field, Release};
pub use traits::Provider;
