pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod provider;
pub mod schedule;
pub mod update;
pub mod version;
