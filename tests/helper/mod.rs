//! Shared fixtures for integration tests

#![allow(dead_code)]

mod audience;
mod provider;

pub use audience::{RecordingSink, StubAudience, StubSubscriber};
pub use provider::StubProvider;
