//! High-level number acquisition service.
//!
//! This module provides a service layer on top of providers, running the
//! bounded search/purchase rounds that turn a requested quantity into owned
//! numbers.

pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod structure;
pub(crate) mod traits;

pub use config::{AcquireServiceConfig, AcquireServiceConfigBuilder, DEFAULT_MAX_RETRY_ROUNDS};
pub use error::{AcquireServiceError, AcquireStage};
pub use structure::{AcquireService, AcquireServiceBuilder};
pub use traits::AcquireServiceTrait;
