//! # Lantern Core
//!
//! Core data model for the Lantern analysis engine.
//!
//! This crate provides the fundamental building blocks:
//! - [`Entity`] / [`EntityRef`] - Organizations behind observed traffic
//! - [`ProtocolEvent`] - Raw protocol log entries
//! - [`NetworkRecord`] - Normalized request records
//! - [`LanternError`] - Engine error types

pub mod entity;
pub mod error;
pub mod log;
pub mod types;

// Re-exports for convenience
pub use entity::{Entity, EntityRef, CHROME_EXTENSION_CATEGORY};
pub use error::{LanternError, Result};
pub use log::{DevtoolsLog, ExecutionContext, ProtocolEvent};
pub use types::{NetworkRecord, PageUrls};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::entity::{Entity, EntityRef};
    pub use crate::error::{LanternError, Result};
    pub use crate::log::{DevtoolsLog, ExecutionContext, ProtocolEvent};
    pub use crate::types::{NetworkRecord, PageUrls};
}
