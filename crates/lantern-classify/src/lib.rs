//! # Lantern Classify
//!
//! Entity classification of network telemetry.
//!
//! Groups every observed request URL by the organization that served it,
//! distinguishing first-party from third-party traffic:
//! - [`EntityClassifier`] - the computed artifact producing an
//!   [`EntityClassification`]
//! - [`NetworkRecords`] - ordered request records derived from the raw log
//! - [`EntityReference`] - boundary to the known-entity reference dataset
//! - [`urls`] - URL scheme policy and root-domain helpers

pub mod classification;
pub mod network_records;
pub mod reference;
pub mod urls;

// Re-exports for convenience
pub use classification::{ClassificationInputs, EntityClassification, EntityClassifier};
pub use network_records::NetworkRecords;
pub use reference::{EntityRecord, EntityReference, StaticEntityDataset};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::classification::{
        ClassificationInputs, EntityClassification, EntityClassifier,
    };
    pub use crate::network_records::NetworkRecords;
    pub use crate::reference::{EntityRecord, EntityReference, StaticEntityDataset};
    pub use lantern_compute::{ComputeContext, ComputedArtifact};
    pub use lantern_core::prelude::*;
}
