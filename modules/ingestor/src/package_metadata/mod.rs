//! Ingestion of package metadata exports: package licenses and security advisories.
//!
//! Both follow the batched upsert pattern of the SBOM pipeline. Data objects are ingested in
//! slices, each slice runs its tasks in a single transaction, and ids are derived from natural
//! keys.

mod advisory_data_object;
mod advisory_ingestion;
mod data_object;
mod license_ingestion;
mod maps;
mod slice;

pub mod tasks;

pub use advisory_data_object::*;
pub use advisory_ingestion::*;
pub use data_object::*;
pub use license_ingestion::*;
pub use maps::*;

use crate::validation::Rejection;
use serde::Serialize;

/// The result of ingesting a sequence of data objects.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IngestionOutcome {
    /// Number of data objects persisted.
    pub ingested: usize,
    /// Number of distinct dependent rows persisted, like license assignments or affected
    /// packages.
    pub related: usize,
    pub slices: usize,
    pub rejections: Vec<Rejection>,
}
