//! Ingestion of the SBOM reports of a pipeline.
//!
//! A report is turned into a sorted collection of [`OccurrenceMap`]s, which is ingested in
//! slices. Every slice runs the [`tasks`] in a single transaction. Once all reports are
//! ingested, occurrences of the project which were not reported again get deleted.

mod delete_not_present;
mod execution;
mod occurrence_map;
mod occurrence_map_collection;
mod report;
mod reports;
mod slice;

pub mod tasks;

pub use delete_not_present::*;
pub use execution::*;
pub use occurrence_map::*;
pub use occurrence_map_collection::*;
pub use report::*;
pub use reports::*;
pub use slice::*;
