//! Ingestion of SBOM scan reports and package metadata into the database.

pub mod config;
pub mod error;
pub mod model;
pub mod package_metadata;
pub mod sbom;
pub mod validation;

mod upsert;

pub use error::Error;
