//! Tasks of the package metadata slices.

mod advisories;
mod affected_packages;
mod licenses;
mod package_version_licenses;
mod package_versions;
mod packages;

pub use advisories::*;
pub use affected_packages::*;
pub use licenses::*;
pub use package_version_licenses::*;
pub use package_versions::*;
pub use packages::*;

use super::{AdvisoryMap, LicenseMap};
use crate::{validation::Rejection, Error};
use sea_orm::DatabaseTransaction;

#[async_trait::async_trait]
pub trait PackageMetadataTask<M>: Send + Sync
where
    M: Send + Sync,
{
    fn name(&self) -> &'static str;

    async fn execute(
        &self,
        tx: &DatabaseTransaction,
        maps: &mut [M],
    ) -> Result<Vec<Rejection>, Error>;
}

pub fn license_tasks() -> Vec<Box<dyn PackageMetadataTask<LicenseMap>>> {
    vec![
        Box::new(IngestLicenses),
        Box::new(IngestPackages),
        Box::new(IngestPackageVersions),
        Box::new(IngestPackageVersionLicenses),
    ]
}

pub fn advisory_tasks() -> Vec<Box<dyn PackageMetadataTask<AdvisoryMap>>> {
    vec![Box::new(IngestAdvisories), Box::new(IngestAffectedPackages)]
}
