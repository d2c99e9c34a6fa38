use super::PackageMetadataTask;
use crate::{
    package_metadata::LicenseMap,
    upsert::{keep_existing, upsert},
    validation::Rejection,
    Error,
};
use sbom_ingest_common::uuid::Namespace;
use sbom_ingest_entity::pm_package_version;
use sea_orm::{DatabaseTransaction, Set};
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

const NAMESPACE: Namespace = Namespace::from_bytes([
    0x57, 0xc9, 0x2d, 0x80, 0x13, 0x4e, 0x4f, 0x6a, 0xbb, 0x31, 0x9e, 0x05, 0x7c, 0xd4, 0x68, 0x1a,
]);

pub fn package_version_id(package_id: Uuid, version: &str) -> Uuid {
    NAMESPACE.derive([package_id.as_bytes().as_slice(), version.as_bytes()])
}

/// Upserts the distinct package versions of a slice.
pub struct IngestPackageVersions;

#[async_trait::async_trait]
impl PackageMetadataTask<LicenseMap> for IngestPackageVersions {
    fn name(&self) -> &'static str {
        "package_versions"
    }

    #[instrument(skip_all, fields(maps = maps.len()), err)]
    async fn execute(
        &self,
        tx: &DatabaseTransaction,
        maps: &mut [LicenseMap],
    ) -> Result<Vec<Rejection>, Error> {
        let mut versions = BTreeMap::new();

        for map in maps.iter_mut() {
            let Some(package_id) = map.package_id() else {
                continue;
            };
            let version = &map.object().version;
            let id = package_version_id(package_id, version);
            versions
                .entry(id)
                .or_insert_with(|| pm_package_version::ActiveModel {
                    id: Set(id),
                    package_id: Set(package_id),
                    version: Set(version.clone()),
                });
            map.package_version_id = Some(id);
        }

        upsert(
            tx,
            versions.into_values().collect(),
            keep_existing(pm_package_version::Column::Id),
        )
        .await?;

        Ok(vec![])
    }
}
