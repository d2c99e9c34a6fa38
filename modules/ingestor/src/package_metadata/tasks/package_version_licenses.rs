use super::PackageMetadataTask;
use crate::{
    package_metadata::LicenseMap,
    upsert::{keep_existing, upsert},
    validation::Rejection,
    Error,
};
use sbom_ingest_common::uuid::Namespace;
use sbom_ingest_entity::pm_package_version_license;
use sea_orm::{DatabaseTransaction, Set};
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

const NAMESPACE: Namespace = Namespace::from_bytes([
    0xe1, 0x62, 0x9a, 0x3d, 0x48, 0x0f, 0x41, 0xc7, 0x85, 0x5b, 0x27, 0xf8, 0x1d, 0x90, 0xae, 0x36,
]);

pub fn package_version_license_id(package_version_id: Uuid, license_id: Uuid) -> Uuid {
    NAMESPACE.derive([package_version_id.as_bytes(), license_id.as_bytes()])
}

/// Links the package versions of a slice to their licenses.
pub struct IngestPackageVersionLicenses;

#[async_trait::async_trait]
impl PackageMetadataTask<LicenseMap> for IngestPackageVersionLicenses {
    fn name(&self) -> &'static str {
        "package_version_licenses"
    }

    #[instrument(skip_all, fields(maps = maps.len()), err)]
    async fn execute(
        &self,
        tx: &DatabaseTransaction,
        maps: &mut [LicenseMap],
    ) -> Result<Vec<Rejection>, Error> {
        let mut links = BTreeMap::new();

        for map in maps.iter_mut() {
            let (Some(package_version_id), Some(license_id)) =
                (map.package_version_id(), map.license_id())
            else {
                continue;
            };
            let id = package_version_license_id(package_version_id, license_id);
            links
                .entry(id)
                .or_insert_with(|| pm_package_version_license::ActiveModel {
                    id: Set(id),
                    package_version_id: Set(package_version_id),
                    license_id: Set(license_id),
                });
            map.package_version_license_id = Some(id);
        }

        upsert(
            tx,
            links.into_values().collect(),
            keep_existing(pm_package_version_license::Column::Id),
        )
        .await?;

        Ok(vec![])
    }
}
