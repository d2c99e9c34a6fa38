use super::PackageMetadataTask;
use crate::{
    package_metadata::LicenseMap,
    upsert::{keep_existing, upsert},
    validation::Rejection,
    Error,
};
use sbom_ingest_common::uuid::Namespace;
use sbom_ingest_entity::pm_license;
use sea_orm::{DatabaseTransaction, Set};
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

const NAMESPACE: Namespace = Namespace::from_bytes([
    0x3c, 0x05, 0xe8, 0x7a, 0x91, 0x6d, 0x4b, 0x20, 0x8f, 0x14, 0xa6, 0x3e, 0xc2, 0x58, 0x0b, 0x97,
]);

pub fn license_id(spdx_identifier: &str) -> Uuid {
    NAMESPACE.derive([spdx_identifier])
}

/// Upserts the distinct licenses of a slice.
pub struct IngestLicenses;

#[async_trait::async_trait]
impl PackageMetadataTask<LicenseMap> for IngestLicenses {
    fn name(&self) -> &'static str {
        "licenses"
    }

    #[instrument(skip_all, fields(maps = maps.len()), err)]
    async fn execute(
        &self,
        tx: &DatabaseTransaction,
        maps: &mut [LicenseMap],
    ) -> Result<Vec<Rejection>, Error> {
        let mut licenses = BTreeMap::new();

        for map in maps.iter_mut() {
            let spdx_identifier = &map.object().license;
            let id = license_id(spdx_identifier);
            licenses.entry(id).or_insert_with(|| pm_license::ActiveModel {
                id: Set(id),
                spdx_identifier: Set(spdx_identifier.clone()),
            });
            map.license_id = Some(id);
        }

        upsert(
            tx,
            licenses.into_values().collect(),
            keep_existing(pm_license::Column::Id),
        )
        .await?;

        Ok(vec![])
    }
}
