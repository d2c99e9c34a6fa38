use super::PackageMetadataTask;
use crate::{
    package_metadata::LicenseMap,
    upsert::{keep_existing, upsert},
    validation::Rejection,
    Error,
};
use sbom_ingest_common::uuid::Namespace;
use sbom_ingest_entity::{pm_package, purl_type::PurlType};
use sea_orm::{DatabaseTransaction, Set};
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

const NAMESPACE: Namespace = Namespace::from_bytes([
    0xa4, 0x1b, 0x77, 0x0d, 0x2f, 0xe6, 0x49, 0x5c, 0x96, 0x83, 0x0a, 0xd1, 0x6b, 0x3f, 0x22, 0x58,
]);

pub fn package_id(purl_type: PurlType, name: &str) -> Uuid {
    NAMESPACE.derive([purl_type.to_string().as_bytes(), name.as_bytes()])
}

/// Upserts the distinct packages of a slice.
pub struct IngestPackages;

#[async_trait::async_trait]
impl PackageMetadataTask<LicenseMap> for IngestPackages {
    fn name(&self) -> &'static str {
        "packages"
    }

    #[instrument(skip_all, fields(maps = maps.len()), err)]
    async fn execute(
        &self,
        tx: &DatabaseTransaction,
        maps: &mut [LicenseMap],
    ) -> Result<Vec<Rejection>, Error> {
        let mut packages = BTreeMap::new();

        for map in maps.iter_mut() {
            let purl_type = map.purl_type();
            let name = &map.object().name;
            let id = package_id(purl_type, name);
            packages.entry(id).or_insert_with(|| pm_package::ActiveModel {
                id: Set(id),
                purl_type: Set(purl_type),
                name: Set(name.clone()),
            });
            map.package_id = Some(id);
        }

        upsert(
            tx,
            packages.into_values().collect(),
            keep_existing(pm_package::Column::Id),
        )
        .await?;

        Ok(vec![])
    }
}
