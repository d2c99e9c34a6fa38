use super::PackageMetadataTask;
use crate::{
    package_metadata::{AdvisoryMap, AffectedPackage},
    upsert::{update, upsert},
    validation::{partition, Partitioned, Rejection, Validate, Violation},
    Error,
};
use sbom_ingest_common::uuid::{optional, Namespace};
use sbom_ingest_entity::{pm_affected_package, purl_type::PurlType};
use sea_orm::{DatabaseTransaction, Set};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

const NAMESPACE: Namespace = Namespace::from_bytes([
    0x9b, 0x26, 0x11, 0xf7, 0x6a, 0x40, 0x4c, 0x83, 0xa1, 0x5d, 0xe9, 0x32, 0x0f, 0x77, 0xb8, 0x4c,
]);

pub fn affected_package_id(
    advisory_id: Uuid,
    purl_type: PurlType,
    package_name: &str,
    distro_version: Option<&str>,
) -> Uuid {
    NAMESPACE.derive([
        advisory_id.as_bytes().as_slice(),
        purl_type.to_string().as_bytes(),
        package_name.as_bytes(),
        optional(distro_version).as_slice(),
    ])
}

struct Candidate<'a> {
    map: usize,
    advisory_id: Uuid,
    package: &'a AffectedPackage,
}

impl Validate for Candidate<'_> {
    const CLASS: &'static str = AffectedPackage::CLASS;

    fn identity(&self) -> BTreeMap<&'static str, String> {
        let mut identity = self.package.identity();
        identity.insert("advisory_id", self.advisory_id.to_string());
        identity
    }

    fn violations(&self) -> Vec<Violation> {
        self.package.violations()
    }
}

/// Upserts the packages affected by the advisories of a slice.
///
/// Packages of advisories which were not persisted are skipped.
pub struct IngestAffectedPackages;

#[async_trait::async_trait]
impl PackageMetadataTask<AdvisoryMap> for IngestAffectedPackages {
    fn name(&self) -> &'static str {
        "affected_packages"
    }

    #[instrument(skip_all, fields(maps = maps.len()), err)]
    async fn execute(
        &self,
        tx: &DatabaseTransaction,
        maps: &mut [AdvisoryMap],
    ) -> Result<Vec<Rejection>, Error> {
        let candidates = maps.iter().enumerate().flat_map(|(index, map)| {
            map.advisory_id().into_iter().flat_map(move |advisory_id| {
                map.object()
                    .affected_packages
                    .iter()
                    .map(move |package| Candidate {
                        map: index,
                        advisory_id,
                        package,
                    })
            })
        });

        let Partitioned { valid, rejected } = partition(candidates);

        let mut models = BTreeMap::new();
        let mut assigned = Vec::with_capacity(valid.len());

        for Candidate {
            map,
            advisory_id,
            package,
        } in valid
        {
            let Some(purl_type) = package.parsed_purl_type() else {
                continue;
            };
            let id = affected_package_id(
                advisory_id,
                purl_type,
                &package.package_name,
                package.distro_version.as_deref(),
            );
            models.insert(
                id,
                pm_affected_package::ActiveModel {
                    id: Set(id),
                    advisory_id: Set(advisory_id),
                    purl_type: Set(purl_type),
                    package_name: Set(package.package_name.clone()),
                    distro_version: Set(package.distro_version.clone()),
                    solution: Set(package.solution.clone()),
                    affected_range: Set(package.affected_range.clone()),
                    fixed_versions: Set(Value::from(package.fixed_versions.clone())),
                    overridden_advisory_fields: Set(package.overridden_advisory_fields.clone()),
                },
            );
            assigned.push((map, id));
        }

        upsert(
            tx,
            models.into_values().collect(),
            update(
                pm_affected_package::Column::Id,
                [
                    pm_affected_package::Column::Solution,
                    pm_affected_package::Column::AffectedRange,
                    pm_affected_package::Column::FixedVersions,
                    pm_affected_package::Column::OverriddenAdvisoryFields,
                ],
            ),
        )
        .await?;

        for (map, id) in assigned {
            maps[map].affected_package_ids.push(id);
        }

        Ok(rejected)
    }
}
