use super::PackageMetadataTask;
use crate::{
    package_metadata::{AdvisoryDataObject, AdvisoryMap},
    upsert::{update, upsert},
    validation::{partition, Partitioned, Rejection, Validate, Violation},
    Error,
};
use sbom_ingest_common::uuid::Namespace;
use sbom_ingest_entity::pm_advisory;
use sea_orm::{DatabaseTransaction, Set};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

const NAMESPACE: Namespace = Namespace::from_bytes([
    0x0c, 0x8d, 0x4f, 0xb2, 0x73, 0x19, 0x46, 0xe5, 0x9f, 0x60, 0xd7, 0x2a, 0x84, 0x3b, 0xc1, 0x5e,
]);

pub fn advisory_id(advisory_xid: &str, source_xid: &str) -> Uuid {
    NAMESPACE.derive([advisory_xid, source_xid])
}

/// Upserts the advisories of a slice, refreshing their descriptive columns.
pub struct IngestAdvisories;

#[async_trait::async_trait]
impl PackageMetadataTask<AdvisoryMap> for IngestAdvisories {
    fn name(&self) -> &'static str {
        "advisories"
    }

    #[instrument(skip_all, fields(maps = maps.len()), err)]
    async fn execute(
        &self,
        tx: &DatabaseTransaction,
        maps: &mut [AdvisoryMap],
    ) -> Result<Vec<Rejection>, Error> {
        let Partitioned { valid, rejected } =
            partition(maps.iter_mut().map(Candidate));

        let mut advisories = BTreeMap::new();
        for Candidate(map) in valid {
            let object = map.object();
            let id = advisory_id(&object.advisory_xid, &object.source_xid);
            // the last occurrence of an advisory in a slice wins
            advisories.insert(
                id,
                pm_advisory::ActiveModel {
                    id: Set(id),
                    advisory_xid: Set(object.advisory_xid.clone()),
                    source_xid: Set(object.source_xid.clone()),
                    published_date: Set(object.published_date),
                    title: Set(object.title.clone()),
                    description: Set(object.description.clone()),
                    cvss_v2: Set(object.cvss_v2.clone()),
                    cvss_v3: Set(object.cvss_v3.clone()),
                    urls: Set(Value::from(object.urls.clone())),
                    identifiers: Set(Value::from(object.identifiers.clone())),
                },
            );
            map.advisory_id = Some(id);
        }

        upsert(
            tx,
            advisories.into_values().collect(),
            update(
                pm_advisory::Column::Id,
                [
                    pm_advisory::Column::PublishedDate,
                    pm_advisory::Column::Title,
                    pm_advisory::Column::Description,
                    pm_advisory::Column::CvssV2,
                    pm_advisory::Column::CvssV3,
                    pm_advisory::Column::Urls,
                    pm_advisory::Column::Identifiers,
                ],
            ),
        )
        .await?;

        Ok(rejected)
    }
}

struct Candidate<'m>(&'m mut AdvisoryMap);

impl Validate for Candidate<'_> {
    const CLASS: &'static str = AdvisoryDataObject::CLASS;

    fn identity(&self) -> BTreeMap<&'static str, String> {
        self.0.object().identity()
    }

    fn violations(&self) -> Vec<Violation> {
        self.0.object().violations()
    }
}
