use super::IngestionTask;
use crate::{
    model::Pipeline,
    sbom::OccurrenceMap,
    upsert::{keep_existing, upsert},
    validation::{partition, Checks, Partitioned, Rejection, Validate, Violation},
    Error,
};
use sbom_ingest_common::uuid::Namespace;
use sbom_ingest_entity::sbom_component_version;
use sea_orm::{DatabaseTransaction, Set};
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

const NAMESPACE: Namespace = Namespace::from_bytes([
    0x1f, 0xa9, 0x6d, 0x42, 0x0b, 0x87, 0x4e, 0x35, 0x8c, 0x2a, 0x71, 0x5f, 0xe0, 0x93, 0x3b, 0xc4,
]);

pub const MAX_VERSION_LENGTH: usize = 255;

pub fn component_version_id(component_id: Uuid, version: &str) -> Uuid {
    NAMESPACE.derive([component_id.as_bytes().as_slice(), version.as_bytes()])
}

struct Candidate {
    id: Uuid,
    component_id: Uuid,
    version: String,
    maps: Vec<usize>,
}

impl Validate for Candidate {
    const CLASS: &'static str = "ComponentVersion";

    fn identity(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("component_id", self.component_id.to_string()),
            ("version", self.version.clone()),
        ])
    }

    fn violations(&self) -> Vec<Violation> {
        Checks::new()
            .max_len("version", Some(&self.version), MAX_VERSION_LENGTH)
            .finish()
    }
}

/// Upserts the reported versions of the components of a slice.
///
/// Maps without a version, or without a component, are skipped.
pub struct IngestComponentVersions;

#[async_trait::async_trait]
impl IngestionTask for IngestComponentVersions {
    fn name(&self) -> &'static str {
        "component_versions"
    }

    #[instrument(skip_all, fields(maps = maps.len()), err)]
    async fn execute(
        &self,
        tx: &DatabaseTransaction,
        _pipeline: &Pipeline,
        maps: &mut [OccurrenceMap],
    ) -> Result<Vec<Rejection>, Error> {
        let mut candidates = BTreeMap::<Uuid, Candidate>::new();

        for (index, map) in maps.iter().enumerate() {
            if !map.version_present() {
                continue;
            }
            let (Some(component_id), Some(version)) = (map.component_id(), map.version()) else {
                continue;
            };

            let id = component_version_id(component_id, version);
            candidates
                .entry(id)
                .or_insert_with(|| Candidate {
                    id,
                    component_id,
                    version: version.to_string(),
                    maps: vec![],
                })
                .maps
                .push(index);
        }

        let Partitioned { valid, rejected } = partition(candidates.into_values());

        let models = valid
            .iter()
            .map(|candidate| sbom_component_version::ActiveModel {
                id: Set(candidate.id),
                component_id: Set(candidate.component_id),
                version: Set(candidate.version.clone()),
            })
            .collect();

        upsert(tx, models, keep_existing(sbom_component_version::Column::Id)).await?;

        for candidate in valid {
            for index in candidate.maps {
                maps[index].set_component_version_id(candidate.id);
            }
        }

        Ok(rejected)
    }
}
