use super::IngestionTask;
use crate::{
    model::Pipeline,
    sbom::OccurrenceMap,
    upsert::{keep_existing, upsert},
    validation::{partition, Checks, Partitioned, Rejection, Validate, Violation},
    Error,
};
use sbom_ingest_common::uuid::Namespace;
use sbom_ingest_entity::{sbom_source, source_type::SourceType};
use sea_orm::{DatabaseTransaction, Set};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

const NAMESPACE: Namespace = Namespace::from_bytes([
    0xd3, 0x70, 0x0e, 0x9b, 0x54, 0xc1, 0x43, 0x8f, 0xa2, 0x6e, 0x18, 0xbd, 0x07, 0x5a, 0xf4, 0x29,
]);

pub fn source_id(source_type: SourceType, fingerprint: &str) -> Uuid {
    NAMESPACE.derive([source_type.to_string().as_bytes(), fingerprint.as_bytes()])
}

struct Candidate {
    id: Uuid,
    source_type: SourceType,
    fingerprint: String,
    data: Value,
    maps: Vec<usize>,
}

impl Validate for Candidate {
    const CLASS: &'static str = "Source";

    fn identity(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("source_type", self.source_type.to_string()),
            ("fingerprint", self.fingerprint.clone()),
        ])
    }

    fn violations(&self) -> Vec<Violation> {
        let checks = Checks::new();
        if self.data.is_object() {
            checks.finish()
        } else {
            checks.invalid("source", "must be a JSON object").finish()
        }
    }
}

/// Upserts the sources the components of a slice were reported from.
pub struct IngestSources;

#[async_trait::async_trait]
impl IngestionTask for IngestSources {
    fn name(&self) -> &'static str {
        "sources"
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
            let Some(source) = map.report_source() else {
                continue;
            };

            let fingerprint = source.fingerprint();
            let id = source_id(source.source_type, &fingerprint);
            candidates
                .entry(id)
                .or_insert_with(|| Candidate {
                    id,
                    source_type: source.source_type,
                    fingerprint,
                    data: source.data.clone(),
                    maps: vec![],
                })
                .maps
                .push(index);
        }

        let Partitioned { valid, rejected } = partition(candidates.into_values());

        let models = valid
            .iter()
            .map(|candidate| sbom_source::ActiveModel {
                id: Set(candidate.id),
                source_type: Set(candidate.source_type),
                fingerprint: Set(candidate.fingerprint.clone()),
                source: Set(candidate.data.clone()),
            })
            .collect();

        upsert(tx, models, keep_existing(sbom_source::Column::Id)).await?;

        for candidate in valid {
            for index in candidate.maps {
                maps[index].set_source_id(candidate.id);
            }
        }

        Ok(rejected)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sbom_ingest_common::hashing::fingerprint;
    use serde_json::json;

    #[test]
    fn equal_sources_share_an_id() {
        let a = json!({"input_file": {"path": "Gemfile.lock"}, "package_manager": {"name": "bundler"}});
        let b = json!({"package_manager": {"name": "bundler"}, "input_file": {"path": "Gemfile.lock"}});

        assert_eq!(
            source_id(SourceType::DependencyScanning, &fingerprint(&a)),
            source_id(SourceType::DependencyScanning, &fingerprint(&b)),
        );
        assert_ne!(
            source_id(SourceType::DependencyScanning, &fingerprint(&a)),
            source_id(SourceType::ContainerScanning, &fingerprint(&a)),
        );
    }
}
