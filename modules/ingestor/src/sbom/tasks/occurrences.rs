use super::IngestionTask;
use crate::{
    model::Pipeline,
    sbom::OccurrenceMap,
    upsert::{update, upsert},
    validation::{partition, Checks, Partitioned, Rejection, Validate, Violation},
    Error,
};
use sbom_ingest_common::uuid::{optional, Namespace};
use sbom_ingest_entity::sbom_occurrence;
use sea_orm::{DatabaseTransaction, Set};
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

const NAMESPACE: Namespace = Namespace::from_bytes([
    0x62, 0x4b, 0xf0, 0x1e, 0x9d, 0x35, 0x47, 0xa8, 0x93, 0xcc, 0x2e, 0x70, 0x5b, 0x16, 0x8a, 0xef,
]);

pub const MAX_INPUT_FILE_PATH_LENGTH: usize = 1024;

/// Id of the occurrence of a component (version) from a source, within a project.
pub fn occurrence_id(
    project_id: i64,
    component_id: Uuid,
    component_version_id: Option<Uuid>,
    source_id: Option<Uuid>,
) -> Uuid {
    NAMESPACE.derive([
        project_id.to_be_bytes().as_slice(),
        component_id.as_bytes().as_slice(),
        optional(component_version_id.as_ref().map(Uuid::as_bytes)).as_slice(),
        optional(source_id.as_ref().map(Uuid::as_bytes)).as_slice(),
    ])
}

struct Candidate {
    model: sbom_occurrence::Model,
    maps: Vec<usize>,
}

impl Validate for Candidate {
    const CLASS: &'static str = "Occurrence";

    fn identity(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("project_id", self.model.project_id.to_string()),
            ("component_name", self.model.component_name.clone()),
            (
                "input_file_path",
                self.model.input_file_path.clone().unwrap_or_default(),
            ),
        ])
    }

    fn violations(&self) -> Vec<Violation> {
        Checks::new()
            .present("commit_sha", &self.model.commit_sha)
            .max_len(
                "input_file_path",
                self.model.input_file_path.as_deref(),
                MAX_INPUT_FILE_PATH_LENGTH,
            )
            .finish()
    }
}

/// Upserts the occurrences of a slice, attributing them to the pipeline.
///
/// Only maps with all their required upstream ids assigned are considered. An existing
/// occurrence is moved to the pipeline which reported it last.
pub struct IngestOccurrences;

#[async_trait::async_trait]
impl IngestionTask for IngestOccurrences {
    fn name(&self) -> &'static str {
        "occurrences"
    }

    #[instrument(skip_all, fields(pipeline = pipeline.id, maps = maps.len()), err)]
    async fn execute(
        &self,
        tx: &DatabaseTransaction,
        pipeline: &Pipeline,
        maps: &mut [OccurrenceMap],
    ) -> Result<Vec<Rejection>, Error> {
        let mut candidates = BTreeMap::<Uuid, Candidate>::new();
        let mut incomplete = 0usize;

        for (index, map) in maps.iter().enumerate() {
            let Some(component_id) = map.component_id().filter(|_| map.is_ready_for_occurrence())
            else {
                incomplete += 1;
                continue;
            };

            let id = occurrence_id(
                pipeline.project_id,
                component_id,
                map.component_version_id(),
                map.source_id(),
            );
            candidates
                .entry(id)
                .or_insert_with(|| Candidate {
                    model: sbom_occurrence::Model {
                        id,
                        project_id: pipeline.project_id,
                        pipeline_id: pipeline.id,
                        commit_sha: pipeline.sha.clone(),
                        component_id,
                        component_version_id: map.component_version_id(),
                        source_id: map.source_id(),
                        component_name: map.name().to_string(),
                        package_manager: map.package_manager().map(Into::into),
                        input_file_path: map.input_file_path(),
                    },
                    maps: vec![],
                })
                .maps
                .push(index);
        }

        if incomplete > 0 {
            log::debug!("skipping {incomplete} maps with unresolved references");
        }

        let Partitioned { valid, rejected } = partition(candidates.into_values());

        let models = valid
            .iter()
            .map(|candidate| {
                let model = candidate.model.clone();
                sbom_occurrence::ActiveModel {
                    id: Set(model.id),
                    project_id: Set(model.project_id),
                    pipeline_id: Set(model.pipeline_id),
                    commit_sha: Set(model.commit_sha),
                    component_id: Set(model.component_id),
                    component_version_id: Set(model.component_version_id),
                    source_id: Set(model.source_id),
                    component_name: Set(model.component_name),
                    package_manager: Set(model.package_manager),
                    input_file_path: Set(model.input_file_path),
                }
            })
            .collect();

        upsert(
            tx,
            models,
            update(
                sbom_occurrence::Column::Id,
                [
                    sbom_occurrence::Column::PipelineId,
                    sbom_occurrence::Column::CommitSha,
                    sbom_occurrence::Column::PackageManager,
                    sbom_occurrence::Column::InputFilePath,
                    sbom_occurrence::Column::ComponentName,
                ],
            ),
        )
        .await?;

        for candidate in valid {
            for index in candidate.maps {
                maps[index].set_occurrence_id(candidate.model.id);
            }
        }

        Ok(rejected)
    }
}
