use super::IngestionTask;
use crate::{
    model::Pipeline,
    sbom::OccurrenceMap,
    upsert::{keep_existing, upsert},
    validation::{partition, Checks, Partitioned, Rejection, Validate, Violation},
    Error,
};
use sbom_ingest_common::uuid::{optional, Namespace};
use sbom_ingest_entity::{component_type::ComponentType, purl_type::PurlType, sbom_component};
use sea_orm::{DatabaseTransaction, Set};
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

const NAMESPACE: Namespace = Namespace::from_bytes([
    0x8e, 0x34, 0x51, 0x0c, 0x6f, 0x2b, 0x4a, 0x1d, 0xb5, 0x07, 0x93, 0xe2, 0x4c, 0x19, 0xd8, 0x61,
]);

pub const MAX_NAME_LENGTH: usize = 255;

/// Id of the component identified by name, purl type and component type.
pub fn component_id(name: &str, purl_type: Option<PurlType>, component_type: ComponentType) -> Uuid {
    let purl_type = purl_type.map(|ty| ty.to_string());
    NAMESPACE.derive([
        name.as_bytes(),
        optional(purl_type.as_deref()).as_slice(),
        component_type.to_string().as_bytes(),
    ])
}

struct Candidate {
    id: Uuid,
    name: String,
    purl_type: Option<PurlType>,
    component_type: ComponentType,
    maps: Vec<usize>,
}

impl Validate for Candidate {
    const CLASS: &'static str = "Component";

    fn identity(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("name", self.name.clone()),
            ("component_type", self.component_type.to_string()),
            (
                "purl_type",
                self.purl_type.map(|ty| ty.to_string()).unwrap_or_default(),
            ),
        ])
    }

    fn violations(&self) -> Vec<Violation> {
        Checks::new()
            .present("name", &self.name)
            .max_len("name", Some(&self.name), MAX_NAME_LENGTH)
            .finish()
    }
}

/// Upserts one component per distinct name, purl type and component type.
pub struct IngestComponents;

#[async_trait::async_trait]
impl IngestionTask for IngestComponents {
    fn name(&self) -> &'static str {
        "components"
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
            let id = component_id(map.name(), map.purl_type(), map.component_type());
            candidates
                .entry(id)
                .or_insert_with(|| Candidate {
                    id,
                    name: map.name().to_string(),
                    purl_type: map.purl_type(),
                    component_type: map.component_type(),
                    maps: vec![],
                })
                .maps
                .push(index);
        }

        let Partitioned { valid, rejected } = partition(candidates.into_values());

        let models = valid
            .iter()
            .map(|candidate| sbom_component::ActiveModel {
                id: Set(candidate.id),
                name: Set(candidate.name.clone()),
                purl_type: Set(candidate.purl_type),
                component_type: Set(candidate.component_type),
            })
            .collect();

        upsert(tx, models, keep_existing(sbom_component::Column::Id)).await?;

        for candidate in valid {
            for index in candidate.maps {
                maps[index].set_component_id(candidate.id);
            }
        }

        Ok(rejected)
    }
}
