use sea_orm::entity::prelude::*;

/// One component observed in a project, attributed to the pipeline that last reported it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sbom_occurrence")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: i64,
    pub pipeline_id: i64,
    pub commit_sha: String,
    pub component_id: Uuid,
    pub component_version_id: Option<Uuid>,
    pub source_id: Option<Uuid>,
    pub component_name: String,
    pub package_manager: Option<String>,
    pub input_file_path: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sbom_component::Entity",
        from = "Column::ComponentId",
        to = "super::sbom_component::Column::Id"
    )]
    Component,

    #[sea_orm(
        belongs_to = "super::sbom_component_version::Entity",
        from = "Column::ComponentVersionId",
        to = "super::sbom_component_version::Column::Id"
    )]
    ComponentVersion,

    #[sea_orm(
        belongs_to = "super::sbom_source::Entity",
        from = "Column::SourceId",
        to = "super::sbom_source::Column::Id"
    )]
    Source,
}

impl Related<super::sbom_component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Component.def()
    }
}

impl Related<super::sbom_component_version::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComponentVersion.def()
    }
}

impl Related<super::sbom_source::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Source.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
