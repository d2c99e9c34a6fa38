use crate::purl_type::PurlType;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pm_affected_package")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub advisory_id: Uuid,
    pub purl_type: PurlType,
    pub package_name: String,
    pub distro_version: Option<String>,
    pub solution: Option<String>,
    pub affected_range: String,
    pub fixed_versions: Json,
    pub overridden_advisory_fields: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pm_advisory::Entity",
        from = "Column::AdvisoryId",
        to = "super::pm_advisory::Column::Id"
    )]
    Advisory,
}

impl Related<super::pm_advisory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Advisory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
