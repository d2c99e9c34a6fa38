use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pm_advisory")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub advisory_xid: String,
    pub source_xid: String,
    pub published_date: TimeDate,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cvss_v2: Option<String>,
    pub cvss_v3: Option<String>,
    pub urls: Json,
    pub identifiers: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pm_affected_package::Entity")]
    AffectedPackages,
}

impl Related<super::pm_affected_package::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AffectedPackages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
