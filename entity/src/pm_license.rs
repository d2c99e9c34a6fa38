use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pm_license")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub spdx_identifier: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pm_package_version_license::Entity")]
    PackageVersionLicenses,
}

impl Related<super::pm_package_version_license::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PackageVersionLicenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
