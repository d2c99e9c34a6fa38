use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pm_package_version_license")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub package_version_id: Uuid,
    pub license_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pm_package_version::Entity",
        from = "Column::PackageVersionId",
        to = "super::pm_package_version::Column::Id"
    )]
    PackageVersion,

    #[sea_orm(
        belongs_to = "super::pm_license::Entity",
        from = "Column::LicenseId",
        to = "super::pm_license::Column::Id"
    )]
    License,
}

impl Related<super::pm_package_version::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PackageVersion.def()
    }
}

impl Related<super::pm_license::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::License.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
