use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pm_package_version")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub package_id: Uuid,
    pub version: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pm_package::Entity",
        from = "Column::PackageId",
        to = "super::pm_package::Column::Id"
    )]
    Package,

    #[sea_orm(has_many = "super::pm_package_version_license::Entity")]
    Licenses,
}

impl Related<super::pm_package::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Package.def()
    }
}

impl Related<super::pm_license::Entity> for Entity {
    fn to() -> RelationDef {
        super::pm_package_version_license::Relation::License.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::pm_package_version_license::Relation::PackageVersion.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
