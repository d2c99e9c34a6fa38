pub use sea_orm_migration::prelude::*;

mod m0000010_create_sbom;
mod m0000020_create_package_metadata;
mod m0000030_create_advisory;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m0000010_create_sbom::Migration),
            Box::new(m0000020_create_package_metadata::Migration),
            Box::new(m0000030_create_advisory::Migration),
        ]
    }
}
