use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PmLicense::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PmLicense::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(PmLicense::SpdxIdentifier)
                            .string_len(50)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("pm_license_spdx_identifier")
                    .table(PmLicense::Table)
                    .unique()
                    .if_not_exists()
                    .col(PmLicense::SpdxIdentifier)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PmPackage::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PmPackage::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PmPackage::PurlType).integer().not_null())
                    .col(ColumnDef::new(PmPackage::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("pm_package_natural_key")
                    .table(PmPackage::Table)
                    .unique()
                    .if_not_exists()
                    .col(PmPackage::PurlType)
                    .col(PmPackage::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PmPackageVersion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PmPackageVersion::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PmPackageVersion::PackageId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PmPackageVersion::Version)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pm_package_version_package_id")
                            .from(PmPackageVersion::Table, PmPackageVersion::PackageId)
                            .to(PmPackage::Table, PmPackage::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("pm_package_version_natural_key")
                    .table(PmPackageVersion::Table)
                    .unique()
                    .if_not_exists()
                    .col(PmPackageVersion::PackageId)
                    .col(PmPackageVersion::Version)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PmPackageVersionLicense::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PmPackageVersionLicense::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PmPackageVersionLicense::PackageVersionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PmPackageVersionLicense::LicenseId)
                            .uuid()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pm_package_version_license_package_version_id")
                            .from(
                                PmPackageVersionLicense::Table,
                                PmPackageVersionLicense::PackageVersionId,
                            )
                            .to(PmPackageVersion::Table, PmPackageVersion::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pm_package_version_license_license_id")
                            .from(
                                PmPackageVersionLicense::Table,
                                PmPackageVersionLicense::LicenseId,
                            )
                            .to(PmLicense::Table, PmLicense::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("pm_package_version_license_natural_key")
                    .table(PmPackageVersionLicense::Table)
                    .unique()
                    .if_not_exists()
                    .col(PmPackageVersionLicense::PackageVersionId)
                    .col(PmPackageVersionLicense::LicenseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(PmPackageVersionLicense::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(PmPackageVersion::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PmPackage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PmLicense::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum PmLicense {
    Table,
    Id,
    SpdxIdentifier,
}

#[derive(DeriveIden)]
pub enum PmPackage {
    Table,
    Id,
    PurlType,
    Name,
}

#[derive(DeriveIden)]
pub enum PmPackageVersion {
    Table,
    Id,
    PackageId,
    Version,
}

#[derive(DeriveIden)]
pub enum PmPackageVersionLicense {
    Table,
    Id,
    PackageVersionId,
    LicenseId,
}
