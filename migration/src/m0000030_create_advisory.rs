use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PmAdvisory::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PmAdvisory::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(PmAdvisory::AdvisoryXid)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PmAdvisory::SourceXid).string().not_null())
                    .col(ColumnDef::new(PmAdvisory::PublishedDate).date().not_null())
                    .col(ColumnDef::new(PmAdvisory::Title).string_len(256))
                    .col(ColumnDef::new(PmAdvisory::Description).text())
                    .col(ColumnDef::new(PmAdvisory::CvssV2).string_len(128))
                    .col(ColumnDef::new(PmAdvisory::CvssV3).string_len(128))
                    .col(ColumnDef::new(PmAdvisory::Urls).json().not_null())
                    .col(ColumnDef::new(PmAdvisory::Identifiers).json().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("pm_advisory_natural_key")
                    .table(PmAdvisory::Table)
                    .unique()
                    .if_not_exists()
                    .col(PmAdvisory::AdvisoryXid)
                    .col(PmAdvisory::SourceXid)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PmAffectedPackage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PmAffectedPackage::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PmAffectedPackage::AdvisoryId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PmAffectedPackage::PurlType)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PmAffectedPackage::PackageName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PmAffectedPackage::DistroVersion).string())
                    .col(ColumnDef::new(PmAffectedPackage::Solution).text())
                    .col(
                        ColumnDef::new(PmAffectedPackage::AffectedRange)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PmAffectedPackage::FixedVersions)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PmAffectedPackage::OverriddenAdvisoryFields)
                            .json()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pm_affected_package_advisory_id")
                            .from(PmAffectedPackage::Table, PmAffectedPackage::AdvisoryId)
                            .to(PmAdvisory::Table, PmAdvisory::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("pm_affected_package_natural_key")
                    .table(PmAffectedPackage::Table)
                    .unique()
                    .if_not_exists()
                    .col(PmAffectedPackage::AdvisoryId)
                    .col(PmAffectedPackage::PurlType)
                    .col(PmAffectedPackage::PackageName)
                    .col(PmAffectedPackage::DistroVersion)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PmAffectedPackage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PmAdvisory::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum PmAdvisory {
    Table,
    Id,
    AdvisoryXid,
    SourceXid,
    PublishedDate,
    Title,
    Description,
    CvssV2,
    CvssV3,
    Urls,
    Identifiers,
}

#[derive(DeriveIden)]
pub enum PmAffectedPackage {
    Table,
    Id,
    AdvisoryId,
    PurlType,
    PackageName,
    DistroVersion,
    Solution,
    AffectedRange,
    FixedVersions,
    OverriddenAdvisoryFields,
}
