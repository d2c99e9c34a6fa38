use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SbomComponent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SbomComponent::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SbomComponent::Name).string().not_null())
                    .col(ColumnDef::new(SbomComponent::PurlType).integer())
                    .col(
                        ColumnDef::new(SbomComponent::ComponentType)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("sbom_component_natural_key")
                    .table(SbomComponent::Table)
                    .unique()
                    .if_not_exists()
                    .col(SbomComponent::Name)
                    .col(SbomComponent::PurlType)
                    .col(SbomComponent::ComponentType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SbomComponentVersion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SbomComponentVersion::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SbomComponentVersion::ComponentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SbomComponentVersion::Version)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sbom_component_version_component_id")
                            .from(SbomComponentVersion::Table, SbomComponentVersion::ComponentId)
                            .to(SbomComponent::Table, SbomComponent::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("sbom_component_version_natural_key")
                    .table(SbomComponentVersion::Table)
                    .unique()
                    .if_not_exists()
                    .col(SbomComponentVersion::ComponentId)
                    .col(SbomComponentVersion::Version)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SbomSource::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SbomSource::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SbomSource::SourceType).integer().not_null())
                    .col(ColumnDef::new(SbomSource::Fingerprint).string().not_null())
                    .col(ColumnDef::new(SbomSource::Source).json().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("sbom_source_natural_key")
                    .table(SbomSource::Table)
                    .unique()
                    .if_not_exists()
                    .col(SbomSource::SourceType)
                    .col(SbomSource::Fingerprint)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SbomOccurrence::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SbomOccurrence::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SbomOccurrence::ProjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SbomOccurrence::PipelineId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SbomOccurrence::CommitSha).string().not_null())
                    .col(ColumnDef::new(SbomOccurrence::ComponentId).uuid().not_null())
                    .col(ColumnDef::new(SbomOccurrence::ComponentVersionId).uuid())
                    .col(ColumnDef::new(SbomOccurrence::SourceId).uuid())
                    .col(
                        ColumnDef::new(SbomOccurrence::ComponentName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SbomOccurrence::PackageManager).string())
                    .col(ColumnDef::new(SbomOccurrence::InputFilePath).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sbom_occurrence_component_id")
                            .from(SbomOccurrence::Table, SbomOccurrence::ComponentId)
                            .to(SbomComponent::Table, SbomComponent::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sbom_occurrence_component_version_id")
                            .from(SbomOccurrence::Table, SbomOccurrence::ComponentVersionId)
                            .to(SbomComponentVersion::Table, SbomComponentVersion::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sbom_occurrence_source_id")
                            .from(SbomOccurrence::Table, SbomOccurrence::SourceId)
                            .to(SbomSource::Table, SbomSource::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // deletion reconciliation walks a project's occurrences in id order
        manager
            .create_index(
                Index::create()
                    .name("sbom_occurrence_project_id")
                    .table(SbomOccurrence::Table)
                    .if_not_exists()
                    .col(SbomOccurrence::ProjectId)
                    .col(SbomOccurrence::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SbomOccurrence::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SbomSource::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SbomComponentVersion::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SbomComponent::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum SbomComponent {
    Table,
    Id,
    Name,
    PurlType,
    ComponentType,
}

#[derive(DeriveIden)]
pub enum SbomComponentVersion {
    Table,
    Id,
    ComponentId,
    Version,
}

#[derive(DeriveIden)]
pub enum SbomSource {
    Table,
    Id,
    SourceType,
    Fingerprint,
    Source,
}

#[derive(DeriveIden)]
pub enum SbomOccurrence {
    Table,
    Id,
    ProjectId,
    PipelineId,
    CommitSha,
    ComponentId,
    ComponentVersionId,
    SourceId,
    ComponentName,
    PackageManager,
    InputFilePath,
}
