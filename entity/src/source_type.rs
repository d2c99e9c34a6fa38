use sea_orm::{DeriveActiveEnum, EnumIter};

#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    strum::Display,
    strum::EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceType {
    #[sea_orm(num_value = 0)]
    DependencyScanning,
    #[sea_orm(num_value = 1)]
    ContainerScanning,
    #[sea_orm(num_value = 2)]
    ContainerScanningForRegistry,
}

impl SourceType {
    pub fn is_container_scanning(&self) -> bool {
        matches!(
            self,
            Self::ContainerScanning | Self::ContainerScanningForRegistry
        )
    }
}
