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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ComponentType {
    #[sea_orm(num_value = 0)]
    Library,
    #[sea_orm(num_value = 1)]
    Application,
    #[sea_orm(num_value = 2)]
    Framework,
    #[sea_orm(num_value = 3)]
    Container,
    #[sea_orm(num_value = 4)]
    OperatingSystem,
    #[sea_orm(num_value = 5)]
    Device,
    #[sea_orm(num_value = 6)]
    Firmware,
    #[sea_orm(num_value = 7)]
    File,
    #[serde(other)]
    #[sea_orm(num_value = 99)]
    Unknown,
}

impl ComponentType {
    /// Ordering rank used when sorting report components. Unknown types rank lowest.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Library => 1,
            Self::Application => 2,
            Self::Framework => 3,
            Self::Container => 4,
            Self::OperatingSystem => 5,
            Self::Device => 6,
            Self::Firmware => 7,
            Self::File => 8,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(ComponentType::OperatingSystem.to_string(), "operating-system");
        assert_eq!(
            serde_json::from_str::<ComponentType>(r#""library""#).unwrap(),
            ComponentType::Library
        );
        assert_eq!(
            serde_json::from_str::<ComponentType>(r#""widget""#).unwrap(),
            ComponentType::Unknown
        );
    }

    #[test]
    fn unknown_ranks_lowest() {
        assert!(ComponentType::Unknown.rank() < ComponentType::Library.rank());
    }
}
