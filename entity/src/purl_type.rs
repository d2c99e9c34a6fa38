use sea_orm::{DeriveActiveEnum, EnumIter};

/// Package URL types known to the ingestion pipelines.
///
/// The numeric value doubles as the ordering rank of a component's purl type; an absent or
/// unrecognized type ranks `0`.
#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    strum::Display,
    strum::EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PurlType {
    Composer = 1,
    Conan = 2,
    Gem = 3,
    Golang = 4,
    Maven = 5,
    Npm = 6,
    Nuget = 7,
    Pypi = 8,
    Apk = 9,
    Rpm = 10,
    Deb = 11,
    #[serde(rename = "cbl-mariner")]
    #[strum(serialize = "cbl-mariner")]
    CblMariner = 12,
    Wolfi = 13,
    Cargo = 14,
    Swift = 15,
    Conda = 16,
}

impl PurlType {
    pub fn rank(value: Option<Self>) -> u8 {
        match value {
            Some(ty) => ty as u8,
            None => 0,
        }
    }
}
