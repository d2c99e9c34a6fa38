use crate::{
    validation::{Checks, Validate, Violation},
    Error,
};
use sbom_ingest_entity::purl_type::PurlType;
use std::{collections::BTreeMap, io::Read, str::FromStr};

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_VERSION_LENGTH: usize = 255;
pub const MAX_LICENSE_LENGTH: usize = 50;

/// The license of one version of a package.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DataObject {
    pub purl_type: String,
    pub name: String,
    pub version: String,
    /// SPDX identifier of the license
    pub license: String,
}

impl DataObject {
    pub fn new(
        purl_type: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        license: impl Into<String>,
    ) -> Self {
        Self {
            purl_type: purl_type.into(),
            name: name.into(),
            version: version.into(),
            license: license.into(),
        }
    }

    /// Read data objects of one purl type, from CSV lines of `name,version,license`.
    ///
    /// Missing fields read as empty, leaving it to validation to reject the object.
    pub fn from_csv<R: Read>(purl_type: &str, reader: R) -> Result<Vec<Self>, Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut result = vec![];
        for record in reader.records() {
            let record = record?;
            let field = |n: usize| record.get(n).unwrap_or_default().to_string();
            result.push(Self::new(purl_type, field(0), field(1), field(2)));
        }

        Ok(result)
    }

    pub fn parsed_purl_type(&self) -> Option<PurlType> {
        PurlType::from_str(&self.purl_type).ok()
    }
}

impl Validate for DataObject {
    const CLASS: &'static str = "PackageMetadata::DataObject";

    fn identity(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("purl_type", self.purl_type.clone()),
            ("name", self.name.clone()),
            ("version", self.version.clone()),
        ])
    }

    fn violations(&self) -> Vec<Violation> {
        let mut checks = Checks::new()
            .present("name", &self.name)
            .max_len("name", Some(&self.name), MAX_NAME_LENGTH)
            .present("version", &self.version)
            .max_len("version", Some(&self.version), MAX_VERSION_LENGTH)
            .present("license", &self.license)
            .max_len("license", Some(&self.license), MAX_LICENSE_LENGTH);

        if self.parsed_purl_type().is_none() {
            checks = checks.invalid("purl_type", format!("unknown purl type '{}'", self.purl_type));
        }

        checks.finish()
    }
}
