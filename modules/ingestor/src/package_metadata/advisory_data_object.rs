use crate::{
    validation::{Checks, Partitioned, Rejection, Validate, Violation},
    Error,
};
use sbom_ingest_entity::purl_type::PurlType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, io::Read, str::FromStr};
use time::Date;

pub const MAX_XID_LENGTH: usize = 36;
pub const MAX_TITLE_LENGTH: usize = 256;
pub const MAX_DESCRIPTION_LENGTH: usize = 8192;
pub const MAX_CVSS_LENGTH: usize = 128;
pub const MAX_PACKAGE_NAME_LENGTH: usize = 256;
pub const MAX_AFFECTED_RANGE_LENGTH: usize = 512;
pub const MAX_SOLUTION_LENGTH: usize = 2048;

/// A security advisory, with the packages it affects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryDataObject {
    pub advisory_xid: String,
    pub source_xid: String,
    #[serde(with = "date")]
    pub published_date: Date,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cvss_v2: Option<String>,
    #[serde(default)]
    pub cvss_v3: Option<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub identifiers: Vec<Value>,
    #[serde(default)]
    pub affected_packages: Vec<AffectedPackage>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffectedPackage {
    pub purl_type: String,
    pub package_name: String,
    #[serde(default)]
    pub distro_version: Option<String>,
    #[serde(default)]
    pub solution: Option<String>,
    pub affected_range: String,
    #[serde(default)]
    pub fixed_versions: Vec<String>,
    #[serde(default = "empty_object")]
    pub overridden_advisory_fields: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

impl AdvisoryDataObject {
    /// Read advisories from newline delimited JSON.
    ///
    /// An entry which is valid JSON, but not an advisory, is rejected and the remaining entries
    /// are still read. Input which is not JSON at all fails the whole read.
    pub fn from_ndjson<R: Read>(reader: R) -> Result<Partitioned<Self>, Error> {
        let mut result = Partitioned::default();

        for value in serde_json::Deserializer::from_reader(reader).into_iter::<Value>() {
            let value = value?;
            let identity = Self::raw_identity(&value);

            match serde_json::from_value::<Self>(value) {
                Ok(advisory) => result.valid.push(advisory),
                Err(err) => result.rejected.push(Rejection::unreadable(
                    Self::CLASS,
                    identity,
                    "advisory",
                    err.to_string(),
                )),
            }
        }

        Ok(result)
    }

    /// Whatever identifying fields an unreadable entry carries.
    fn raw_identity(value: &Value) -> BTreeMap<&'static str, String> {
        ["advisory_xid", "source_xid"]
            .into_iter()
            .filter_map(|field| {
                value
                    .get(field)
                    .and_then(Value::as_str)
                    .map(|text| (field, text.to_string()))
            })
            .collect()
    }
}

impl AffectedPackage {
    pub fn parsed_purl_type(&self) -> Option<PurlType> {
        PurlType::from_str(&self.purl_type).ok()
    }
}

impl Validate for AdvisoryDataObject {
    const CLASS: &'static str = "PackageMetadata::Advisory";

    fn identity(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("advisory_xid", self.advisory_xid.clone()),
            ("source_xid", self.source_xid.clone()),
        ])
    }

    fn violations(&self) -> Vec<Violation> {
        Checks::new()
            .present("advisory_xid", &self.advisory_xid)
            .max_len("advisory_xid", Some(&self.advisory_xid), MAX_XID_LENGTH)
            .present("source_xid", &self.source_xid)
            .max_len("title", self.title.as_deref(), MAX_TITLE_LENGTH)
            .max_len(
                "description",
                self.description.as_deref(),
                MAX_DESCRIPTION_LENGTH,
            )
            .max_len("cvss_v2", self.cvss_v2.as_deref(), MAX_CVSS_LENGTH)
            .max_len("cvss_v3", self.cvss_v3.as_deref(), MAX_CVSS_LENGTH)
            .finish()
    }
}

impl Validate for AffectedPackage {
    const CLASS: &'static str = "PackageMetadata::AffectedPackage";

    fn identity(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("purl_type", self.purl_type.clone()),
            ("package_name", self.package_name.clone()),
            (
                "distro_version",
                self.distro_version.clone().unwrap_or_default(),
            ),
        ])
    }

    fn violations(&self) -> Vec<Violation> {
        let mut checks = Checks::new()
            .present("package_name", &self.package_name)
            .max_len(
                "package_name",
                Some(&self.package_name),
                MAX_PACKAGE_NAME_LENGTH,
            )
            .present("affected_range", &self.affected_range)
            .max_len(
                "affected_range",
                Some(&self.affected_range),
                MAX_AFFECTED_RANGE_LENGTH,
            )
            .max_len("solution", self.solution.as_deref(), MAX_SOLUTION_LENGTH);

        if self.parsed_purl_type().is_none() {
            checks = checks.invalid("purl_type", format!("unknown purl type '{}'", self.purl_type));
        }

        checks.finish()
    }
}

mod date {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::{macros::format_description, Date};

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let value = date
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let value = String::deserialize(deserializer)?;
        Date::parse(&value, format_description!("[year]-[month]-[day]")).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use time::macros::date;

    const ADVISORY: &str = r#"{"advisory_xid":"d4f176d6-0a07-46f4-9da5-22df92e5efa0","source_xid":"glad","published_date":"2023-04-05","title":"Prototype Pollution","description":"lodash is vulnerable","cvss_v3":"CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H","urls":["https://example.com/advisory"],"identifiers":[{"type":"cve","name":"CVE-2020-8203"}],"affected_packages":[{"purl_type":"npm","package_name":"lodash","affected_range":"<4.17.19","solution":"Upgrade to 4.17.19","fixed_versions":["4.17.19"]}]}"#;

    #[test]
    fn read_ndjson() {
        let data = format!("{ADVISORY}\n{ADVISORY}\n");
        let advisories = AdvisoryDataObject::from_ndjson(data.as_bytes())
            .unwrap()
            .valid;

        assert_eq!(advisories.len(), 2);
        let advisory = &advisories[0];
        assert_eq!(advisory.published_date, date!(2023 - 04 - 05));
        assert_eq!(advisory.cvss_v2, None);
        assert_eq!(advisory.affected_packages[0].fixed_versions, vec!["4.17.19"]);
        assert!(advisory.violations().is_empty());
        assert!(advisory.affected_packages[0].violations().is_empty());
    }

    #[test]
    fn rejects_bad_date() {
        let data = ADVISORY.replace("2023-04-05", "05/04/2023");
        let result = AdvisoryDataObject::from_ndjson(data.as_bytes()).unwrap();

        assert!(result.valid.is_empty());
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(
            result.rejected[0].identity["advisory_xid"],
            "d4f176d6-0a07-46f4-9da5-22df92e5efa0"
        );
    }

    #[test]
    fn skips_unreadable_entries() {
        let broken = ADVISORY.replace(r#""advisory_xid":"d4f176d6-0a07-46f4-9da5-22df92e5efa0","#, "");
        let data = format!("{ADVISORY}\n{broken}\n{ADVISORY}\n");
        let result = AdvisoryDataObject::from_ndjson(data.as_bytes()).unwrap();

        assert_eq!(result.valid.len(), 2);
        assert_eq!(result.rejected.len(), 1);

        let rejection = &result.rejected[0];
        assert_eq!(rejection.class, "PackageMetadata::Advisory");
        assert_eq!(rejection.identity["source_xid"], "glad");
        assert!(!rejection.identity.contains_key("advisory_xid"));
        assert!(matches!(
            rejection.errors.as_slice(),
            [Violation::Invalid { field: "advisory", reason }] if reason.contains("advisory_xid")
        ));
    }

    #[test]
    fn fails_on_broken_framing() {
        let data = format!("{ADVISORY}\nnot json\n");
        assert!(AdvisoryDataObject::from_ndjson(data.as_bytes()).is_err());
    }

    #[test]
    fn advisory_limits() {
        let mut advisory = AdvisoryDataObject::from_ndjson(ADVISORY.as_bytes())
            .unwrap()
            .valid
            .remove(0);
        advisory.advisory_xid = "x".repeat(37);
        advisory.source_xid = String::new();

        assert_eq!(
            advisory.violations(),
            vec![
                Violation::TooLong {
                    field: "advisory_xid",
                    max: MAX_XID_LENGTH
                },
                Violation::Blank {
                    field: "source_xid"
                },
            ]
        );
    }
}
