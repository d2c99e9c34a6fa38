use sbom_ingest_common::{hashing, purl::Purl};
use sbom_ingest_entity::{component_type::ComponentType, purl_type::PurlType, source_type::SourceType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// A scan report, listing the components found by one scanner run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub source: Option<Source>,
    /// Structural problems found while parsing the report.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Report {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(rename = "type", default = "default_component_type")]
    pub component_type: ComponentType,
    #[serde(default)]
    pub purl: Option<String>,
}

fn default_component_type() -> ComponentType {
    ComponentType::Library
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            component_type: ComponentType::Library,
            purl: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.purl = Some(purl.into());
        self
    }

    pub fn with_type(mut self, component_type: ComponentType) -> Self {
        self.component_type = component_type;
        self
    }

    /// The parsed package URL, absent when missing or malformed.
    pub fn parsed_purl(&self) -> Option<Purl> {
        self.purl.as_deref().and_then(|purl| Purl::from_str(purl).ok())
    }

    /// The purl type, absent when there is no purl or its type is not a known one.
    pub fn purl_type(&self) -> Option<PurlType> {
        self.parsed_purl()
            .and_then(|purl| PurlType::from_str(&purl.ty).ok())
    }
}

/// Where the components of a report were found.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub data: Value,
}

impl Source {
    pub fn new(source_type: SourceType, data: Value) -> Self {
        Self { source_type, data }
    }

    pub fn fingerprint(&self) -> String {
        hashing::fingerprint(&self.data)
    }

    fn text(&self, pointer: &str) -> Option<&str> {
        self.data.pointer(pointer).and_then(Value::as_str)
    }

    pub fn input_file_path(&self) -> Option<String> {
        if self.source_type.is_container_scanning() {
            let name = self.text("/image/name")?;
            let tag = self.text("/image/tag")?;
            Some(format!("container-image:{name}:{tag}"))
        } else {
            self.text("/input_file/path").map(Into::into)
        }
    }

    pub fn package_manager(&self) -> Option<&str> {
        self.text("/package_manager/name")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_report() {
        let report: Report = serde_json::from_value(json!({
            "components": [
                {"name": "lodash", "version": "4.17.21", "type": "library", "purl": "pkg:npm/lodash@4.17.21"},
                {"name": "left-pad"}
            ],
            "source": {
                "type": "dependency_scanning",
                "data": {"input_file": {"path": "package-lock.json"}, "package_manager": {"name": "npm"}}
            }
        }))
        .unwrap();

        assert!(report.is_valid());
        assert_eq!(report.components.len(), 2);
        assert_eq!(report.components[0].purl_type(), Some(PurlType::Npm));
        assert_eq!(report.components[1].component_type, ComponentType::Library);
        assert_eq!(report.components[1].purl_type(), None);

        let source = report.source.unwrap();
        assert_eq!(source.input_file_path().as_deref(), Some("package-lock.json"));
        assert_eq!(source.package_manager(), Some("npm"));
    }

    #[test]
    fn unknown_and_malformed_purls() {
        assert_eq!(Component::new("a").with_purl("pkg:github/a/b@1").purl_type(), None);
        assert_eq!(Component::new("a").with_purl("garbage").purl_type(), None);
    }

    #[test]
    fn container_image_path() {
        let source = Source::new(
            SourceType::ContainerScanning,
            json!({"image": {"name": "registry.example.com/app", "tag": "1.2"}}),
        );
        assert_eq!(
            source.input_file_path().as_deref(),
            Some("container-image:registry.example.com/app:1.2")
        );
        assert_eq!(source.package_manager(), None);
    }
}
