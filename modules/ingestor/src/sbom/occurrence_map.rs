use crate::model::{Component, Source};
use sbom_ingest_entity::{
    component_type::ComponentType, purl_type::PurlType, source_type::SourceType,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Correlates one reported component, and the source it was found in, with the ids of the
/// rows persisted for it.
///
/// Ids are assigned progressively by the ingestion tasks of a slice. A map is owned by the
/// slice processing it, and is never persisted itself.
#[derive(Clone, Debug, PartialEq)]
pub struct OccurrenceMap {
    report_component: Component,
    report_source: Option<Source>,
    purl_type: Option<PurlType>,
    component_id: Option<Uuid>,
    component_version_id: Option<Uuid>,
    source_id: Option<Uuid>,
    occurrence_id: Option<Uuid>,
}

/// Read-only view of an [`OccurrenceMap`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OccurrenceRecord {
    pub component_id: Option<Uuid>,
    pub component_version_id: Option<Uuid>,
    pub component_type: ComponentType,
    pub name: String,
    pub purl_type: Option<PurlType>,
    pub source_id: Option<Uuid>,
    pub source_type: Option<SourceType>,
    pub source: Option<Value>,
    pub version: Option<String>,
}

impl OccurrenceMap {
    pub fn new(report_component: Component, report_source: Option<Source>) -> Self {
        let purl_type = report_component.purl_type();
        Self {
            report_component,
            report_source,
            purl_type,
            component_id: None,
            component_version_id: None,
            source_id: None,
            occurrence_id: None,
        }
    }

    pub fn report_component(&self) -> &Component {
        &self.report_component
    }

    pub fn report_source(&self) -> Option<&Source> {
        self.report_source.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.report_component.name
    }

    pub fn version(&self) -> Option<&str> {
        self.report_component.version.as_deref()
    }

    /// If the component was reported with a non-blank version.
    pub fn version_present(&self) -> bool {
        self.version().is_some_and(|version| !version.trim().is_empty())
    }

    pub fn component_type(&self) -> ComponentType {
        self.report_component.component_type
    }

    pub fn purl_type(&self) -> Option<PurlType> {
        self.purl_type
    }

    pub fn source_type(&self) -> Option<SourceType> {
        self.report_source.as_ref().map(|source| source.source_type)
    }

    pub fn input_file_path(&self) -> Option<String> {
        self.report_source.as_ref().and_then(Source::input_file_path)
    }

    pub fn package_manager(&self) -> Option<&str> {
        self.report_source.as_ref().and_then(Source::package_manager)
    }

    pub fn component_id(&self) -> Option<Uuid> {
        self.component_id
    }

    pub fn component_version_id(&self) -> Option<Uuid> {
        self.component_version_id
    }

    pub fn source_id(&self) -> Option<Uuid> {
        self.source_id
    }

    pub fn occurrence_id(&self) -> Option<Uuid> {
        self.occurrence_id
    }

    pub(crate) fn set_component_id(&mut self, id: Uuid) {
        self.component_id = Some(id);
    }

    pub(crate) fn set_component_version_id(&mut self, id: Uuid) {
        self.component_version_id = Some(id);
    }

    pub(crate) fn set_source_id(&mut self, id: Uuid) {
        self.source_id = Some(id);
    }

    pub(crate) fn set_occurrence_id(&mut self, id: Uuid) {
        self.occurrence_id = Some(id);
    }

    /// If every upstream id this map requires has been assigned.
    ///
    /// The component id is always required. The version id only when a version was reported,
    /// and the source id only when the report carries a source.
    pub fn is_ready_for_occurrence(&self) -> bool {
        self.component_id.is_some()
            && (!self.version_present() || self.component_version_id.is_some())
            && (self.report_source.is_none() || self.source_id.is_some())
    }

    pub fn to_record(&self) -> OccurrenceRecord {
        OccurrenceRecord {
            component_id: self.component_id,
            component_version_id: self.component_version_id,
            component_type: self.component_type(),
            name: self.report_component.name.clone(),
            purl_type: self.purl_type,
            source_id: self.source_id,
            source_type: self.source_type(),
            source: self.report_source.as_ref().map(|source| source.data.clone()),
            version: self.report_component.version.clone(),
        }
    }
}
