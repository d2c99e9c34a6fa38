use super::{AdvisoryDataObject, DataObject};
use sbom_ingest_entity::purl_type::PurlType;
use uuid::Uuid;

/// A valid license data object, and the ids of the rows persisted for it.
#[derive(Clone, Debug, PartialEq)]
pub struct LicenseMap {
    object: DataObject,
    purl_type: PurlType,
    pub(crate) license_id: Option<Uuid>,
    pub(crate) package_id: Option<Uuid>,
    pub(crate) package_version_id: Option<Uuid>,
    pub(crate) package_version_license_id: Option<Uuid>,
}

impl LicenseMap {
    /// Wrap a data object, unless its purl type is unknown.
    pub fn new(object: DataObject) -> Option<Self> {
        let purl_type = object.parsed_purl_type()?;
        Some(Self {
            object,
            purl_type,
            license_id: None,
            package_id: None,
            package_version_id: None,
            package_version_license_id: None,
        })
    }

    pub fn object(&self) -> &DataObject {
        &self.object
    }

    pub fn purl_type(&self) -> PurlType {
        self.purl_type
    }

    pub fn license_id(&self) -> Option<Uuid> {
        self.license_id
    }

    pub fn package_id(&self) -> Option<Uuid> {
        self.package_id
    }

    pub fn package_version_id(&self) -> Option<Uuid> {
        self.package_version_id
    }

    pub fn package_version_license_id(&self) -> Option<Uuid> {
        self.package_version_license_id
    }
}

/// An advisory, and the ids of the rows persisted for it.
#[derive(Clone, Debug, PartialEq)]
pub struct AdvisoryMap {
    object: AdvisoryDataObject,
    pub(crate) advisory_id: Option<Uuid>,
    pub(crate) affected_package_ids: Vec<Uuid>,
}

impl AdvisoryMap {
    pub fn new(object: AdvisoryDataObject) -> Self {
        Self {
            object,
            advisory_id: None,
            affected_package_ids: vec![],
        }
    }

    pub fn object(&self) -> &AdvisoryDataObject {
        &self.object
    }

    pub fn advisory_id(&self) -> Option<Uuid> {
        self.advisory_id
    }

    pub fn affected_package_ids(&self) -> &[Uuid] {
        &self.affected_package_ids
    }
}
