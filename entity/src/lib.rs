pub mod component_type;
pub mod purl_type;
pub mod source_type;

pub mod sbom_component;
pub mod sbom_component_version;
pub mod sbom_occurrence;
pub mod sbom_source;

pub mod pm_advisory;
pub mod pm_affected_package;
pub mod pm_license;
pub mod pm_package;
pub mod pm_package_version;
pub mod pm_package_version_license;
