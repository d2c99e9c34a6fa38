use super::OccurrenceMap;
use crate::model::Report;
use sbom_ingest_entity::purl_type::PurlType;

/// The occurrence maps of one report, in a deterministic order.
///
/// Maps are ordered by component name, purl type rank, component type rank and version, with
/// a missing version ordering first. Unknown types rank lowest. Every call to [`Self::iter`]
/// produces a fresh sequence from the report.
#[derive(Clone, Debug)]
pub struct OccurrenceMapCollection<'r> {
    report: &'r Report,
}

impl<'r> OccurrenceMapCollection<'r> {
    pub fn new(report: &'r Report) -> Self {
        Self { report }
    }

    pub fn len(&self) -> usize {
        self.report.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.report.components.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = OccurrenceMap> + Send + 'r {
        let report = self.report;
        let mut components = report.components.iter().collect::<Vec<_>>();
        // stable, so equal keys keep their reported order
        components.sort_by_cached_key(|component| {
            (
                component.name.clone(),
                PurlType::rank(component.purl_type()),
                component.component_type.rank(),
                component.version.clone().unwrap_or_default(),
            )
        });

        let source = &report.source;
        components
            .into_iter()
            .map(move |component| OccurrenceMap::new(component.clone(), source.clone()))
    }
}

impl<'r> IntoIterator for &OccurrenceMapCollection<'r> {
    type Item = OccurrenceMap;
    type IntoIter = Box<dyn Iterator<Item = OccurrenceMap> + Send + 'r>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
