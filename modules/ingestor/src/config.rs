use std::num::NonZeroUsize;

const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(size) => size,
    None => unreachable!(),
};

#[derive(clap::Args, Debug, Clone, Copy, PartialEq, Eq)]
#[command(next_help_heading = "Ingestion")]
pub struct IngestionConfig {
    /// Number of occurrence maps ingested per transaction
    #[arg(id = "sbom-slice-size", long, env = "SBOM_SLICE_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    pub sbom_slice_size: NonZeroUsize,

    /// Number of stored occurrences examined per deletion batch
    #[arg(
        id = "sbom-deletion-batch-size",
        long,
        env = "SBOM_DELETION_BATCH_SIZE",
        default_value_t = DEFAULT_BATCH_SIZE
    )]
    pub sbom_deletion_batch_size: NonZeroUsize,

    /// Number of package metadata objects ingested per transaction
    #[arg(
        id = "package-metadata-slice-size",
        long,
        env = "PACKAGE_METADATA_SLICE_SIZE",
        default_value_t = DEFAULT_BATCH_SIZE
    )]
    pub package_metadata_slice_size: NonZeroUsize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            sbom_slice_size: DEFAULT_BATCH_SIZE,
            sbom_deletion_batch_size: DEFAULT_BATCH_SIZE,
            package_metadata_slice_size: DEFAULT_BATCH_SIZE,
        }
    }
}
