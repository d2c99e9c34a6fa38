#![allow(clippy::expect_used)]

use sbom_ingest_common::{config, db::Database};
use sbom_ingest_infrastructure::{init_tracing, Tracing};
use sbom_ingest_module_ingestor::{
    config::IngestionConfig,
    model::{Pipeline, Report},
    package_metadata::{
        AdvisoryDataObject, AdvisoryIngestionService, DataObject, LicenseIngestionService,
    },
    sbom::ExecutionService,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use std::{env, path::PathBuf};
use test_context::AsyncTestContext;
use tracing::instrument;

pub struct IngestContext {
    pub db: Database,
    pub config: IngestionConfig,
}

impl IngestContext {
    pub fn execution(&self) -> ExecutionService {
        ExecutionService::new(self.db.clone(), self.config)
    }

    pub fn licenses(&self) -> LicenseIngestionService {
        LicenseIngestionService::new(self.db.clone(), self.config.package_metadata_slice_size)
    }

    pub fn advisories(&self) -> AdvisoryIngestionService {
        AdvisoryIngestionService::new(self.db.clone(), self.config.package_metadata_slice_size)
    }

    /// Number of rows stored for an entity.
    pub async fn count<E>(&self) -> Result<u64, anyhow::Error>
    where
        E: EntityTrait,
        E::Model: Sync,
    {
        Ok(E::find().count(&self.db).await?)
    }

    /// A pipeline carrying test reports.
    pub async fn pipeline<'a, P: IntoIterator<Item = &'a str>>(
        &self,
        id: i64,
        project_id: i64,
        reports: P,
    ) -> Result<Pipeline, anyhow::Error> {
        let mut result = Pipeline {
            id,
            project_id,
            sha: format!("{id:040x}"),
            reports: vec![],
        };
        for path in reports {
            result.reports.push(document::<Report>(path).await?);
        }
        Ok(result)
    }
}

impl AsyncTestContext for IngestContext {
    #[instrument]
    async fn setup() -> IngestContext {
        init_tracing("test-context", Tracing::Compact);

        let config = if env::var("EXTERNAL_TEST_DB").is_ok() {
            log::warn!("Using external database from 'DB_*' env vars");
            config::Database::from_env().expect("DB config from env")
        } else {
            // one connection, as every connection opens its own in-memory database
            config::Database::for_url("sqlite::memory:")
        };

        let db = Database::new(&config)
            .await
            .expect("Configuring the database");
        db.migrate().await.expect("Migrating the database");

        IngestContext {
            db,
            config: IngestionConfig::default(),
        }
    }

    async fn teardown(self) {
        if let Err(err) = self.db.close().await {
            log::warn!("failed to close test database: {err}");
        }
    }
}

fn absolute(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../etc/test-data")
        .join(path)
}

/// Load a test document as-is.
pub async fn document_bytes(path: &str) -> Result<Vec<u8>, anyhow::Error> {
    Ok(tokio::fs::read(absolute(path)).await?)
}

/// Load and deserialize a JSON test document.
pub async fn document<T>(path: &str) -> Result<T, anyhow::Error>
where
    T: serde::de::DeserializeOwned,
{
    Ok(serde_json::from_slice(&document_bytes(path).await?)?)
}

/// Load license data objects of a purl type, from a CSV test document.
pub async fn licenses(purl_type: &str, path: &str) -> Result<Vec<DataObject>, anyhow::Error> {
    Ok(DataObject::from_csv(purl_type, document_bytes(path).await?.as_slice())?)
}

/// Load advisories from an NDJSON test document. Every entry must be readable.
pub async fn advisories(path: &str) -> Result<Vec<AdvisoryDataObject>, anyhow::Error> {
    let result = AdvisoryDataObject::from_ndjson(document_bytes(path).await?.as_slice())?;
    if !result.rejected.is_empty() {
        anyhow::bail!("unreadable advisories in {path}: {:?}", result.rejected);
    }
    Ok(result.valid)
}

#[cfg(test)]
mod test {
    use super::*;
    use sbom_ingest_entity::sbom_occurrence;
    use test_context::test_context;
    use test_log::test;

    #[test_context(IngestContext)]
    #[test(tokio::test)]
    async fn migrated(ctx: &IngestContext) -> Result<(), anyhow::Error> {
        ctx.db.ping().await?;
        assert_eq!(ctx.count::<sbom_occurrence::Entity>().await?, 0);
        Ok(())
    }

    #[test(tokio::test)]
    async fn load_report() -> Result<(), anyhow::Error> {
        let report: Report = document("sbom/gemnasium-npm.json").await?;
        assert!(report.is_valid());
        assert!(!report.components.is_empty());
        Ok(())
    }

    #[test(tokio::test)]
    async fn load_package_metadata() -> Result<(), anyhow::Error> {
        assert_eq!(
            licenses("npm", "package_metadata/npm-licenses.csv")
                .await?
                .len(),
            5
        );
        assert_eq!(
            advisories("package_metadata/advisories.ndjson")
                .await?
                .len(),
            2
        );
        Ok(())
    }
}
