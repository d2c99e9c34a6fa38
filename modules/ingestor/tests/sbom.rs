#![allow(clippy::expect_used)]

use sbom_ingest_entity::{
    sbom_component, sbom_component_version, sbom_occurrence, sbom_source,
    source_type::SourceType,
};
use sbom_ingest_module_ingestor::{
    config::IngestionConfig,
    model::{Component, Pipeline, Report, Source},
    sbom::{
        tasks::{default_tasks, IngestionTask},
        DeleteNotPresentOccurrencesService, ExecutionService, IngestReportService,
        IngestReportSliceService, IngestReportsService, OccurrenceMap,
    },
    validation::{Rejection, Violation},
    Error,
};
use sbom_ingest_test_context::IngestContext;
use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter};
use serde_json::json;
use std::num::NonZeroUsize;
use test_context::test_context;
use test_log::test;

fn source() -> Source {
    Source::new(
        SourceType::DependencyScanning,
        json!({"input_file": {"path": "package-lock.json"}, "package_manager": {"name": "npm"}}),
    )
}

fn report<'a>(names: impl IntoIterator<Item = &'a str>) -> Report {
    Report {
        components: names
            .into_iter()
            .map(|name| {
                Component::new(name)
                    .with_version("1.0.0")
                    .with_purl(format!("pkg:npm/{name}@1.0.0"))
            })
            .collect(),
        source: Some(source()),
        errors: vec![],
    }
}

fn pipeline(id: i64, project_id: i64, reports: Vec<Report>) -> Pipeline {
    Pipeline {
        id,
        project_id,
        sha: format!("{id:040x}"),
        reports,
    }
}

fn size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("non-zero size")
}

fn reports_service(ctx: &IngestContext) -> IngestReportsService {
    IngestReportsService::new(IngestReportService::new(
        IngestReportSliceService::new(ctx.db.clone()),
        ctx.config.sbom_slice_size,
    ))
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn ingest_report(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let pipeline = ctx.pipeline(1, 10, ["sbom/gemnasium-npm.json"]).await?;

    let summary = ctx.execution().execute(&pipeline).await?;

    assert_eq!(summary.ingested_occurrences, 5);
    assert_eq!(summary.deleted_occurrences, 0);
    assert!(summary.rejections.is_empty());

    // two versions of "debug" share a component
    assert_eq!(ctx.count::<sbom_component::Entity>().await?, 4);
    assert_eq!(ctx.count::<sbom_component_version::Entity>().await?, 5);
    assert_eq!(ctx.count::<sbom_source::Entity>().await?, 1);
    assert_eq!(ctx.count::<sbom_occurrence::Entity>().await?, 5);

    let occurrence = sbom_occurrence::Entity::find()
        .filter(sbom_occurrence::Column::ComponentName.eq("lodash"))
        .one(&ctx.db)
        .await?
        .expect("lodash occurrence");
    assert_eq!(occurrence.project_id, 10);
    assert_eq!(occurrence.pipeline_id, 1);
    assert_eq!(occurrence.commit_sha, pipeline.sha);
    assert_eq!(occurrence.package_manager.as_deref(), Some("npm"));
    assert_eq!(
        occurrence.input_file_path.as_deref(),
        Some("package-lock.json")
    );
    assert!(occurrence.component_version_id.is_some());
    assert!(occurrence.source_id.is_some());

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn container_scanning_report(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let pipeline = ctx.pipeline(1, 10, ["sbom/container-scanning.json"]).await?;

    let summary = ctx.execution().execute(&pipeline).await?;
    assert_eq!(summary.ingested_occurrences, 3);

    let occurrences = sbom_occurrence::Entity::find().all(&ctx.db).await?;
    for occurrence in occurrences {
        assert_eq!(
            occurrence.input_file_path.as_deref(),
            Some("container-image:registry.example.com/group/project:v1.0.0")
        );
        assert_eq!(occurrence.package_manager, None);
    }

    let os = sbom_component::Entity::find()
        .filter(sbom_component::Column::Name.eq("alpine"))
        .one(&ctx.db)
        .await?
        .expect("operating system component");
    assert_eq!(os.purl_type, None);

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn ingestion_is_idempotent(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let pipeline = ctx
        .pipeline(
            1,
            10,
            ["sbom/gemnasium-npm.json", "sbom/container-scanning.json"],
        )
        .await?;
    let service = reports_service(ctx);

    let first = service.execute(&pipeline).await?;
    let counts = (
        ctx.count::<sbom_component::Entity>().await?,
        ctx.count::<sbom_component_version::Entity>().await?,
        ctx.count::<sbom_source::Entity>().await?,
        ctx.count::<sbom_occurrence::Entity>().await?,
    );

    let second = service.execute(&pipeline).await?;

    assert_eq!(first.occurrence_ids(), second.occurrence_ids());
    assert_eq!(first.occurrence_ids().len(), 8);
    assert_eq!(
        counts,
        (
            ctx.count::<sbom_component::Entity>().await?,
            ctx.count::<sbom_component_version::Entity>().await?,
            ctx.count::<sbom_source::Entity>().await?,
            ctx.count::<sbom_occurrence::Entity>().await?,
        )
    );
    assert_eq!(counts, (7, 8, 2, 8));

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn reported_order_does_not_matter(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let names = ["c", "a", "b", "e", "d"];
    let mut reversed = names;
    reversed.reverse();

    let service = reports_service(ctx);
    let first = service
        .execute(&pipeline(1, 10, vec![report(names)]))
        .await?;
    let second = service
        .execute(&pipeline(2, 10, vec![report(reversed)]))
        .await?;

    assert_eq!(first.occurrence_ids(), second.occurrence_ids());
    assert_eq!(ctx.count::<sbom_occurrence::Entity>().await?, 5);

    Ok(())
}

/// Fails the slice containing a specific component, after all regular tasks ran.
struct FailOn(&'static str);

#[async_trait::async_trait]
impl IngestionTask for FailOn {
    fn name(&self) -> &'static str {
        "fail"
    }

    async fn execute(
        &self,
        _tx: &DatabaseTransaction,
        _pipeline: &Pipeline,
        maps: &mut [OccurrenceMap],
    ) -> Result<Vec<Rejection>, Error> {
        if maps.iter().any(|map| map.name() == self.0) {
            return Err(anyhow::anyhow!("failing on {}", self.0).into());
        }
        Ok(vec![])
    }
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn failing_slice_rolls_back(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let names = (0..150)
        .map(|n| format!("component-{n:03}"))
        .collect::<Vec<_>>();
    let report = report(names.iter().map(String::as_str));

    let mut tasks = default_tasks();
    tasks.push(Box::new(FailOn("component-149")));
    let service = IngestReportService::new(
        IngestReportSliceService::with_tasks(ctx.db.clone(), tasks),
        size(100),
    );

    let result = service.execute(&pipeline(1, 10, vec![]), &report).await;
    assert!(result.is_err());

    // the first slice stays committed, the second leaves nothing behind
    assert_eq!(ctx.count::<sbom_component::Entity>().await?, 100);
    assert_eq!(ctx.count::<sbom_component_version::Entity>().await?, 100);
    assert_eq!(ctx.count::<sbom_occurrence::Entity>().await?, 100);
    assert!(sbom_component::Entity::find()
        .filter(sbom_component::Column::Name.eq("component-100"))
        .one(&ctx.db)
        .await?
        .is_none());

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn invalid_components_are_rejected(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let mut report = report(["a", "b"]);
    report.components.push(Component::new("").with_version("1.0.0"));

    let summary = ctx
        .execution()
        .execute(&pipeline(1, 10, vec![report]))
        .await?;

    assert_eq!(summary.ingested_occurrences, 2);
    assert_eq!(summary.rejections.len(), 1);
    assert_eq!(summary.rejections[0].class, "Component");
    assert_eq!(
        summary.rejections[0].errors,
        vec![Violation::Blank { field: "name" }]
    );

    assert_eq!(ctx.count::<sbom_component::Entity>().await?, 2);
    assert_eq!(ctx.count::<sbom_component_version::Entity>().await?, 2);
    assert_eq!(ctx.count::<sbom_occurrence::Entity>().await?, 2);

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn too_long_version_skips_the_occurrence(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let mut report = report(["a"]);
    report
        .components
        .push(Component::new("b").with_version("1".repeat(256)));

    let summary = ctx
        .execution()
        .execute(&pipeline(1, 10, vec![report]))
        .await?;

    assert_eq!(summary.ingested_occurrences, 1);
    assert_eq!(summary.rejections.len(), 1);
    assert_eq!(summary.rejections[0].class, "ComponentVersion");
    // the component itself is valid
    assert_eq!(ctx.count::<sbom_component::Entity>().await?, 2);
    assert_eq!(ctx.count::<sbom_occurrence::Entity>().await?, 1);

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn occurrences_not_reported_again_are_deleted(
    ctx: &IngestContext,
) -> Result<(), anyhow::Error> {
    let execution = ctx.execution();

    execution
        .execute(&pipeline(1, 10, vec![report(["one", "two", "three"])]))
        .await?;
    // another project, which must not be touched
    execution
        .execute(&pipeline(2, 20, vec![report(["one"])]))
        .await?;

    let summary = execution
        .execute(&pipeline(3, 10, vec![report(["two", "three", "four"])]))
        .await?;
    assert_eq!(summary.ingested_occurrences, 3);
    assert_eq!(summary.deleted_occurrences, 1);

    let mut names = sbom_occurrence::Entity::find()
        .filter(sbom_occurrence::Column::ProjectId.eq(10))
        .all(&ctx.db)
        .await?
        .into_iter()
        .map(|occurrence| {
            assert_eq!(occurrence.pipeline_id, 3);
            occurrence.component_name
        })
        .collect::<Vec<_>>();
    names.sort();
    assert_eq!(names, vec!["four", "three", "two"]);

    assert_eq!(
        sbom_occurrence::Entity::find()
            .filter(sbom_occurrence::Column::ProjectId.eq(20))
            .all(&ctx.db)
            .await?
            .len(),
        1
    );

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn deletion_walks_all_batches(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let execution = ExecutionService::new(
        ctx.db.clone(),
        IngestionConfig {
            sbom_slice_size: size(7),
            sbom_deletion_batch_size: size(3),
            ..Default::default()
        },
    );

    let names = (0..25).map(|n| format!("c{n:02}")).collect::<Vec<_>>();
    execution
        .execute(&pipeline(
            1,
            10,
            vec![report(names.iter().map(String::as_str))],
        ))
        .await?;
    assert_eq!(ctx.count::<sbom_occurrence::Entity>().await?, 25);

    let kept = names.iter().step_by(5).map(String::as_str);
    let summary = execution
        .execute(&pipeline(2, 10, vec![report(kept)]))
        .await?;

    assert_eq!(summary.ingested_occurrences, 5);
    assert_eq!(summary.deleted_occurrences, 20);
    assert_eq!(ctx.count::<sbom_occurrence::Entity>().await?, 5);

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn invalid_reports_keep_existing_occurrences(
    ctx: &IngestContext,
) -> Result<(), anyhow::Error> {
    let execution = ctx.execution();
    execution
        .execute(&pipeline(1, 10, vec![report(["a", "b"])]))
        .await?;

    let invalid = ctx.pipeline(2, 10, ["sbom/invalid.json"]).await?;
    let summary = execution.execute(&invalid).await?;

    assert_eq!(summary.skipped_reports, 1);
    assert_eq!(summary.ingested_occurrences, 0);
    assert_eq!(summary.deleted_occurrences, 0);
    assert_eq!(ctx.count::<sbom_occurrence::Entity>().await?, 2);
    assert_eq!(ctx.count::<sbom_component::Entity>().await?, 2);

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn partially_invalid_pipelines_keep_existing_occurrences(
    ctx: &IngestContext,
) -> Result<(), anyhow::Error> {
    let execution = ctx.execution();
    execution
        .execute(&pipeline(1, 10, vec![report(["a", "b"]), report(["c"])]))
        .await?;
    assert_eq!(ctx.count::<sbom_occurrence::Entity>().await?, 3);

    // the report which used to carry "c" fails to parse this time
    let mut broken = report(["c"]);
    broken.errors = vec!["unsupported schema version".into()];
    let summary = execution
        .execute(&pipeline(2, 10, vec![report(["a"]), broken]))
        .await?;

    assert_eq!(summary.ingested_reports, 1);
    assert_eq!(summary.skipped_reports, 1);
    assert_eq!(summary.ingested_occurrences, 1);
    assert_eq!(summary.deleted_occurrences, 0);
    assert_eq!(ctx.count::<sbom_occurrence::Entity>().await?, 3);

    // once every report is valid again, stale occurrences go
    let summary = execution
        .execute(&pipeline(3, 10, vec![report(["a"]), report(["c"])]))
        .await?;

    assert_eq!(summary.deleted_occurrences, 1);
    assert_eq!(ctx.count::<sbom_occurrence::Entity>().await?, 2);

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn deletion_refuses_other_projects(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let completed = reports_service(ctx)
        .execute(&pipeline(1, 10, vec![report(["a"])]))
        .await?;

    let deletion = DeleteNotPresentOccurrencesService::new(ctx.db.clone(), size(100));
    let result = deletion
        .execute(&pipeline(2, 20, vec![]), &completed)
        .await;

    assert!(matches!(
        result,
        Err(Error::ProjectMismatch {
            ingested: 10,
            pipeline: 1,
            requested: 20
        })
    ));
    assert_eq!(ctx.count::<sbom_occurrence::Entity>().await?, 1);

    Ok(())
}
