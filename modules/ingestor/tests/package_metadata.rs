#![allow(clippy::expect_used)]

use sbom_ingest_entity::{
    pm_advisory, pm_affected_package, pm_license, pm_package, pm_package_version,
    pm_package_version_license,
};
use sbom_ingest_module_ingestor::{
    package_metadata::{AdvisoryIngestionService, DataObject, LicenseIngestionService},
    validation::Violation,
};
use sbom_ingest_test_context::{advisories, document_bytes, licenses, IngestContext};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::num::NonZeroUsize;
use test_context::test_context;
use test_log::test;

fn size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("non-zero size")
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn ingest_licenses(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let objects = licenses("npm", "package_metadata/npm-licenses.csv").await?;
    // more than one slice
    let service = LicenseIngestionService::new(ctx.db.clone(), size(2));

    let outcome = service.execute(objects.clone()).await?;
    assert_eq!(outcome.ingested, 5);
    assert_eq!(outcome.related, 5);
    assert_eq!(outcome.slices, 3);
    assert!(outcome.rejections.is_empty());

    assert_eq!(ctx.count::<pm_license::Entity>().await?, 2);
    assert_eq!(ctx.count::<pm_package::Entity>().await?, 4);
    assert_eq!(ctx.count::<pm_package_version::Entity>().await?, 5);
    assert_eq!(ctx.count::<pm_package_version_license::Entity>().await?, 5);

    // again, with a different slicing
    ctx.licenses().execute(objects).await?;

    assert_eq!(ctx.count::<pm_license::Entity>().await?, 2);
    assert_eq!(ctx.count::<pm_package::Entity>().await?, 4);
    assert_eq!(ctx.count::<pm_package_version::Entity>().await?, 5);
    assert_eq!(ctx.count::<pm_package_version_license::Entity>().await?, 5);

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn invalid_license_objects_are_rejected(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let outcome = ctx
        .licenses()
        .execute([
            DataObject::new("gem", "rails", "7.1.0", "MIT"),
            DataObject::new("gem", "", "1.0.0", "MIT"),
            DataObject::new("github", "octokit", "1.0.0", "MIT"),
            DataObject::new("gem", "rack", "3.0.8", "x".repeat(51)),
        ])
        .await?;

    assert_eq!(outcome.ingested, 1);
    assert_eq!(outcome.rejections.len(), 3);
    assert_eq!(
        outcome.rejections[0].errors,
        vec![Violation::Blank { field: "name" }]
    );
    assert!(matches!(
        outcome.rejections[1].errors.as_slice(),
        [Violation::Invalid {
            field: "purl_type",
            ..
        }]
    ));

    assert_eq!(ctx.count::<pm_package::Entity>().await?, 1);
    assert_eq!(ctx.count::<pm_license::Entity>().await?, 1);

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn ingest_advisories(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let mut objects = advisories("package_metadata/advisories.ndjson").await?;
    let service = AdvisoryIngestionService::new(ctx.db.clone(), size(1));

    let outcome = service.execute(objects.clone()).await?;
    assert_eq!(outcome.ingested, 2);
    assert_eq!(outcome.related, 3);
    assert_eq!(outcome.slices, 2);
    assert_eq!(ctx.count::<pm_advisory::Entity>().await?, 2);
    assert_eq!(ctx.count::<pm_affected_package::Entity>().await?, 3);

    // updates replace the descriptive columns
    objects[0].title = Some("Prototype Pollution".into());
    objects[0].affected_packages[0].solution = None;
    ctx.advisories().execute(objects).await?;

    assert_eq!(ctx.count::<pm_advisory::Entity>().await?, 2);
    assert_eq!(ctx.count::<pm_affected_package::Entity>().await?, 3);

    let advisory = pm_advisory::Entity::find()
        .filter(pm_advisory::Column::SourceXid.eq("glad"))
        .one(&ctx.db)
        .await?
        .expect("advisory");
    assert_eq!(advisory.title.as_deref(), Some("Prototype Pollution"));

    let affected = pm_affected_package::Entity::find()
        .filter(pm_affected_package::Column::AdvisoryId.eq(advisory.id))
        .all(&ctx.db)
        .await?;
    assert_eq!(affected.len(), 1);
    assert_eq!(affected[0].package_name, "lodash");
    assert_eq!(affected[0].solution, None);
    assert_eq!(affected[0].affected_range, "<4.17.20");

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn rejected_advisories_skip_their_packages(
    ctx: &IngestContext,
) -> Result<(), anyhow::Error> {
    let mut objects = advisories("package_metadata/advisories.ndjson").await?;
    objects[0].advisory_xid = String::new();
    objects[1].affected_packages[1].affected_range = String::new();

    let outcome = ctx.advisories().execute(objects).await?;

    assert_eq!(outcome.ingested, 1);
    assert_eq!(outcome.related, 1);
    assert_eq!(outcome.rejections.len(), 2);
    assert_eq!(outcome.rejections[0].class, "PackageMetadata::Advisory");
    assert_eq!(
        outcome.rejections[1].class,
        "PackageMetadata::AffectedPackage"
    );

    assert_eq!(ctx.count::<pm_advisory::Entity>().await?, 1);
    assert_eq!(ctx.count::<pm_affected_package::Entity>().await?, 1);

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn unreadable_advisories_are_rejected(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let data = String::from_utf8(document_bytes("package_metadata/advisories.ndjson").await?)?;
    let mut lines = data.lines().collect::<Vec<_>>();
    // valid JSON, but no advisory_xid
    let broken = r#"{"source_xid":"glad","published_date":"2023-04-05","title":"Broken"}"#;
    lines.insert(1, broken);

    let outcome = ctx
        .advisories()
        .execute_ndjson(lines.join("\n").as_bytes())
        .await?;

    assert_eq!(outcome.ingested, 2);
    assert_eq!(outcome.related, 3);
    assert_eq!(outcome.rejections.len(), 1);
    assert_eq!(outcome.rejections[0].class, "PackageMetadata::Advisory");
    assert_eq!(outcome.rejections[0].identity["source_xid"], "glad");

    assert_eq!(ctx.count::<pm_advisory::Entity>().await?, 2);
    assert_eq!(ctx.count::<pm_affected_package::Entity>().await?, 3);

    Ok(())
}

#[test_context(IngestContext)]
#[test(tokio::test)]
async fn repeated_objects_count_rows_once(ctx: &IngestContext) -> Result<(), anyhow::Error> {
    let objects = advisories("package_metadata/advisories.ndjson").await?;
    let repeated = vec![objects[0].clone(), objects[0].clone(), objects[1].clone()];

    let outcome = ctx.advisories().execute(repeated).await?;
    assert_eq!(outcome.ingested, 3);
    assert_eq!(outcome.related, 3);
    assert_eq!(ctx.count::<pm_affected_package::Entity>().await?, 3);

    let rails = DataObject::new("gem", "rails", "7.1.0", "MIT");
    let outcome = ctx
        .licenses()
        .execute([rails.clone(), rails])
        .await?;
    assert_eq!(outcome.related, 1);
    assert_eq!(ctx.count::<pm_package_version_license::Entity>().await?, 1);

    Ok(())
}
