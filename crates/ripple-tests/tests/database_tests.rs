//! Database integration tests.
//!
//! Run with: `cargo test -p ripple-tests --test database_tests --features integration`

#![cfg(feature = "integration")]

use ripple_core::ids::SnapshotImageId;
use ripple_core::ports::{
    AuthorRepository, BuildRepository, CachedSnapshotImageRepository, PlanRepository,
    ProjectRepository, SnapshotRepository, TestRepository,
};
use ripple_core::snapshot::CacheWrite;
use ripple_tests::{
    at,
    context::TestContext,
    fixtures::{BuildFixture, PlanFixture, ProjectFixture, SnapshotFixture, TestCaseFixture},
};

#[tokio::test]
async fn test_project_and_plan_roundtrip() {
    let ctx = TestContext::new().await.expect("Failed to create context");

    let project = ProjectFixture::named("server");
    ctx.projects().create(&project).await.expect("Failed to create project");
    let found = ctx
        .projects()
        .get(project.id)
        .await
        .expect("Failed to get project")
        .expect("Project not found");
    assert_eq!(found, project);

    let plan = PlanFixture::in_cluster(&project, "unit", "linux");
    ctx.plans().create(&plan).await.expect("Failed to create plan");
    let found = ctx
        .plans()
        .get(plan.id)
        .await
        .expect("Failed to get plan")
        .expect("Plan not found");
    assert_eq!(found, plan);
}

#[tokio::test]
async fn test_list_plans_by_cluster_spans_projects() {
    let ctx = TestContext::new().await.expect("Failed to create context");
    let plans = ctx.plans();

    let server = ProjectFixture::named("server");
    let client = ProjectFixture::named("client");
    ctx.projects().create(&server).await.unwrap();
    ctx.projects().create(&client).await.unwrap();

    let a = PlanFixture::in_cluster(&server, "unit", "linux");
    let b = PlanFixture::in_cluster(&client, "e2e", "linux");
    let c = PlanFixture::in_cluster(&server, "lint", "macos");
    let d = PlanFixture::unclustered(&server, "docs");
    for plan in [&a, &b, &c, &d] {
        plans.create(plan).await.unwrap();
    }

    let mut linux: Vec<_> = plans
        .list_by_cluster("linux")
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    linux.sort();
    let mut expected = vec![a.id, b.id];
    expected.sort();
    assert_eq!(linux, expected);

    assert!(plans.list_by_cluster("windows").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_snapshot_images_listing() {
    let ctx = TestContext::new().await.expect("Failed to create context");
    let snapshots = ctx.snapshots();

    let project = ProjectFixture::named("server");
    ctx.projects().create(&project).await.unwrap();
    let unit = PlanFixture::in_cluster(&project, "unit", "linux");
    let lint = PlanFixture::in_cluster(&project, "lint", "linux");
    ctx.plans().create(&unit).await.unwrap();
    ctx.plans().create(&lint).await.unwrap();

    let old = SnapshotFixture::active(&project, 0);
    let new = SnapshotFixture::active(&project, 60);
    snapshots.create(&old).await.unwrap();
    snapshots.create(&new).await.unwrap();

    let old_unit = SnapshotFixture::image(&old, &unit);
    let new_unit = SnapshotFixture::image(&new, &unit);
    let new_lint = SnapshotFixture::image(&new, &lint);
    for image in [&old_unit, &new_unit, &new_lint] {
        snapshots.create_image(image).await.unwrap();
    }

    assert_eq!(snapshots.get(new.id).await.unwrap(), Some(new.clone()));

    let mut of_new: Vec<_> = snapshots
        .list_images(new.id)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    of_new.sort();
    let mut expected = vec![new_unit.id, new_lint.id];
    expected.sort();
    assert_eq!(of_new, expected);

    let of_unit: Vec<_> = snapshots
        .list_images_for_plan(unit.id)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(of_unit, vec![new_unit.id, old_unit.id]);
}

#[tokio::test]
async fn test_cache_apply_upserts_in_place() {
    let ctx = TestContext::new().await.expect("Failed to create context");
    let cache = ctx.cache();

    let project = ProjectFixture::named("server");
    ctx.projects().create(&project).await.unwrap();
    let plan = PlanFixture::in_cluster(&project, "unit", "linux");
    ctx.plans().create(&plan).await.unwrap();
    let snapshot = SnapshotFixture::active(&project, 0);
    ctx.snapshots().create(&snapshot).await.unwrap();
    let image = SnapshotFixture::image(&snapshot, &plan);
    ctx.snapshots().create_image(&image).await.unwrap();

    let mut write = CacheWrite::new();
    write.pin(image.id);
    cache.apply(&write).await.unwrap();

    let entry = cache.get(image.id).await.unwrap().expect("Entry not found");
    assert!(entry.is_pinned());
    assert_eq!(entry.snapshot_id, snapshot.id);
    assert_eq!(entry.plan_id, plan.id);

    let mut write = CacheWrite::new();
    write.upsert(image.id, Some(at(30)));
    cache.apply(&write).await.unwrap();

    let updated = cache.get(image.id).await.unwrap().expect("Entry not found");
    assert_eq!(updated.expiration_date, Some(at(30)));
    assert_eq!(updated.date_created, entry.date_created);
    assert_eq!(cache.count().await.unwrap(), 1);

    let listed = cache.list_for_plans(&[plan.id]).await.unwrap();
    assert_eq!(listed, vec![updated]);
    assert!(cache.list_for_plans(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cache_apply_is_all_or_nothing() {
    let ctx = TestContext::new().await.expect("Failed to create context");
    let cache = ctx.cache();

    let project = ProjectFixture::named("server");
    ctx.projects().create(&project).await.unwrap();
    let plan = PlanFixture::in_cluster(&project, "unit", "linux");
    ctx.plans().create(&plan).await.unwrap();
    let snapshot = SnapshotFixture::active(&project, 0);
    ctx.snapshots().create(&snapshot).await.unwrap();
    let image = SnapshotFixture::image(&snapshot, &plan);
    ctx.snapshots().create_image(&image).await.unwrap();

    // The second entry has no snapshot image behind it and violates the
    // foreign key, so the first must not be committed either.
    let mut write = CacheWrite::new();
    write.pin(image.id);
    write.pin(SnapshotImageId::new());

    assert!(cache.apply(&write).await.is_err());
    assert_eq!(cache.count().await.unwrap(), 0);
    assert!(cache.get(image.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_build_with_author_roundtrip() {
    let ctx = TestContext::new().await.expect("Failed to create context");

    let project = ProjectFixture::named("server");
    ctx.projects().create(&project).await.unwrap();
    let author = BuildFixture::author();
    ctx.authors().create(&author).await.unwrap();

    let build = BuildFixture::finished(&project, Some(&author), 5);
    ctx.builds().create(&build).await.unwrap();
    let anonymous = BuildFixture::in_progress(&project, 10);
    ctx.builds().create(&anonymous).await.unwrap();

    assert_eq!(ctx.builds().get(build.id).await.unwrap(), Some(build));
    assert_eq!(ctx.builds().get(anonymous.id).await.unwrap(), Some(anonymous));
}

#[tokio::test]
async fn test_previous_and_first_runs() {
    let ctx = TestContext::new().await.expect("Failed to create context");
    let builds = ctx.builds();
    let tests = ctx.tests();

    let project = ProjectFixture::named("server");
    ctx.projects().create(&project).await.unwrap();

    let first = BuildFixture::finished(&project, None, 0);
    let second = BuildFixture::finished(&project, None, 10);
    let running = BuildFixture::in_progress(&project, 20);
    let current = BuildFixture::finished(&project, None, 30);
    let later = BuildFixture::finished(&project, None, 40);
    for build in [&first, &second, &running, &current, &later] {
        builds.create(build).await.unwrap();
    }

    let name = "tests.test_api.test_get";
    let first_run = TestCaseFixture::run_of(&first, name);
    let second_run = TestCaseFixture::failed(&second, name, "AssertionError");
    let subject = TestCaseFixture::run_of(&current, name);
    for test in [
        &first_run,
        &second_run,
        &TestCaseFixture::run_of(&running, name),
        &subject,
        &TestCaseFixture::run_of(&later, name),
        &TestCaseFixture::run_of(&second, "tests.test_api.test_put"),
    ] {
        tests.create(test).await.unwrap();
    }

    assert_eq!(tests.get(subject.id).await.unwrap(), Some(subject.clone()));

    let previous = tests
        .previous_runs(&subject, current.date_created, 25)
        .await
        .unwrap();
    let ids: Vec<_> = previous.iter().map(|r| r.test.id).collect();
    assert_eq!(ids, vec![second_run.id, first_run.id]);
    assert_eq!(previous[0].build, second);

    let capped = tests
        .previous_runs(&subject, current.date_created, 1)
        .await
        .unwrap();
    assert_eq!(capped.len(), 1);

    let oldest = tests.first_run(&subject).await.unwrap().expect("No first run");
    assert_eq!(oldest.test.id, first_run.id);
    assert!(tests.first_run(&first_run).await.unwrap().is_some());
}
