//! Integration tests for the member login activity report

use member_visits::members::{InMemoryMemberDirectory, MemberDirectory};
use member_visits::models::{Enriched, MemberId, MemberProfile};
use member_visits::report::{
    ReportError, ReportParams, ReportRequest, SortDirection, SortField, VisitReportQuery,
};
use member_visits::storage::{SqliteStorage, VisitStore};
use member_visits::summary::VisitSummaryService;
use std::sync::Arc;

const DAY: i64 = 86_400;
// 2024-03-01T00:00:00Z
const MARCH_1: i64 = 1_709_251_200;

const ADA: MemberId = 1;
const GRACE: MemberId = 2;
const GHOST: MemberId = 99;

async fn create_test_storage() -> Arc<dyn VisitStore> {
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

fn profile(id: MemberId, first_name: &str, surname: &str) -> MemberProfile {
    MemberProfile {
        id,
        first_name: first_name.to_string(),
        surname: surname.to_string(),
        email: None,
        groups: vec![],
    }
}

fn create_directory() -> Arc<dyn MemberDirectory> {
    let directory = InMemoryMemberDirectory::new();
    directory.upsert(profile(ADA, "Ada", "Lovelace"));
    directory.upsert(profile(GRACE, "Grace", "Hopper"));
    Arc::new(directory)
}

fn params() -> ReportParams {
    ReportParams::default()
}

/// Ada visits on March 1st, 2nd (10:00) and 3rd; Grace on March 2nd (10:00).
async fn seed_scenario(storage: &Arc<dyn VisitStore>) -> [i64; 3] {
    let t1 = MARCH_1 + 9 * 3_600;
    let t2 = MARCH_1 + DAY + 10 * 3_600;
    let t3 = MARCH_1 + 2 * DAY + 11 * 3_600;

    storage.append(ADA, t1).await.unwrap();
    storage.append(ADA, t2).await.unwrap();
    storage.append(GRACE, t2).await.unwrap();
    storage.append(ADA, t3).await.unwrap();

    [t1, t2, t3]
}

#[tokio::test]
async fn test_unfiltered_report_scenario() {
    let storage = create_test_storage().await;
    let [t1, t2, t3] = seed_scenario(&storage).await;
    let reports = VisitReportQuery::new(Arc::clone(&storage), create_directory());

    let report = reports.run_params(&params()).await.unwrap();
    assert_eq!(report.stats.total_visits, 4);
    assert_eq!(report.stats.total_visitors, 2);
    assert_eq!(report.total_rows, 4);

    // Default sort: visit date, descending
    assert_eq!(report.rows[0].visited_at, t3);
    assert_eq!(report.rows[0].member_id, ADA);
    assert_eq!(report.rows[1].visited_at, t2);
    assert_eq!(report.rows[2].visited_at, t2);
    assert_eq!(report.rows[3].visited_at, t1);

    let unique = reports
        .run_params(&ReportParams {
            unique: Some("on".to_string()),
            ..params()
        })
        .await
        .unwrap();
    assert_eq!(unique.rows.len(), 2);
    assert_eq!(unique.total_rows, 2);
    // Stats describe the filtered set before de-duplication
    assert_eq!(unique.stats.total_visits, 4);

    let summaries = VisitSummaryService::new(Arc::clone(&storage));
    assert_eq!(summaries.visit_count(ADA).await.unwrap(), 3);
    assert_eq!(summaries.first_logged_in(ADA).await.unwrap(), Some(t1));
    assert_eq!(summaries.last_logged_in(ADA).await.unwrap(), Some(t3));
}

#[tokio::test]
async fn test_rows_are_enriched_with_member_facts() {
    let storage = create_test_storage().await;
    let [t1, _, t3] = seed_scenario(&storage).await;
    let reports = VisitReportQuery::new(Arc::clone(&storage), create_directory());

    let report = reports.run_params(&params()).await.unwrap();
    for row in report.rows.iter().filter(|r| r.member_id == ADA) {
        assert_eq!(row.member_name, Enriched::Known("Ada Lovelace".to_string()));
        assert_eq!(row.member_first_visit, Enriched::Known(t1));
        assert_eq!(row.member_last_visit, Enriched::Known(t3));
        assert_eq!(row.member_link, "/admin/security/EditForm/field/Members/item/1/edit");
    }
}

#[tokio::test]
async fn test_single_day_window() {
    let storage = create_test_storage().await;
    let [_, t2, _] = seed_scenario(&storage).await;
    let reports = VisitReportQuery::new(Arc::clone(&storage), create_directory());

    let report = reports
        .run_params(&ReportParams {
            start: Some("2024-03-02".to_string()),
            end: Some("2024-03-02".to_string()),
            ..params()
        })
        .await
        .unwrap();

    assert_eq!(report.stats.total_visits, 2);
    assert!(report.rows.iter().all(|row| row.visited_at == t2));

    // Member facts stay system-wide even inside a narrow window
    let ada_row = report.rows.iter().find(|r| r.member_id == ADA).unwrap();
    assert_eq!(ada_row.member_first_visit, Enriched::Known(MARCH_1 + 9 * 3_600));
}

#[tokio::test]
async fn test_end_date_covers_the_last_second_of_the_day() {
    let storage = create_test_storage().await;
    storage.append(ADA, MARCH_1 + DAY - 1).await.unwrap();
    storage.append(ADA, MARCH_1 + DAY).await.unwrap();
    let reports = VisitReportQuery::new(Arc::clone(&storage), create_directory());

    let report = reports
        .run_params(&ReportParams {
            end: Some("2024-03-01".to_string()),
            ..params()
        })
        .await
        .unwrap();

    assert_eq!(report.stats.total_visits, 1);
    assert_eq!(report.rows[0].visited_at, MARCH_1 + DAY - 1);
}

#[tokio::test]
async fn test_first_time_visitors_use_system_wide_first_visit() {
    let storage = create_test_storage().await;
    seed_scenario(&storage).await;
    // Second Grace visit in the window must not double count her
    storage.append(GRACE, MARCH_1 + DAY + 12 * 3_600).await.unwrap();
    let reports = VisitReportQuery::new(Arc::clone(&storage), create_directory());

    let report = reports
        .run_params(&ReportParams {
            start: Some("2024-03-02".to_string()),
            end: Some("2024-03-03".to_string()),
            ..params()
        })
        .await
        .unwrap();

    // Ada visited inside the window but her first visit was on March 1st
    assert_eq!(report.stats.total_visits, 4);
    assert_eq!(report.stats.total_visitors, 2);
    assert_eq!(report.stats.first_time_visitors, 1);

    let whole_history = reports.run_params(&params()).await.unwrap();
    assert_eq!(whole_history.stats.first_time_visitors, 2);
}

#[tokio::test]
async fn test_name_filters() {
    let storage = create_test_storage().await;
    seed_scenario(&storage).await;
    let reports = VisitReportQuery::new(Arc::clone(&storage), create_directory());

    let by_first = reports
        .run_params(&ReportParams {
            first_name: Some("GRA".to_string()),
            ..params()
        })
        .await
        .unwrap();
    assert_eq!(by_first.stats.total_visits, 1);
    assert_eq!(by_first.rows[0].member_id, GRACE);

    let by_last = reports
        .run_params(&ReportParams {
            last_name: Some("love".to_string()),
            ..params()
        })
        .await
        .unwrap();
    assert_eq!(by_last.stats.total_visits, 3);
    assert!(by_last.rows.iter().all(|row| row.member_id == ADA));

    let nobody = reports
        .run_params(&ReportParams {
            first_name: Some("Ada".to_string()),
            last_name: Some("Hopper".to_string()),
            ..params()
        })
        .await
        .unwrap();
    assert!(nobody.rows.is_empty());
    assert_eq!(nobody.stats.total_visits, 0);
}

#[tokio::test]
async fn test_unique_keeps_first_occurrence() {
    let storage = create_test_storage().await;
    let [t1, _, _] = seed_scenario(&storage).await;
    let reports = VisitReportQuery::new(Arc::clone(&storage), create_directory());

    let report = reports
        .run(&ReportRequest {
            unique_only: true,
            sort: SortField::MemberName,
            direction: SortDirection::Ascending,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].member_id, ADA);
    assert_eq!(report.rows[0].visited_at, t1, "earliest stored visit survives");
    assert_eq!(report.rows[1].member_id, GRACE);
}

#[tokio::test]
async fn test_unresolved_member_renders_unknown_but_counts() {
    let storage = create_test_storage().await;
    seed_scenario(&storage).await;
    storage.append(GHOST, MARCH_1 + 3 * DAY).await.unwrap();
    let reports = VisitReportQuery::new(Arc::clone(&storage), create_directory());

    let report = reports.run_params(&params()).await.unwrap();
    assert_eq!(report.stats.total_visits, 5);
    assert_eq!(report.stats.total_visitors, 3);

    let ghost = report.rows.iter().find(|r| r.member_id == GHOST).unwrap();
    assert_eq!(ghost.member_name, Enriched::Unknown);
    assert_eq!(ghost.member_first_visit, Enriched::Unknown);
    assert_eq!(ghost.member_last_visit, Enriched::Unknown);

    let json = serde_json::to_value(ghost).unwrap();
    assert_eq!(json["member_name"], "unknown");
    assert_eq!(json["member_first_visit"], "unknown");
}

#[tokio::test]
async fn test_sort_by_first_visit_ascending() {
    let storage = create_test_storage().await;
    storage.append(GRACE, MARCH_1 + DAY).await.unwrap();
    storage.append(ADA, MARCH_1 + 2 * DAY).await.unwrap();
    storage.append(ADA, MARCH_1).await.unwrap();
    let reports = VisitReportQuery::new(Arc::clone(&storage), create_directory());

    let report = reports
        .run_params(&ReportParams {
            sort: Some("member_first_visit".to_string()),
            direction: Some("asc".to_string()),
            ..params()
        })
        .await
        .unwrap();

    let members: Vec<MemberId> = report.rows.iter().map(|r| r.member_id).collect();
    assert_eq!(members, vec![ADA, ADA, GRACE]);
    // Ada's two rows tie on first visit and keep insertion order
    assert_eq!(report.rows[0].visited_at, MARCH_1 + 2 * DAY);
    assert_eq!(report.rows[1].visited_at, MARCH_1);
}

#[tokio::test]
async fn test_pagination_does_not_change_stats() {
    let storage = create_test_storage().await;
    for i in 0..10 {
        storage.append(ADA, MARCH_1 + i).await.unwrap();
    }
    let reports = VisitReportQuery::new(Arc::clone(&storage), create_directory());

    let report = reports
        .run_params(&ReportParams {
            limit: Some("3".to_string()),
            offset: Some("2".to_string()),
            ..params()
        })
        .await
        .unwrap();

    assert_eq!(report.total_rows, 10);
    assert_eq!(report.stats.total_visits, 10);
    let visited: Vec<i64> = report.rows.iter().map(|r| r.visited_at).collect();
    assert_eq!(visited, vec![MARCH_1 + 7, MARCH_1 + 6, MARCH_1 + 5]);
}

#[tokio::test]
async fn test_invalid_date_is_rejected() {
    let storage = create_test_storage().await;
    let reports = VisitReportQuery::new(Arc::clone(&storage), create_directory());

    let err = reports
        .run_params(&ReportParams {
            start: Some("03/01/2024".to_string()),
            ..params()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::InvalidParameter { field: "start", .. }));
}

#[tokio::test]
async fn test_report_on_uninitialized_store_is_empty() {
    let storage: Arc<dyn VisitStore> =
        Arc::new(SqliteStorage::new("sqlite::memory:", 1).await.unwrap());
    let reports = VisitReportQuery::new(Arc::clone(&storage), create_directory());

    let report = reports.run_params(&params()).await.unwrap();
    assert!(report.rows.is_empty());
    assert_eq!(report.stats.total_visits, 0);
    assert_eq!(report.stats.total_visitors, 0);
    assert_eq!(report.stats.first_time_visitors, 0);
}

#[tokio::test]
async fn test_name_filter_matching_more_members_than_sqlite_variables() {
    let storage = create_test_storage().await;
    let directory = InMemoryMemberDirectory::new();
    for id in 1..=40_000 {
        directory.upsert(profile(id, &format!("Anna{id}"), "Smith"));
    }
    storage.append(7, MARCH_1).await.unwrap();
    storage.append(40_001, MARCH_1).await.unwrap();

    let reports = VisitReportQuery::new(Arc::clone(&storage), Arc::new(directory));
    let report = reports
        .run_params(&ReportParams {
            first_name: Some("a".to_string()),
            ..params()
        })
        .await
        .expect("large member lists bind as one parameter");

    assert_eq!(report.stats.total_visits, 1);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].member_id, 7);
}
