use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::members::MemberDirectory;
use crate::models::{Enriched, MemberId, MemberProfile, VisitFilter, VisitRecord};
use crate::storage::VisitStore;
use crate::summary::VisitSummaryService;

use super::rows::{dedup_by_member, sort_rows, ReportRow, ReportStats};
use super::{ReportError, ReportParams, ReportRequest};

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub stats: ReportStats,
    /// Row count before pagination
    pub total_rows: usize,
}

/// Member facts looked up once per report run
struct MemberFacts {
    profile: Option<MemberProfile>,
    first_visit: Option<i64>,
    last_visit: Option<i64>,
}

pub struct VisitReportQuery {
    store: Arc<dyn VisitStore>,
    members: Arc<dyn MemberDirectory>,
    summaries: VisitSummaryService,
}

impl VisitReportQuery {
    pub fn new(store: Arc<dyn VisitStore>, members: Arc<dyn MemberDirectory>) -> Self {
        let summaries = VisitSummaryService::new(Arc::clone(&store));
        Self {
            store,
            members,
            summaries,
        }
    }

    pub async fn run_params(&self, params: &ReportParams) -> Result<Report, ReportError> {
        let request = ReportRequest::parse(params)?;
        self.run(&request).await
    }

    pub async fn run(&self, request: &ReportRequest) -> Result<Report, ReportError> {
        let member_ids = if request.has_name_filter() {
            Some(
                self.members
                    .search(request.first_name.as_deref(), request.last_name.as_deref())
                    .await,
            )
        } else {
            None
        };

        let filter = VisitFilter {
            start: request.start,
            end: request.end,
            member_ids,
        };

        let records = self.store.query(&filter).await?;
        let facts = self.collect_facts(&records).await?;

        let stats = compute_stats(&records, &facts, &filter);

        let rows = records
            .iter()
            .map(|record| enrich(record, &facts))
            .collect::<Vec<_>>();

        let mut rows = if request.unique_only {
            dedup_by_member(rows)
        } else {
            rows
        };

        sort_rows(&mut rows, request.sort, request.direction);

        let total_rows = rows.len();
        let rows = rows
            .into_iter()
            .skip(request.offset)
            .take(request.limit.unwrap_or(usize::MAX))
            .collect();

        Ok(Report {
            rows,
            stats,
            total_rows,
        })
    }

    async fn collect_facts(
        &self,
        records: &[VisitRecord],
    ) -> Result<HashMap<MemberId, MemberFacts>, ReportError> {
        let mut facts = HashMap::new();

        for record in records {
            if facts.contains_key(&record.member_id) {
                continue;
            }

            let profile = self.members.get(record.member_id).await;
            if profile.is_none() {
                debug!(member_id = record.member_id, "visit refers to unknown member");
            }

            let first_visit = self.summaries.first_logged_in(record.member_id).await?;
            let last_visit = self.summaries.last_logged_in(record.member_id).await?;

            facts.insert(
                record.member_id,
                MemberFacts {
                    profile,
                    first_visit,
                    last_visit,
                },
            );
        }

        Ok(facts)
    }
}

fn enrich(record: &VisitRecord, facts: &HashMap<MemberId, MemberFacts>) -> ReportRow {
    let resolved = facts
        .get(&record.member_id)
        .and_then(|f| f.profile.as_ref().map(|profile| (profile, f)));

    let (member_name, member_first_visit, member_last_visit): (
        Enriched<String>,
        Enriched<i64>,
        Enriched<i64>,
    ) = match resolved {
        Some((profile, f)) => (
            Enriched::Known(profile.display_name()),
            f.first_visit.into(),
            f.last_visit.into(),
        ),
        None => (Enriched::Unknown, Enriched::Unknown, Enriched::Unknown),
    };

    ReportRow {
        visit_id: record.id,
        member_id: record.member_id,
        visited_at: record.created_at,
        member_name,
        member_link: MemberProfile::edit_link(record.member_id),
        member_first_visit,
        member_last_visit,
    }
}

fn compute_stats(
    records: &[VisitRecord],
    facts: &HashMap<MemberId, MemberFacts>,
    filter: &VisitFilter,
) -> ReportStats {
    let first_time_visitors = facts
        .values()
        .filter(|f| f.first_visit.is_some_and(|t| filter.window_contains(t)))
        .count();

    ReportStats {
        total_visits: records.len(),
        total_visitors: facts.len(),
        first_time_visitors,
    }
}
