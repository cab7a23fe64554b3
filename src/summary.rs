//! Per-member visit aggregates.
//!
//! Every call goes back to the store; nothing is cached between calls.

use std::sync::Arc;

use crate::models::{MemberId, MemberVisitSummary};
use crate::storage::{StorageResult, VisitStore};

#[derive(Clone)]
pub struct VisitSummaryService {
    store: Arc<dyn VisitStore>,
}

impl VisitSummaryService {
    pub fn new(store: Arc<dyn VisitStore>) -> Self {
        Self { store }
    }

    pub async fn first_logged_in(&self, member_id: MemberId) -> StorageResult<Option<i64>> {
        self.store.first_visit(member_id).await
    }

    pub async fn last_logged_in(&self, member_id: MemberId) -> StorageResult<Option<i64>> {
        self.store.last_visit(member_id).await
    }

    pub async fn visit_count(&self, member_id: MemberId) -> StorageResult<i64> {
        self.store.count_for(member_id).await
    }

    /// All three aggregates, each read independently
    pub async fn summarize(&self, member_id: MemberId) -> StorageResult<MemberVisitSummary> {
        let (first_visit, last_visit, visit_count) = tokio::try_join!(
            self.first_logged_in(member_id),
            self.last_logged_in(member_id),
            self.visit_count(member_id),
        )?;

        Ok(MemberVisitSummary {
            first_visit,
            last_visit,
            visit_count,
        })
    }
}
