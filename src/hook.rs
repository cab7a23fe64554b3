//! Login trigger fired by the host authentication subsystem.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{MemberId, VisitRecord};
use crate::storage::{StorageError, VisitStore};

pub struct LoginHook {
    store: Arc<dyn VisitStore>,
}

impl LoginHook {
    pub fn new(store: Arc<dyn VisitStore>) -> Self {
        Self { store }
    }

    /// Called after a successful interactive login
    pub async fn on_login(&self, member_id: MemberId) -> Option<VisitRecord> {
        self.log_visit(member_id, chrono::Utc::now().timestamp()).await
    }

    /// Called after a session was restored from a remember-me token
    pub async fn on_auto_login(&self, member_id: MemberId) -> Option<VisitRecord> {
        self.log_visit(member_id, chrono::Utc::now().timestamp()).await
    }

    /// Append a visit at an explicit time.
    ///
    /// Never fails: login must go through even when the visit table does not
    /// exist yet, so every storage error is absorbed and logged.
    pub async fn log_visit(&self, member_id: MemberId, created_at: i64) -> Option<VisitRecord> {
        if !self.store.is_ready().await {
            debug!(member_id, "visit store not ready, skipping visit log");
            return None;
        }

        match self.store.append(member_id, created_at).await {
            Ok(record) => {
                debug!(member_id, visit_id = record.id, "logged member visit");
                Some(record)
            }
            Err(StorageError::Unavailable) => {
                debug!(member_id, "visit store became unavailable, skipping visit log");
                None
            }
            Err(StorageError::Other(e)) => {
                warn!(member_id, error = %e, "failed to log member visit");
                None
            }
        }
    }
}
