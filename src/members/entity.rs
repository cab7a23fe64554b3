use std::sync::Arc;

use crate::hook::LoginHook;
use crate::models::{MemberProfile, VisitRecord};
use crate::policy::{self, Action, Role, Target};
use crate::storage::StorageResult;
use crate::summary::VisitSummaryService;

/// A member together with the visit log it reports its logins to
pub struct Member {
    profile: MemberProfile,
    login_hook: Arc<LoginHook>,
    summaries: VisitSummaryService,
}

impl Member {
    pub fn new(
        profile: MemberProfile,
        login_hook: Arc<LoginHook>,
        summaries: VisitSummaryService,
    ) -> Self {
        Self {
            profile,
            login_hook,
            summaries,
        }
    }

    pub fn profile(&self) -> &MemberProfile {
        &self.profile
    }

    pub fn display_name(&self) -> String {
        self.profile.display_name()
    }

    pub fn role(&self) -> Role {
        Role::from_groups(&self.profile.groups)
    }

    pub fn can(&self, action: Action, target: Target) -> bool {
        policy::evaluate(self.role(), action, target).is_allowed()
    }

    /// Login-success path for interactive logins
    pub async fn logged_in(&self) -> Option<VisitRecord> {
        self.login_hook.on_login(self.profile.id).await
    }

    /// Login-success path for remember-me session restores
    pub async fn auto_logged_in(&self) -> Option<VisitRecord> {
        self.login_hook.on_auto_login(self.profile.id).await
    }

    pub async fn first_logged_in(&self) -> StorageResult<Option<i64>> {
        self.summaries.first_logged_in(self.profile.id).await
    }

    pub async fn last_logged_in(&self) -> StorageResult<Option<i64>> {
        self.summaries.last_logged_in(self.profile.id).await
    }

    pub async fn number_of_visits(&self) -> StorageResult<i64> {
        self.summaries.visit_count(self.profile.id).await
    }
}
