//! Access decisions for the visit log.
//!
//! A pure table over (role, action, target). Visit records are append-only,
//! so no role may edit or delete them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// No credentials
    Anonymous,
    /// Dashboard users who may read reports
    Viewer,
    /// The host authentication subsystem
    Host,
    /// Site administrators
    Admin,
    /// Trusted in-process caller (authentication disabled)
    System,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "anonymous" => Some(Role::Anonymous),
            "viewer" => Some(Role::Viewer),
            "host" => Some(Role::Host),
            "admin" => Some(Role::Admin),
            "system" => Some(Role::System),
            _ => None,
        }
    }

    /// Role a member holds on the dashboard, from host group codes.
    /// The most privileged matching group wins.
    pub fn from_groups(groups: &[String]) -> Self {
        let has = |code: &str| groups.iter().any(|g| g.trim().eq_ignore_ascii_case(code));

        if has("administrators") {
            Role::Admin
        } else if has("report-viewers") {
            Role::Viewer
        } else {
            Role::Anonymous
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Raw visit records
    VisitLog,
    /// The aggregated activity report
    VisitReport,
    /// Per-member first/last visit and count
    MemberSummary,
    /// Cached member profiles synced from the host
    MemberProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

pub fn evaluate(role: Role, action: Action, target: Target) -> Decision {
    use Action::*;
    use Role::*;
    use Target::*;

    let allowed = match (target, action) {
        (VisitLog, Edit | Delete) => false,
        (VisitLog, Create) => matches!(role, Host | System),
        (VisitLog | VisitReport | MemberSummary, View) => matches!(role, Viewer | Admin | System),
        (MemberProfile, Create | Edit) => matches!(role, Host | Admin | System),
        (MemberProfile, Delete) => false,
        (MemberProfile, View) => matches!(role, Viewer | Admin | System),
        (VisitReport | MemberSummary, Create | Edit | Delete) => false,
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny
    }
}
