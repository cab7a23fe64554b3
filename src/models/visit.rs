use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;

/// Identifier of a member owned by the host system.
pub type MemberId = i64;

/// One logged login event. Rows are inserted once and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct VisitRecord {
    pub id: i64,
    pub member_id: MemberId,
    /// Unix timestamp (seconds, UTC) of the login
    pub created_at: i64,
}

/// Per-member aggregates derived from the visit log on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemberVisitSummary {
    pub first_visit: Option<i64>,
    pub last_visit: Option<i64>,
    pub visit_count: i64,
}

/// Conjunctive filter over the visit log. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitFilter {
    /// Inclusive lower bound on `created_at`
    pub start: Option<i64>,
    /// Inclusive upper bound on `created_at`
    pub end: Option<i64>,
    /// Restrict to these members. An empty list matches nothing.
    pub member_ids: Option<Vec<MemberId>>,
}

impl VisitFilter {
    /// Whether a timestamp lies inside the filter's date window
    pub fn window_contains(&self, timestamp: i64) -> bool {
        self.start.is_none_or(|start| timestamp >= start)
            && self.end.is_none_or(|end| timestamp <= end)
    }
}

/// A report cell that could not be resolved renders as `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Enriched<T> {
    Unknown,
    Known(T),
}

impl<T> Enriched<T> {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn known(&self) -> Option<&T> {
        match self {
            Enriched::Known(value) => Some(value),
            Enriched::Unknown => None,
        }
    }
}

impl<T> From<Option<T>> for Enriched<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Enriched::Unknown, Enriched::Known)
    }
}

impl<T: Serialize> Serialize for Enriched<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Enriched::Known(value) => value.serialize(serializer),
            Enriched::Unknown => serializer.serialize_str(Enriched::<T>::UNKNOWN),
        }
    }
}
