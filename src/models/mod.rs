mod member;
mod visit;

pub use member::{MemberProfile, UpsertMemberRequest};
pub use visit::{Enriched, MemberId, MemberVisitSummary, VisitFilter, VisitRecord};
