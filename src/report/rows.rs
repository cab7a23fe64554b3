use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{Enriched, MemberId};

use super::{SortDirection, SortField};

/// One visit enriched with member facts, as rendered in the report table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub visit_id: i64,
    pub member_id: MemberId,
    pub visited_at: i64,
    pub member_name: Enriched<String>,
    pub member_link: String,
    pub member_first_visit: Enriched<i64>,
    pub member_last_visit: Enriched<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    pub total_visits: usize,
    pub total_visitors: usize,
    pub first_time_visitors: usize,
}

/// Keep the first row seen for each member, preserving order
pub fn dedup_by_member(rows: Vec<ReportRow>) -> Vec<ReportRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.member_id))
        .collect()
}

/// Stable sort; rows with equal keys keep their relative order in either direction
pub fn sort_rows(rows: &mut [ReportRow], field: SortField, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare(a: &ReportRow, b: &ReportRow, field: SortField) -> Ordering {
    match field {
        SortField::VisitDate => a.visited_at.cmp(&b.visited_at),
        SortField::MemberName => {
            let key = |row: &ReportRow| row.member_name.known().map(|name| name.to_lowercase());
            key(a).cmp(&key(b))
        }
        SortField::MemberFirstVisit => a.member_first_visit.cmp(&b.member_first_visit),
        SortField::MemberLastVisit => a.member_last_visit.cmp(&b.member_last_visit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(visit_id: i64, member_id: MemberId, visited_at: i64, name: Option<&str>) -> ReportRow {
        ReportRow {
            visit_id,
            member_id,
            visited_at,
            member_name: name.map(str::to_string).into(),
            member_link: String::new(),
            member_first_visit: Enriched::Unknown,
            member_last_visit: Enriched::Unknown,
        }
    }

    fn ids(rows: &[ReportRow]) -> Vec<i64> {
        rows.iter().map(|r| r.visit_id).collect()
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let rows = vec![
            row(1, 10, 300, None),
            row(2, 20, 200, None),
            row(3, 10, 100, None),
        ];
        assert_eq!(ids(&dedup_by_member(rows)), vec![1, 2]);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let rows = vec![
            row(1, 10, 1, None),
            row(2, 10, 2, None),
            row(3, 20, 3, None),
            row(4, 30, 4, None),
            row(5, 20, 5, None),
        ];
        let once = dedup_by_member(rows);
        let twice = dedup_by_member(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_is_stable_for_ties_in_both_directions() {
        let rows = vec![
            row(1, 10, 100, None),
            row(2, 10, 200, None),
            row(3, 20, 200, None),
            row(4, 10, 300, None),
        ];

        let mut descending = rows.clone();
        sort_rows(&mut descending, SortField::VisitDate, SortDirection::Descending);
        assert_eq!(ids(&descending), vec![4, 2, 3, 1]);

        let mut ascending = rows;
        sort_rows(&mut ascending, SortField::VisitDate, SortDirection::Ascending);
        assert_eq!(ids(&ascending), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sort_by_name_ignores_case_and_puts_unknown_first() {
        let mut rows = vec![
            row(1, 10, 0, Some("bob")),
            row(2, 20, 0, None),
            row(3, 30, 0, Some("Alice")),
            row(4, 40, 0, Some("alice")),
        ];
        sort_rows(&mut rows, SortField::MemberName, SortDirection::Ascending);
        assert_eq!(ids(&rows), vec![2, 3, 4, 1]);
    }
}
