use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use super::ReportError;

/// Report parameters as submitted by the dashboard form.
///
/// Everything is a string so that a malformed optional field can be ignored
/// instead of rejecting the whole request. Only the date bounds are validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportParams {
    /// `YYYY-MM-DD`, inclusive from 00:00:00 UTC
    pub start: Option<String>,
    /// `YYYY-MM-DD`, inclusive until 23:59:59 UTC
    pub end: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Checkbox value; any of `on`, `true`, `1`, `yes` enables it
    pub unique: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    VisitDate,
    MemberName,
    MemberFirstVisit,
    MemberLastVisit,
}

impl SortField {
    /// Lenient parse: case, `_` and `-` are ignored
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "created" | "visit" | "visitdate" | "date" => Some(SortField::VisitDate),
            "membername" | "name" => Some(SortField::MemberName),
            "memberfirstvisit" | "firstvisit" => Some(SortField::MemberFirstVisit),
            "memberlastvisit" | "lastvisit" => Some(SortField::MemberLastVisit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// Validated report request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportRequest {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub unique_only: bool,
    pub sort: SortField,
    pub direction: SortDirection,
    /// `None` returns every row
    pub limit: Option<usize>,
    pub offset: usize,
}

impl ReportRequest {
    pub fn parse(params: &ReportParams) -> Result<Self, ReportError> {
        let start = non_empty(&params.start)
            .map(|value| parse_date(value, "start", NaiveTime::MIN))
            .transpose()?;
        let end = non_empty(&params.end)
            .map(|value| parse_date(value, "end", end_of_day()))
            .transpose()?;

        let sort = match non_empty(&params.sort) {
            None => SortField::default(),
            Some(value) => SortField::parse(value).unwrap_or_else(|| {
                tracing::warn!(sort = value, "unknown sort field, sorting by visit date");
                SortField::default()
            }),
        };

        let direction = match non_empty(&params.direction) {
            None => SortDirection::default(),
            Some(value) => SortDirection::parse(value).unwrap_or_else(|| {
                tracing::warn!(direction = value, "unknown sort direction, using descending");
                SortDirection::default()
            }),
        };

        let unique_only = non_empty(&params.unique).is_some_and(|value| {
            matches!(
                value.to_lowercase().as_str(),
                "on" | "true" | "1" | "yes"
            )
        });

        Ok(Self {
            start,
            end,
            first_name: non_empty(&params.first_name).map(str::to_string),
            last_name: non_empty(&params.last_name).map(str::to_string),
            unique_only,
            sort,
            direction,
            limit: non_empty(&params.limit).and_then(|v| v.parse().ok()),
            offset: non_empty(&params.offset)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        })
    }

    pub fn has_name_filter(&self) -> bool {
        self.first_name.is_some() || self.last_name.is_some()
    }

    /// Apply a default page size and cap it. A missing or zero limit means
    /// the default page size.
    pub fn with_limit_bounds(mut self, default_limit: usize, max_limit: usize) -> Self {
        let limit = self
            .limit
            .filter(|limit| *limit > 0)
            .unwrap_or(default_limit)
            .clamp(1, max_limit.max(1));
        self.limit = Some(limit);
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

fn parse_date(value: &str, field: &'static str, time: NaiveTime) -> Result<i64, ReportError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(time).and_utc().timestamp())
        .map_err(|_| ReportError::InvalidParameter {
            field,
            value: value.to_string(),
        })
}
