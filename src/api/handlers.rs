use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::Actor;
use crate::config::ReportConfig;
use crate::members::{InMemoryMemberDirectory, MemberDirectory};
use crate::models::{Enriched, MemberId, MemberProfile, UpsertMemberRequest};
use crate::policy::{self, Action, Target};
use crate::report::VisitReportQuery;
use crate::summary::VisitSummaryService;

pub struct AppState {
    pub directory: Arc<InMemoryMemberDirectory>,
    pub summaries: VisitSummaryService,
    pub reports: VisitReportQuery,
    pub report_config: ReportConfig,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MemberVisitsResponse {
    pub member_id: MemberId,
    pub member_name: Enriched<String>,
    pub first_logged_in: Option<i64>,
    pub last_visited: Option<i64>,
    pub number_of_visits: i64,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Reject the request unless the policy table allows it
pub fn authorize(actor: Actor, action: Action, target: Target) -> Result<(), ApiError> {
    if policy::evaluate(actor.0, action, target).is_allowed() {
        Ok(())
    } else {
        tracing::debug!(role = ?actor.0, ?action, ?target, "request denied by policy");
        Err(error(StatusCode::FORBIDDEN, "Not allowed"))
    }
}

/// First visit, last visit and visit count for one member
pub async fn get_member_visits(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(member_id): Path<MemberId>,
) -> Result<Json<MemberVisitsResponse>, ApiError> {
    authorize(actor, Action::View, Target::MemberSummary)?;

    let summary = state.summaries.summarize(member_id).await.map_err(|e| {
        tracing::error!("Failed to summarize visits for member {}: {}", member_id, e);
        error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to retrieve member visits",
        )
    })?;

    let member_name = state
        .directory
        .get(member_id)
        .await
        .map(|profile| profile.display_name())
        .into();

    Ok(Json(MemberVisitsResponse {
        member_id,
        member_name,
        first_logged_in: summary.first_visit,
        last_visited: summary.last_visit,
        number_of_visits: summary.visit_count,
    }))
}

/// Host pushes the current profile of a member
pub async fn upsert_member(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(member_id): Path<MemberId>,
    Json(payload): Json<UpsertMemberRequest>,
) -> Result<(StatusCode, Json<MemberProfile>), ApiError> {
    authorize(actor, Action::Edit, Target::MemberProfile)?;

    let profile = payload.into_profile(member_id);
    let created = state.directory.upsert(profile.clone());
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(profile)))
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
