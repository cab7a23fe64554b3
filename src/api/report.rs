//! Member login activity report handler

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::auth::Actor;
use crate::policy::{Action, Target};
use crate::report::{Report, ReportParams, ReportRequest};

use super::handlers::{authorize, error, ApiError, AppState};

/// Filtered, sorted visit rows plus the stats panel
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Report>, ApiError> {
    authorize(actor, Action::View, Target::VisitReport)?;

    let request = ReportRequest::parse(&params)
        .map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string()))?
        .with_limit_bounds(
            state.report_config.default_limit,
            state.report_config.max_limit,
        );

    match state.reports.run(&request).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!("Failed to build visit report: {}", e);
            Err(error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to build visit report",
            ))
        }
    }
}
