use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::handlers::{authorize, ApiError};
use crate::auth::Actor;
use crate::hook::LoginHook;
use crate::models::MemberId;
use crate::policy::{Action, Target};

pub struct HookState {
    pub hook: Arc<LoginHook>,
}

#[derive(Debug, Deserialize)]
pub struct LoginEvent {
    pub member_id: MemberId,
    /// Session restored from a remember-me token rather than an interactive login
    #[serde(default)]
    pub auto: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginAck {
    /// Whether a visit row was written
    pub logged: bool,
    pub visit_id: Option<i64>,
}

/// Record a login reported by the host.
///
/// Always answers 202 once the caller is authorized; whether the visit could
/// be stored is reported in the body, never as a failure.
pub async fn member_logged_in(
    State(state): State<Arc<HookState>>,
    Extension(actor): Extension<Actor>,
    Json(event): Json<LoginEvent>,
) -> Result<(StatusCode, Json<LoginAck>), ApiError> {
    authorize(actor, Action::Create, Target::VisitLog)?;

    let record = if event.auto {
        state.hook.on_auto_login(event.member_id).await
    } else {
        state.hook.on_login(event.member_id).await
    };

    Ok((
        StatusCode::ACCEPTED,
        Json(LoginAck {
            logged: record.is_some(),
            visit_id: record.map(|r| r.id),
        }),
    ))
}

pub async fn health_check() -> &'static str {
    "OK"
}
