use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::{auth_middleware, AuthService};
use crate::config::ReportConfig;
use crate::members::{InMemoryMemberDirectory, MemberDirectory};
use crate::report::VisitReportQuery;
use crate::storage::VisitStore;
use crate::summary::VisitSummaryService;

use super::handlers::{get_member_visits, health_check, upsert_member, AppState};
use super::report::get_report;

pub fn create_api_router(
    store: Arc<dyn VisitStore>,
    directory: Arc<InMemoryMemberDirectory>,
    auth_service: Arc<AuthService>,
    report_config: ReportConfig,
) -> Router {
    let members: Arc<dyn MemberDirectory> = directory.clone();
    let state = Arc::new(AppState {
        directory,
        summaries: VisitSummaryService::new(Arc::clone(&store)),
        reports: VisitReportQuery::new(store, members),
        report_config,
    });

    let protected_routes = Router::new()
        .route("/api/report", get(get_report))
        .route("/api/members/{id}/visits", get(get_member_visits))
        .route("/api/members/{id}", put(upsert_member))
        .route_layer(middleware::from_fn(move |headers, req, next| {
            let auth = Arc::clone(&auth_service);
            auth_middleware(auth, headers, req, next)
        }))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(cors)
}
