use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::auth::{auth_middleware, AuthService};
use crate::hook::LoginHook;

use super::handlers::{health_check, member_logged_in, HookState};

pub fn create_hook_router(hook: Arc<LoginHook>, auth_service: Arc<AuthService>) -> Router {
    let state = Arc::new(HookState { hook });

    let protected_routes = Router::new()
        .route("/login", post(member_logged_in))
        .route_layer(middleware::from_fn(move |headers, req, next| {
            let auth = Arc::clone(&auth_service);
            auth_middleware(auth, headers, req, next)
        }))
        .with_state(state);

    Router::new()
        .route("/", get(health_check))
        .merge(protected_routes)
}
