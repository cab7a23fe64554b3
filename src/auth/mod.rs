use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::config::{ApiKeyConfig, AuthConfig, AuthMode};
use crate::policy::Role;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Role of the caller, attached to every request by [`auth_middleware`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub Role);

pub struct AuthService {
    mode: AuthMode,
    api_keys: Arc<Vec<ApiKeyConfig>>,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            mode: config.mode,
            api_keys: Arc::new(config.api_keys),
        }
    }

    pub fn resolve(&self, key: Option<&str>) -> Role {
        // With authentication disabled every caller is trusted
        if matches!(self.mode, AuthMode::None) {
            return Role::System;
        }

        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return Role::Anonymous;
        };

        self.api_keys
            .iter()
            .find(|candidate| bool::from(candidate.key.as_bytes().ct_eq(key.as_bytes())))
            .map(|candidate| candidate.role)
            .unwrap_or(Role::Anonymous)
    }
}

pub async fn auth_middleware(
    auth_service: Arc<AuthService>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let api_key = headers.get(API_KEY_HEADER).and_then(|h| h.to_str().ok());

    let role = auth_service.resolve(api_key);
    request.extensions_mut().insert(Actor(role));
    next.run(request).await
}
