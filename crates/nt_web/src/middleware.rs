use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use nt_auth::AuthContext;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Request extension set by [`require_api_key`]. `None` when the gate is
/// disabled.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Option<AuthContext>);

/// Runs every gated request through the API key check and attaches the
/// admitted record for downstream handlers.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let context = match state.service.authenticate(provided.as_deref()).await.into_result() {
        Ok(context) => context,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let quota = context
        .as_ref()
        .map(|c| (c.decision.limit, c.decision.remaining));
    request.extensions_mut().insert(Authenticated(context));

    let mut response = next.run(request).await;
    if let Some((limit, remaining)) = quota {
        let headers = response.headers_mut();
        headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
        headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    }
    response
}
