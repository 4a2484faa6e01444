use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use nt_core::Category;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ApiError;
use crate::middleware::{Authenticated, API_KEY_HEADER};
use crate::AppState;

pub async fn get_category(
    category: Category,
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let response = state
        .service
        .get_category(
            category,
            params.get("limit").map(String::as_str),
            params.get("page").map(String::as_str),
        )
        .await;
    Json(response)
}

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn api_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut endpoints = Map::new();
    for category in Category::ALL {
        let description = if category.is_unfiltered() {
            "All articles, newest first".to_string()
        } else {
            format!("{} articles, newest first", category)
        };
        endpoints.insert(format!("GET /api/{}", category), Value::String(description));
    }
    endpoints.insert(
        "GET /api/quota".to_string(),
        json!("Usage of the presented API key"),
    );
    endpoints.insert(
        "GET /api/stream".to_string(),
        json!("Server-sent events: connected, heartbeat, new_article"),
    );
    endpoints.insert("GET /health".to_string(), json!("Liveness check"));

    Json(json!({
        "name": "nt news API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoints,
        "parameters": {
            "limit": "1-100, default 20",
            "page": ">= 1, default 1",
        },
        "authentication": {
            "header": API_KEY_HEADER,
            "required": state.service.gate().is_enabled(),
        },
    }))
}

pub async fn quota(Extension(Authenticated(context)): Extension<Authenticated>) -> Response {
    let Some(context) = context else {
        return Json(json!({ "authRequired": false })).into_response();
    };
    let record = context.record;
    Json(json!({
        "authRequired": true,
        "name": record.name,
        "rateLimitPerHour": record.rate_limit_per_hour,
        "requestsThisHour": record.requests_this_hour,
        "remaining": context.decision.remaining,
        "windowResetsAt": context.decision.window_resets_at.to_rfc3339(),
        "isDev": record.is_dev,
    }))
    .into_response()
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
