use axum::{
    extract::{Query, State},
    middleware,
    response::Response,
    routing::get,
    Router,
};
use nt_core::Category;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::error::internal_error_response;
use crate::{handlers, stream, AppState};

pub fn router(state: Arc<AppState>) -> Router {
    let mut gated = Router::new();
    for category in Category::ALL {
        gated = gated.route(
            &format!("/api/{}", category),
            get(
                move |state: State<Arc<AppState>>, query: Query<HashMap<String, String>>| {
                    handlers::get_category(category, state, query)
                },
            ),
        );
    }
    let gated = gated
        .route("/api/quota", get(handlers::quota))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::require_api_key,
        ));

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/api", get(handlers::api_info))
        .route("/api/stream", get(stream::stream_events))
        .merge(gated)
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found);

    with_guards(api).with_state(state)
}

/// Panic recovery and request tracing.
pub fn with_guards<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);
    internal_error_response()
}
