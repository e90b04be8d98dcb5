//! HTTP surface: API routes, middleware and the static site fallback.

use crate::errors::AppError;
use crate::handlers::{self, AppState};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower::{ServiceBuilder, ServiceExt};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Largest accepted lead body. A contact form never comes close.
pub const MAX_LEAD_BODY_BYTES: usize = 64 * 1024;

/// Builds the full application router.
///
/// - `POST /api/send-lead` (body-size and per-IP rate limited)
/// - `GET /api/health`
/// - anything else: a file from the static directory, else its `index.html`
///
/// Rejections raised by the body limit and the rate limiter are rewritten into
/// the same `{success: false, error}` envelope the handler uses.
///
/// The rate limiter keys on client IP, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()` when it is enabled.
pub fn build_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let lead_routes = Router::new()
        .route(
            "/api/send-lead",
            post(handlers::send_lead).get(serve_site),
        )
        .layer(RequestBodyLimitLayer::new(MAX_LEAD_BODY_BYTES));

    let lead_routes = match state.config.rate_limit {
        Some(limit) => {
            let governor_conf = Arc::new(
                GovernorConfigBuilder::default()
                    .per_second(limit.replenish_secs)
                    .burst_size(limit.burst_size)
                    .key_extractor(SmartIpKeyExtractor)
                    .finish()
                    .ok_or_else(|| anyhow::anyhow!("Invalid lead rate limit: {:?}", limit))?,
            );
            lead_routes.layer(ServiceBuilder::new().layer(GovernorLayer {
                config: governor_conf,
            }))
        }
        None => lead_routes,
    };
    let lead_routes = lead_routes.layer(middleware::map_response(envelope_rejection));

    let app = Router::new()
        .route("/api/health", get(handlers::health))
        .merge(lead_routes)
        .fallback(serve_site)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(app)
}

/// Serves the single-page site.
///
/// Paths with a dot-segment (`/.env`, `/.git/config`, `/a/../b`) never reach
/// the filesystem; they get `index.html` like any other unknown route.
pub async fn serve_site(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let static_dir = &state.config.static_dir;
    let index = ServeFile::new(static_dir.join("index.html"));

    let result = if has_hidden_segment(request.uri().path()) {
        tracing::warn!("Blocked hidden path: {}", request.uri().path());
        index
            .oneshot(request)
            .await
            .map(IntoResponse::into_response)
    } else {
        ServeDir::new(static_dir)
            .fallback(index)
            .oneshot(request)
            .await
            .map(IntoResponse::into_response)
    };

    match result {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

/// True when any path segment starts with a dot, percent-encoded or not.
pub fn has_hidden_segment(path: &str) -> bool {
    path.split('/').any(|segment| {
        segment.starts_with('.')
            || segment
                .get(..3)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("%2e"))
    })
}

/// Rewrites plain-text 413/429 middleware rejections into the JSON envelope.
///
/// Headers such as `retry-after` from the rate limiter are kept.
async fn envelope_rejection(response: Response) -> Response {
    let error = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
        StatusCode::TOO_MANY_REQUESTS => AppError::TooManyRequests,
        _ => return response,
    };
    let already_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|ct| ct.as_bytes().starts_with(b"application/json"));
    if already_json {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    let (_, body) = error.into_response().into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Response::from_parts(parts, body)
}

/// Turns a handler panic into the generic 500 envelope.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}
