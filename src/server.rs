/// HTTP server exposing the lookup API via axum.
///
/// Provides `AppState` (shared state), `build_router`, and `serve`.
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::{Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::auth::{Authenticator, Caller, bearer_token};
use crate::error::LookupError;
use crate::lookup::{Lookup, LookupResult};

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<Lookup>,
    pub auth: Arc<dyn Authenticator>,
}

// ── Errors ───────────────────────────────────────────────────────────

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "authentication credentials were not provided or are invalid".to_string(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        let status = if err.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::BAD_GATEWAY
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status == StatusCode::UNAUTHORIZED {
            let payload = json!({ "error": "unauthorized", "message": self.message });
            return (
                self.status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(payload),
            )
                .into_response();
        }
        (self.status, self.message).into_response()
    }
}

// ── Router ───────────────────────────────────────────────────────────

pub fn build_router(state: AppState) -> Router {
    let translate = Router::new()
        .route("/translate/", post(translate))
        .route("/translate", post(translate))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_caller,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(translate)
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let router = build_router(state);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Binding HTTP listener");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server encountered an error")?;

    info!("HTTP server exited");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to install Ctrl-C handler: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

// ── Middleware ───────────────────────────────────────────────────────

async fn require_caller(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .and_then(|token| state.auth.authenticate(token))
        .ok_or_else(|| {
            warn!("rejected unauthenticated request");
            ApiError::unauthorized()
        })?;

    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `text` from a urlencoded form or a JSON object body, picked by
/// `Content-Type`. Anything else counts as absent.
fn body_text(content_type: Option<&str>, body: &[u8]) -> Option<String> {
    let is_form = content_type
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);

    if is_form {
        let mut fields: HashMap<String, String> = serde_urlencoded::from_bytes(body).ok()?;
        return fields.remove("text");
    }

    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value.get("text")?.as_str().map(str::to_owned)
}

async fn translate(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok());
    let text = body_text(content_type, &body);
    let query = crate::lookup::Query::from_request(&params, text.as_deref()).inspect_err(|e| {
        info!(caller = %caller.name, "rejected lookup: {e}");
    })?;

    let lookup = state.lookup.clone();
    let result: LookupResult = tokio::task::spawn_blocking(move || lookup.run(&query))
        .await
        .map_err(|e| ApiError::internal(format!("lookup task failed: {e}")))?;

    let status = if result.all_failed() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    Ok((status, Json(result)).into_response())
}
