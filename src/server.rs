//! HTTP surface: `GET /PhoneApi/v1/search=<number>`.
//!
//! The response is always `200 OK`; an unusable number is reported through
//! the `{"error": ...}` body, which is part of the API contract.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, info, warn};
use tokio::net::TcpListener;

use crate::lookup::Lookup;

pub const ROUTE_PREFIX: &str = "/PhoneApi/v1";
const SEARCH_PREFIX: &str = "search=";

#[derive(Clone)]
struct ApiState {
  lookup: Arc<Lookup>,
}

/// Builds the application with its single route.
pub fn router(lookup: Arc<Lookup>) -> Router {
  // axum captures whole segments only, so `search=` is matched by hand.
  Router::new()
    .route(&format!("{ROUTE_PREFIX}/{{query}}"), get(search_handler))
    .with_state(ApiState { lookup })
}

async fn search_handler(
  State(state): State<ApiState>,
  Path(query): Path<String>,
) -> Response {
  let Some(number) = query.strip_prefix(SEARCH_PREFIX) else {
    return StatusCode::NOT_FOUND.into_response();
  };
  debug!("API lookup for {number:?}");

  (StatusCode::OK, Json(state.lookup.lookup(number))).into_response()
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!("Failed to listen for Ctrl+C: {e}");
    std::future::pending::<()>().await;
  }
  info!("Interrupt received, shutting down");
}

/// Serves `app` on `addr` until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: &str, app: Router) -> Result<()> {
  let listener = TcpListener::bind(addr)
    .await
    .with_context(|| format!("Failed to bind API server to {addr}"))?;

  info!("API listening on http://{addr}{ROUTE_PREFIX}/search=<number>");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("API server error")
}
