// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal HTTP endpoint for hosts that require a listening port.

use axum::{Router, routing::get};
use stockwatch_core::StockwatchError;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

/// `GET /healthz` answers `ok`; everything else answers with a banner.
pub fn router() -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .fallback(running)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok\n"
}

async fn running() -> &'static str {
    "stockwatch running\n"
}

pub async fn bind(address: &str, port: u16) -> Result<TcpListener, StockwatchError> {
    let addr = format!("{address}:{port}");
    TcpListener::bind(&addr)
        .await
        .map_err(|e| StockwatchError::Internal(format!("failed to bind keepalive to {addr}: {e}")))
}

/// Serves [`router`] on `listener` until `cancel` fires.
pub async fn serve(listener: TcpListener, cancel: CancellationToken) -> Result<(), StockwatchError> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "keepalive endpoint listening");
    }

    axum::serve(listener, router())
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| StockwatchError::Internal(format!("keepalive server error: {e}")))
}
