// SPDX-FileCopyrightText: Copyright (c) 2025-2026 The Ordercache Authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! HTTP query endpoint.
//!
//! A thin adapter over [`CacheCoordinator::lookup`]: one route per the
//! lookup operation plus a liveness probe. No caching logic lives here.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use ordercache::{CacheCoordinator, CacheError, Order};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<CacheCoordinator>,
}

/// JSON error body returned for failed lookups.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Build the router for a node.
pub fn router(coordinator: Arc<CacheCoordinator>) -> Router {
    Router::new()
        .route("/v1/orders/{id}", get(get_order_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { coordinator })
}

/// Bind and serve until `cancel_token` fires.
pub async fn serve(
    addr: &str,
    coordinator: Arc<CacheCoordinator>,
    cancel_token: CancellationToken,
) -> anyhow::Result<()> {
    let app = router(coordinator);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    debug!("query endpoint bound to {}", listener.local_addr()?);

    let observer = cancel_token.child_token();
    axum::serve(listener, app)
        .with_graceful_shutdown(observer.cancelled_owned())
        .await?;
    Ok(())
}

async fn get_order_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, Response> {
    match state.coordinator.lookup(&id).await {
        Ok(order) => Ok(Json(order)),
        Err(e) => Err(error_response(&id, e)),
    }
}

fn error_response(key: &str, e: CacheError) -> Response {
    let status = match &e {
        CacheError::NotFound { .. } => StatusCode::NOT_FOUND,
        CacheError::InvalidKey { .. } => StatusCode::BAD_REQUEST,
        CacheError::Storage { .. } | CacheError::Origin { .. } | CacheError::OriginTimeout { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(%key, "lookup failed: {e:#}");
    } else {
        warn!(%key, "lookup rejected: {e}");
    }
    (
        status,
        Json(ErrorBody {
            error: e.to_string(),
        }),
    )
        .into_response()
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use ordercache::bus::StubBus;
    use ordercache::origin::StubOrigin;
    use ordercache::storage::MemoryStore;

    fn test_router() -> Router {
        let bus = StubBus::default();
        let coordinator = Arc::new(CacheCoordinator::new(
            Arc::new(MemoryStore::new()),
            Arc::new(StubOrigin::new()),
            Arc::new(bus),
        ));
        router(coordinator)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_order_returns_full_entity() {
        let app = test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/orders/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], "42");
        assert!(body["customer"].is_string());
        assert!(body["product"].is_string());
        assert!(body["quantity"].is_u64());
        assert!(body["status"].is_string());
    }

    #[tokio::test]
    async fn test_invalid_key_is_bad_request() {
        let app = test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/orders/bad%20key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        struct EmptyOrigin;

        #[async_trait::async_trait]
        impl ordercache::origin::OriginFetcher for EmptyOrigin {
            async fn fetch(&self, _key: &str) -> anyhow::Result<Option<Order>> {
                Ok(None)
            }
        }

        let coordinator = Arc::new(CacheCoordinator::new(
            Arc::new(MemoryStore::new()),
            Arc::new(EmptyOrigin),
            Arc::new(StubBus::default()),
        ));
        let app = router(coordinator);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/orders/absent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bind_failure_carries_the_address() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap().to_string();

        let bus = StubBus::default();
        let coordinator = Arc::new(CacheCoordinator::new(
            Arc::new(MemoryStore::new()),
            Arc::new(StubOrigin::new()),
            Arc::new(bus),
        ));

        let err = serve(&addr, coordinator, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains(&addr));
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
