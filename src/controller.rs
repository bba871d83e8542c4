//! # HTTP controller for the key/value service.
//!
//! [`Controller`] exposes the four CRUD endpoints over axum and implements
//! the [`Worker`] contract:
//!
//! - **Setup**: bind the TCP listener; a bind failure is an irrecoverable
//!   setup error.
//! - **Readiness**: fired once the listener is bound and the server is
//!   accepting requests.
//! - **Main phase**: serve until cancellation.
//! - **Teardown**: drain in-flight requests under a capped graceful-shutdown
//!   timeout.
//!
//! ## Endpoints
//! ```text
//! POST /create?key=K&value=V   → 200 "created"
//! GET  /read?key=K             → 200 "<value>"
//! POST /update?key=K&value=V   → 200 "updated"
//! POST /delete?key=K           → 200 "deleted"
//! ```
//!
//! Missing query parameters default to the empty string; validation happens
//! in the model layer. [`AppError`] maps onto status codes: InvalidArgument
//! → 400, NotFound → 404, AlreadyExists → 409, anything else → 500.

use std::future::IntoFuture;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::{AppError, WorkerError};
use crate::model::{Key, Value};
use crate::service::Service;
use crate::workers::{ReadySignal, Worker};

/// Cap on draining in-flight requests during teardown.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP collaborator serving the CRUD endpoints.
pub struct Controller {
    service: Service,
    addr: String,
}

impl Controller {
    /// Creates a controller that will bind `addr` during its setup phase.
    pub fn new(service: Service, addr: impl Into<String>) -> Self {
        Self {
            service,
            addr: addr.into(),
        }
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/create", post(create))
            .route("/read", get(read))
            .route("/update", post(update))
            .route("/delete", post(delete))
            .with_state(self.service.clone())
    }
}

#[async_trait]
impl Worker for Controller {
    fn name(&self) -> &str {
        "controller"
    }

    async fn run(
        &self,
        ctx: CancellationToken,
        ready: Option<ReadySignal>,
    ) -> Result<(), WorkerError> {
        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|err| WorkerError::setup(format!("bind {}: {err}", self.addr)))?;
        info!(addr = %self.addr, "controller listening");

        if let Some(ready) = ready {
            ready.fire();
        }

        let graceful = {
            let ctx = ctx.clone();
            async move { ctx.cancelled().await }
        };
        let server = axum::serve(listener, self.router()).with_graceful_shutdown(graceful);

        tokio::select! {
            res = server.into_future() => match res {
                Ok(()) if ctx.is_cancelled() => Err(WorkerError::Canceled),
                Ok(()) => Err(WorkerError::runtime("server exited unexpectedly")),
                Err(err) => Err(WorkerError::runtime(err)),
            },
            _ = async {
                ctx.cancelled().await;
                tokio::time::sleep(SHUTDOWN_TIMEOUT).await;
            } => Err(WorkerError::teardown(format!(
                "graceful shutdown exceeded {SHUTDOWN_TIMEOUT:?}"
            ))),
        }
    }
}

/// Query parameters carrying a key and a value.
///
/// Absent parameters default to the empty string, mirroring form-value
/// semantics; the model layer decides what is valid.
#[derive(Deserialize)]
struct EntryParams {
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: String,
}

/// Query parameters carrying only a key.
#[derive(Deserialize)]
struct KeyParams {
    #[serde(default)]
    key: String,
}

async fn create(
    State(service): State<Service>,
    Query(params): Query<EntryParams>,
) -> Result<&'static str, AppError> {
    let key = Key::parse(&params.key)?;
    let value = Value::parse(&params.value)?;
    service.create(&key, value).await?;
    Ok("created")
}

async fn read(
    State(service): State<Service>,
    Query(params): Query<KeyParams>,
) -> Result<String, AppError> {
    let key = Key::parse(&params.key)?;
    let value = service.read(&key).await?;
    Ok(value.to_string())
}

async fn update(
    State(service): State<Service>,
    Query(params): Query<EntryParams>,
) -> Result<&'static str, AppError> {
    let key = Key::parse(&params.key)?;
    let value = Value::parse(&params.value)?;
    service.update(&key, value).await?;
    Ok("updated")
}

async fn delete(
    State(service): State<Service>,
    Query(params): Query<KeyParams>,
) -> Result<&'static str, AppError> {
    let key = Key::parse(&params.key)?;
    service.delete(&key).await?;
    Ok("deleted")
}

/// Maps the application error taxonomy to HTTP status codes.
fn http_status(err: &AppError) -> StatusCode {
    match err {
        AppError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::AlreadyExists { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = http_status(&self);
        // Server-side failures get logged with detail; client errors carry
        // their message in the response body and need no diagnostics.
        if status.is_server_error() {
            error!(label = self.as_label(), error = %self, "request failed");
            let body = status.canonical_reason().unwrap_or("Internal Server Error");
            (status, body).into_response()
        } else {
            (status, self.to_string()).into_response()
        }
    }
}
