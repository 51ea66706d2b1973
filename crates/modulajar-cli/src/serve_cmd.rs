use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use modulajar_core::export::{ExportError, render_html};
use modulajar_core::input::ModuleInput;
use modulajar_core::{ExportFormat, GeneratedModule, Generator, Session, SessionError};

use crate::options_cmd::{OptionCatalog, catalog};

const INDEX_HTML: &str = include_str!("../assets/index.html");

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let status = match &err {
            SessionError::Busy => StatusCode::CONFLICT,
            SessionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SessionError::Generation(e) => {
                tracing::warn!(error = %e, "generation failed");
                StatusCode::BAD_GATEWAY
            }
            SessionError::NothingGenerated => StatusCode::NOT_FOUND,
        };
        Self {
            status,
            message: err.user_message(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// One form session shared by every request, plus the generator behind it.
///
/// The session lock is held only to begin and to finish a submission, never
/// across the generator call.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<Session>>,
    generator: Arc<dyn Generator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            generator,
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, Session>, AppError> {
        self.session
            .lock()
            .map_err(|_| AppError::internal("session state is unavailable"))
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub module: GeneratedModule,
    /// Rendered preview of `content`.
    pub html: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/options", get(options))
        .route("/api/generate", post(generate))
        .route("/api/export/{format}", get(export))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(generator: Arc<dyn Generator>, bind: &str, port: u16) -> Result<()> {
    let model = generator.model().to_owned();
    let app = build_router(AppState::new(generator));
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!(%model, "modulajar serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("modulajar serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn options() -> Json<OptionCatalog> {
    Json(catalog())
}

async fn generate(
    State(state): State<AppState>,
    Json(input): Json<ModuleInput>,
) -> Result<Json<GenerateResponse>, AppError> {
    let pending = {
        let mut session = state.session()?;
        if session.is_busy() {
            return Err(SessionError::Busy.into());
        }
        session.set_input(input);
        session.begin()?
    };

    tracing::info!(
        generator = state.generator.name(),
        model = state.generator.model(),
        teaching_model = %pending.input.teaching_model,
        "generating module"
    );
    // Detached from the request: a dropped handler (client gone, shutdown)
    // must still reach `finish` so the busy flag is cleared.
    let task_state = state.clone();
    let module = tokio::spawn(async move {
        let outcome = task_state.generator.generate(&pending.prompt).await;
        let mut session = task_state.session()?;
        let module = session.finish(pending, outcome)?.clone();
        Ok::<_, AppError>(module)
    })
    .await
    .map_err(|e| AppError::internal(format!("generation task failed: {e}")))??;

    let html = render_html(&module.content);
    Ok(Json(GenerateResponse { module, html }))
}

async fn export(
    State(state): State<AppState>,
    Path(format): Path<String>,
) -> Result<Response, AppError> {
    let format: ExportFormat = format
        .parse()
        .map_err(|e: ExportError| AppError::bad_request(e.to_string()))?;
    let payload = state.session()?.export(format)?;

    let mut response = (StatusCode::OK, payload.body).into_response();
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(payload.mime));
    if let Some(name) = &payload.filename {
        let disposition = format!("attachment; filename=\"{name}\"");
        match HeaderValue::from_bytes(disposition.as_bytes()) {
            Ok(value) => {
                headers.insert(CONTENT_DISPOSITION, value);
            }
            Err(e) => tracing::debug!(
                error = %e,
                filename = %name,
                "omitting content-disposition header"
            ),
        }
    }
    Ok(response)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
