// src/handlers/system.rs

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{config::AppState, middleware::auth::AuthenticatedSession};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub storage_backend: &'static str,
    pub ai_model: Option<String>,
    pub ai_enabled: bool,
    pub server_time: DateTime<Utc>,
    pub session_issued_at: DateTime<Utc>,
    pub session_expires_at: DateTime<Utc>,
}

// Informações de infraestrutura (versão, backend, modelo de IA)
pub async fn info(
    State(app_state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Json<SystemInfo> {
    let ai_model = app_state.extractor.model().map(str::to_string);

    Json(SystemInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        storage_backend: app_state.store.backend_name(),
        ai_enabled: ai_model.is_some(),
        ai_model,
        server_time: Utc::now(),
        session_issued_at: session.issued_at,
        session_expires_at: session.expires_at,
    })
}
