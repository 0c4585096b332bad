//src/main.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppConfig, AppState};
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; o padrão é "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar
    let config = AppConfig::from_env()?;
    let app_state = AppState::new(&config).await?;
    let app = build_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    let workspace_routes = Router::new()
        .route(
            "/",
            get(handlers::workspaces::list_workspaces).post(handlers::workspaces::create_workspace),
        )
        .route("/{id}", delete(handlers::workspaces::delete_workspace));

    // Todas exigem o cabeçalho X-Workspace-ID
    let invoice_routes = Router::new()
        .route(
            "/",
            get(handlers::invoices::list_invoices).post(handlers::invoices::create_invoice),
        )
        .route("/duplicate", get(handlers::invoices::check_duplicate))
        .route(
            "/{id}",
            put(handlers::invoices::update_invoice).delete(handlers::invoices::delete_invoice),
        );

    let report_routes = Router::new()
        .route("/summary", get(handlers::reports::summary))
        .route("/global", get(handlers::reports::global))
        .route("/suppliers/{name}", get(handlers::reports::supplier));

    let export_routes = Router::new()
        .route("/csv", get(handlers::transfer::export_csv))
        .route("/pdf", get(handlers::transfer::export_pdf));

    // Tudo aqui passa pelo guardião de sessão
    let protected = Router::new()
        .nest("/workspaces", workspace_routes)
        .nest("/invoices", invoice_routes)
        .nest("/reports", report_routes)
        .nest("/export", export_routes)
        // O arquivo vem inteiro no corpo; o limite padrão do axum (2 MB) é pequeno para PDFs
        .route(
            "/import",
            post(handlers::transfer::import).layer(DefaultBodyLimit::max(app_state.max_upload_bytes)),
        )
        .route("/system/info", get(handlers::system::info))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected)
        .with_state(app_state)
}
