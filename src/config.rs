// src/config.rs

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::{env, sync::Arc, time::Duration};

use crate::{
    db::{InMemoryInvoiceStore, InvoiceStore, PgInvoiceStore},
    services::{
        auth::AuthService,
        document_service::DocumentService,
        extraction_service::{GeminiExtractor, InvoiceExtractor},
        import_service::ImportService,
        invoice_service::InvoiceService,
        workspace_service::WorkspaceService,
    },
};

pub const DEFAULT_MAX_UPLOAD_MB: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

// Tudo o que vem do ambiente (.env)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub password_hash: String,
    pub jwt_secret: String,
    pub session_hours: i64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub bind_addr: String,
    pub fonts_dir: String,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let storage = match optional("STORAGE_BACKEND").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => anyhow::bail!("STORAGE_BACKEND inválido: '{}' (use postgres ou memory)", other),
        };

        let database_url = optional("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL deve ser definida");
        }

        let session_hours = match optional("SESSION_HOURS") {
            Some(raw) => raw
                .parse::<i64>()
                .with_context(|| format!("SESSION_HOURS inválido: '{}'", raw))?,
            None => 12,
        };

        // Limite do corpo em /api/import. O padrão acompanha o limite de dados inline do Gemini.
        let max_upload_mb = match optional("MAX_UPLOAD_MB") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("MAX_UPLOAD_MB inválido: '{}'", raw))?,
            None => DEFAULT_MAX_UPLOAD_MB,
        };

        Ok(Self {
            storage,
            database_url,
            password_hash: required("APP_PASSWORD_HASH")?,
            jwt_secret: required("JWT_SECRET")?,
            session_hours,
            gemini_api_key: optional("GEMINI_API_KEY"),
            gemini_model: optional("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.5-flash".to_string()),
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            fonts_dir: optional("FONTS_DIR").unwrap_or_else(|| "./fonts".to_string()),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    optional(key).with_context(|| format!("{} deve ser definido", key))
}

// Variável vazia conta como ausente
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InvoiceStore>,
    pub extractor: Arc<dyn InvoiceExtractor>,
    pub auth_service: AuthService,
    pub workspace_service: WorkspaceService,
    pub invoice_service: InvoiceService,
    pub import_service: ImportService,
    pub document_service: DocumentService,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn InvoiceStore> = match config.storage {
            StorageBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL deve ser definida")?;

                // Conecta ao banco de dados, usando '?' para propagar erros
                let db_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!().run(&db_pool).await?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Arc::new(PgInvoiceStore::new(db_pool))
            }
            StorageBackend::Memory => {
                tracing::warn!("⚠️ Armazenamento em memória: nada será persistido");
                Arc::new(InMemoryInvoiceStore::new())
            }
        };

        if config.gemini_api_key.is_none() {
            tracing::warn!("⚠️ GEMINI_API_KEY ausente: importação de PDF desativada");
        }
        let extractor: Arc<dyn InvoiceExtractor> = Arc::new(GeminiExtractor::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        ));

        Ok(Self::with_parts(config, store, extractor))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_parts(
        config: &AppConfig,
        store: Arc<dyn InvoiceStore>,
        extractor: Arc<dyn InvoiceExtractor>,
    ) -> Self {
        Self {
            auth_service: AuthService::new(
                config.password_hash.clone(),
                config.jwt_secret.clone(),
                config.session_hours,
            ),
            workspace_service: WorkspaceService::new(store.clone()),
            invoice_service: InvoiceService::new(store.clone()),
            import_service: ImportService::new(store.clone(), extractor.clone()),
            document_service: DocumentService::new(config.fonts_dir.clone()),
            max_upload_bytes: config.max_upload_bytes,
            store,
            extractor,
        }
    }
}
