use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Senha inválida")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Cabeçalho X-Workspace-ID ausente")]
    WorkspaceHeaderMissing,

    #[error("Cabeçalho X-Workspace-ID inválido")]
    WorkspaceHeaderInvalid,

    #[error("Área de trabalho não encontrada")]
    WorkspaceNotFound,

    #[error("Fatura não encontrada")]
    InvoiceNotFound,

    #[error("A última área de trabalho não pode ser removida")]
    LastWorkspace,

    #[error("Número de fatura já usado pela fatura {existing_id}")]
    DuplicateInvoiceNumber { existing_id: Uuid },

    #[error("Importação inválida: {0}")]
    InvalidImport(String),

    #[error("Tipo de arquivo não suportado: {0}")]
    UnsupportedFileType(String),

    #[error("Falha ao processar o PDF com a IA: {0}")]
    ExtractionFailed(String),

    #[error("Extração por IA não configurada")]
    ExtractionDisabled,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::WorkspaceHeaderMissing
            | AppError::WorkspaceHeaderInvalid => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::WorkspaceNotFound | AppError::InvoiceNotFound => StatusCode::NOT_FOUND,
            AppError::LastWorkspace | AppError::DuplicateInvoiceNumber { .. } => {
                StatusCode::CONFLICT
            }
            AppError::UnsupportedFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::InvalidImport(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ExtractionFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::ExtractionDisabled => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Os campos do payload chegam em camelCase; os nomes do validator são os do struct.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(camel_case(&field), messages);
                }
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                })
            }
            AppError::DuplicateInvoiceNumber { existing_id } => json!({
                "error": "Já existe uma fatura com este número nesta área de trabalho.",
                "duplicateId": existing_id,
            }),
            // O tracing loga a mensagem detalhada; o cliente recebe uma genérica.
            ref e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                json!({ "error": "Ocorreu um erro inesperado." })
            }
            ref e => {
                if status == StatusCode::BAD_GATEWAY {
                    tracing::error!("Falha na chamada externa: {}", e);
                }
                json!({ "error": e.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_and_not_found_have_distinct_statuses() {
        assert_eq!(AppError::LastWorkspace.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::DuplicateInvoiceNumber { existing_id: Uuid::new_v4() }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::InvoiceNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::UnsupportedFileType("image/png".into()).status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn internal_errors_are_masked() {
        let response = AppError::InternalServerError(anyhow::anyhow!("pool exhausted")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn field_names_become_camel_case() {
        assert_eq!(camel_case("invoice_number"), "invoiceNumber");
        assert_eq!(camel_case("allow_duplicate"), "allowDuplicate");
        assert_eq!(camel_case("amount"), "amount");
    }

    #[tokio::test]
    async fn validation_details_use_wire_field_names() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("required");
        err.message = Some("O campo é obrigatório.".into());
        errors.add("invoice_number", err);

        let response = AppError::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["details"]["invoiceNumber"][0], "O campo é obrigatório.");
        assert!(body["details"].get("invoice_number").is_none());
    }
}
