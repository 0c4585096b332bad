// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Sujeito fixo do token: existe uma única senha compartilhada, não há usuários.
pub const SESSION_SUBJECT: &str = "session";

// Dados para login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (sempre "session")
    pub exp: usize,  // Expiration time (quando o token expira)
    pub iat: usize,  // Issued At (quando o token foi criado)
}

// A sessão validada, colocada nos "extensions" da requisição pelo middleware
#[derive(Debug, Clone)]
pub struct Session {
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
