// src/services/auth.rs

use bcrypt::verify;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::auth::{AuthResponse, Claims, Session, SESSION_SUBJECT},
};

#[derive(Clone)]
pub struct AuthService {
    password_hash: String,
    jwt_secret: String,
    session_hours: i64,
}

impl AuthService {
    pub fn new(password_hash: String, jwt_secret: String, session_hours: i64) -> Self {
        Self { password_hash, jwt_secret, session_hours }
    }

    /// Confere a senha compartilhada e emite um token de sessão.
    pub async fn login(&self, password: &str) -> Result<AuthResponse, AppError> {
        let password_clone = password.to_owned();
        let password_hash_clone = self.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
        ?;

        if !is_password_valid {
            tracing::warn!("🔒 Tentativa de login com senha incorreta");
            return Err(AppError::InvalidCredentials);
        }

        let now = Utc::now();
        let expires_at = now + Duration::hours(self.session_hours);
        let token = self.create_token(now, expires_at)?;

        tracing::info!("🔓 Sessão aberta até {}", expires_at);
        Ok(AuthResponse { token, expires_at })
    }

    pub fn validate_token(&self, token: &str) -> Result<Session, AppError> {
        let mut validation = Validation::default();
        validation.sub = Some(SESSION_SUBJECT.to_string());

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;
        Ok(Session {
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }

    fn create_token(&self, now: DateTime<Utc>, expires_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: SESSION_SUBJECT.to_string(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        // Usa '?' para um tratamento de erro mais limpo
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

fn timestamp(secs: usize) -> Result<DateTime<Utc>, AppError> {
    DateTime::from_timestamp(secs as i64, 0).ok_or(AppError::InvalidToken)
}
