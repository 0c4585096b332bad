// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, models::auth::Session};

// Guardião das rotas protegidas: exige "Authorization: Bearer <token>" válido
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    let session = app_state.auth_service.validate_token(bearer.token())?;

    // Insere a sessão nos "extensions" da requisição
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

// Extrator para obter a sessão autenticada diretamente nos handlers
pub struct AuthenticatedSession(pub Session);

impl<S> FromRequestParts<S> for AuthenticatedSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(AuthenticatedSession)
            .ok_or(AppError::InvalidToken)
    }
}
