// src/middleware/workspace.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::workspace::Workspace};

// O nome do nosso cabeçalho HTTP customizado
pub const WORKSPACE_ID_HEADER: &str = "x-workspace-id";

// A área de trabalho selecionada, já conferida no armazenamento.
#[derive(Debug, Clone)]
pub struct WorkspaceContext(pub Workspace);

impl WorkspaceContext {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

/// Lê o UUID do cabeçalho. Ausente e malformado são erros distintos.
pub fn workspace_id_from(parts: &Parts) -> Result<Uuid, AppError> {
    let value = parts
        .headers
        .get(WORKSPACE_ID_HEADER)
        .ok_or(AppError::WorkspaceHeaderMissing)?;

    let value_str = value.to_str().map_err(|_| AppError::WorkspaceHeaderInvalid)?;
    Uuid::parse_str(value_str.trim()).map_err(|_| AppError::WorkspaceHeaderInvalid)
}

impl FromRequestParts<AppState> for WorkspaceContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let workspace_id = workspace_id_from(parts)?;
        let workspace = state.workspace_service.require(workspace_id).await?;
        Ok(WorkspaceContext(workspace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder();
        if let Some(value) = header {
            builder = builder.header(WORKSPACE_ID_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn header_must_be_present_and_a_uuid() {
        assert!(matches!(workspace_id_from(&parts(None)), Err(AppError::WorkspaceHeaderMissing)));
        assert!(matches!(
            workspace_id_from(&parts(Some("main"))),
            Err(AppError::WorkspaceHeaderInvalid)
        ));

        let id = Uuid::new_v4();
        assert_eq!(workspace_id_from(&parts(Some(&id.to_string()))).unwrap(), id);
    }
}
