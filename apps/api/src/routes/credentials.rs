use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CredentialRequest {
    pub api_key: String,
}

/// The key itself is never echoed back.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CredentialStatus {
    pub configured: bool,
}

/// PUT /api/v1/credentials
pub async fn handle_set_credentials(
    State(state): State<AppState>,
    Json(req): Json<CredentialRequest>,
) -> Result<Json<CredentialStatus>, AppError> {
    let api_key = req.api_key.trim();
    if api_key.is_empty() {
        return Err(AppError::Validation("Please enter an API key.".to_string()));
    }
    *state.llm_api_key.write().await = Some(api_key.to_string());
    info!("LLM API key updated");
    Ok(Json(CredentialStatus { configured: true }))
}

/// GET /api/v1/credentials
pub async fn handle_get_credentials(State(state): State<AppState>) -> Json<CredentialStatus> {
    Json(CredentialStatus {
        configured: state.llm_api_key.read().await.is_some(),
    })
}
