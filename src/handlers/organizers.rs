use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::OrganizerWithPeladas;
use crate::services::auth::is_valid_email;
use crate::services::organizer::Registration;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOrganizerRequest {
    pub nome: String,
    pub email: String,
    pub nome_pelada: String,
    pub senha: String, // SecretBox不要（Deserialize後すぐハッシュ化）
}

#[derive(Debug, Serialize)]
pub struct CreateOrganizerResponse {
    pub message: String,
    pub organizador: OrganizerWithPeladas,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /organizadores
///
/// パスワードハッシュは含めない
pub async fn list_organizers(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrganizerWithPeladas>>, AppError> {
    let organizers = state.organizer_service.list().await?;
    Ok(Json(organizers))
}

/// POST /organizadores
///
/// 主催者と初期ペラーダを同時に作成する
///
/// # Security
/// - パスワードはログに出力しない
pub async fn create_organizer(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateOrganizerRequest>,
) -> Result<Json<CreateOrganizerResponse>, AppError> {
    validate_create_request(&request)?;

    let organizador = state
        .organizer_service
        .register(Registration {
            nome: request.nome.trim().to_string(),
            email: request.email.trim().to_string(),
            nome_pelada: request.nome_pelada.trim().to_string(),
            senha: request.senha,
        })
        .await?;

    Ok(Json(CreateOrganizerResponse {
        message: "Organizador e pelada criados com sucesso!".to_string(),
        organizador,
    }))
}

/// DELETE /organizadores/{id}
///
/// 数値でない ID は該当なしとして 404
pub async fn delete_organizer(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.organizer_service.delete(id).await?;

    Ok(Json(MessageResponse {
        message: "Organizador deletado com sucesso!".to_string(),
    }))
}

/// DELETE /organizadores
pub async fn delete_all_organizers(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.organizer_service.delete_all().await?;

    Ok(Json(MessageResponse {
        message: "Todos os organizadores foram deletados com sucesso!".to_string(),
    }))
}

/// 登録リクエストのバリデーション
fn validate_create_request(request: &CreateOrganizerRequest) -> Result<(), AppError> {
    if request.nome.trim().is_empty() {
        return Err(AppError::Validation("O nome é obrigatório.".to_string()));
    }
    if !is_valid_email(request.email.trim()) {
        return Err(AppError::Validation("E-mail inválido.".to_string()));
    }
    if request.nome_pelada.trim().is_empty() {
        return Err(AppError::Validation(
            "O nome da pelada é obrigatório.".to_string(),
        ));
    }
    if request.senha.is_empty() {
        return Err(AppError::Validation("A senha é obrigatória.".to_string()));
    }
    Ok(())
}
