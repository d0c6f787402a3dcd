use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

// === リセットリクエスト ===

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResetRequestRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ResetRequestResponse {
    pub message: String,
}

/// POST /password-reset-request
///
/// # Errors
/// - 400: メール形式不正
/// - 404: 未登録のメールアドレス
/// - 500: メール送信失敗
pub async fn request_password_reset(
    State(state): State<AppState>,
    AppJson(request): AppJson<ResetRequestRequest>,
) -> Result<Json<ResetRequestResponse>, AppError> {
    // 形式チェックはサービス側で実施（前後の空白も不正な形式として扱う）
    state
        .auth_service
        .request_password_reset(&request.email)
        .await?;

    Ok(Json(ResetRequestResponse {
        message: "E-mail de redefinição enviado com sucesso!".to_string(),
    }))
}

// === パスワードリセット実行 ===

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub nova_senha: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub message: String,
}

/// POST /password-reset
///
/// # Security
/// - token, nova_senha はログに出力しない
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(request): AppJson<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>, AppError> {
    validate_reset_password_request(&request)?;

    state
        .auth_service
        .reset_password(&request.token, &request.nova_senha)
        .await?;

    Ok(Json(ResetPasswordResponse {
        message: "Senha redefinida com sucesso.".to_string(),
    }))
}

/// リセットパスワードリクエストのバリデーション
fn validate_reset_password_request(request: &ResetPasswordRequest) -> Result<(), AppError> {
    if request.token.trim().is_empty() {
        return Err(AppError::InvalidToken);
    }
    if request.nova_senha.is_empty() {
        return Err(AppError::Validation(
            "A nova senha é obrigatória.".to_string(),
        ));
    }
    Ok(())
}
