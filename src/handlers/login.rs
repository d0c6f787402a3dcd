use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

/// ログインリクエスト
///
/// 欠落したフィールドは空文字として扱い、認証失敗に揃える
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    /// 主催者のメールアドレス
    pub email: String,
    /// 主催者のパスワード
    pub senha: String,
}

/// ログインレスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    /// セッショントークン（有効期限1時間）
    pub token: String,
    /// 主催者の最初のペラーダ（存在しない場合は null）
    pub pelada_id: Option<Uuid>,
    pub nome_pelada: Option<String>,
}

/// ログインハンドラー
///
/// POST /login
///
/// 処理フロー:
/// 1. 主催者認証（DB照合）
/// 2. セッショントークン発行
/// 3. 最初のペラーダを付与して返却
///
/// 空の入力も認証失敗（401 `Credenciais inválidas`）として扱う
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let outcome = state
        .auth_service
        .login(&request.email, &request.senha)
        .await?;

    let (pelada_id, nome_pelada) = match outcome.pelada {
        Some(pelada) => (Some(pelada.id), Some(pelada.nome_pelada)),
        None => (None, None),
    };

    Ok(Json(LoginResponse {
        message: "Login realizado com sucesso!".to_string(),
        token: outcome.token,
        pelada_id,
        nome_pelada,
    }))
}
