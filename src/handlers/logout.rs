use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// ログアウトレスポンス
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// ログアウトハンドラー
///
/// POST /logout
///
/// トークンはサーバー側で失効できないため常に成功を返す。
/// クライアントは保持しているトークンを破棄すること。
pub async fn logout(State(state): State<AppState>) -> Json<LogoutResponse> {
    state.auth_service.logout();

    Json(LogoutResponse {
        message: "Logout realizado com sucesso!".to_string(),
    })
}
