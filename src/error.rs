use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::repositories::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    #[error("認証情報が無効です")]
    InvalidCredentials,

    #[error("メールアドレスが登録されていません")]
    EmailNotFound,

    #[error("無効または期限切れのトークンです")]
    InvalidToken,

    #[error("主催者が見つかりません")]
    OrganizerNotFound,

    #[error("削除対象の主催者が存在しません")]
    NothingToDelete,

    #[error("このメールアドレスは既に使用されています")]
    EmailAlreadyExists,

    #[error("メール送信エラー: {0}")]
    Delivery(String),

    #[error("データベースエラー")]
    Database(#[from] sqlx::Error),

    #[error("内部エラー")]
    Internal(#[from] anyhow::Error),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(_) => Self::EmailAlreadyExists,
            RepositoryError::Database(e) => Self::Database(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "リクエストボディの解析失敗");
        Self::Validation("Requisição inválida.".to_string())
    }
}

// パスパラメータは主催者IDのみ（数値でなければ該当なし）
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "パスパラメータの解析失敗");
        Self::OrganizerNotFound
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Credenciais inválidas".to_string(), // 存在有無の漏洩防止
            ),
            Self::EmailNotFound => (
                StatusCode::NOT_FOUND,
                "E-mail não cadastrado.".to_string(),
            ),
            Self::InvalidToken => (
                StatusCode::NOT_FOUND,
                "Token inválido ou expirado.".to_string(),
            ),
            Self::OrganizerNotFound => (
                StatusCode::NOT_FOUND,
                "Organizador não encontrado".to_string(),
            ),
            Self::NothingToDelete => (
                StatusCode::NOT_FOUND,
                "Nenhum organizador encontrado para deletar.".to_string(),
            ),
            Self::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "E-mail já cadastrado.".to_string())
            }
            Self::Delivery(e) => {
                tracing::error!(error = %e, "メール送信エラー");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro ao processar sua solicitação. Tente novamente.".to_string(),
                )
            }
            Self::Database(e) => {
                tracing::error!(error = ?e, "データベースエラー");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            Self::Internal(e) => {
                tracing::error!(error = ?e, "内部エラー");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::EmailNotFound, StatusCode::NOT_FOUND),
            (AppError::InvalidToken, StatusCode::NOT_FOUND),
            (AppError::OrganizerNotFound, StatusCode::NOT_FOUND),
            (AppError::EmailAlreadyExists, StatusCode::CONFLICT),
            (
                AppError::Delivery("smtp down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_conflict_maps_to_email_already_exists() {
        let error: AppError = RepositoryError::Conflict("organizers_email_key".into()).into();
        assert!(matches!(error, AppError::EmailAlreadyExists));
    }
}
