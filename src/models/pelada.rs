use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// ペラーダ（草試合）
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pelada {
    pub id: Uuid,
    pub pelada_id: i64,
    pub nome_pelada: String,
    #[serde(rename = "organizador")]
    pub organizer_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
