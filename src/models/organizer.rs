use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::Pelada;

/// ペラーダ主催者（ログインアカウント）
///
/// `organizador_id` は連番カウンタから採番される表示用ID
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organizer {
    pub id: Uuid,
    pub organizador_id: i64,
    pub nome: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// 所有ペラーダを展開した主催者
#[derive(Debug, Clone, Serialize)]
pub struct OrganizerWithPeladas {
    #[serde(flatten)]
    pub organizer: Organizer,
    pub peladas: Vec<Pelada>,
}
