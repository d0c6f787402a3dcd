//! 永続化層
//!
//! サービス層はここで定義するトレイトにのみ依存し、具体的なストレージには依存しない。
//! 本番実装は PostgreSQL (`Pg*`)。

pub mod counter;
pub mod organizer;
pub mod pelada;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Organizer, Pelada};

pub use counter::PgSequenceAllocator;
pub use organizer::PgOrganizerRepository;
pub use pelada::PgPeladaRepository;

/// 主催者IDカウンタ名
pub const ORGANIZADOR_SEQUENCE: &str = "organizadorId";
/// ペラーダIDカウンタ名
pub const PELADA_SEQUENCE: &str = "peladaId";

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// 一意制約違反（制約名を保持）
    #[error("一意制約違反: {0}")]
    Conflict(String),

    #[error("データベースエラー")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// sqlx エラーを変換（UNIQUE 制約違反のみ `Conflict` に振り分け）
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(db_err.constraint().unwrap_or_default().to_string());
        }
        Self::Database(e)
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// 新規主催者
#[derive(Debug, Clone)]
pub struct NewOrganizer {
    pub organizador_id: i64,
    pub nome: String,
    pub email: String,
    pub password_hash: String,
}

/// 新規ペラーダ（所有者は作成時に紐付け）
#[derive(Debug, Clone)]
pub struct NewPelada {
    pub pelada_id: i64,
    pub nome_pelada: String,
}

/// 名前付き連番カウンタ
///
/// 採番はストレージ側で原子的に行うこと（同時登録でも重複・欠番なし）
#[async_trait]
pub trait SequenceAllocator: Send + Sync {
    /// カウンタを1進めて新しい値を返す（初回は 1）
    async fn next(&self, name: &str) -> RepositoryResult<i64>;
}

#[async_trait]
pub trait OrganizerRepository: Send + Sync {
    /// 主催者と初期ペラーダを1単位で作成
    ///
    /// # Errors
    /// - メールアドレス重複時: `RepositoryError::Conflict`
    async fn create_with_pelada(
        &self,
        organizer: NewOrganizer,
        pelada: NewPelada,
    ) -> RepositoryResult<(Organizer, Pelada)>;

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Organizer>>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Organizer>>;

    /// 全主催者（organizador_id 昇順）
    async fn find_all(&self) -> RepositoryResult<Vec<Organizer>>;

    /// パスワードハッシュを更新。対象が存在しなければ `false`
    async fn update_password(&self, id: Uuid, password_hash: &str) -> RepositoryResult<bool>;

    /// 表示用IDで削除し、削除した主催者を返す
    async fn delete_by_organizador_id(
        &self,
        organizador_id: i64,
    ) -> RepositoryResult<Option<Organizer>>;

    /// 全件削除。削除件数を返す
    async fn delete_all(&self) -> RepositoryResult<u64>;
}

#[async_trait]
pub trait PeladaRepository: Send + Sync {
    /// 主催者の最初のペラーダ（pelada_id 最小）
    async fn find_first_by_organizer(&self, organizer_id: Uuid) -> RepositoryResult<Option<Pelada>>;

    /// 複数主催者のペラーダを一括取得（pelada_id 昇順）
    async fn find_by_organizers(&self, organizer_ids: &[Uuid]) -> RepositoryResult<Vec<Pelada>>;
}
