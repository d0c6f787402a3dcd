use async_trait::async_trait;
use sqlx::PgPool;

use super::{RepositoryError, RepositoryResult, SequenceAllocator};

/// `counters` テーブルによる連番採番
#[derive(Clone)]
pub struct PgSequenceAllocator {
    pool: PgPool,
}

impl PgSequenceAllocator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SequenceAllocator for PgSequenceAllocator {
    /// UPSERT 1文で加算と取得を行う（行ロックにより同時実行でも重複しない）
    async fn next(&self, name: &str) -> RepositoryResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO counters (name, seq)
            VALUES ($1, 1)
            ON CONFLICT (name) DO UPDATE SET seq = counters.seq + 1
            RETURNING seq
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)
    }
}
