use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{PeladaRepository, RepositoryError, RepositoryResult};
use crate::models::Pelada;

#[derive(Clone)]
pub struct PgPeladaRepository {
    pool: PgPool,
}

impl PgPeladaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PeladaRepository for PgPeladaRepository {
    async fn find_first_by_organizer(
        &self,
        organizer_id: Uuid,
    ) -> RepositoryResult<Option<Pelada>> {
        sqlx::query_as::<_, Pelada>(
            r#"
            SELECT id, pelada_id, nome_pelada, organizer_id, created_at
            FROM peladas
            WHERE organizer_id = $1
            ORDER BY pelada_id
            LIMIT 1
            "#,
        )
        .bind(organizer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)
    }

    async fn find_by_organizers(&self, organizer_ids: &[Uuid]) -> RepositoryResult<Vec<Pelada>> {
        sqlx::query_as::<_, Pelada>(
            r#"
            SELECT id, pelada_id, nome_pelada, organizer_id, created_at
            FROM peladas
            WHERE organizer_id = ANY($1)
            ORDER BY pelada_id
            "#,
        )
        .bind(organizer_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)
    }
}
