use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{NewOrganizer, NewPelada, OrganizerRepository, RepositoryError, RepositoryResult};
use crate::models::{Organizer, Pelada};

#[derive(Clone)]
pub struct PgOrganizerRepository {
    pool: PgPool,
}

impl PgOrganizerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizerRepository for PgOrganizerRepository {
    /// 主催者と初期ペラーダを同一トランザクションで作成
    ///
    /// # Errors
    /// - UNIQUE制約違反時 (constraint = "organizers_email_key"): `RepositoryError::Conflict`
    async fn create_with_pelada(
        &self,
        organizer: NewOrganizer,
        pelada: NewPelada,
    ) -> RepositoryResult<(Organizer, Pelada)> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from_sqlx)?;

        let created = sqlx::query_as::<_, Organizer>(
            r#"
            INSERT INTO organizers (organizador_id, nome, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, organizador_id, nome, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(organizer.organizador_id)
        .bind(&organizer.nome)
        .bind(&organizer.email)
        .bind(&organizer.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        let pelada = sqlx::query_as::<_, Pelada>(
            r#"
            INSERT INTO peladas (pelada_id, nome_pelada, organizer_id)
            VALUES ($1, $2, $3)
            RETURNING id, pelada_id, nome_pelada, organizer_id, created_at
            "#,
        )
        .bind(pelada.pelada_id)
        .bind(&pelada.nome_pelada)
        .bind(created.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        tx.commit().await.map_err(RepositoryError::from_sqlx)?;

        Ok((created, pelada))
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Organizer>> {
        sqlx::query_as::<_, Organizer>(
            r#"
            SELECT id, organizador_id, nome, email, password_hash, created_at, updated_at
            FROM organizers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Organizer>> {
        sqlx::query_as::<_, Organizer>(
            r#"
            SELECT id, organizador_id, nome, email, password_hash, created_at, updated_at
            FROM organizers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Organizer>> {
        sqlx::query_as::<_, Organizer>(
            r#"
            SELECT id, organizador_id, nome, email, password_hash, created_at, updated_at
            FROM organizers
            ORDER BY organizador_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)
    }

    /// # Note
    /// password_hash はログに出力しないこと
    async fn update_password(&self, id: Uuid, password_hash: &str) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE organizers
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// 所有ペラーダは外部キー (ON DELETE CASCADE) で同時に削除される
    async fn delete_by_organizador_id(
        &self,
        organizador_id: i64,
    ) -> RepositoryResult<Option<Organizer>> {
        sqlx::query_as::<_, Organizer>(
            r#"
            DELETE FROM organizers
            WHERE organizador_id = $1
            RETURNING id, organizador_id, nome, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(organizador_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM organizers")
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from_sqlx)?;

        Ok(result.rows_affected())
    }
}
