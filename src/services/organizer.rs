use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{OrganizerWithPeladas, Pelada};
use crate::repositories::{
    NewOrganizer, NewPelada, ORGANIZADOR_SEQUENCE, OrganizerRepository, PELADA_SEQUENCE,
    PeladaRepository, SequenceAllocator,
};
use crate::services::password::PasswordHasher;

/// 主催者登録の入力
#[derive(Debug, Clone)]
pub struct Registration {
    pub nome: String,
    pub email: String,
    pub nome_pelada: String,
    pub senha: String,
}

/// 主催者管理サービス
#[derive(Clone)]
pub struct OrganizerService {
    organizer_repo: Arc<dyn OrganizerRepository>,
    pelada_repo: Arc<dyn PeladaRepository>,
    sequences: Arc<dyn SequenceAllocator>,
    hasher: PasswordHasher,
}

impl OrganizerService {
    pub fn new(
        organizer_repo: Arc<dyn OrganizerRepository>,
        pelada_repo: Arc<dyn PeladaRepository>,
        sequences: Arc<dyn SequenceAllocator>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            organizer_repo,
            pelada_repo,
            sequences,
            hasher,
        }
    }

    /// 主催者と初期ペラーダを登録
    ///
    /// # Security
    /// パスワードは即座にハッシュ化し、平文はログに出力しない
    pub async fn register(
        &self,
        registration: Registration,
    ) -> Result<OrganizerWithPeladas, AppError> {
        let password_hash = self.hasher.hash(&registration.senha).await?;

        let organizador_id = self.sequences.next(ORGANIZADOR_SEQUENCE).await?;
        let pelada_id = self.sequences.next(PELADA_SEQUENCE).await?;

        let (organizer, pelada) = self
            .organizer_repo
            .create_with_pelada(
                NewOrganizer {
                    organizador_id,
                    nome: registration.nome,
                    email: registration.email,
                    password_hash,
                },
                NewPelada {
                    pelada_id,
                    nome_pelada: registration.nome_pelada,
                },
            )
            .await?;

        tracing::info!(
            organizador_id = organizer.organizador_id,
            pelada_id = pelada.pelada_id,
            "主催者登録成功"
        );

        Ok(OrganizerWithPeladas {
            organizer,
            peladas: vec![pelada],
        })
    }

    /// 全主催者をペラーダ展開付きで取得
    pub async fn list(&self) -> Result<Vec<OrganizerWithPeladas>, AppError> {
        let organizers = self.organizer_repo.find_all().await?;
        let ids: Vec<Uuid> = organizers.iter().map(|o| o.id).collect();

        let mut by_owner: HashMap<Uuid, Vec<Pelada>> = HashMap::new();
        for pelada in self.pelada_repo.find_by_organizers(&ids).await? {
            by_owner.entry(pelada.organizer_id).or_default().push(pelada);
        }

        Ok(organizers
            .into_iter()
            .map(|organizer| {
                let peladas = by_owner.remove(&organizer.id).unwrap_or_default();
                OrganizerWithPeladas { organizer, peladas }
            })
            .collect())
    }

    /// 表示用IDで主催者を削除
    pub async fn delete(&self, organizador_id: i64) -> Result<(), AppError> {
        let deleted = self
            .organizer_repo
            .delete_by_organizador_id(organizador_id)
            .await?
            .ok_or(AppError::OrganizerNotFound)?;

        tracing::info!(organizador_id = deleted.organizador_id, "主催者削除");
        Ok(())
    }

    /// 全主催者を削除
    ///
    /// 削除対象がなければ `NothingToDelete`
    pub async fn delete_all(&self) -> Result<u64, AppError> {
        let count = self.organizer_repo.delete_all().await?;
        if count == 0 {
            return Err(AppError::NothingToDelete);
        }

        tracing::info!(count, "全主催者削除");
        Ok(count)
    }
}
