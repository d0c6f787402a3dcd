use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use time::Duration;

use crate::config::Config;
use crate::error::AppError;
use crate::repositories::{PgOrganizerRepository, PgPeladaRepository, PgSequenceAllocator};
use crate::services::{
    AuthService, EmailService, OrganizerService, PasswordHasher, SmtpEmailSender, TokenService,
};

/// アプリケーション共有状態
///
/// axum の State として全ハンドラーで共有される。
/// Clone は必須（axum が内部で clone するため）。
#[derive(Clone)]
pub struct AppState {
    /// 認証サービス
    pub auth_service: AuthService,
    /// 主催者管理サービス
    pub organizer_service: OrganizerService,
}

impl AppState {
    /// PostgreSQL と SMTP を使う本番構成の AppState を作成
    ///
    /// シークレット未設定・0 以下のトークン有効期間・不正な SMTP 設定はここで失敗する（リクエスト時ではなく起動時）
    pub fn new(db_pool: PgPool, config: Config) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let organizer_repo = Arc::new(PgOrganizerRepository::new(db_pool.clone()));
        let pelada_repo = Arc::new(PgPeladaRepository::new(db_pool.clone()));
        let sequences = Arc::new(PgSequenceAllocator::new(db_pool));

        let hasher = PasswordHasher::new(config.bcrypt_cost)?;
        let tokens = TokenService::new(
            config.secret_key.expose_secret(),
            Duration::seconds(config.token_ttl_secs),
        )?;

        let sender = Arc::new(SmtpEmailSender::from_config(&config)?);
        let email_service = EmailService::new(sender, config.password_reset_url_base.clone());

        let auth_service = AuthService::new(
            organizer_repo.clone(),
            pelada_repo.clone(),
            hasher,
            tokens,
            email_service,
        );
        let organizer_service =
            OrganizerService::new(organizer_repo, pelada_repo, sequences, hasher);

        Ok(Self::from_services(auth_service, organizer_service))
    }

    /// 構築済みサービスから AppState を作成
    pub fn from_services(auth_service: AuthService, organizer_service: OrganizerService) -> Self {
        Self {
            auth_service,
            organizer_service,
        }
    }
}
