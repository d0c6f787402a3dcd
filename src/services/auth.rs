use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::Pelada;
use crate::repositories::{OrganizerRepository, PeladaRepository};
use crate::services::password::PasswordHasher;
use crate::services::token::{TokenPurpose, TokenService};
use crate::services::EmailService;

/// タイミング攻撃対策用のダミーハッシュ（cost 10）
const DUMMY_HASH: &str = "$2b$10$CwTycUXWue0Thq9StjUM0uJ8.jfe2nsAmo8ugZsrVuB8Eq0ubuYZy";

/// ログイン結果
#[derive(Debug)]
pub struct LoginOutcome {
    /// セッショントークン
    pub token: String,
    /// 主催者の最初のペラーダ（存在しない場合は None）
    pub pelada: Option<Pelada>,
}

/// 認証サービス
///
/// ログイン・ログアウト・パスワードリセットの各フローを担う
#[derive(Clone)]
pub struct AuthService {
    organizer_repo: Arc<dyn OrganizerRepository>,
    pelada_repo: Arc<dyn PeladaRepository>,
    hasher: PasswordHasher,
    tokens: TokenService,
    email_service: EmailService,
}

impl AuthService {
    /// 新しい AuthService を作成
    pub fn new(
        organizer_repo: Arc<dyn OrganizerRepository>,
        pelada_repo: Arc<dyn PeladaRepository>,
        hasher: PasswordHasher,
        tokens: TokenService,
        email_service: EmailService,
    ) -> Self {
        Self {
            organizer_repo,
            pelada_repo,
            hasher,
            tokens,
            email_service,
        }
    }

    /// ログイン
    ///
    /// # Security
    /// - メール不在とパスワード不一致は同じ `InvalidCredentials` を返す
    /// - メール不在時もダミーのパスワード検証を実行（応答時間による推測防止）
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let organizer = match self.organizer_repo.find_by_email(email).await? {
            Some(organizer) => organizer,
            None => {
                let _ = self.hasher.verify(password, DUMMY_HASH).await;
                tracing::warn!(email = %email, "認証失敗: 主催者不在");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &organizer.password_hash).await? {
            tracing::warn!(email = %email, "認証失敗: パスワード不一致");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(organizer.id, TokenPurpose::Session)?;

        // ペラーダ取得は補助情報のため失敗してもログインは成功させる
        let pelada = match self.pelada_repo.find_first_by_organizer(organizer.id).await {
            Ok(pelada) => pelada,
            Err(e) => {
                tracing::warn!(error = ?e, organizer_id = %organizer.id, "ペラーダ取得失敗");
                None
            }
        };

        tracing::info!(organizer_id = %organizer.id, "ログイン成功");

        Ok(LoginOutcome { token, pelada })
    }

    /// ログアウト
    ///
    /// トークンはサーバー側で管理していないため無効化する状態はない
    pub fn logout(&self) {
        tracing::info!("ログアウト");
    }

    /// パスワードリセットを要求
    ///
    /// トークンは呼び出し元に返さず、メールでのみ送付する
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        if !is_valid_email(email) {
            return Err(AppError::Validation("E-mail inválido.".to_string()));
        }

        let organizer = self
            .organizer_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::EmailNotFound)?;

        let token = self
            .tokens
            .issue(organizer.id, TokenPurpose::PasswordReset)?;

        self.email_service
            .send_password_reset_email(&organizer.email, &organizer.nome, &token)
            .await?;

        tracing::info!(organizer_id = %organizer.id, "パスワードリセット要求受付");

        Ok(())
    }

    /// パスワードをリセット
    ///
    /// # Security
    /// トークン・新パスワードはログに出力しない
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let organizer_id: Uuid = self.tokens.verify(token, TokenPurpose::PasswordReset)?;

        let organizer = self
            .organizer_repo
            .find_by_id(organizer_id)
            .await?
            .ok_or(AppError::OrganizerNotFound)?;

        let password_hash = self.hasher.hash(new_password).await?;

        // 検索後に削除された場合も不在として扱う
        if !self
            .organizer_repo
            .update_password(organizer.id, &password_hash)
            .await?
        {
            return Err(AppError::OrganizerNotFound);
        }

        tracing::info!(organizer_id = %organizer.id, "パスワードリセット完了");

        Ok(())
    }
}

/// `local@domain.tld` 形式のメールアドレスか判定
///
/// 空白と `@` を含まないローカル部・ドメイン部、ドメイン内部に `.` が必要
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
