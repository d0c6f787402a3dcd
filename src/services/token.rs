use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::error::AppError;

/// トークンの用途
///
/// セッション用トークンをパスワードリセットに流用できないよう署名対象に含める
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenPurpose {
    Session,
    PasswordReset,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    purpose: TokenPurpose,
    iat: i64,
    exp: i64,
}

/// JWT（HS256）の発行・検証サービス
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// 新しい TokenService を作成
    ///
    /// # Errors
    /// - シークレットが空の場合（署名なしトークンを発行しないため起動時に失敗させる）
    /// - 有効期間が 0 以下の場合（発行直後から失効するトークンになる）
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "SECRET_KEY must not be empty"
            )));
        }

        if ttl <= Duration::ZERO {
            return Err(AppError::Internal(anyhow::anyhow!(
                "TOKEN_TTL_SECS must be positive, got {}",
                ttl.whole_seconds()
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    /// 既定の有効期間でトークンを発行
    pub fn issue(&self, subject: Uuid, purpose: TokenPurpose) -> Result<String, AppError> {
        self.issue_with_ttl(subject, purpose, self.ttl)
    }

    /// 有効期間を指定してトークンを発行
    pub fn issue_with_ttl(
        &self,
        subject: Uuid,
        purpose: TokenPurpose,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: subject.to_string(),
            purpose,
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = ?e, "トークン署名エラー");
            AppError::Internal(anyhow::anyhow!("token signing error"))
        })
    }

    /// トークンを検証して subject を返す
    ///
    /// 署名不正・形式不正・期限切れ・用途不一致はすべて `InvalidToken`
    pub fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<Uuid, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::warn!(error = %e, "トークン検証失敗");
            AppError::InvalidToken
        })?;

        // exp は秒単位のため、同じ秒に入った時点で失効扱い
        if data.claims.exp <= OffsetDateTime::now_utc().unix_timestamp() {
            tracing::warn!("トークン検証失敗: 期限切れ");
            return Err(AppError::InvalidToken);
        }

        if data.claims.purpose != purpose {
            tracing::warn!(
                expected = ?purpose,
                actual = ?data.claims.purpose,
                "トークン用途不一致"
            );
            return Err(AppError::InvalidToken);
        }

        Uuid::parse_str(&data.claims.sub).map_err(|_| AppError::InvalidToken)
    }
}
