use crate::error::AppError;

/// bcrypt のコスト既定値
pub const DEFAULT_COST: u32 = 10;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// パスワードハッシュ化（bcrypt）
///
/// 呼び出しごとにソルトが生成されるため、同じ平文でも異なるハッシュになる
#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    /// # Errors
    /// bcrypt が受け付けないコスト（4〜31 の範囲外）
    pub fn new(cost: u32) -> Result<Self, AppError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "invalid bcrypt cost: {}",
                cost
            )));
        }
        Ok(Self { cost })
    }

    /// パスワードをハッシュ化
    ///
    /// bcrypt は CPU を占有するためブロッキングスレッドで実行する
    pub async fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!(error = ?e, "パスワードハッシュ生成エラー");
                AppError::Internal(anyhow::anyhow!("password hash error"))
            })
    }

    /// パスワードを検証
    ///
    /// 不一致は `Ok(false)`。ハッシュ形式が不正な場合のみエラー
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!(error = ?e, "パスワードハッシュのパースエラー");
                AppError::Internal(anyhow::anyhow!("password hash parse error"))
            })
    }
}
