use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;
use crate::error::AppError;
use secrecy::ExposeSecret;

const RESET_EMAIL_SUBJECT: &str = "Redefinição de Senha - Volleytics";

/// メール送信手段
///
/// 失敗は `AppError::Delivery` で返す。リトライは行わない（呼び出し側の判断）
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}

/// SMTP（STARTTLS）によるメール送信
#[derive(Clone)]
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    /// 設定からトランスポートを構築（接続は送信時に行う）
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let from: Mailbox = config.email_user.parse().map_err(|e| {
            AppError::Internal(anyhow::anyhow!("invalid EMAIL_USER address: {}", e))
        })?;

        let credentials = Credentials::new(
            config.email_user.clone(),
            config.email_password.expose_secret().clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid SMTP relay: {}", e)))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::Delivery(format!("invalid recipient: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| AppError::Delivery(format!("message build error: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Delivery(e.to_string()))?;

        Ok(())
    }
}

/// メール送信サービス
#[derive(Clone)]
pub struct EmailService {
    sender: Arc<dyn EmailSender>,
    reset_url_base: String,
}

impl EmailService {
    /// 新しい EmailService を作成
    pub fn new(sender: Arc<dyn EmailSender>, reset_url_base: impl Into<String>) -> Self {
        Self {
            sender,
            reset_url_base: reset_url_base.into(),
        }
    }

    /// パスワードリセットメールを送信
    ///
    /// # Security
    /// リセットURL（トークンを含む）はログに出力しない
    pub async fn send_password_reset_email(
        &self,
        to: &str,
        nome: &str,
        token: &str,
    ) -> Result<(), AppError> {
        let reset_url = self.build_reset_url(token);
        let body = render_reset_email(nome, &reset_url);

        self.sender.send(to, RESET_EMAIL_SUBJECT, &body).await?;

        tracing::info!(to = %to, "パスワードリセットメール送信");
        Ok(())
    }

    /// リセットURLを構築
    fn build_reset_url(&self, token: &str) -> String {
        format!("{}?token={}", self.reset_url_base, token)
    }
}

fn render_reset_email(nome: &str, reset_url: &str) -> String {
    format!(
        r#"<h2>Redefinição de Senha</h2>
<p>Olá, {nome},</p>
<p>Você solicitou a redefinição de sua senha. Clique no link abaixo para redefinir:</p>
<a href="{url}" target="_blank">Redefinir Senha</a>
<p><strong>O link é válido por 1 hora.</strong></p>
<p>Se você não solicitou essa redefinição, ignore este e-mail.</p>
<p>Atenciosamente,</p>
<p>Equipe Volleytics</p>
"#,
        nome = escape_html(nome),
        url = reset_url,
    )
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
