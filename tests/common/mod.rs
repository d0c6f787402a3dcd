#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::Value;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

use volleytics::error::AppError;
use volleytics::models::{Organizer, Pelada};
use volleytics::repositories::{
    NewOrganizer, NewPelada, OrganizerRepository, PeladaRepository, RepositoryError,
    RepositoryResult, SequenceAllocator,
};
use volleytics::router::create_router;
use volleytics::services::organizer::Registration;
use volleytics::services::{
    AuthService, EmailSender, EmailService, OrganizerService, PasswordHasher, TokenService,
};
use volleytics::state::AppState;

pub const RESET_URL_BASE: &str = "http://localhost:3000/novaSenha.html";

// === インメモリストア ===

#[derive(Default)]
struct StoreInner {
    organizers: Vec<Organizer>,
    peladas: Vec<Pelada>,
    counters: HashMap<String, i64>,
}

/// PostgreSQL 実装と同じ契約を満たすテスト用ストア
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryStore {
    /// 主催者を残したままペラーダだけを削除
    pub async fn clear_peladas(&self) {
        self.inner.lock().await.peladas.clear();
    }
}

#[async_trait]
impl SequenceAllocator for InMemoryStore {
    async fn next(&self, name: &str) -> RepositoryResult<i64> {
        let mut inner = self.inner.lock().await;
        let seq = inner.counters.entry(name.to_string()).or_insert(0);
        *seq += 1;
        Ok(*seq)
    }
}

#[async_trait]
impl OrganizerRepository for InMemoryStore {
    async fn create_with_pelada(
        &self,
        organizer: NewOrganizer,
        pelada: NewPelada,
    ) -> RepositoryResult<(Organizer, Pelada)> {
        let mut inner = self.inner.lock().await;
        if inner.organizers.iter().any(|o| o.email == organizer.email) {
            return Err(RepositoryError::Conflict("organizers_email_key".to_string()));
        }

        let now = OffsetDateTime::now_utc();
        let created = Organizer {
            id: Uuid::new_v4(),
            organizador_id: organizer.organizador_id,
            nome: organizer.nome,
            email: organizer.email,
            password_hash: organizer.password_hash,
            created_at: now,
            updated_at: now,
        };
        let pelada = Pelada {
            id: Uuid::new_v4(),
            pelada_id: pelada.pelada_id,
            nome_pelada: pelada.nome_pelada,
            organizer_id: created.id,
            created_at: now,
        };

        inner.organizers.push(created.clone());
        inner.peladas.push(pelada.clone());
        Ok((created, pelada))
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Organizer>> {
        let inner = self.inner.lock().await;
        Ok(inner.organizers.iter().find(|o| o.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Organizer>> {
        let inner = self.inner.lock().await;
        Ok(inner.organizers.iter().find(|o| o.id == id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Organizer>> {
        let inner = self.inner.lock().await;
        let mut all = inner.organizers.clone();
        all.sort_by_key(|o| o.organizador_id);
        Ok(all)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> RepositoryResult<bool> {
        let mut inner = self.inner.lock().await;
        match inner.organizers.iter_mut().find(|o| o.id == id) {
            Some(organizer) => {
                organizer.password_hash = password_hash.to_string();
                organizer.updated_at = OffsetDateTime::now_utc();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_organizador_id(
        &self,
        organizador_id: i64,
    ) -> RepositoryResult<Option<Organizer>> {
        let mut inner = self.inner.lock().await;
        let Some(pos) = inner
            .organizers
            .iter()
            .position(|o| o.organizador_id == organizador_id)
        else {
            return Ok(None);
        };
        let removed = inner.organizers.remove(pos);
        inner.peladas.retain(|p| p.organizer_id != removed.id);
        Ok(Some(removed))
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        let mut inner = self.inner.lock().await;
        let count = inner.organizers.len() as u64;
        inner.organizers.clear();
        inner.peladas.clear();
        Ok(count)
    }
}

#[async_trait]
impl PeladaRepository for InMemoryStore {
    async fn find_first_by_organizer(
        &self,
        organizer_id: Uuid,
    ) -> RepositoryResult<Option<Pelada>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .peladas
            .iter()
            .filter(|p| p.organizer_id == organizer_id)
            .min_by_key(|p| p.pelada_id)
            .cloned())
    }

    async fn find_by_organizers(&self, organizer_ids: &[Uuid]) -> RepositoryResult<Vec<Pelada>> {
        let inner = self.inner.lock().await;
        let mut found: Vec<Pelada> = inner
            .peladas
            .iter()
            .filter(|p| organizer_ids.contains(&p.organizer_id))
            .cloned()
            .collect();
        found.sort_by_key(|p| p.pelada_id);
        Ok(found)
    }
}

// === メール送信ダブル ===

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

impl SentEmail {
    /// 本文のリセットリンクからトークンを取り出す
    pub fn reset_token(&self) -> String {
        let start = self
            .html_body
            .find("?token=")
            .expect("reset link present")
            + "?token=".len();
        let rest = &self.html_body[start..];
        let end = rest.find('"').expect("link terminated");
        rest[..end].to_string()
    }
}

#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentEmail>>,
}

impl RecordingSender {
    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        self.sent.lock().await.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

pub struct FailingSender;

#[async_trait]
impl EmailSender for FailingSender {
    async fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> Result<(), AppError> {
        Err(AppError::Delivery("connection refused".to_string()))
    }
}

// === アプリ構築 ===

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<RecordingSender>,
    pub tokens: TokenService,
    pub auth: AuthService,
    pub organizers: OrganizerService,
}

pub fn test_app() -> TestApp {
    let mailer = Arc::new(RecordingSender::default());
    build(mailer.clone(), mailer)
}

pub fn test_app_with_sender(sender: Arc<dyn EmailSender>) -> TestApp {
    build(sender, Arc::new(RecordingSender::default()))
}

fn build(sender: Arc<dyn EmailSender>, mailer: Arc<RecordingSender>) -> TestApp {
    let store = Arc::new(InMemoryStore::default());
    // テスト高速化のため最小コスト
    let hasher = PasswordHasher::new(4).unwrap();
    let tokens = TokenService::new("test-secret", Duration::hours(1)).unwrap();
    let email_service = EmailService::new(sender, RESET_URL_BASE);

    let auth = AuthService::new(
        store.clone(),
        store.clone(),
        hasher,
        tokens.clone(),
        email_service,
    );
    let organizers = OrganizerService::new(store.clone(), store.clone(), store.clone(), hasher);
    let router = create_router(AppState::from_services(auth.clone(), organizers.clone()));

    TestApp {
        router,
        store,
        mailer,
        tokens,
        auth,
        organizers,
    }
}

pub fn registration(nome: &str, email: &str, senha: &str) -> Registration {
    Registration {
        nome: nome.to_string(),
        email: email.to_string(),
        nome_pelada: format!("Pelada da {}", nome),
        senha: senha.to_string(),
    }
}

/// JSON リクエストを送信し、ステータスとボディを返す
pub async fn send_json(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let body = body.map(|json| serde_json::to_string(&json).unwrap());
    send_raw(router, method, uri, body.as_deref()).await
}

/// 任意の文字列ボディを `application/json` として送信する
///
/// レスポンスが JSON でない場合は文字列として返す
pub async fn send_raw(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(text) => {
            builder = builder.header("content-type", "application/json");
            Body::from(text.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, json)
}
