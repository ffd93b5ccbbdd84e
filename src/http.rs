/// REST 백엔드 HTTP 어댑터
/// 1. 베어러 토큰 첨부
/// 2. 401 응답 시 토큰 전역 삭제
/// 3. 응답을 Result 로 정규화
// region:    --- Imports
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::storage::{LocalStore, TOKEN_KEY};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

// endregion: --- Imports

// region:    --- Session Events
/// 세션 변경 알림
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { user_id: String },
    LoggedOut,
    /// 401 응답으로 토큰이 삭제됨
    Expired,
}
// endregion: --- Session Events

// region:    --- Api Client
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<dyn LocalStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn LocalStore>) -> Result<Self> {
        config.validate()?;
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Config(format!("HTTP 클라이언트 생성 실패: {e}")))?;
        let (events, _) = broadcast::channel(16);

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            store,
            events,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 로컬 저장소 반환
    pub fn store(&self) -> &Arc<dyn LocalStore> {
        &self.store
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        if token.is_empty() {
            return Ok(());
        }
        self.store.set(TOKEN_KEY, token)
    }

    pub fn clear_token(&self) {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            warn!("{:<12} --> 토큰 삭제 실패: {:?}", "HttpClient", e);
        }
    }

    /// 세션 이벤트 구독
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        // 구독자가 없으면 무시
        let _ = self.events.send(event);
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::GET, path, |rb| rb).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(Method::GET, path, |rb| rb.query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, |rb| rb.json(body)).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::POST, path, |rb| rb).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, |rb| rb.json(body)).await
    }

    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::PUT, path, |rb| rb).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::DELETE, path, |rb| rb).await
    }

    /// 요청 전송 및 응답 정규화
    async fn send<T, F>(&self, method: Method, path: &str, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("{:<12} --> {} {}", "HttpClient", method, url);

        let mut builder = self.http.request(method.clone(), &url);
        if let Some(token) = self.token() {
            builder = builder.bearer_auth(token);
        }

        let response = build(builder).send().await.map_err(|e| {
            warn!("{:<12} --> 요청 실패 {} {}: {}", "HttpClient", method, path, e);
            Error::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            let raw = if body.trim().is_empty() { "null" } else { body.as_str() };
            return serde_json::from_str(raw).map_err(|e| {
                warn!("{:<12} --> 응답 해석 실패 {}: {}", "HttpClient", path, e);
                Error::Decode(e.to_string())
            });
        }

        let message = error_message(status, &body);
        if status == StatusCode::UNAUTHORIZED {
            info!("{:<12} --> 401 응답, 토큰 삭제", "HttpClient");
            self.clear_token();
            self.emit(SessionEvent::Expired);
            return Err(Error::Unauthorized(message));
        }

        warn!(
            "{:<12} --> 서버 오류 {} {}: {}",
            "HttpClient",
            status.as_u16(),
            path,
            message
        );
        Err(Error::Server {
            status: status.as_u16(),
            message,
        })
    }
}

/// 응답 본문에서 오류 메시지 추출 (message -> error -> 기본 메시지)
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("요청이 실패했습니다 (status {}).", status.as_u16()))
}
// endregion: --- Api Client
