/// 세션/인증 상태
/// 전역 싱글턴 대신 명시적으로 생성해 필요한 곳에 주입한다.
/// 1. init: 저장된 토큰으로 사용자 복원
/// 2. login / register: 토큰 저장 후 사용자 로드
/// 3. logout: 토큰 삭제 및 구독자 알림
// region:    --- Imports
use crate::error::{Error, Result};
use crate::http::{ApiClient, SessionEvent};
use crate::model::{LoginRequest, RegisterRequest, Role, User};
use crate::services::auth;
use crate::storage::{LAST_LOGIN_KEY, USER_ID_KEY};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Session
pub struct Session {
    client: Arc<ApiClient>,
    user: RwLock<Option<User>>,
    initializing: AtomicBool,
}

impl Session {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            user: RwLock::new(None),
            initializing: AtomicBool::new(true),
        }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// 저장된 토큰으로 세션 복원
    pub async fn init(&self) -> Option<User> {
        let user = match self.load_user().await {
            Ok(user) => Some(user),
            Err(e) => {
                info!("{:<12} --> 세션 복원 안 됨: {}", "Session", e);
                None
            }
        };
        self.initializing.store(false, Ordering::SeqCst);
        user
    }

    /// 현재 사용자 다시 조회
    pub async fn refresh(&self) -> Result<User> {
        self.load_user().await
    }

    async fn load_user(&self) -> Result<User> {
        if self.client.token().is_none() {
            self.set_user(None);
            return Err(Error::Unauthorized("로그인이 필요합니다.".to_string()));
        }

        match auth::me(&self.client).await {
            Ok(user) => {
                if let Err(e) = self.client.store().set(USER_ID_KEY, &user.id) {
                    warn!("{:<12} --> 사용자 ID 저장 실패: {:?}", "Session", e);
                }
                self.set_user(Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                // 토큰이 더 이상 유효하지 않음
                self.client.clear_token();
                self.set_user(None);
                Err(e)
            }
        }
    }

    /// 로그인
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = auth::login(&self.client, &request).await?;
        self.establish(response.token).await
    }

    /// 구글 ID 토큰으로 로그인
    pub async fn login_with_google(&self, id_token: &str) -> Result<User> {
        let response = auth::login_with_google(&self.client, id_token).await?;
        self.establish(response.token).await
    }

    /// 회원가입
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        let response = auth::register(&self.client, request).await?;
        self.establish(response.token).await
    }

    async fn establish(&self, token: Option<String>) -> Result<User> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Unauthorized("토큰을 받지 못했습니다.".to_string()))?;
        self.client.set_token(&token)?;

        let user = self.load_user().await?;
        if let Err(e) = self
            .client
            .store()
            .set(LAST_LOGIN_KEY, &Utc::now().to_rfc3339())
        {
            warn!("{:<12} --> 로그인 시각 저장 실패: {:?}", "Session", e);
        }
        self.initializing.store(false, Ordering::SeqCst);
        info!("{:<12} --> 로그인 완료: {}", "Session", user.email);
        self.client.emit(SessionEvent::LoggedIn {
            user_id: user.id.clone(),
        });
        Ok(user)
    }

    /// 로그아웃
    pub fn logout(&self) {
        self.client.clear_token();
        if let Err(e) = self.client.store().remove(USER_ID_KEY) {
            warn!("{:<12} --> 사용자 ID 삭제 실패: {:?}", "Session", e);
        }
        self.set_user(None);
        info!("{:<12} --> 로그아웃", "Session");
        self.client.emit(SessionEvent::LoggedOut);
    }

    /// 현재 사용자 (토큰이 사라졌으면 None)
    pub fn current_user(&self) -> Option<User> {
        if self.client.token().is_none() {
            return None;
        }
        self.user.read().ok().and_then(|u| u.clone())
    }

    /// 사용자 ID: 세션 사용자 우선, 없으면 로컬에 저장된 값
    pub fn resolve_user_id(&self) -> Option<String> {
        self.current_user()
            .map(|u| u.id)
            .filter(|id| !id.is_empty())
            .or_else(|| self.client.store().get(USER_ID_KEY))
            .filter(|id| !id.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.initializing.load(Ordering::SeqCst)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.current_user().is_some_and(|u| u.has_role(role))
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.current_user().is_some_and(|u| u.has_any_role(roles))
    }

    /// 세션 이벤트 구독
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.client.subscribe()
    }

    fn set_user(&self, user: Option<User>) {
        if let Ok(mut guard) = self.user.write() {
            *guard = user;
        }
    }
}
// endregion: --- Session
