// region:    --- Imports
use crate::error::Result;
use crate::http::ApiClient;
use crate::model::{AuthResponse, LoginRequest, RegisterRequest, User};
use tracing::info;

// endregion: --- Imports

// region:    --- Auth

/// 로그인
pub async fn login(client: &ApiClient, request: &LoginRequest) -> Result<AuthResponse> {
    info!("{:<12} --> 로그인 요청: {}", "Auth", request.email);
    client.post("/auth/login", request).await
}

/// 회원가입
pub async fn register(client: &ApiClient, request: &RegisterRequest) -> Result<AuthResponse> {
    info!("{:<12} --> 회원가입 요청: {}", "Auth", request.email);
    client.post("/auth/register", request).await
}

/// 현재 사용자 조회
pub async fn me(client: &ApiClient) -> Result<User> {
    info!("{:<12} --> 현재 사용자 조회", "Auth");
    client.get("/auth/me").await
}

/// 구글 로그인 (ID 토큰 교환)
pub async fn login_with_google(client: &ApiClient, id_token: &str) -> Result<AuthResponse> {
    info!("{:<12} --> 구글 로그인 요청", "Auth");
    client
        .post("/auth/google-login", &serde_json::json!({ "idToken": id_token }))
        .await
}

// endregion: --- Auth
