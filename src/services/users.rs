// region:    --- Imports
use super::Ack;
use crate::error::Result;
use crate::http::ApiClient;
use crate::model::User;
use serde::Serialize;
use tracing::info;

// endregion: --- Imports

/// 프로필 수정 요청
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// 내 프로필 조회
pub async fn get_profile(client: &ApiClient) -> Result<User> {
    info!("{:<12} --> 프로필 조회", "Users");
    client.get("/users/profile").await
}

/// 프로필 수정
pub async fn update_profile(client: &ApiClient, update: &ProfileUpdate) -> Result<User> {
    info!("{:<12} --> 프로필 수정", "Users");
    client.put("/users/profile", update).await
}

/// 사용자 조회
pub async fn get_user(client: &ApiClient, user_id: &str) -> Result<User> {
    info!("{:<12} --> 사용자 조회 id: {}", "Users", user_id);
    client.get(&format!("/users/{user_id}")).await
}

/// 사용자 통계
pub async fn get_user_stats(client: &ApiClient) -> Result<serde_json::Value> {
    client.get("/users/stats").await
}

/// 판매자 역할 신청
pub async fn request_seller_role(client: &ApiClient) -> Result<()> {
    info!("{:<12} --> 판매자 역할 신청", "Users");
    client
        .post_empty::<Ack>("/users/roles/seller")
        .await
        .map(|_| ())
}
