// region:    --- Imports
use super::Ack;
use crate::error::Result;
use crate::http::ApiClient;
use crate::model::{Auction, Item, ItemStatus, User};
use tracing::info;

// endregion: --- Imports

// region:    --- Admin

/// 관리자 대시보드
pub async fn get_dashboard(client: &ApiClient) -> Result<serde_json::Value> {
    info!("{:<12} --> 대시보드 조회", "Admin");
    client.get("/admin/dashboard").await
}

/// 사용자 목록
pub async fn list_users(client: &ApiClient) -> Result<Vec<User>> {
    info!("{:<12} --> 사용자 목록 조회", "Admin");
    client.get("/admin/users").await
}

/// 사용자 삭제
pub async fn delete_user(client: &ApiClient, user_id: &str) -> Result<()> {
    info!("{:<12} --> 사용자 삭제 id: {}", "Admin", user_id);
    client
        .delete::<Ack>(&format!("/admin/users/{user_id}"))
        .await
        .map(|_| ())
}

/// 상품 상태 변경
pub async fn update_item_status(
    client: &ApiClient,
    item_id: &str,
    status: ItemStatus,
) -> Result<Item> {
    info!("{:<12} --> 상품 상태 변경 id: {}, {:?}", "Admin", item_id, status);
    client
        .put(
            &format!("/admin/items/{item_id}/status"),
            &serde_json::json!({ "status": status }),
        )
        .await
}

/// 경매 강제 종료
pub async fn close_auction(client: &ApiClient, auction_id: &str) -> Result<Auction> {
    info!("{:<12} --> 경매 강제 종료 id: {}", "Admin", auction_id);
    client
        .post_empty(&format!("/admin/auctions/{auction_id}/close"))
        .await
}

// endregion: --- Admin
