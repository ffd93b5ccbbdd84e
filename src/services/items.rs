// region:    --- Imports
use super::Ack;
use crate::error::Result;
use crate::http::ApiClient;
use crate::model::{Auction, Item, ItemDraft, ItemStatus, Page, PageRequest};
use tracing::info;

// endregion: --- Imports

// region:    --- Item Queries

/// 모든 상품 조회
pub async fn list_items(client: &ApiClient, page: PageRequest) -> Result<Page<Item>> {
    info!("{:<12} --> 모든 상품 조회 page: {}", "Items", page.page);
    client.get_query("/items", &page).await
}

/// 진행 중인 상품 조회
pub async fn list_active_items(client: &ApiClient, page: PageRequest) -> Result<Page<Item>> {
    info!("{:<12} --> 진행 중 상품 조회 page: {}", "Items", page.page);
    client.get_query("/items/active", &page).await
}

/// 상태별 상품 조회
pub async fn list_items_by_status(
    client: &ApiClient,
    status: ItemStatus,
    page: PageRequest,
) -> Result<Page<Item>> {
    let status = serde_json::to_value(status)?;
    let status = status.as_str().unwrap_or("ACTIVE");
    info!("{:<12} --> 상태별 상품 조회: {}", "Items", status);
    client
        .get_query(&format!("/items/status/{status}"), &page)
        .await
}

/// 판매자별 상품 조회
pub async fn list_items_by_seller(
    client: &ApiClient,
    seller_id: &str,
    page: PageRequest,
) -> Result<Page<Item>> {
    info!("{:<12} --> 판매자별 상품 조회: {}", "Items", seller_id);
    client
        .get_query(&format!("/items/seller/{seller_id}"), &page)
        .await
}

/// 상품 조회
pub async fn get_item(client: &ApiClient, item_id: &str) -> Result<Item> {
    info!("{:<12} --> 상품 조회 id: {}", "Items", item_id);
    client.get(&format!("/items/{item_id}")).await
}

/// 내 상품 조회
pub async fn my_items(client: &ApiClient) -> Result<Vec<Item>> {
    info!("{:<12} --> 내 상품 조회", "Items");
    client.get("/items/mine").await
}

// endregion: --- Item Queries

// region:    --- Item Commands

/// 상품 등록
pub async fn create_item(client: &ApiClient, draft: &ItemDraft) -> Result<Item> {
    info!("{:<12} --> 상품 등록: {}", "Items", draft.title);
    client.post("/items", draft).await
}

/// 상품 수정
pub async fn update_item(client: &ApiClient, item_id: &str, draft: &ItemDraft) -> Result<Item> {
    info!("{:<12} --> 상품 수정 id: {}", "Items", item_id);
    client.put(&format!("/items/{item_id}"), draft).await
}

/// 상품 삭제
pub async fn delete_item(client: &ApiClient, item_id: &str) -> Result<()> {
    info!("{:<12} --> 상품 삭제 id: {}", "Items", item_id);
    client
        .delete::<Ack>(&format!("/items/{item_id}"))
        .await
        .map(|_| ())
}

/// 판매자가 경매 조기 종료
pub async fn close_item(client: &ApiClient, item_id: &str) -> Result<Auction> {
    info!("{:<12} --> 경매 종료 요청 id: {}", "Items", item_id);
    client.post_empty(&format!("/items/{item_id}/close")).await
}

// endregion: --- Item Commands
