// region:    --- Imports
use crate::error::Result;
use crate::http::ApiClient;
use crate::model::{Bid, PlaceBidRequest};
use tracing::info;

// endregion: --- Imports

// region:    --- Bids

/// 입찰
pub async fn place_bid(client: &ApiClient, request: &PlaceBidRequest) -> Result<Bid> {
    info!(
        "{:<12} --> 입찰 요청 item: {}, amount: {}",
        "Bids", request.item_id, request.bid_amount
    );
    client.post("/bids", request).await
}

/// 상품 입찰 이력 조회
pub async fn get_bids_for_item(client: &ApiClient, item_id: &str) -> Result<Vec<Bid>> {
    info!("{:<12} --> 상품 입찰 이력 조회 id: {}", "Bids", item_id);
    client.get(&format!("/bids/item/{item_id}")).await
}

/// 내 입찰 조회
pub async fn get_my_bids(client: &ApiClient) -> Result<Vec<Bid>> {
    info!("{:<12} --> 내 입찰 조회", "Bids");
    client.get("/bids/user").await
}

/// 내 상품에 들어온 입찰 조회
pub async fn get_bids_on_my_items(client: &ApiClient) -> Result<Vec<Bid>> {
    info!("{:<12} --> 내 상품 입찰 조회", "Bids");
    client.get("/bids/my-items").await
}

// endregion: --- Bids
