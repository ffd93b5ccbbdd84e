use crate::error::Result;
use crate::http::ApiClient;
use crate::model::{Auction, Page, PageRequest};
use tracing::info;

/// 경매 목록 조회
pub async fn list_auctions(client: &ApiClient, page: PageRequest) -> Result<Page<Auction>> {
    info!("{:<12} --> 경매 목록 조회", "Auctions");
    client.get_query("/auctions", &page).await
}

/// 진행 중 경매 조회
pub async fn list_active_auctions(client: &ApiClient) -> Result<Vec<Auction>> {
    info!("{:<12} --> 진행 중 경매 조회", "Auctions");
    client.get("/auctions/active").await
}

/// 경매 조회
pub async fn get_auction(client: &ApiClient, auction_id: &str) -> Result<Auction> {
    info!("{:<12} --> 경매 조회 id: {}", "Auctions", auction_id);
    client.get(&format!("/auctions/{auction_id}")).await
}
