// region:    --- Imports
use super::Ack;
use crate::error::Result;
use crate::http::ApiClient;
use crate::model::Item;
use serde::Deserialize;
use tracing::info;

// endregion: --- Imports

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InWatchlist {
    #[serde(default)]
    in_watchlist: bool,
}

// region:    --- Watchlist

/// 관심 목록 추가
pub async fn add_to_watchlist(client: &ApiClient, item_id: &str) -> Result<()> {
    info!("{:<12} --> 관심 목록 추가 id: {}", "Watchlist", item_id);
    client
        .post_empty::<Ack>(&format!("/watchlist/{item_id}"))
        .await
        .map(|_| ())
}

/// 관심 목록 제거
pub async fn remove_from_watchlist(client: &ApiClient, item_id: &str) -> Result<()> {
    info!("{:<12} --> 관심 목록 제거 id: {}", "Watchlist", item_id);
    client
        .delete::<Ack>(&format!("/watchlist/{item_id}"))
        .await
        .map(|_| ())
}

/// 관심 목록 조회
pub async fn get_watchlist(client: &ApiClient) -> Result<Vec<Item>> {
    info!("{:<12} --> 관심 목록 조회", "Watchlist");
    client.get("/watchlist").await
}

/// 관심 목록 포함 여부
pub async fn check_watchlist(client: &ApiClient, item_id: &str) -> Result<bool> {
    client
        .get::<InWatchlist>(&format!("/watchlist/check/{item_id}"))
        .await
        .map(|w| w.in_watchlist)
}

// endregion: --- Watchlist
