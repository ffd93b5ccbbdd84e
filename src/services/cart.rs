// region:    --- Imports
use super::Ack;
use crate::error::Result;
use crate::http::ApiClient;
use crate::model::Item;
use serde::Deserialize;
use tracing::info;

// endregion: --- Imports

#[derive(Deserialize)]
struct CartCount {
    #[serde(default)]
    count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InCart {
    #[serde(default)]
    in_cart: bool,
}

// region:    --- Cart

/// 장바구니 담기
pub async fn add_to_cart(client: &ApiClient, item_id: &str) -> Result<()> {
    info!("{:<12} --> 장바구니 담기 id: {}", "Cart", item_id);
    client
        .post_empty::<Ack>(&format!("/cart/{item_id}"))
        .await
        .map(|_| ())
}

/// 장바구니 빼기
pub async fn remove_from_cart(client: &ApiClient, item_id: &str) -> Result<()> {
    info!("{:<12} --> 장바구니 빼기 id: {}", "Cart", item_id);
    client
        .delete::<Ack>(&format!("/cart/{item_id}"))
        .await
        .map(|_| ())
}

/// 장바구니 비우기
pub async fn clear_cart(client: &ApiClient) -> Result<()> {
    info!("{:<12} --> 장바구니 비우기", "Cart");
    client.delete::<Ack>("/cart").await.map(|_| ())
}

/// 장바구니 상품 조회
pub async fn get_cart_items(client: &ApiClient) -> Result<Vec<Item>> {
    info!("{:<12} --> 장바구니 조회", "Cart");
    client.get("/cart").await
}

/// 장바구니 개수
pub async fn get_cart_count(client: &ApiClient) -> Result<u64> {
    client
        .get::<CartCount>("/cart/count")
        .await
        .map(|c| c.count)
}

/// 장바구니 포함 여부
pub async fn check_in_cart(client: &ApiClient, item_id: &str) -> Result<bool> {
    client
        .get::<InCart>(&format!("/cart/check/{item_id}"))
        .await
        .map(|c| c.in_cart)
}

// endregion: --- Cart
