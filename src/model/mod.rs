//! 서버 리소스의 클라이언트 측 사본
//! 업스트림 응답 형태가 제각각이라 역직렬화 시점에 한 가지 형태로 정규화한다.
pub mod auction;
pub mod bid;
pub mod item;
pub mod notification;
pub mod payment;
pub mod user;

pub use auction::{Auction, AuctionStatus, PaymentStatus};
pub use bid::{Bid, BidStatus, ItemSummary, PlaceBidRequest};
pub use item::{Item, ItemDraft, ItemStatus};
pub use notification::Notification;
pub use payment::{
    PaymentExists, PaymentReceipt, PaymentRequest, PaymentSummary, MOCK_PAYMENT_METHOD,
};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, Role, User};

use serde::{Deserialize, Deserializer, Serialize};

/// 페이지 응답 (Spring Page 형태)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

/// 페이지 요청 파라미터
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 20 }
    }
}

/// null 을 기본값으로 취급
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `{ "id": .. }` 또는 `{ "_id": .. }` 형태의 참조
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IdRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "_id")]
    pub mongo_id: Option<String>,
}

impl IdRef {
    pub fn resolve(self) -> Option<String> {
        self.id.or(self.mongo_id).filter(|v| !v.is_empty())
    }
}
