use super::null_as_default;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 상품 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Active,
    Sold,
    Ended,
    Draft,
    #[serde(other)]
    Unknown,
}

// 상품 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub minimum_bid: Option<f64>,
    #[serde(default)]
    pub current_bid: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub auction_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auction_end_time: Option<DateTime<Utc>>,
    pub status: ItemStatus,
    #[serde(default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_bids: u32,
}

impl Item {
    /// 다음 입찰이 넘어야 하는 금액: max(현재 입찰가, 최소 입찰가)
    pub fn minimum_bid_floor(&self) -> f64 {
        let current = self.current_bid.unwrap_or(0.0);
        let minimum = self.minimum_bid.unwrap_or(0.0);
        current.max(minimum)
    }

    /// 화면에 표시할 현재 최고가
    pub fn display_price(&self) -> f64 {
        self.current_bid.or(self.minimum_bid).unwrap_or(0.0)
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.auction_end_time.is_some_and(|end| end <= now)
    }

    /// 입찰 가능 여부 (UX 가드, 최종 판단은 서버)
    pub fn is_open_for_bids(&self, now: DateTime<Utc>) -> bool {
        !self.has_ended(now) && !matches!(self.status, ItemStatus::Sold | ItemStatus::Ended)
    }

    pub fn is_listed_by(&self, user_id: &str) -> bool {
        self.seller_id.as_deref() == Some(user_id)
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(String::as_str)
            .or(self.image_url.as_deref())
    }
}

/// 상품 등록/수정 요청
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub minimum_bid: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auction_start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auction_end_time: Option<DateTime<Utc>>,
}
