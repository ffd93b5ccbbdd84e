use super::{IdRef, ItemStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 입찰 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BidStatus {
    #[default]
    Active,
    Outbid,
    Won,
    Lost,
    #[serde(other)]
    Unknown,
}

/// 입찰에 포함된 상품 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub auction_end_time: Option<DateTime<Utc>>,
}

// 입찰 모델
// 식별자/금액 필드명은 역직렬화 시 정규화된다 (RawBid 참고)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawBid")]
pub struct Bid {
    pub id: String,
    pub item_id: Option<String>,
    pub auction_id: Option<String>,
    pub bidder_id: Option<String>,
    pub amount: f64,
    pub timestamp: Option<DateTime<Utc>>,
    pub status: BidStatus,
    pub item: Option<ItemSummary>,
}

impl Bid {
    pub fn is_won(&self) -> bool {
        self.status == BidStatus::Won
    }

    pub fn item_title(&self) -> Option<&str> {
        self.item.as_ref().and_then(|i| i.title.as_deref())
    }
}

/// 업스트림 입찰 응답의 모든 변형
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBid {
    #[serde(default, alias = "_id")]
    id: Option<String>,
    #[serde(default)]
    item_id: Option<String>,
    #[serde(default)]
    item: Option<ItemSummary>,
    #[serde(default)]
    auction_id: Option<String>,
    #[serde(default)]
    auction: Option<IdRef>,
    #[serde(default)]
    bidder_id: Option<String>,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    bid_amount: Option<f64>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    bid_time: Option<DateTime<Utc>>,
    #[serde(default)]
    status: Option<BidStatus>,
}

impl From<RawBid> for Bid {
    fn from(raw: RawBid) -> Self {
        let item_id = raw
            .item
            .as_ref()
            .and_then(|i| i.id.clone())
            .or(raw.item_id)
            .filter(|v| !v.is_empty());
        let auction_id = raw
            .auction_id
            .filter(|v| !v.is_empty())
            .or_else(|| raw.auction.and_then(IdRef::resolve));

        Bid {
            id: raw.id.unwrap_or_default(),
            item_id,
            auction_id,
            bidder_id: raw.bidder_id,
            amount: raw.amount.or(raw.bid_amount).unwrap_or(0.0),
            timestamp: raw.timestamp.or(raw.bid_time),
            status: raw.status.unwrap_or_default(),
            item: raw.item,
        }
    }
}

/// 입찰 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidRequest {
    pub item_id: String,
    pub bid_amount: f64,
}
