use super::bid::{Bid, ItemSummary};
use super::null_as_default;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 경매 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuctionStatus {
    Scheduled,
    Active,
    Ended,
    Cancelled,
    #[serde(other)]
    Unknown,
}

// 결제 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    #[serde(other)]
    Unknown,
}

// 경매 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub status: AuctionStatus,
    #[serde(default)]
    pub current_bid_amount: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_bids: u32,
    #[serde(default)]
    pub winner_id: Option<String>,
    #[serde(default)]
    pub winning_bid: Option<f64>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub item: Option<ItemSummary>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bids: Vec<Bid>,
}
