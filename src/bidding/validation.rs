/// 입찰 전 클라이언트 측 검증
/// 서버가 최종 판단하지만, 명백히 안 되는 입찰은 네트워크까지 보내지 않는다.
// region:    --- Imports
use crate::model::{Item, User};
use chrono::{DateTime, Utc};
use thiserror::Error;

// endregion: --- Imports

// region:    --- Bid Rejection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BidRejection {
    #[error("입찰 금액은 {minimum:.2}보다 커야 합니다.")]
    InvalidAmount { minimum: f64 },

    #[error("본인이 등록한 상품에는 입찰할 수 없습니다.")]
    SelfBid,

    #[error("이미 종료된 경매입니다.")]
    AuctionEnded,

    #[error("상품 정보를 아직 불러오지 못했습니다.")]
    NotLoaded,

    #[error("입찰을 처리하는 중입니다.")]
    InProgress,
}
// endregion: --- Bid Rejection

// region:    --- Validation

/// 입력 문자열을 유한한 금액으로 변환
pub fn parse_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// 입찰 검증
/// 1. 경매 종료 여부
/// 2. 금액 > max(현재 입찰가, 최소 입찰가)
/// 3. 본인 상품 입찰 금지
pub fn validate_bid(
    item: &Item,
    bidder: Option<&User>,
    input: &str,
    now: DateTime<Utc>,
) -> Result<f64, BidRejection> {
    if !item.is_open_for_bids(now) {
        return Err(BidRejection::AuctionEnded);
    }

    let minimum = item.minimum_bid_floor();
    let amount = parse_amount(input)
        .filter(|amount| *amount > minimum)
        .ok_or(BidRejection::InvalidAmount { minimum })?;

    if bidder.is_some_and(|u| item.is_listed_by(&u.id)) {
        return Err(BidRejection::SelfBid);
    }

    Ok(amount)
}

// endregion: --- Validation
