//! REST 리소스별 서비스 함수
//! 각 함수는 엔드포인트 하나에 대응하며 항상 Result 를 돌려준다.
pub mod admin;
pub mod auctions;
pub mod auth;
pub mod bids;
pub mod cart;
pub mod items;
pub mod notifications;
pub mod payments;
pub mod users;
pub mod watchlist;

/// 상태만 담긴 응답 ({"status": "added"} 등)은 버린다
pub(crate) type Ack = serde_json::Value;
