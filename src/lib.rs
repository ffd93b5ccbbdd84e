//! 경매 마켓플레이스 클라이언트
//! REST 백엔드 위에서 세션, 상품 상세/입찰, 낙찰 결제 흐름을 제공한다.
pub mod bidding;
pub mod config;
pub mod counters;
pub mod error;
pub mod format;
pub mod http;
pub mod model;
pub mod payment;
pub mod poller;
pub mod services;
pub mod session;
pub mod shell;
pub mod storage;

pub use error::{Error, Result};
