/// 입찰 위젯 커맨드 처리
/// 1. 입찰 제출 (검증 후 확인 단계로)
/// 2. 입찰 확정 (실제 네트워크 호출)
///
/// 상태: Idle -> (검증) -> ConfirmPending -> Submitting -> Idle | ConfirmPending
// region:    --- Imports
use super::validation::{validate_bid, BidRejection};
use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::model::{Bid, Item, PlaceBidRequest, User};
use crate::services::bids;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Bid Widget
#[derive(Debug, Clone, PartialEq)]
pub enum BidPhase {
    Idle,
    ConfirmPending { item_id: String, amount: f64 },
    Submitting { item_id: String, amount: f64 },
}

#[derive(Debug, Clone)]
pub struct BidWidget {
    input: String,
    phase: BidPhase,
    last_error: Option<String>,
}

impl Default for BidWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl BidWidget {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            phase: BidPhase::Idle,
            last_error: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn phase(&self) -> &BidPhase {
        &self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self.phase, BidPhase::ConfirmPending { .. })
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, BidPhase::Submitting { .. })
    }

    /// 확인 대기 중인 금액
    pub fn pending_amount(&self) -> Option<f64> {
        match &self.phase {
            BidPhase::ConfirmPending { amount, .. } | BidPhase::Submitting { amount, .. } => {
                Some(*amount)
            }
            BidPhase::Idle => None,
        }
    }

    /// 1. 입찰 제출: 검증만 하고 서버는 아직 호출하지 않는다
    pub fn submit(
        &mut self,
        item: Option<&Item>,
        bidder: Option<&User>,
        now: DateTime<Utc>,
    ) -> std::result::Result<f64, BidRejection> {
        if self.is_submitting() {
            return Err(BidRejection::InProgress);
        }

        let outcome = item
            .ok_or(BidRejection::NotLoaded)
            .and_then(|item| validate_bid(item, bidder, &self.input, now).map(|a| (item, a)));

        match outcome {
            Ok((item, amount)) => {
                self.phase = BidPhase::ConfirmPending {
                    item_id: item.id.clone(),
                    amount,
                };
                self.last_error = None;
                Ok(amount)
            }
            Err(rejection) => {
                self.phase = BidPhase::Idle;
                self.last_error = Some(rejection.to_string());
                Err(rejection)
            }
        }
    }

    /// 확인 단계 닫기 (입력값은 유지)
    pub fn cancel(&mut self) {
        if self.is_confirming() {
            self.phase = BidPhase::Idle;
        }
    }

    /// 확정 직전에 경매 종료 여부를 다시 확인한다.
    fn begin_confirm(
        &mut self,
        item: Option<&Item>,
        now: DateTime<Utc>,
    ) -> std::result::Result<Option<PlaceBidRequest>, BidRejection> {
        if self.is_confirming() && !item.is_some_and(|item| item.is_open_for_bids(now)) {
            let rejection = if item.is_some() {
                BidRejection::AuctionEnded
            } else {
                BidRejection::NotLoaded
            };
            self.phase = BidPhase::Idle;
            self.last_error = Some(rejection.to_string());
            return Err(rejection);
        }

        Ok(match &self.phase {
            BidPhase::ConfirmPending { item_id, amount } => {
                let request = PlaceBidRequest {
                    item_id: item_id.clone(),
                    bid_amount: *amount,
                };
                self.phase = BidPhase::Submitting {
                    item_id: item_id.clone(),
                    amount: *amount,
                };
                Some(request)
            }
            _ => None,
        })
    }

    fn finish(&mut self, result: &Result<Bid>) {
        let BidPhase::Submitting { item_id, amount } = self.phase.clone() else {
            return;
        };
        match result {
            Ok(_) => {
                self.input.clear();
                self.phase = BidPhase::Idle;
                self.last_error = None;
            }
            Err(e) => {
                // 재시도할 수 있도록 확인 단계로 돌아간다
                self.phase = BidPhase::ConfirmPending { item_id, amount };
                self.last_error = Some(e.user_message());
            }
        }
    }
}
// endregion: --- Bid Widget

// region:    --- Commands

/// 2. 입찰 확정
/// 확인 단계 사이에 경매가 끝났으면 서버로 보내지 않고 Idle 로 돌아간다.
/// 위젯 잠금은 네트워크 대기 동안 잡지 않는다.
pub async fn handle_confirm_bid(
    widget: &Mutex<BidWidget>,
    client: &ApiClient,
    item: Option<&Item>,
    now: DateTime<Utc>,
) -> Result<Bid> {
    let request = {
        let mut guard = widget
            .lock()
            .map_err(|e| Error::Validation(e.to_string()))?;
        if guard.is_submitting() {
            return Err(Error::InFlight);
        }
        guard
            .begin_confirm(item, now)?
            .ok_or_else(|| Error::Validation("확인할 입찰이 없습니다.".to_string()))?
    };

    info!("{:<12} --> 입찰 확정 요청 시작: {:?}", "Command", request);
    let result = bids::place_bid(client, &request).await;

    match &result {
        Ok(bid) => info!("{:<12} --> 입찰 성공 id: {}", "Command", bid.id),
        Err(e) => warn!("{:<12} --> 입찰 실패: {}", "Command", e),
    }

    if let Ok(mut guard) = widget.lock() {
        guard.finish(&result);
    }
    result
}

// endregion: --- Commands
