/// 모의 결제 대화상자
/// Editing -> Processing -> Succeeded(영수증) | Editing(오류)
///
/// 확정 순서
/// 1. 카드 입력 검증
/// 2. 사용자 ID / 경매 또는 상품 ID 확인
/// 3. 처리 지연 후 결제 요청 한 번
// region:    --- Imports
use super::card::{format_card_number, format_expiry, sanitize_cvv, CardBrand, CardForm};
use crate::error::{Error, Result};
use crate::format::format_amount;
use crate::model::{Bid, PaymentReceipt, PaymentRequest, MOCK_PAYMENT_METHOD};
use crate::services::payments;
use crate::session::Session;
use crate::shell::Toasts;
use crate::storage::DASHBOARD_REFRESH_KEY;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

// endregion: --- Imports

/// 결제 수수료 (2%)
pub const PROCESSING_FEE_RATE: f64 = 0.02;

// region:    --- Target
/// 결제 대상 (정규화된 낙찰 입찰에서 만든다)
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentTarget {
    pub auction_id: Option<String>,
    pub item_id: Option<String>,
    pub winning_bid: f64,
    pub item_name: Option<String>,
    pub item_image: Option<String>,
}

impl From<&Bid> for PaymentTarget {
    fn from(bid: &Bid) -> Self {
        Self {
            auction_id: bid.auction_id.clone(),
            item_id: bid.item_id.clone(),
            winning_bid: bid.amount,
            item_name: bid.item_title().map(str::to_string),
            item_image: bid.item.as_ref().and_then(|i| i.image_url.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentTotals {
    pub subtotal: f64,
    pub fee: f64,
    pub total: f64,
}

impl PaymentTarget {
    pub fn totals(&self) -> PaymentTotals {
        let fee = self.winning_bid * PROCESSING_FEE_RATE;
        PaymentTotals {
            subtotal: self.winning_bid,
            fee,
            total: self.winning_bid + fee,
        }
    }
}
// endregion: --- Target

// region:    --- Dialog
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentPhase {
    Editing,
    Processing,
    Succeeded(PaymentReceipt),
}

struct DialogState {
    form: CardForm,
    phase: PaymentPhase,
}

pub struct PaymentDialog {
    target: PaymentTarget,
    session: Arc<Session>,
    delay: Duration,
    state: Mutex<DialogState>,
    toasts: Toasts,
}

impl PaymentDialog {
    pub fn new(target: PaymentTarget, session: Arc<Session>, delay: Duration, toasts: Toasts) -> Self {
        Self {
            target,
            session,
            delay,
            state: Mutex::new(DialogState {
                form: CardForm::default(),
                phase: PaymentPhase::Editing,
            }),
            toasts,
        }
    }

    pub fn target(&self) -> &PaymentTarget {
        &self.target
    }

    pub fn totals(&self) -> PaymentTotals {
        self.target.totals()
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn phase(&self) -> PaymentPhase {
        self.state
            .lock()
            .map(|s| s.phase.clone())
            .unwrap_or(PaymentPhase::Editing)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.phase(), PaymentPhase::Processing)
    }

    pub fn form(&self) -> CardForm {
        self.state
            .lock()
            .map(|s| s.form.clone())
            .unwrap_or_default()
    }

    pub fn brand(&self) -> CardBrand {
        self.form().brand()
    }

    // region:    --- Inputs
    pub fn set_card_number(&self, input: &str) {
        self.edit(|f| f.card_number = format_card_number(input));
    }

    pub fn set_cardholder(&self, input: &str) {
        self.edit(|f| f.cardholder = input.to_string());
    }

    pub fn set_expiry(&self, input: &str) {
        self.edit(|f| f.expiry = format_expiry(input));
    }

    pub fn set_cvv(&self, input: &str) {
        self.edit(|f| f.cvv = sanitize_cvv(input));
    }

    fn edit(&self, f: impl FnOnce(&mut CardForm)) {
        if let Ok(mut state) = self.state.lock() {
            if state.phase == PaymentPhase::Editing {
                f(&mut state.form);
            }
        }
    }
    // endregion: --- Inputs

    /// 결제 확정
    /// 실패하면 대화상자는 열린 채로 Editing 에 남는다.
    pub async fn confirm(&self) -> Result<PaymentReceipt> {
        let request = match self.begin() {
            Ok(request) => request,
            Err(Error::InFlight) => return Err(Error::InFlight),
            Err(e) => {
                self.toasts.error("결제 정보 오류", e.user_message());
                return Err(e);
            }
        };
        let mut guard = ProcessingGuard {
            state: &self.state,
            armed: true,
        };

        info!(
            "{:<12} --> 결제 처리 중 ({:?} 지연) amount: {}",
            "Payment", self.delay, request.amount
        );
        sleep(self.delay).await;
        let result = payments::confirm_payment(self.session.client(), &request).await;

        match result {
            Ok(receipt) => {
                guard.succeed(receipt.clone());
                let stamp = Utc::now().timestamp_millis().to_string();
                if let Err(e) = self.session.client().store().set(DASHBOARD_REFRESH_KEY, &stamp) {
                    warn!("{:<12} --> 대시보드 갱신 표시 저장 실패: {:?}", "Payment", e);
                }
                info!("{:<12} --> 결제 완료 id: {:?}", "Payment", receipt.payment_id);
                Ok(receipt)
            }
            Err(e) => {
                warn!("{:<12} --> 결제 실패: {}", "Payment", e);
                self.toasts.error("결제 실패", e.user_message());
                Err(e)
            }
        }
    }

    /// 검증과 식별자 확인을 마치고 Processing 으로 전환
    fn begin(&self) -> Result<PaymentRequest> {
        let mut state = self.lock()?;
        match state.phase {
            PaymentPhase::Processing => return Err(Error::InFlight),
            PaymentPhase::Succeeded(_) => {
                return Err(Error::Validation("이미 결제가 완료되었습니다.".to_string()))
            }
            PaymentPhase::Editing => {}
        }
        state.form.validate()?;

        let user_id = self
            .session
            .resolve_user_id()
            .ok_or(Error::MissingIdentifier("user"))?;
        if self.target.auction_id.is_none() && self.target.item_id.is_none() {
            return Err(Error::MissingIdentifier("auction"));
        }

        state.phase = PaymentPhase::Processing;
        Ok(PaymentRequest {
            auction_id: self.target.auction_id.clone(),
            item_id: self.target.item_id.clone(),
            user_id,
            amount: self.totals().total,
            payment_method: MOCK_PAYMENT_METHOD.to_string(),
        })
    }

    /// 결제 완료 화면 (완료 전에는 None)
    pub fn success_view(&self, auto_close: Duration) -> Option<SuccessView> {
        match self.phase() {
            PaymentPhase::Succeeded(receipt) => Some(SuccessView {
                receipt,
                item_name: self.target.item_name.clone(),
                auto_close,
            }),
            _ => None,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, DialogState>> {
        self.state
            .lock()
            .map_err(|e| Error::Validation(e.to_string()))
    }
}

/// 결제 future 가 버려져도 Processing 에 갇히지 않게 한다
struct ProcessingGuard<'a> {
    state: &'a Mutex<DialogState>,
    armed: bool,
}

impl ProcessingGuard<'_> {
    fn succeed(&mut self, receipt: PaymentReceipt) {
        if let Ok(mut state) = self.state.lock() {
            state.phase = PaymentPhase::Succeeded(receipt);
        }
        self.armed = false;
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            if let Ok(mut state) = self.state.lock() {
                state.phase = PaymentPhase::Editing;
            }
        }
    }
}
// endregion: --- Dialog

// region:    --- Success View
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessAction {
    ViewReceipt,
    GoDashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessOutcome {
    AutoClosed,
    ViewReceipt,
    GoDashboard,
}

/// 결제 완료 화면: 자동 닫힘 카운트다운, 사용자 동작이 있으면 바로 끝난다
#[derive(Debug, Clone)]
pub struct SuccessView {
    receipt: PaymentReceipt,
    item_name: Option<String>,
    auto_close: Duration,
}

impl SuccessView {
    pub fn receipt(&self) -> &PaymentReceipt {
        &self.receipt
    }

    pub fn receipt_text(&self) -> String {
        self.receipt.render_text(self.item_name.as_deref())
    }

    pub fn headline(&self) -> String {
        format!("결제 완료: {}", format_amount(self.receipt.amount))
    }

    /// 남은 초 (올림)
    pub fn seconds_left(&self, elapsed: Duration) -> u64 {
        let left = self.auto_close.saturating_sub(elapsed);
        left.as_millis().div_ceil(1000) as u64
    }

    /// 동작 또는 자동 닫힘까지 대기
    /// 송신 측이 모두 닫히면 자동 닫힘만 기다린다.
    pub async fn wait(&self, mut actions: mpsc::Receiver<SuccessAction>) -> SuccessOutcome {
        tokio::select! {
            _ = sleep(self.auto_close) => SuccessOutcome::AutoClosed,
            Some(action) = actions.recv() => match action {
                SuccessAction::ViewReceipt => SuccessOutcome::ViewReceipt,
                SuccessAction::GoDashboard => SuccessOutcome::GoDashboard,
            },
        }
    }
}
// endregion: --- Success View
