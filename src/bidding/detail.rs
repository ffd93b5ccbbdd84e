/// 상품 상세 화면 컨트롤러
/// 1. 상품/입찰 이력 동시 조회 (수동 새로고침, 폴링 공용)
/// 2. 입찰 제출 -> 확인 -> 확정
/// 3. 장바구니 / 관심 목록 토글
///
/// 조회마다 순번을 받고, 이미 반영된 순번보다 오래된 응답은 버린다.
/// 화면이 닫힌 뒤 도착한 응답도 버린다.
// region:    --- Imports
use super::commands::{handle_confirm_bid, BidWidget};
use super::toggle::{CartMembership, Membership, MembershipToggle, WatchlistMembership};
use crate::counters::CartCounter;
use crate::error::{Error, Result};
use crate::format::{format_amount, time_remaining};
use crate::model::{Bid, Item};
use crate::poller::{Poller, PollerHandle, Visibility};
use crate::services::{bids, items};
use crate::session::Session;
use crate::shell::Toasts;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// endregion: --- Imports

// region:    --- Snapshot
/// 화면에 그릴 현재 상태
#[derive(Debug, Clone, Default)]
pub struct DetailSnapshot {
    pub item: Option<Item>,
    pub bids: Vec<Bid>,
    /// 인라인 오류 메시지
    pub error: Option<String>,
    pub loading: bool,
}

impl DetailSnapshot {
    /// max(현재 입찰가, 최소 입찰가), 상품이 없으면 0
    pub fn minimum_bid(&self) -> f64 {
        self.item
            .as_ref()
            .map(Item::minimum_bid_floor)
            .unwrap_or(0.0)
    }
}

#[derive(Default)]
struct DetailState {
    snapshot: DetailSnapshot,
    item_ticket: u64,
    bids_ticket: u64,
    load_ticket: u64,
}

/// 조회 실패를 어떻게 다룰지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchMode {
    /// 인라인 오류로 표시
    Load,
    /// 로그만 남김
    Poll,
}
// endregion: --- Snapshot

// region:    --- Item Detail
pub struct ItemDetail {
    item_id: String,
    session: Arc<Session>,
    state: Mutex<DetailState>,
    tickets: AtomicU64,
    closed: CancellationToken,
    widget: Mutex<BidWidget>,
    cart: MembershipToggle<CartMembership>,
    watchlist: MembershipToggle<WatchlistMembership>,
    toasts: Toasts,
}

impl ItemDetail {
    pub fn new(
        item_id: impl Into<String>,
        session: Arc<Session>,
        cart: Arc<CartCounter>,
        toasts: Toasts,
    ) -> Self {
        let item_id = item_id.into();
        let watchlist = WatchlistMembership::new(Arc::clone(session.client()));
        Self {
            cart: MembershipToggle::new(CartMembership::new(cart), item_id.clone()),
            watchlist: MembershipToggle::new(watchlist, item_id.clone()),
            item_id,
            session,
            state: Mutex::new(DetailState::default()),
            tickets: AtomicU64::new(0),
            closed: CancellationToken::new(),
            widget: Mutex::new(BidWidget::new()),
            toasts,
        }
    }

    /// 화면 열기: 최초 조회 + 로그인 상태면 장바구니 개수와 멤버십 동기화
    /// 조회 실패는 인라인 오류로 남으므로 여기서 돌려주지 않는다.
    pub async fn open(
        item_id: impl Into<String>,
        session: Arc<Session>,
        cart: Arc<CartCounter>,
        toasts: Toasts,
    ) -> Arc<Self> {
        let detail = Arc::new(Self::new(item_id, session, Arc::clone(&cart), toasts));
        if let Err(e) = detail.load().await {
            info!("{:<12} --> 최초 조회 실패: {}", "ItemDetail", e);
        }
        if detail.session.is_authenticated() {
            if let Err(e) = cart.refresh().await {
                warn!("{:<12} --> 장바구니 개수 조회 실패: {}", "ItemDetail", e);
            }
        }
        detail.sync_memberships().await;
        detail
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn snapshot(&self) -> DetailSnapshot {
        self.state
            .lock()
            .map(|s| s.snapshot.clone())
            .unwrap_or_default()
    }

    pub fn minimum_bid(&self) -> f64 {
        self.snapshot().minimum_bid()
    }

    pub fn time_remaining(&self, now: DateTime<Utc>) -> String {
        let end = self.snapshot().item.and_then(|i| i.auction_end_time);
        time_remaining(end, now)
    }

    // region:    --- Fetch

    /// 상품과 입찰 이력 조회
    /// 한쪽이 실패해도 성공한 쪽은 반영하고, 오류는 인라인으로 남긴다.
    pub async fn load(&self) -> Result<()> {
        self.fetch(FetchMode::Load).await
    }

    /// 폴링 한 번 (실패는 로그만)
    pub async fn poll_once(&self) {
        if let Err(e) = self.fetch(FetchMode::Poll).await {
            debug!("{:<12} --> 폴링 실패 무시: {}", "ItemDetail", e);
        }
    }

    async fn fetch(&self, mode: FetchMode) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        if mode == FetchMode::Load {
            self.with_state(|s| {
                s.snapshot.loading = true;
                s.load_ticket = ticket;
            });
        }

        let client = self.session.client();
        let (item, bid_list) = tokio::join!(
            items::get_item(client, &self.item_id),
            bids::get_bids_for_item(client, &self.item_id)
        );

        if self.is_closed() {
            debug!("{:<12} --> 화면 종료 후 응답 버림 ticket: {}", "ItemDetail", ticket);
            return Ok(());
        }
        self.apply(ticket, mode, item, bid_list)
    }

    fn apply(
        &self,
        ticket: u64,
        mode: FetchMode,
        item: Result<Item>,
        bid_list: Result<Vec<Bid>>,
    ) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| Error::Validation(e.to_string()))?;
        let mut first_error = None;

        match item {
            Ok(item) if ticket > state.item_ticket => {
                state.item_ticket = ticket;
                state.snapshot.item = Some(item);
            }
            Ok(_) => debug!("{:<12} --> 오래된 상품 응답 버림 ticket: {}", "ItemDetail", ticket),
            Err(e) => first_error = Some(e),
        }
        match bid_list {
            Ok(list) if ticket > state.bids_ticket => {
                state.bids_ticket = ticket;
                state.snapshot.bids = list;
            }
            Ok(_) => debug!("{:<12} --> 오래된 입찰 응답 버림 ticket: {}", "ItemDetail", ticket),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }

        if mode == FetchMode::Load && ticket == state.load_ticket {
            state.snapshot.loading = false;
            state.snapshot.error = first_error.as_ref().map(Error::user_message);
        }

        match first_error {
            Some(e) => {
                warn!("{:<12} --> 조회 실패 id: {}: {}", "ItemDetail", self.item_id, e);
                Err(e)
            }
            None => Ok(()),
        }
    }

    /// 화면이 보이는 동안 주기적으로 다시 조회
    /// 화면이 닫히면 (close) 함께 멈춘다.
    pub fn start_polling(
        self: &Arc<Self>,
        visibility: Visibility,
        every: Duration,
    ) -> Result<PollerHandle> {
        let weak = Arc::downgrade(self);
        let poller = Poller::new(every, visibility, self.closed.child_token())?;
        Ok(poller.start(move || {
            let weak = weak.clone();
            async move {
                if let Some(detail) = weak.upgrade() {
                    detail.poll_once().await;
                }
            }
        }))
    }

    // endregion: --- Fetch

    // region:    --- Bidding

    pub fn set_bid_input(&self, input: impl Into<String>) {
        if let Ok(mut widget) = self.widget.lock() {
            widget.set_input(input);
        }
    }

    pub fn bid_widget(&self) -> BidWidget {
        self.widget
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    /// 입찰 제출 (검증 후 확인 단계로, 서버 호출 없음)
    pub fn submit_bid(&self) -> Result<f64> {
        let item = self.snapshot().item;
        let bidder = self.session.current_user();
        let outcome = {
            let mut widget = self
                .widget
                .lock()
                .map_err(|e| Error::Validation(e.to_string()))?;
            widget.submit(item.as_ref(), bidder.as_ref(), Utc::now())
        };

        outcome.map_err(|rejection| {
            info!("{:<12} --> 입찰 거부: {}", "ItemDetail", rejection);
            self.toasts.error("입찰 불가", rejection.to_string());
            Error::from(rejection)
        })
    }

    pub fn cancel_bid(&self) {
        if let Ok(mut widget) = self.widget.lock() {
            widget.cancel();
        }
    }

    /// 입찰 확정: 성공 시 다시 조회, 실패 시 확인 단계 유지
    pub async fn confirm_bid(&self) -> Result<Bid> {
        let item = self.snapshot().item;
        match handle_confirm_bid(&self.widget, self.session.client(), item.as_ref(), Utc::now())
            .await
        {
            Ok(bid) => {
                self.toasts.success(
                    "입찰 완료",
                    format!("{} 입찰이 등록되었습니다.", format_amount(bid.amount)),
                );
                if let Err(e) = self.load().await {
                    warn!("{:<12} --> 입찰 후 재조회 실패: {}", "ItemDetail", e);
                }
                Ok(bid)
            }
            Err(e) => {
                self.toasts.error("입찰 실패", e.user_message());
                Err(e)
            }
        }
    }

    // endregion: --- Bidding

    // region:    --- Memberships

    /// 로그인 상태면 장바구니 / 관심 목록 여부 동기화 (실패는 로그만)
    pub async fn sync_memberships(&self) {
        if !self.session.is_authenticated() {
            return;
        }
        let (cart, watchlist) = tokio::join!(self.cart.sync(), self.watchlist.sync());
        if let Err(e) = cart {
            warn!("{:<12} --> 장바구니 여부 조회 실패: {}", "ItemDetail", e);
        }
        if let Err(e) = watchlist {
            warn!("{:<12} --> 관심 목록 여부 조회 실패: {}", "ItemDetail", e);
        }
    }

    pub async fn toggle_cart(&self) -> Result<bool> {
        self.toggle(&self.cart, "장바구니").await
    }

    pub async fn toggle_watchlist(&self) -> Result<bool> {
        self.toggle(&self.watchlist, "관심 목록").await
    }

    async fn toggle<M: Membership>(&self, toggle: &MembershipToggle<M>, label: &str) -> Result<bool> {
        match toggle.toggle().await {
            Ok(member) => {
                let message = if member {
                    format!("{label}에 추가했습니다.")
                } else {
                    format!("{label}에서 제거했습니다.")
                };
                self.toasts.success(label, message);
                Ok(member)
            }
            Err(e) => {
                self.toasts.error(label, e.user_message());
                Err(e)
            }
        }
    }

    pub fn in_cart(&self) -> bool {
        self.cart.is_member()
    }

    pub fn in_watchlist(&self) -> bool {
        self.watchlist.is_member()
    }

    pub fn cart_busy(&self) -> bool {
        self.cart.is_busy()
    }

    pub fn watchlist_busy(&self) -> bool {
        self.watchlist.is_busy()
    }

    // endregion: --- Memberships

    /// 화면 닫기: 폴링 중단, 이후 응답은 버린다
    pub fn close(&self) {
        info!("{:<12} --> 화면 닫힘 id: {}", "ItemDetail", self.item_id);
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    fn with_state(&self, f: impl FnOnce(&mut DetailState)) {
        if let Ok(mut state) = self.state.lock() {
            f(&mut state);
        }
    }
}

impl Drop for ItemDetail {
    fn drop(&mut self) {
        self.closed.cancel();
    }
}
// endregion: --- Item Detail
