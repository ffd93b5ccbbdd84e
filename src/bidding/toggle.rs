/// 장바구니 / 관심 목록 멤버십 토글
/// 응답이 오기 전에는 값을 바꾸지 않는다: Idle -> Pending -> Idle(새 값 또는 기존 값)
/// Pending 동안의 토글은 거부된다.
// region:    --- Imports
use crate::counters::CartCounter;
use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::services::watchlist;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Membership Trait
/// (사용자, 상품) 관계
#[async_trait]
pub trait Membership: Send + Sync {
    fn label(&self) -> &'static str;
    async fn check(&self, item_id: &str) -> Result<bool>;
    async fn add(&self, item_id: &str) -> Result<()>;
    async fn remove(&self, item_id: &str) -> Result<()>;
}

/// 장바구니 (성공 시 공유 개수도 갱신)
pub struct CartMembership {
    counter: Arc<CartCounter>,
}

impl CartMembership {
    pub fn new(counter: Arc<CartCounter>) -> Self {
        Self { counter }
    }
}

#[async_trait]
impl Membership for CartMembership {
    fn label(&self) -> &'static str {
        "Cart"
    }

    async fn check(&self, item_id: &str) -> Result<bool> {
        self.counter.contains(item_id).await
    }

    async fn add(&self, item_id: &str) -> Result<()> {
        self.counter.add(item_id).await
    }

    async fn remove(&self, item_id: &str) -> Result<()> {
        self.counter.remove(item_id).await
    }
}

/// 관심 목록
pub struct WatchlistMembership {
    client: Arc<ApiClient>,
}

impl WatchlistMembership {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Membership for WatchlistMembership {
    fn label(&self) -> &'static str {
        "Watchlist"
    }

    async fn check(&self, item_id: &str) -> Result<bool> {
        watchlist::check_watchlist(&self.client, item_id).await
    }

    async fn add(&self, item_id: &str) -> Result<()> {
        watchlist::add_to_watchlist(&self.client, item_id).await
    }

    async fn remove(&self, item_id: &str) -> Result<()> {
        watchlist::remove_from_watchlist(&self.client, item_id).await
    }
}
// endregion: --- Membership Trait

// region:    --- Membership Toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    Idle { member: bool },
    Pending { member: bool },
}

impl ToggleState {
    pub fn member(&self) -> bool {
        match *self {
            ToggleState::Idle { member } | ToggleState::Pending { member } => member,
        }
    }
}

pub struct MembershipToggle<M> {
    relation: M,
    item_id: String,
    state: Mutex<ToggleState>,
}

impl<M: Membership> MembershipToggle<M> {
    pub fn new(relation: M, item_id: impl Into<String>) -> Self {
        Self {
            relation,
            item_id: item_id.into(),
            state: Mutex::new(ToggleState::Idle { member: false }),
        }
    }

    pub fn state(&self) -> ToggleState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(ToggleState::Idle { member: false })
    }

    pub fn is_member(&self) -> bool {
        self.state().member()
    }

    /// 요청 진행 중 (컨트롤 비활성)
    pub fn is_busy(&self) -> bool {
        matches!(self.state(), ToggleState::Pending { .. })
    }

    /// 서버 값과 동기화 (마운트 시)
    pub async fn sync(&self) -> Result<bool> {
        let member = self.relation.check(&self.item_id).await?;
        let mut state = self.lock()?;
        if let ToggleState::Idle { .. } = *state {
            *state = ToggleState::Idle { member };
        }
        Ok(member)
    }

    /// 토글: 성공 응답 뒤에만 값이 바뀐다
    pub async fn toggle(&self) -> Result<bool> {
        let current = {
            let mut state = self.lock()?;
            match *state {
                ToggleState::Pending { .. } => return Err(Error::InFlight),
                ToggleState::Idle { member } => {
                    *state = ToggleState::Pending { member };
                    member
                }
            }
        };
        let mut guard = PendingGuard {
            state: &self.state,
            restore: current,
            armed: true,
        };

        let result = if current {
            self.relation.remove(&self.item_id).await
        } else {
            self.relation.add(&self.item_id).await
        };

        let settled = match &result {
            Ok(()) => {
                info!(
                    "{:<12} --> 멤버십 변경 id: {}, {} -> {}",
                    self.relation.label(),
                    self.item_id,
                    current,
                    !current
                );
                !current
            }
            Err(e) => {
                warn!(
                    "{:<12} --> 멤버십 변경 실패 id: {}: {}",
                    self.relation.label(),
                    self.item_id,
                    e
                );
                current
            }
        };
        guard.settle(settled);
        result.map(|_| settled)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ToggleState>> {
        self.state
            .lock()
            .map_err(|e| Error::Validation(e.to_string()))
    }
}

/// 토글 future 가 중간에 버려져도 Pending 에 갇히지 않게 한다
struct PendingGuard<'a> {
    state: &'a Mutex<ToggleState>,
    restore: bool,
    armed: bool,
}

impl PendingGuard<'_> {
    fn settle(&mut self, member: bool) {
        self.restore = member;
        self.release();
    }

    fn release(&mut self) {
        if self.armed {
            if let Ok(mut state) = self.state.lock() {
                *state = ToggleState::Idle {
                    member: self.restore,
                };
            }
            self.armed = false;
        }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
// endregion: --- Membership Toggle
