/// 장바구니 개수 / 알림 보관소
/// 서버 값으로 갱신하고, 사용자 동작이 성공한 뒤에만 로컬 값을 바꾼다.
// region:    --- Imports
use crate::error::{Error, Result};
use crate::model::Notification;
use crate::services::{cart, notifications};
use crate::session::Session;
use futures::future::join_all;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Cart Counter
pub struct CartCounter {
    session: Arc<Session>,
    count: AtomicU64,
}

impl CartCounter {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            count: AtomicU64::new(0),
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }

    /// 서버 값으로 갱신 (비로그인 시 0)
    pub async fn refresh(&self) -> Result<u64> {
        if !self.session.is_authenticated() {
            self.count.store(0, Ordering::SeqCst);
            return Ok(0);
        }
        let count = cart::get_cart_count(self.session.client()).await?;
        self.count.store(count, Ordering::SeqCst);
        Ok(count)
    }

    pub async fn add(&self, item_id: &str) -> Result<()> {
        cart::add_to_cart(self.session.client(), item_id).await?;
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    pub async fn remove(&self, item_id: &str) -> Result<()> {
        cart::remove_from_cart(self.session.client(), item_id).await?;
        // 0 아래로 내려가지 않음
        let _ = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| {
                Some(c.saturating_sub(1))
            });
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        cart::clear_cart(self.session.client()).await?;
        self.count.store(0, Ordering::SeqCst);
        Ok(())
    }

    pub async fn contains(&self, item_id: &str) -> Result<bool> {
        cart::check_in_cart(self.session.client(), item_id).await
    }
}
// endregion: --- Cart Counter

// region:    --- Notification Center
pub struct NotificationCenter {
    session: Arc<Session>,
    notifications: Mutex<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            notifications: Mutex::new(Vec::new()),
        }
    }

    /// 알림 목록 갱신
    pub async fn refresh(&self) -> Result<usize> {
        let fetched = notifications::get_notifications(self.session.client()).await?;
        let len = fetched.len();
        self.replace(fetched);
        Ok(len)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications
            .lock()
            .map(|n| n.iter().filter(|n| !n.read).count())
            .unwrap_or(0)
    }

    /// 알림 하나 읽음 처리
    pub async fn mark_read(&self, notification_id: &str) -> Result<()> {
        notifications::mark_as_read(self.session.client(), notification_id).await?;
        self.set_read(&[notification_id.to_string()]);
        Ok(())
    }

    /// 읽지 않은 알림 모두 읽음 처리 (동시 요청)
    /// 성공한 것만 반영하고 첫 번째 오류를 돌려준다.
    pub async fn mark_all_read(&self) -> Result<usize> {
        let unread: Vec<String> = self
            .notifications()
            .into_iter()
            .filter(|n| !n.read)
            .map(|n| n.id)
            .collect();
        if unread.is_empty() {
            return Ok(0);
        }

        let client = self.session.client();
        let results = join_all(
            unread
                .iter()
                .map(|id| notifications::mark_as_read(client, id)),
        )
        .await;

        let mut marked = Vec::new();
        let mut first_error: Option<Error> = None;
        for (id, result) in unread.into_iter().zip(results) {
            match result {
                Ok(()) => marked.push(id),
                Err(e) => {
                    warn!("{:<12} --> 읽음 처리 실패 id: {}: {}", "Notify", id, e);
                    first_error.get_or_insert(e);
                }
            }
        }
        self.set_read(&marked);
        info!("{:<12} --> 읽음 처리 {}건", "Notify", marked.len());

        match first_error {
            Some(e) => Err(e),
            None => Ok(marked.len()),
        }
    }

    fn replace(&self, fetched: Vec<Notification>) {
        if let Ok(mut guard) = self.notifications.lock() {
            *guard = fetched;
        }
    }

    fn set_read(&self, ids: &[String]) {
        if let Ok(mut guard) = self.notifications.lock() {
            for n in guard.iter_mut().filter(|n| ids.contains(&n.id)) {
                n.read = true;
            }
        }
    }
}
// endregion: --- Notification Center
