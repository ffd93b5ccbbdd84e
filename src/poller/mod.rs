/// 화면 수명 동안 도는 주기 작업
/// 보이지 않는 동안에는 틱을 건너뛰고, 취소 토큰으로 종료한다.
/// 진행 중인 요청은 중단하지 않는다 (결과는 호출 측에서 버린다).
// region:    --- Imports
use crate::error::{Error, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Visibility
/// 문서 표시 상태 (탭이 보이는지)
#[derive(Debug, Clone)]
pub struct Visibility(Arc<AtomicBool>);

impl Default for Visibility {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Visibility {
    pub fn new(visible: bool) -> Self {
        Self(Arc::new(AtomicBool::new(visible)))
    }

    pub fn set_visible(&self, visible: bool) {
        self.0.store(visible, Ordering::SeqCst);
    }

    pub fn is_visible(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
// endregion: --- Visibility

// region:    --- Poller
pub struct Poller {
    every: Duration,
    visibility: Visibility,
    cancel: CancellationToken,
}

impl Poller {
    /// 간격이 0 이면 거부
    pub fn new(every: Duration, visibility: Visibility, cancel: CancellationToken) -> Result<Self> {
        if every.is_zero() {
            return Err(Error::Config("폴링 간격은 0보다 커야 합니다.".to_string()));
        }
        Ok(Self {
            every,
            visibility,
            cancel,
        })
    }

    /// 폴링 시작 (첫 틱은 한 주기 뒤)
    pub fn start<F, Fut>(self, mut tick: F) -> PollerHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let ticks = Arc::new(AtomicU64::new(0));
        let skipped = Arc::new(AtomicU64::new(0));
        let cancel = self.cancel.clone();

        let task = {
            let ticks = Arc::clone(&ticks);
            let skipped = Arc::clone(&skipped);
            let Poller {
                every,
                visibility,
                cancel,
            } = self;

            tokio::spawn(async move {
                let mut interval = interval_at(Instant::now() + every, every);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                info!("{:<12} --> 폴링 시작: {:?} 간격", "Poller", every);

                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = interval.tick() => {
                            if !visibility.is_visible() {
                                skipped.fetch_add(1, Ordering::SeqCst);
                                debug!("{:<12} --> 화면 숨김, 틱 건너뜀", "Poller");
                                continue;
                            }
                            tick().await;
                            ticks.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                }
                info!("{:<12} --> 폴링 종료", "Poller");
            })
        };

        PollerHandle {
            cancel,
            task: Some(task),
            ticks,
            skipped,
        }
    }
}

/// 폴링 핸들 (drop 시 취소)
pub struct PollerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
    skipped: Arc<AtomicU64>,
}

impl PollerHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// 실행된 틱 수
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    /// 숨김 상태로 건너뛴 틱 수
    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::SeqCst)
    }

    /// 취소 후 작업 종료까지 대기
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
// endregion: --- Poller
