/// 낙찰 상품 목록과 결제 여부
// region:    --- Imports
use crate::error::Result;
use crate::model::Bid;
use crate::services::bids;
use crate::services::payments::{self, PaymentLookup};
use crate::session::Session;
use futures::future::join_all;
use tracing::{info, warn};

// endregion: --- Imports

#[derive(Debug, Clone)]
pub struct WonItem {
    pub bid: Bid,
    pub paid: bool,
}

impl WonItem {
    /// "결제하기" 버튼 노출 여부
    pub fn needs_payment(&self) -> bool {
        !self.paid
    }

    /// 목록에 표시할 동작 이름
    pub fn action_label(&self) -> &'static str {
        if self.paid {
            "Paid"
        } else {
            "Complete Payment"
        }
    }

    /// 결제 조회 키 (상품 ID 우선)
    fn lookup(&self, user_id: &str) -> Option<PaymentLookup> {
        let lookup = match (&self.bid.item_id, &self.bid.auction_id) {
            (Some(item_id), _) => PaymentLookup {
                auction_id: None,
                item_id: Some(item_id.clone()),
                user_id: user_id.to_string(),
            },
            (None, Some(auction_id)) => PaymentLookup {
                auction_id: Some(auction_id.clone()),
                item_id: None,
                user_id: user_id.to_string(),
            },
            (None, None) => return None,
        };
        Some(lookup)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WonItems {
    items: Vec<WonItem>,
}

impl WonItems {
    pub fn items(&self) -> &[WonItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn paid_count(&self) -> usize {
        self.items.iter().filter(|w| w.paid).count()
    }

    pub fn unpaid_count(&self) -> usize {
        self.len() - self.paid_count()
    }

    /// 상품 ID 또는 경매 ID 로 찾기
    pub fn find(&self, id: &str) -> Option<&WonItem> {
        self.items.iter().find(|w| {
            w.bid.item_id.as_deref() == Some(id)
                || w.bid.auction_id.as_deref() == Some(id)
                || w.bid.id == id
        })
    }
}

/// 낙찰 목록 조회
/// 1. 내 입찰 중 WON 만 남긴다
/// 2. 상품마다 결제 여부를 동시에 조회 (실패는 미결제로 본다)
pub async fn list_won(session: &Session) -> Result<WonItems> {
    let client = session.client();
    let mut items: Vec<WonItem> = bids::get_my_bids(client)
        .await?
        .into_iter()
        .filter(Bid::is_won)
        .map(|bid| WonItem { bid, paid: false })
        .collect();

    let Some(user_id) = session.resolve_user_id() else {
        warn!("{:<12} --> 사용자 ID 없음, 결제 여부 조회 생략", "WonItems");
        return Ok(WonItems { items });
    };

    let checks = join_all(items.iter().map(|won| {
        let lookup = won.lookup(&user_id);
        async move {
            match lookup {
                Some(lookup) => payments::payment_exists(client, &lookup).await,
                None => Ok(false),
            }
        }
    }))
    .await;

    for (won, check) in items.iter_mut().zip(checks) {
        won.paid = match check {
            Ok(paid) => paid,
            Err(e) => {
                warn!("{:<12} --> 결제 여부 조회 실패 bid: {}: {}", "WonItems", won.bid.id, e);
                false
            }
        };
    }

    let won = WonItems { items };
    info!(
        "{:<12} --> 낙찰 {}건 (결제 {}, 미결제 {})",
        "WonItems",
        won.len(),
        won.paid_count(),
        won.unpaid_count()
    );
    Ok(won)
}
