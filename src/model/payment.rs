use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MOCK_PAYMENT_METHOD: &str = "mock_card";

/// 결제 확정 요청
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub auction_id: Option<String>,
    pub item_id: Option<String>,
    pub user_id: String,
    pub amount: f64,
    pub payment_method: String,
}

/// 결제 영수증
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub auction_id: Option<String>,
    #[serde(default)]
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl PaymentReceipt {
    /// 텍스트 영수증
    pub fn render_text(&self, item_name: Option<&str>) -> String {
        let date = self
            .timestamp
            .map(|t| crate::format::format_date_time(Some(t)))
            .unwrap_or_else(|| crate::format::format_date_time(Some(Utc::now())));
        format!(
            "eAuction Payment Receipt\n\nTransaction ID: {}\nAmount: {}\nMethod: {}\nDate: {}\n\nItem: {}\n",
            self.payment_id.as_deref().unwrap_or("-"),
            crate::format::format_amount(self.amount),
            self.payment_method.as_deref().unwrap_or(MOCK_PAYMENT_METHOD),
            date,
            item_name.unwrap_or("Auction Item"),
        )
    }
}

/// 결제 존재 여부
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaymentExists {
    #[serde(default)]
    pub paid: bool,
}

/// 결제 요약 (대시보드)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    #[serde(default)]
    pub total_spent: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub won_paid: u64,
    #[serde(default)]
    pub won_unpaid: u64,
}
