// region:    --- Imports
use crate::error::Result;
use crate::http::ApiClient;
use crate::model::{PaymentExists, PaymentReceipt, PaymentRequest, PaymentSummary};
use serde::Serialize;
use tracing::info;

// endregion: --- Imports

/// 결제 존재 여부 조회 키
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLookup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub user_id: String,
}

// region:    --- Payments

/// 결제 확정 (모의 결제)
pub async fn confirm_payment(client: &ApiClient, request: &PaymentRequest) -> Result<PaymentReceipt> {
    info!(
        "{:<12} --> 결제 확정 요청 auction: {:?}, item: {:?}, amount: {}",
        "Payments", request.auction_id, request.item_id, request.amount
    );
    client.post("/payments/confirm", request).await
}

/// 결제 존재 여부
pub async fn payment_exists(client: &ApiClient, lookup: &PaymentLookup) -> Result<bool> {
    client
        .get_query::<PaymentExists, _>("/payments/exists", lookup)
        .await
        .map(|p| p.paid)
}

/// 결제 요약
pub async fn payment_summary(client: &ApiClient, user_id: &str) -> Result<PaymentSummary> {
    info!("{:<12} --> 결제 요약 조회 user: {}", "Payments", user_id);
    client
        .get_query("/payments/summary", &[("userId", user_id)])
        .await
}

// endregion: --- Payments
