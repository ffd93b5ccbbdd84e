mod common;

use auction_client::payment::{
    card_brand, format_card_number, format_expiry, list_won, sanitize_cvv, CardBrand, CardError,
    CardForm, PaymentDialog, PaymentPhase, PaymentTarget, SuccessAction, SuccessOutcome,
};
use auction_client::session::Session;
use auction_client::shell::Toasts;
use auction_client::storage::{DASHBOARD_REFRESH_KEY, USER_ID_KEY};
use auction_client::Error;
use common::*;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration, Instant};

const FAST: Duration = Duration::from_millis(10);

fn valid_form() -> CardForm {
    CardForm {
        card_number: "4242 4242 4242 4242".into(),
        cardholder: "Bea Buyer".into(),
        expiry: "12/29".into(),
        cvv: "123".into(),
    }
}

fn fill(dialog: &PaymentDialog) {
    let form = valid_form();
    dialog.set_card_number(&form.card_number);
    dialog.set_cardholder(&form.cardholder);
    dialog.set_expiry(&form.expiry);
    dialog.set_cvv(&form.cvv);
}

async fn won_dialog(session: &Arc<Session>, delay: Duration) -> PaymentDialog {
    let won = list_won(session).await.expect("낙찰 목록 조회 실패");
    let item = won.find(WON_ITEM).expect("낙찰 상품 없음");
    PaymentDialog::new(
        PaymentTarget::from(&item.bid),
        Arc::clone(session),
        delay,
        Toasts::new(),
    )
}

/// 카드 검증 순서와 메시지
#[test]
fn test_card_validation_order() {
    assert_eq!(valid_form().validate(), Ok(()));

    let cases = [
        (CardForm { card_number: "4242 4242".into(), ..valid_form() }, CardError::CardNumber),
        (CardForm { cardholder: "   ".into(), ..valid_form() }, CardError::Cardholder),
        (CardForm { expiry: "1229".into(), ..valid_form() }, CardError::ExpiryFormat),
        (CardForm { expiry: "1/29".into(), ..valid_form() }, CardError::ExpiryFormat),
        (CardForm { expiry: "13/29".into(), ..valid_form() }, CardError::ExpiryMonth),
        (CardForm { expiry: "00/29".into(), ..valid_form() }, CardError::ExpiryMonth),
        (CardForm { cvv: "12".into(), ..valid_form() }, CardError::Cvv),
        // 여러 개가 틀리면 첫 번째만
        (
            CardForm { card_number: "1".into(), cvv: "".into(), ..valid_form() },
            CardError::CardNumber,
        ),
    ];
    for (form, expected) in cases {
        assert_eq!(form.validate(), Err(expected), "{form:?}");
    }
}

/// 입력 보조
#[test]
fn test_card_input_helpers() {
    assert_eq!(format_card_number("4242424242424242999"), "4242 4242 4242 4242");
    assert_eq!(format_card_number("5555-55"), "5555 55");
    assert_eq!(format_expiry("1"), "1");
    assert_eq!(format_expiry("12"), "12");
    assert_eq!(format_expiry("1229"), "12/29");
    assert_eq!(format_expiry("12/2999"), "12/29");
    assert_eq!(sanitize_cvv("1a2b3c4"), "123");
    assert_eq!(card_brand("4111"), CardBrand::Visa);
    assert_eq!(card_brand(" 5100"), CardBrand::Mastercard);
    assert_eq!(card_brand("3700"), CardBrand::Card);
}

/// 낙찰 목록: WON 만, 결제 여부 포함, 식별자 정규화
#[tokio::test]
async fn test_list_won_marks_paid_and_unpaid() {
    let server = MockServer::start().await;
    let session = server.signed_in(BUYER_EMAIL).await;

    let won = list_won(&session).await.expect("낙찰 목록 조회 실패");
    assert_eq!(won.len(), 2);
    assert_eq!(won.paid_count(), 1);
    assert_eq!(won.unpaid_count(), 1);

    let unpaid = won.find(WON_ITEM).expect("미결제 상품");
    assert!(unpaid.needs_payment());
    assert_eq!(unpaid.action_label(), "Complete Payment");
    assert_eq!(unpaid.bid.auction_id.as_deref(), Some(WON_AUCTION));
    assert_eq!(unpaid.bid.amount, 200.0);
    assert_eq!(unpaid.bid.item_title(), Some("Antique Clock"));

    assert!(!won.find(PAID_ITEM).expect("결제 상품").needs_payment());
    assert_eq!(server.hits("payment_exists"), 2);
}

/// 결제 여부 조회 실패는 미결제로 본다
#[tokio::test]
async fn test_failed_payment_lookup_counts_as_unpaid() {
    let server = MockServer::start().await;
    let session = server.signed_in(BUYER_EMAIL).await;
    server.fail("payment_exists");

    let won = list_won(&session).await.expect("낙찰 목록 조회 실패");
    assert_eq!(won.len(), 2);
    assert_eq!(won.paid_count(), 0);
}

/// 금액 = 낙찰가 + 2% 수수료
#[tokio::test]
async fn test_payment_totals_include_fee() {
    let server = MockServer::start().await;
    let session = server.signed_in(BUYER_EMAIL).await;
    let dialog = won_dialog(&session, FAST).await;

    let totals = dialog.totals();
    assert_eq!(totals.subtotal, 200.0);
    assert!((totals.fee - 4.0).abs() < 1e-9);
    assert!((totals.total - 204.0).abs() < 1e-9);
}

/// 미결제 상품 결제 후 paid=true
#[tokio::test]
async fn test_pay_won_item_then_marked_paid() {
    let server = MockServer::start().await;
    let session = server.signed_in(BUYER_EMAIL).await;
    let dialog = won_dialog(&session, Duration::from_millis(100)).await;
    fill(&dialog);
    assert_eq!(dialog.brand(), CardBrand::Visa);

    let started = Instant::now();
    let receipt = dialog.confirm().await.expect("결제 실패");
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert!(matches!(dialog.phase(), PaymentPhase::Succeeded(_)));
    assert_eq!(server.hits("payment_confirm"), 1);

    let payment = server.payments().pop().expect("결제 기록 없음");
    assert_eq!(payment["auctionId"], WON_AUCTION);
    assert_eq!(payment["itemId"], WON_ITEM);
    assert_eq!(payment["userId"], BUYER_ID);
    assert_eq!(payment["paymentMethod"], "mock_card");
    assert!((receipt.amount - 204.0).abs() < 1e-9);

    let text = dialog
        .success_view(Duration::from_secs(5))
        .expect("완료 화면")
        .receipt_text();
    assert!(text.starts_with("eAuction Payment Receipt\n\nTransaction ID: pay-"));
    assert!(text.contains("Amount: $204.00"));
    assert!(text.contains("Item: Antique Clock"));

    assert!(session.client().store().get(DASHBOARD_REFRESH_KEY).is_some());

    let won = list_won(&session).await.expect("낙찰 목록 조회 실패");
    let paid = won.find(WON_ITEM).expect("낙찰 상품");
    assert!(paid.paid);
    assert_eq!(paid.action_label(), "Paid");
    assert_eq!(won.unpaid_count(), 0);
}

/// 잘못된 카드: 네트워크 호출 없이 오류, 대화상자는 편집 상태 유지
#[tokio::test]
async fn test_invalid_card_never_reaches_network() {
    let server = MockServer::start().await;
    let session = server.signed_in(BUYER_EMAIL).await;
    let dialog = won_dialog(&session, FAST).await;
    fill(&dialog);
    dialog.set_cvv("1");

    let err = dialog.confirm().await.expect_err("검증 실패해야 함");
    assert!(matches!(err, Error::Card(CardError::Cvv)));
    assert_eq!(dialog.phase(), PaymentPhase::Editing);
    assert_eq!(dialog.toasts().len(), 1);
    assert_eq!(server.hits("payment_confirm"), 0);
}

/// 사용자 ID 가 없으면 바로 실패
#[tokio::test]
async fn test_missing_user_id_fails_fast() {
    let server = MockServer::start().await;
    let session = server.signed_in(BUYER_EMAIL).await;
    let dialog = won_dialog(&session, FAST).await;
    fill(&dialog);

    session.logout();
    assert!(session.client().store().get(USER_ID_KEY).is_none());

    let err = dialog.confirm().await.expect_err("사용자 ID 없음");
    assert!(matches!(err, Error::MissingIdentifier("user")));
    assert_eq!(server.hits("payment_confirm"), 0);
}

/// 경매/상품 ID 가 모두 없으면 바로 실패
#[tokio::test]
async fn test_missing_auction_and_item_fails_fast() {
    let server = MockServer::start().await;
    let session = server.signed_in(BUYER_EMAIL).await;
    let target = PaymentTarget {
        auction_id: None,
        item_id: None,
        winning_bid: 50.0,
        item_name: None,
        item_image: None,
    };
    let dialog = PaymentDialog::new(target, Arc::clone(&session), FAST, Toasts::new());
    fill(&dialog);

    let err = dialog.confirm().await.expect_err("식별자 없음");
    assert!(matches!(err, Error::MissingIdentifier("auction")));
}

/// 처리 중 두 번째 확정은 거부
#[tokio::test]
async fn test_second_confirm_while_processing_is_refused() {
    let server = MockServer::start().await;
    let session = server.signed_in(BUYER_EMAIL).await;
    let dialog = Arc::new(won_dialog(&session, Duration::from_millis(200)).await);
    fill(&dialog);

    let first = {
        let dialog = Arc::clone(&dialog);
        tokio::spawn(async move { dialog.confirm().await })
    };
    sleep(Duration::from_millis(50)).await;
    assert!(dialog.is_processing());
    assert!(matches!(dialog.confirm().await, Err(Error::InFlight)));

    first.await.expect("작업 실패").expect("결제 실패");
    assert_eq!(server.hits("payment_confirm"), 1);
}

/// 서버 실패 시 편집 상태로 돌아가 재시도 가능
#[tokio::test]
async fn test_server_failure_returns_to_editing() {
    let server = MockServer::start().await;
    let session = server.signed_in(BUYER_EMAIL).await;
    let dialog = won_dialog(&session, FAST).await;
    fill(&dialog);
    server.fail("payment_confirm");

    let err = dialog.confirm().await.expect_err("서버 실패");
    assert!(matches!(err, Error::Server { status: 500, .. }));
    assert_eq!(dialog.phase(), PaymentPhase::Editing);

    server.recover("payment_confirm");
    dialog.confirm().await.expect("재시도 실패");
    assert_eq!(server.payments().len(), 2);
}

/// 완료 화면: 자동 닫힘, 사용자 동작은 바로 끝낸다
#[tokio::test]
async fn test_success_view_auto_close_and_actions() {
    let server = MockServer::start().await;
    let session = server.signed_in(BUYER_EMAIL).await;
    let dialog = won_dialog(&session, FAST).await;
    fill(&dialog);
    dialog.confirm().await.expect("결제 실패");

    let view = dialog
        .success_view(Duration::from_millis(150))
        .expect("완료 화면");
    assert_eq!(view.seconds_left(Duration::ZERO), 1);

    // 동작 없음 -> 자동 닫힘 (송신 측이 닫혀도 동일)
    let (tx, rx) = mpsc::channel(1);
    drop(tx);
    assert_eq!(view.wait(rx).await, SuccessOutcome::AutoClosed);

    let long = dialog.success_view(Duration::from_secs(5)).expect("완료 화면");
    assert_eq!(long.seconds_left(Duration::from_millis(1500)), 4);

    let (tx, rx) = mpsc::channel(1);
    tx.send(SuccessAction::GoDashboard).await.expect("전송 실패");
    let started = Instant::now();
    assert_eq!(long.wait(rx).await, SuccessOutcome::GoDashboard);
    assert!(started.elapsed() < Duration::from_secs(1));
}
