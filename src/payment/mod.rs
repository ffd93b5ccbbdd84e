//! 낙찰 상품 결제 흐름 (모의 카드 결제)
pub mod card;
pub mod dialog;
pub mod won;

pub use card::{card_brand, format_card_number, format_expiry, sanitize_cvv, CardBrand, CardError, CardForm};
pub use dialog::{
    PaymentDialog, PaymentPhase, PaymentTarget, PaymentTotals, SuccessAction, SuccessOutcome,
    SuccessView, PROCESSING_FEE_RATE,
};
pub use won::{list_won, WonItem, WonItems};
