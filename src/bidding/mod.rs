//! 상품 상세 / 입찰 흐름
pub mod commands;
pub mod detail;
pub mod toggle;
pub mod validation;

pub use commands::{handle_confirm_bid, BidPhase, BidWidget};
pub use detail::{DetailSnapshot, ItemDetail};
pub use toggle::{CartMembership, Membership, MembershipToggle, ToggleState, WatchlistMembership};
pub use validation::{parse_amount, validate_bid, BidRejection};
