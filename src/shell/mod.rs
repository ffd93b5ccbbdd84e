pub mod guard;
pub mod toast;

pub use guard::{authorize, RouteDecision};
pub use toast::{Toast, ToastKind, Toasts};
