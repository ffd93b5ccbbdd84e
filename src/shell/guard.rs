/// 보호된 화면 접근 판단
// region:    --- Imports
use crate::model::Role;
use crate::session::Session;
use tracing::debug;

// endregion: --- Imports

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// 세션 초기화 중
    Loading,
    RedirectLogin,
    /// 권한 부족
    RedirectHome,
    Allow,
}

/// 1. 세션 초기화 중이면 대기
/// 2. 비로그인 -> 로그인 화면
/// 3. 필요한 역할이 하나도 없으면 -> 홈
pub fn authorize(session: &Session, required: Option<&[Role]>) -> RouteDecision {
    let decision = if session.is_loading() {
        RouteDecision::Loading
    } else if !session.is_authenticated() {
        RouteDecision::RedirectLogin
    } else {
        match required {
            Some(roles) if !roles.is_empty() && !session.has_any_role(roles) => {
                RouteDecision::RedirectHome
            }
            _ => RouteDecision::Allow,
        }
    };
    debug!("{:<12} --> 접근 판단: {:?}", "Guard", decision);
    decision
}
