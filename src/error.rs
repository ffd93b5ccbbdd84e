// region:    --- Imports
use crate::bidding::validation::BidRejection;
use crate::payment::card::CardError;
use thiserror::Error;

// endregion: --- Imports

pub type Result<T> = core::result::Result<T, Error>;

// region:    --- Error
/// 클라이언트 전체에서 사용하는 오류
/// 서비스 함수는 패닉 없이 항상 Result 로 돌려준다.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Bid(#[from] BidRejection),

    #[error(transparent)]
    Card(#[from] CardError),

    #[error("{0} 식별자를 확인할 수 없습니다.")]
    MissingIdentifier(&'static str),

    #[error("요청 시간이 초과되었습니다.")]
    Timeout,

    #[error("네트워크 오류: {0}")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Unauthorized(String),

    #[error("응답 해석 실패: {0}")]
    Decode(String),

    #[error("요청이 이미 처리 중입니다.")]
    InFlight,

    #[error("설정 오류: {0}")]
    Config(String),

    #[error("저장소 오류: {0}")]
    Storage(String),
}

impl Error {
    /// 사용자에게 보여줄 메시지
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// 네트워크를 거치지 않고 클라이언트에서 걸러진 오류인지
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Bid(_) | Error::Card(_) | Error::MissingIdentifier(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else if e.is_decode() {
            Error::Decode(e.to_string())
        } else {
            Error::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(e.to_string())
    }
}
// endregion: --- Error
