// region:    --- Imports
use crate::error::{Error, Result};
use crate::format::Currency;
use std::path::PathBuf;
use std::time::Duration;

// endregion: --- Imports

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_STORE_PATH: &str = ".eauction/store.json";

// region:    --- Client Config
/// 클라이언트 설정
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub payment_delay: Duration,
    pub auto_close_after: Duration,
    pub store_path: PathBuf,
    /// 금액 표시 통화
    pub currency: Currency,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(5),
            payment_delay: Duration::from_millis(1200),
            auto_close_after: Duration::from_secs(5),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            currency: Currency::default(),
        }
    }
}

impl ClientConfig {
    /// 환경 변수(.env 포함)에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let api_base_url = std::env::var("EAUCTION_API_BASE_URL")
            .unwrap_or(defaults.api_base_url)
            .trim_end_matches('/')
            .to_string();
        let config = Self {
            api_base_url,
            request_timeout: env_duration("EAUCTION_REQUEST_TIMEOUT_SECS", Duration::from_secs)?
                .unwrap_or(defaults.request_timeout),
            poll_interval: env_duration("EAUCTION_POLL_INTERVAL_SECS", Duration::from_secs)?
                .unwrap_or(defaults.poll_interval),
            payment_delay: env_duration("EAUCTION_PAYMENT_DELAY_MS", Duration::from_millis)?
                .unwrap_or(defaults.payment_delay),
            auto_close_after: env_duration("EAUCTION_AUTO_CLOSE_SECS", Duration::from_secs)?
                .unwrap_or(defaults.auto_close_after),
            store_path: std::env::var("EAUCTION_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            currency: match std::env::var("EAUCTION_CURRENCY") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|e| Error::Config(format!("EAUCTION_CURRENCY={raw}: {e}")))?,
                Err(_) => defaults.currency,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// 값 검증: 빈 URL, 0 인 시간 간격 거부 (결제 지연은 0 허용)
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(Error::Config("EAUCTION_API_BASE_URL 값이 비어 있습니다.".to_string()));
        }
        let intervals = [
            ("EAUCTION_REQUEST_TIMEOUT_SECS", self.request_timeout),
            ("EAUCTION_POLL_INTERVAL_SECS", self.poll_interval),
            ("EAUCTION_AUTO_CLOSE_SECS", self.auto_close_after),
        ];
        match intervals.iter().find(|(_, value)| value.is_zero()) {
            Some((key, _)) => Err(Error::Config(format!("{key} 값은 0보다 커야 합니다."))),
            None => Ok(()),
        }
    }

    /// 기본 URL 지정
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

fn env_duration(key: &str, unit: fn(u64) -> Duration) -> Result<Option<Duration>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|v| Some(unit(v)))
            .map_err(|e| Error::Config(format!("{key}={raw}: {e}"))),
        Err(_) => Ok(None),
    }
}
// endregion: --- Client Config
