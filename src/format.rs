/// 화면 표시용 포맷
// region:    --- Imports
use chrono::{DateTime, Utc};

// endregion: --- Imports

/// `dd/mm/yyyy hh:mm`, 값이 없으면 "-"
pub fn format_date_time(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// 금액 (`$` + 소수 둘째 자리)
pub fn format_amount(amount: f64) -> String {
    format!("${amount:.2}")
}

// region:    --- Currency
/// 서버 금액은 USD, 화면에는 INR 로 보여줄 수 있다
pub const USD_TO_INR_RATE: f64 = 83.0;

/// 표시 통화
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    Usd,
    Inr,
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "INR" => Ok(Currency::Inr),
            other => Err(format!("지원하지 않는 통화: {other}")),
        }
    }
}

impl Currency {
    /// 서버 금액(USD)을 표시 통화로 포맷
    pub fn format(self, usd_amount: f64) -> String {
        match self {
            Currency::Usd => format_amount(usd_amount),
            Currency::Inr => format!("₹{}", group_indian(usd_to_inr(usd_amount))),
        }
    }
}

/// 유한하지 않은 값은 0
pub fn usd_to_inr(usd_amount: f64) -> f64 {
    if usd_amount.is_finite() {
        usd_amount * USD_TO_INR_RATE
    } else {
        0.0
    }
}

/// INR 입력을 서버 금액(USD)으로
pub fn inr_to_usd(inr_amount: f64) -> f64 {
    if inr_amount.is_finite() {
        inr_amount / USD_TO_INR_RATE
    } else {
        0.0
    }
}

/// 인도식 자리 구분 (12,34,567.89)
fn group_indian(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = if whole.len() <= 3 {
        whole.to_string()
    } else {
        let (head, tail) = whole.split_at(whole.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (left, right) = rest.split_at(rest.len() - 2);
            parts.push(right);
            rest = left;
        }
        parts.push(rest);
        parts.reverse();
        format!("{},{tail}", parts.join(","))
    };

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
// endregion: --- Currency

/// 경매 남은 시간
/// "Auction Ended" | "{d}d {h}h" | "{h}h {m}m" | "{m}m {s}s"
pub fn time_remaining(end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(end) = end else {
        return "-".to_string();
    };
    let secs = (end - now).num_seconds();
    if secs <= 0 {
        return "Auction Ended".to_string();
    }

    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m {seconds}s")
    }
}
