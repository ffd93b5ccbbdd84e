/// 모의 카드 입력 검증 및 입력 보조
// region:    --- Imports
use thiserror::Error;

// endregion: --- Imports

// region:    --- Card Error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("카드 번호는 16자리여야 합니다.")]
    CardNumber,

    #[error("카드 소유자 이름을 입력하세요.")]
    Cardholder,

    #[error("유효기간은 MM/YY 형식이어야 합니다.")]
    ExpiryFormat,

    #[error("유효기간의 월이 올바르지 않습니다.")]
    ExpiryMonth,

    #[error("CVV는 3자리여야 합니다.")]
    Cvv,
}
// endregion: --- Card Error

// region:    --- Card Form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardForm {
    pub card_number: String,
    pub cardholder: String,
    pub expiry: String,
    pub cvv: String,
}

impl CardForm {
    /// 입력 순서대로 검사하고 첫 번째 문제를 돌려준다
    pub fn validate(&self) -> Result<(), CardError> {
        if digits(&self.card_number).len() != 16 {
            return Err(CardError::CardNumber);
        }
        if self.cardholder.trim().is_empty() {
            return Err(CardError::Cardholder);
        }

        let (month, _year) = self
            .expiry
            .split_once('/')
            .filter(|(m, y)| is_two_digits(m) && is_two_digits(y))
            .ok_or(CardError::ExpiryFormat)?;
        let month: u8 = month.parse().map_err(|_| CardError::ExpiryFormat)?;
        if !(1..=12).contains(&month) {
            return Err(CardError::ExpiryMonth);
        }

        if self.cvv.len() != 3 || !self.cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(CardError::Cvv);
        }
        Ok(())
    }

    pub fn brand(&self) -> CardBrand {
        card_brand(&self.card_number)
    }
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn is_two_digits(value: &str) -> bool {
    value.len() == 2 && value.chars().all(|c| c.is_ascii_digit())
}
// endregion: --- Card Form

// region:    --- Input Helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardBrand {
    Visa,
    Mastercard,
    Card,
}

/// 첫 자리로 카드 브랜드 판별
pub fn card_brand(card_number: &str) -> CardBrand {
    match digits(card_number).chars().next() {
        Some('4') => CardBrand::Visa,
        Some('5') => CardBrand::Mastercard,
        _ => CardBrand::Card,
    }
}

/// 숫자만 남겨 4자리씩 띄운다 (최대 16자리)
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = digits(input).chars().take(16).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 숫자 4자리까지, 두 자리 뒤에 `/` 삽입
pub fn format_expiry(input: &str) -> String {
    let digits: String = digits(input).chars().take(4).collect();
    if digits.len() <= 2 {
        digits
    } else {
        format!("{}/{}", &digits[..2], &digits[2..])
    }
}

/// 숫자 3자리까지
pub fn sanitize_cvv(input: &str) -> String {
    digits(input).chars().take(3).collect()
}
// endregion: --- Input Helpers
