use thiserror::Error;
use tracing::warn;

/// Error returned when edited text cannot be read as a yen amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("'{0}' contains no digits")]
    NoDigits(String),

    #[error("'{0}' is too large")]
    TooLarge(String),

    #[error("amount must be greater than zero")]
    Zero,
}

/// Reads a whole-yen amount from free-form text.
///
/// Every character that is not an ASCII digit is dropped first, so currency
/// signs, thousands separators and spaces are accepted (`"¥1,234,000"`).
/// A minus sign is dropped too: edited amounts are never negative.
pub fn parse_amount_input(s: &str) -> Result<i64, ParseAmountError> {
    let digits: String = s.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        warn!(input = %s, "amount input has no digits");
        return Err(ParseAmountError::NoDigits(s.to_string()));
    }
    digits
        .parse()
        .map_err(|_| ParseAmountError::TooLarge(s.to_string()))
}

/// Like [`parse_amount_input`], but rejects zero. Used for revenue targets.
pub fn parse_target_input(s: &str) -> Result<i64, ParseAmountError> {
    match parse_amount_input(s)? {
        0 => Err(ParseAmountError::Zero),
        amount => Ok(amount),
    }
}
