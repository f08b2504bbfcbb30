//! # Settlement Reference (UTR)
//!
//! Syntactic validation of the Unique Transaction Reference a buyer
//! submits as proof of fiat payment.
//!
//! Real verification that the reference corresponds to a bank transfer is
//! an external concern; this type only guarantees the format: exactly
//! twelve ASCII digits, as issued by the settlement network.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Required number of digits in a UTR.
pub const UTR_LENGTH: usize = 12;

/// Error returned for a malformed settlement reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UtrError {
    /// The reference was not exactly [`UTR_LENGTH`] characters long.
    #[error("settlement reference must be exactly {UTR_LENGTH} digits, got {0} characters")]
    WrongLength(usize),

    /// The reference contained a non-digit character.
    #[error("settlement reference must contain only digits")]
    NonDigit,
}

/// A syntactically valid 12-digit settlement reference.
///
/// # Examples
///
/// ```
/// use p2p_trade::domain::value_objects::utr::UtrNumber;
///
/// let utr: UtrNumber = "123456789012".parse().unwrap();
/// assert_eq!(utr.as_str(), "123456789012");
///
/// assert!("12345".parse::<UtrNumber>().is_err());
/// assert!("12345678901X".parse::<UtrNumber>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtrNumber(String);

impl UtrNumber {
    /// Parses and validates a settlement reference.
    ///
    /// # Errors
    ///
    /// Returns [`UtrError`] if the input is not exactly twelve ASCII digits.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, UtrError> {
        let s = input.as_ref();
        if s.len() != UTR_LENGTH {
            return Err(UtrError::WrongLength(s.len()));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UtrError::NonDigit);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the reference as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UtrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UtrNumber {
    type Err = UtrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UtrNumber {
    type Error = UtrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UtrNumber> for String {
    fn from(utr: UtrNumber) -> Self {
        utr.0
    }
}
