//! Validators for operator input.
//!
//! Every validator is a pure function over the raw (already trimmed) input
//! plus whatever context the caller fetched beforehand. Acceptance yields the
//! typed value; rejection yields a [`Rejection`] whose message names the
//! offending value and the accepted constraint.
//!
//! ## Examples
//! ```text
//! employee number "12345"   -> rejected: 5 digits
//! employee number "123456"  -> accepted (when not already in the pool)
//! age "76" with 18..=75     -> rejected: only a value between 18 to 75
//! entry date "2021-07-01"   -> rejected: should be DD/MM/YYYY
//! ```
use crate::record::parse_date;
use chrono::NaiveDate;
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;
use thiserror::Error;

/// Employee numbers are exactly this many digits.
pub const EMPLOYEE_NUMBER_DIGITS: usize = 6;

static DATE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}$").expect("regex for date shape")
});

pub type Verdict<T> = Result<T, Rejection>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error(
        "Only a unique 6 digit number is accepted, you entered {value:?}, which is not a number, please try again."
    )]
    NotDigits { value: String },
    #[error("Only a unique 6 digit number is accepted, you entered {digits} digits, please try again.")]
    DigitCount { value: String, digits: usize },
    #[error(
        "Only a unique 6 digit number is accepted, you entered the duplicate employee number {value}, please try again."
    )]
    Duplicate { value: String },
    #[error("Numbers are not accepted, you entered {value}, please try again.")]
    Numeric { value: String },
    #[error("A value is required, you entered nothing, please try again.")]
    Empty { value: String },
    #[error(
        "Only a whole number between {description} is accepted, you entered {value:?}, please try again."
    )]
    NotANumber { value: String, description: String },
    #[error("Only a value between {description} is accepted, you entered {value}, please try again.")]
    OutOfRange { value: String, description: String },
    #[error("Incorrect data format, should be DD/MM/YYYY, you entered {value:?}, please try again.")]
    BadDate { value: String },
    #[error(
        "Please choose one of the listed options by number (1 to {count}) or by name, you entered {value:?}."
    )]
    UnknownChoice { value: String, count: usize },
}

impl Rejection {
    /// The raw input that was rejected.
    pub fn value(&self) -> &str {
        match self {
            Rejection::NotDigits { value }
            | Rejection::DigitCount { value, .. }
            | Rejection::Duplicate { value }
            | Rejection::Numeric { value }
            | Rejection::Empty { value }
            | Rejection::NotANumber { value, .. }
            | Rejection::OutOfRange { value, .. }
            | Rejection::BadDate { value }
            | Rejection::UnknownChoice { value, .. } => value,
        }
    }
}

/// Accept a new employee number: six digits, absent from `existing`.
///
/// `existing` should be fetched fresh from the store for every attempt so a
/// row added mid-session is still caught.
pub fn employee_number(raw: &str, existing: &[String]) -> Verdict<String> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Rejection::NotDigits {
            value: raw.to_string(),
        });
    }
    if raw.len() != EMPLOYEE_NUMBER_DIGITS {
        return Err(Rejection::DigitCount {
            value: raw.to_string(),
            digits: raw.len(),
        });
    }
    if existing.iter().any(|number| number.trim() == raw) {
        return Err(Rejection::Duplicate {
            value: raw.to_string(),
        });
    }
    Ok(raw.to_string())
}

/// Accept free text that is not purely numeric; the result is title-cased.
pub fn text(raw: &str) -> Verdict<String> {
    if raw.is_empty() {
        return Err(Rejection::Empty {
            value: raw.to_string(),
        });
    }
    if raw.chars().all(char::is_numeric) {
        return Err(Rejection::Numeric {
            value: raw.to_string(),
        });
    }
    Ok(title_case(raw))
}

/// Accept a whole number inside `range`; `description` is shown on rejection.
pub fn in_range(raw: &str, range: &RangeInclusive<u32>, description: &str) -> Verdict<u32> {
    let Ok(number) = raw.parse::<i64>() else {
        return Err(Rejection::NotANumber {
            value: raw.to_string(),
            description: description.to_string(),
        });
    };
    let inside = number >= i64::from(*range.start()) && number <= i64::from(*range.end());
    match u32::try_from(number) {
        Ok(value) if inside => Ok(value),
        _ => Err(Rejection::OutOfRange {
            value: raw.to_string(),
            description: description.to_string(),
        }),
    }
}

/// Accept a calendar date written as DD/MM/YYYY.
pub fn date(raw: &str) -> Verdict<NaiveDate> {
    let reject = || Rejection::BadDate {
        value: raw.to_string(),
    };
    if !DATE_SHAPE.is_match(raw) {
        return Err(reject());
    }
    parse_date(raw).map_err(|_| reject())
}

/// Accept one of `choices`, either by 1-based position or by exact label
/// (case-insensitive). Returns the zero-based index.
pub fn choice(raw: &str, choices: &[String]) -> Verdict<usize> {
    let reject = || Rejection::UnknownChoice {
        value: raw.to_string(),
        count: choices.len(),
    };
    if let Ok(position) = raw.parse::<usize>() {
        if (1..=choices.len()).contains(&position) {
            return Ok(position - 1);
        }
    }
    choices
        .iter()
        .position(|label| label.eq_ignore_ascii_case(raw))
        .ok_or_else(reject)
}

/// Capitalize the first letter of every word and lowercase the rest.
///
/// A word starts after any non-alphabetic character, so "o'neil-smith"
/// becomes "O'Neil-Smith".
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut previous_alphabetic = false;
    for ch in raw.chars() {
        if previous_alphabetic {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        previous_alphabetic = ch.is_alphabetic();
    }
    out
}
