/// Errors raised while converting slider labels and updating the tooltip.
use std::fmt;
use thiserror::Error;

/// Why a label could not be read as a whole number of hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseReason {
    /// Nothing but whitespace
    Empty,
    /// Decimal point or exponent present
    Fractional,
    /// Not an integer at all
    NotNumeric,
    /// Not an ISO-8601 instant (inverse transform only)
    NotInstant,
}

impl fmt::Display for ParseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseReason::Empty => "label is empty",
            ParseReason::Fractional => "fractional hours are not allowed",
            ParseReason::NotNumeric => "not a base-10 integer",
            ParseReason::NotInstant => "not an ISO-8601 instant",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimestampError {
    /// The label text is not a valid integer (or instant, for the inverse)
    #[error("Cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: ParseReason },

    /// The display sink has no element for the selector
    #[error("No element matches selector {selector:?}")]
    ElementNotFound { selector: String },

    /// The computed instant cannot be represented
    #[error("{value} is outside the representable date range")]
    Range { value: String },
}

impl TimestampError {
    pub(crate) fn parse(input: &str, reason: ParseReason) -> Self {
        TimestampError::Parse {
            input: input.to_string(),
            reason,
        }
    }

    pub(crate) fn range(value: impl ToString) -> Self {
        TimestampError::Range {
            value: value.to_string(),
        }
    }
}
