//! Error types for the settlement engine
//!
//! The engine itself is total over its domain and never fails on well-typed
//! input. Errors cover two things:
//!
//! - **I/O and parsing**: file not found, malformed ledger rows, etc.
//! - **Validation findings**: records the engine normalizes defensively
//!   (unknown members, non-positive amounts, self-payments). These are reported
//!   and logged, never used to abort a computation.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the settlement engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettleError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the malformed row is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Unknown ledger row type
    #[error("Invalid record type '{record_type}' in group '{group}'")]
    InvalidRecordType { record_type: String, group: String },

    /// A required column was empty for the given row type
    #[error("{record_type} record in group '{group}' requires a '{field}' value")]
    MissingField {
        record_type: String,
        group: String,
        field: String,
    },

    /// Amount could not be parsed as a decimal
    #[error("Invalid amount '{amount}' in group '{group}'")]
    InvalidAmount { amount: String, group: String },

    /// A record references an id that is not a current member
    #[error("{context} references unknown member '{member}'")]
    UnknownMember { member: String, context: String },

    /// Expense or payment amount is zero or negative
    #[error("{context} has non-positive amount {amount}")]
    NonPositiveAmount { amount: Decimal, context: String },

    /// Payment from a member to themselves
    #[error("Payment from '{member}' to themselves is ignored")]
    SelfPayment { member: String },

    /// Expenses were supplied without any members to split them among
    #[error("{expenses} expense(s) supplied but the member set is empty")]
    EmptyMemberSet { expenses: usize },

    /// Two members share the same id
    #[error("Member id '{member}' appears more than once")]
    DuplicateMember { member: String },

    /// A running total would exceed the decimal range
    ///
    /// The offending record is skipped.
    #[error("Arithmetic overflow in {operation} for {context}")]
    ArithmeticOverflow { operation: String, context: String },
}

impl From<std::io::Error> for SettleError {
    fn from(error: std::io::Error) -> Self {
        SettleError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for SettleError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        SettleError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl SettleError {
    pub fn unknown_member(member: &str, context: &str) -> Self {
        SettleError::UnknownMember {
            member: member.to_string(),
            context: context.to_string(),
        }
    }

    pub fn non_positive_amount(amount: Decimal, context: &str) -> Self {
        SettleError::NonPositiveAmount {
            amount,
            context: context.to_string(),
        }
    }

    pub fn self_payment(member: &str) -> Self {
        SettleError::SelfPayment {
            member: member.to_string(),
        }
    }

    pub fn duplicate_member(member: &str) -> Self {
        SettleError::DuplicateMember {
            member: member.to_string(),
        }
    }

    pub fn invalid_record_type(record_type: &str, group: &str) -> Self {
        SettleError::InvalidRecordType {
            record_type: record_type.to_string(),
            group: group.to_string(),
        }
    }

    pub fn missing_field(record_type: &str, group: &str, field: &str) -> Self {
        SettleError::MissingField {
            record_type: record_type.to_string(),
            group: group.to_string(),
            field: field.to_string(),
        }
    }

    pub fn arithmetic_overflow(operation: &str, context: &str) -> Self {
        SettleError::ArithmeticOverflow {
            operation: operation.to_string(),
            context: context.to_string(),
        }
    }

    pub fn invalid_amount(amount: &str, group: &str) -> Self {
        SettleError::InvalidAmount {
            amount: amount.to_string(),
            group: group.to_string(),
        }
    }

    /// Attach a line number to a row-level error
    pub fn at_line(self, line: u64) -> Self {
        match self {
            SettleError::ParseError { message, .. } => SettleError::ParseError {
                line: Some(line),
                message,
            },
            other => SettleError::ParseError {
                line: Some(line),
                message: other.to_string(),
            },
        }
    }
}
