//! Error types for the Payroll Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll calculation.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the Payroll Engine.
///
/// Numeric inputs never produce an error: negative or zero amounts are
/// handled by the calculations themselves. Errors are reserved for inputs
/// that would otherwise yield a silently wrong figure, such as a malformed
/// date or a month outside the financial year.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::InvalidMonth { month: 13 };
/// assert_eq!(
///     error.to_string(),
///     "Invalid financial-year month 13: expected 1 (April) to 12 (March)"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No professional tax table is configured for the state.
    #[error("Professional tax table not found for state: {state}")]
    StateNotFound {
        /// The state code that was requested.
        state: String,
    },

    /// A date field could not be parsed.
    #[error("Invalid date for '{field}': '{value}' (expected YYYY-MM-DD)")]
    InvalidDate {
        /// The field holding the malformed date.
        field: String,
        /// The raw value that failed to parse.
        value: String,
    },

    /// A financial-year month number was outside 1..=12.
    #[error("Invalid financial-year month {month}: expected 1 (April) to 12 (March)")]
    InvalidMonth {
        /// The rejected month number.
        month: u32,
    },

    /// An input field was structurally invalid.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A stored settlement could not be found.
    #[error("Settlement not found: {id}")]
    SettlementNotFound {
        /// The settlement id that was requested.
        id: Uuid,
    },

    /// An amount grew past the range a `Decimal` can hold.
    #[error("Amount out of range while computing {quantity}")]
    AmountOutOfRange {
        /// The figure whose computation overflowed.
        quantity: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    pub(crate) fn out_of_range(quantity: &str) -> Self {
        EngineError::AmountOutOfRange {
            quantity: quantity.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
