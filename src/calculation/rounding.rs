//! Rupee rounding and overflow-checked totals.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Rounds an amount to the nearest whole rupee, halves rounding up.
///
/// Halves always move toward positive infinity (`2.5 -> 3`, `-2.5 -> -2`),
/// so the result is deterministic regardless of sign. Every statutory
/// figure in the engine is rounded through this function at the points the
/// calculations document.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_rupee;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_rupee(Decimal::from_str("2166.67").unwrap()), Decimal::new(2167, 0));
/// assert_eq!(round_rupee(Decimal::from_str("157.5").unwrap()), Decimal::new(158, 0));
/// assert_eq!(round_rupee(Decimal::from_str("-2.5").unwrap()), Decimal::new(-2, 0));
/// ```
pub fn round_rupee(amount: Decimal) -> Decimal {
    match amount.checked_add(Decimal::new(5, 1)) {
        Some(shifted) => shifted.floor(),
        // Only reachable next to Decimal::MAX, where halves already round up.
        None => amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
    }
}

/// Adds up `parts`, reporting `quantity` if the total leaves the `Decimal` range.
pub(crate) fn checked_sum(quantity: &str, parts: &[Decimal]) -> EngineResult<Decimal> {
    parts.iter().try_fold(Decimal::ZERO, |total, part| {
        total
            .checked_add(*part)
            .ok_or_else(|| EngineError::out_of_range(quantity))
    })
}
