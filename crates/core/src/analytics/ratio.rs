use rust_decimal::Decimal;

/// Division with the zero-denominator contract every derived metric shares:
/// a zero denominator resolves to zero instead of propagating an error or a
/// non-finite value. The guarded case is a data-quality signal, so it is
/// logged at debug level rather than surfaced.
pub fn safe_ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        tracing::debug!(
            event_name = "analytics.division_guarded",
            numerator = %numerator,
            "zero denominator resolved to zero"
        );
        return Decimal::ZERO;
    }
    numerator / denominator
}

/// Unweighted mean over `count` contributing records, guarded like
/// [`safe_ratio`]. An empty group averages to zero.
pub fn safe_mean(sum: Decimal, count: usize) -> Decimal {
    safe_ratio(sum, Decimal::from(count as u64))
}
