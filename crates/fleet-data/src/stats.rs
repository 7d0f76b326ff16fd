//! NaN-skipping reductions shared by the summary and aggregation code.
//!
//! Empty cells load as `NaN`; like a dataframe library, every reduction here
//! ignores them instead of letting one missing reading poison a group.

/// Arithmetic mean of the non-`NaN` values, or `None` if there are none.
pub(crate) fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Largest non-`NaN` value, or `NaN` if there are none.
pub(crate) fn max<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().fold(f64::NAN, f64::max)
}

/// Smallest non-`NaN` value, or `NaN` if there are none.
pub(crate) fn min<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().fold(f64::NAN, f64::min)
}
