//! Small numeric helpers shared by the registry, rectangles and driver.

/// Index and value of the smallest element.
///
/// Ties resolve to the first occurrence, which keeps every selection in the
/// clustering run dependent on input order only. NaN never wins over a
/// number. Returns `None` when empty.
pub(crate) fn argmin<I>(values: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, value) in values.into_iter().enumerate() {
        if best.is_none_or(|(_, min)| value < min || (min.is_nan() && !value.is_nan())) {
            best = Some((index, value));
        }
    }
    best
}
