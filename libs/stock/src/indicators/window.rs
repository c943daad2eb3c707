//! Trailing-window helpers over series that may contain undefined points.

/// Lifts raw closes into the optional domain. Non-finite values are undefined.
pub fn defined(values: impl IntoIterator<Item = f64>) -> Vec<Option<f64>> {
    values
        .into_iter()
        .map(|v| v.is_finite().then_some(v))
        .collect()
}

/// Applies `reduce` to every full trailing window of `period` points.
///
/// Index `i` is defined only when `i >= period - 1` and every point in
/// `values[i + 1 - period..=i]` is defined. A zero period yields nothing.
pub fn rolling<F>(values: &[Option<f64>], period: usize, reduce: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = vec![None; values.len()];
    if period == 0 || period > values.len() {
        return out;
    }

    let mut buf = Vec::with_capacity(period);
    for (i, slot) in out.iter_mut().enumerate().skip(period - 1) {
        buf.clear();
        buf.extend(values[i + 1 - period..=i].iter().map_while(|v| *v));
        if buf.len() == period {
            *slot = reduce(&buf);
        }
    }
    out
}

pub fn mean(window: &[f64]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    Some(window.iter().sum::<f64>() / window.len() as f64)
}

/// First differences; index 0 and any pair touching an undefined point are undefined.
pub fn diff(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(values.windows(2).map(|w| Some(w[1]? - w[0]?)));
    out
}
