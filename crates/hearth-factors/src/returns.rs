//! Daily returns and series alignment.

/// Simple returns `p[t] / p[t-1] - 1`.
///
/// A series with fewer than two prices has no returns.
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Pair two series by position from the end.
///
/// Both slices are truncated to the shorter length, keeping the most recent
/// observations. This is a positional alignment, not a join on dates: the
/// last element of `a` is paired with the last element of `b`, and so on.
pub fn align_trailing<'a>(a: &'a [f64], b: &'a [f64]) -> (&'a [f64], &'a [f64]) {
    let n = a.len().min(b.len());
    (&a[a.len() - n..], &b[b.len() - n..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_returns() {
        let r = simple_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert_relative_eq!(r[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(r[1], -0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_short_series_has_no_returns() {
        assert!(simple_returns(&[]).is_empty());
        assert!(simple_returns(&[42.0]).is_empty());
    }

    #[test]
    fn test_align_trailing_keeps_most_recent() {
        let long = [1.0, 2.0, 3.0, 4.0, 5.0];
        let short = [30.0, 40.0, 50.0];
        let (a, b) = align_trailing(&long, &short);
        assert_eq!(a, [3.0, 4.0, 5.0]);
        assert_eq!(b, [30.0, 40.0, 50.0]);

        let (b, a) = align_trailing(&short, &long);
        assert_eq!(a, [3.0, 4.0, 5.0]);
        assert_eq!(b, [30.0, 40.0, 50.0]);
    }

    #[test]
    fn test_align_trailing_with_empty() {
        let (a, b) = align_trailing(&[1.0, 2.0], &[]);
        assert!(a.is_empty());
        assert!(b.is_empty());
    }
}
