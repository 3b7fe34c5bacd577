//! Recursive exponentially weighted mean.

/// Smoothing factor for a span, `2 / (span + 1)`.
pub fn alpha_from_span(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Smoothing factor for a center of mass, `1 / (1 + com)`.
///
/// Wilder smoothing over `n` periods is a center of mass of `n - 1`.
pub fn alpha_from_center_of_mass(com: usize) -> f64 {
    1.0 / (1.0 + com as f64)
}

/// Exponentially weighted mean of `values`.
///
/// The running mean is seeded with the first observed value and updated as
/// `(w * mean + alpha * x) / (w + alpha)`, where `w` is the decayed weight
/// of the running mean. An undefined input keeps the running mean but still
/// decays `w`, so observations on the far side of a gap lose weight as if
/// the gap had been observed. Output stays undefined until `min_periods`
/// values have been observed.
pub fn ewm_mean(values: &[Option<f64>], alpha: f64, min_periods: usize) -> Vec<Option<f64>> {
    let min_periods = min_periods.max(1);
    let decay = 1.0 - alpha;

    let mut output = Vec::with_capacity(values.len());
    let mut running: Option<f64> = None;
    let mut old_weight = 1.0;
    let mut observed = 0usize;

    for value in values {
        let current = value.filter(|v| !v.is_nan());
        if current.is_some() {
            observed += 1;
        }

        match (running, current) {
            (Some(mean), _) => {
                old_weight *= decay;
                if let Some(x) = current {
                    if mean != x {
                        running = Some((old_weight * mean + alpha * x) / (old_weight + alpha));
                    }
                    old_weight = 1.0;
                }
            }
            (None, Some(x)) => running = Some(x),
            (None, None) => {}
        }

        output.push(if observed >= min_periods { running } else { None });
    }

    output
}
