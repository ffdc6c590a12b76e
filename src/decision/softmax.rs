//! Temperature-controlled softmax over action utilities.

/// Convert utilities to a probability distribution.
///
/// Lower temperature sharpens toward the maximum; higher temperature
/// flattens toward uniform. Non-finite utilities are treated as the
/// worst candidate. Always returns a distribution summing to 1 for a
/// non-empty input.
#[must_use]
pub fn softmax(utilities: &[f64], temperature: f64) -> Vec<f64> {
    if utilities.is_empty() {
        return Vec::new();
    }
    let t = if temperature.is_finite() && temperature > 0.0 {
        temperature
    } else {
        1.0
    };

    let max = utilities
        .iter()
        .copied()
        .filter(|u| u.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        // Nothing finite; fall back to uniform.
        return vec![1.0 / utilities.len() as f64; utilities.len()];
    }

    // Max-shifted for numerical stability.
    let exps: Vec<f64> = utilities
        .iter()
        .map(|&u| {
            if u.is_finite() {
                ((u - max) / t).exp()
            } else {
                0.0
            }
        })
        .collect();

    let sum: f64 = exps.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return vec![1.0 / utilities.len() as f64; utilities.len()];
    }
    exps.iter().map(|e| e / sum).collect()
}
