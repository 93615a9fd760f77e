//! Statistical primitives used to fit dependency models: percentiles with
//! linear interpolation and the mutual information of two bit columns.

use crate::fitness::Bit;

/// Returns the `q`-th percentile (`q` in `[0, 100]`) of `values`, linearly
/// interpolating between the two closest order statistics.
///
/// NaN values are ignored. Returns `None` if no other values remain.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let t = rank - lo as f64;

    Some(lerp(sorted[lo], sorted[hi], t))
}

// Interpolates from whichever end is closer so that t == 1 yields exactly `b`.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}

/// Mutual information (in nats) between two equally long bit columns, using
/// their empirical joint distribution.
///
/// Returns 0 for empty columns. The result is never negative.
pub fn mutual_information(x: &[Bit], y: &[Bit]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }

    let mut joint = [[0usize; 2]; 2];
    for (&a, &b) in x.iter().zip(y) {
        joint[a as usize & 1][b as usize & 1] += 1;
    }

    let x_counts = [joint[0][0] + joint[0][1], joint[1][0] + joint[1][1]];
    let y_counts = [joint[0][0] + joint[1][0], joint[0][1] + joint[1][1]];
    let n = n as f64;

    let mut mi = 0.0;
    for a in 0..2 {
        for b in 0..2 {
            let count = joint[a][b];
            if count == 0 {
                continue;
            }
            let count = count as f64;
            let expected = x_counts[a] as f64 * y_counts[b] as f64;
            mi += count / n * (count * n / expected).ln();
        }
    }

    mi.max(0.0)
}
