// Distance kernels for centroid assignment.
// Scalar code with two accumulators so the adds can pipeline.

/// Squared Euclidean distance. Slices must have equal length.
#[inline]
pub fn squared_l2(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let mut sum0 = 0.0f64;
    let mut sum1 = 0.0f64;

    let chunks = a.chunks_exact(4);
    let remainder = chunks.remainder().len();
    for (a_chunk, b_chunk) in chunks.zip(b.chunks_exact(4)) {
        let d0 = a_chunk[0] - b_chunk[0];
        let d1 = a_chunk[1] - b_chunk[1];
        let d2 = a_chunk[2] - b_chunk[2];
        let d3 = a_chunk[3] - b_chunk[3];
        sum0 += d0 * d0 + d1 * d1;
        sum1 += d2 * d2 + d3 * d3;
    }

    for i in (a.len() - remainder)..a.len() {
        let d = a[i] - b[i];
        sum0 += d * d;
    }

    sum0 + sum1
}

/// `|x - a|^2 - |x - b|^2` computed as `sum (b - a)(2x - a - b)`.
/// Stays finite for inputs whose squared distances overflow.
pub fn squared_l2_difference(x: &[f64], a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), a.len());
    debug_assert_eq!(x.len(), b.len());

    x.iter()
        .zip(a.iter().zip(b))
        .map(|(x, (a, b))| (b - a) * ((x - a) + (x - b)))
        .sum()
}

/// Euclidean distance
#[inline]
pub fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    squared_l2(a, b).sqrt()
}
