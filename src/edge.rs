//! Sobel edge strength over a luminance grid.

use ndarray::Array2;

/// Magnitudes at or below this are dropped to zero.
pub const DEFAULT_THRESHOLD: f32 = 30.0;

/// Gradient magnitude for every cell of `luma` (shape `(rows, cols)`).
///
/// Border cells are never evaluated and stay 0; neighbours are not clamped or
/// wrapped. Interior magnitudes `<= threshold` become 0, the rest are kept
/// as-is (not normalized, so they can exceed 255).
pub fn detect_edges(luma: &Array2<f32>, threshold: f32) -> Array2<f32> {
    let (rows, cols) = luma.dim();
    let mut edges = Array2::zeros((rows, cols));
    if rows < 3 || cols < 3 {
        return edges;
    }

    for y in 1..rows - 1 {
        for x in 1..cols - 1 {
            let tl = luma[[y - 1, x - 1]];
            let t = luma[[y - 1, x]];
            let tr = luma[[y - 1, x + 1]];
            let l = luma[[y, x - 1]];
            let r = luma[[y, x + 1]];
            let bl = luma[[y + 1, x - 1]];
            let b = luma[[y + 1, x]];
            let br = luma[[y + 1, x + 1]];

            let gx = -tl + tr - 2.0 * l + 2.0 * r - bl + br;
            let gy = -tl - 2.0 * t - tr + bl + 2.0 * b + br;
            let magnitude = (gx * gx + gy * gy).sqrt();

            if magnitude > threshold {
                edges[[y, x]] = magnitude;
            }
        }
    }
    edges
}

/// Per-cell `max(edge, brightness)` clamped into `[0, 255]`.
pub fn combine(luma: &Array2<f32>, edges: &Array2<f32>) -> Array2<f32> {
    let mut out = luma.clone();
    out.zip_mut_with(edges, |v, &e| *v = v.max(e).clamp(0.0, 255.0));
    out
}
