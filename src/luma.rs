//! Perceptual brightness of sampled cells.

use image::RgbaImage;
use ndarray::Array2;

/// BT.601 luma in `[0, 255]`.
///
/// Computed in integer thousandths so that pure white lands on exactly 255.
pub fn brightness(r: u8, g: u8, b: u8) -> f32 {
    let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    weighted as f32 / 1000.0
}

/// Stretch `gray` away from mid-grey by `factor`, clamped to `[0, 255]`.
pub fn contrast(gray: f32, factor: f32) -> f32 {
    ((gray - 128.0) * factor + 128.0).clamp(0.0, 255.0)
}

/// Brightness of every cell, shaped `(rows, cols)`. Alpha is ignored.
pub fn luminance_grid(samples: &RgbaImage, factor: Option<f32>) -> Array2<f32> {
    let (cols, rows) = samples.dimensions();
    Array2::from_shape_fn((rows as usize, cols as usize), |(y, x)| {
        let [r, g, b, _] = samples.get_pixel(x as u32, y as u32).0;
        let gray = brightness(r, g, b);
        match factor {
            Some(k) => contrast(gray, k),
            None => gray,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn black_and_white_extremes() {
        assert_eq!(brightness(0, 0, 0), 0.0);
        assert_eq!(brightness(255, 255, 255), 255.0);
    }

    #[test]
    fn weights_favour_green() {
        assert!(brightness(0, 255, 0) > brightness(255, 0, 0));
        assert!(brightness(255, 0, 0) > brightness(0, 0, 255));
        assert!((brightness(255, 0, 0) - 76.245).abs() < 1e-3);
    }

    #[test]
    fn monotonic_per_channel() {
        for base in [0u8, 37, 128, 200] {
            let mut prev = (0.0, 0.0, 0.0);
            for v in 0..=255u8 {
                let cur = (
                    brightness(v, base, base),
                    brightness(base, v, base),
                    brightness(base, base, v),
                );
                assert!(cur.0 >= prev.0 && cur.1 >= prev.1 && cur.2 >= prev.2);
                prev = cur;
            }
        }
    }

    #[test]
    fn contrast_stretches_and_clamps() {
        assert_eq!(contrast(128.0, 1.5), 128.0);
        assert_eq!(contrast(148.0, 1.5), 158.0);
        assert_eq!(contrast(108.0, 1.5), 98.0);
        assert_eq!(contrast(250.0, 1.5), 255.0);
        assert_eq!(contrast(5.0, 1.5), 0.0);
    }

    #[test]
    fn grid_is_row_major() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255]));
        img.put_pixel(2, 1, Rgba([255, 255, 255, 255]));
        let grid = luminance_grid(&img, None);
        assert_eq!(grid.dim(), (2, 3));
        assert_eq!(grid[[1, 2]], 255.0);
        assert_eq!(grid[[0, 2]], 0.0);
    }

    #[test]
    fn grid_applies_contrast() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([100, 100, 100, 255]));
        let grid = luminance_grid(&img, Some(1.5));
        assert!(grid.iter().all(|&v| v == 86.0));
    }
}
