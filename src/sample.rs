//! Image sampling - scales a source image down to one pixel per output cell.

use crate::{AsciiError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

// Glyph cells are ~1:2, so rows are halved
const CELL_ASPECT: f64 = 0.5;

/// Decode an encoded image (PNG, JPEG, ...) from memory.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Grid size for a `img_w` x `img_h` source at `width` columns.
///
/// `rows = round(width * img_h / img_w * 0.5)`, floored at 1. Only the row
/// count is derived, so rounding never touches the column count.
pub fn grid_dimensions(img_w: u32, img_h: u32, width: u32) -> Result<(u32, u32)> {
    if width == 0 || img_w == 0 || img_h == 0 {
        return Err(AsciiError::InvalidDimension { width, height: 0 });
    }
    let ratio = img_h as f64 / img_w as f64;
    let rows = (width as f64 * ratio * CELL_ASPECT).round().max(1.0);
    if rows > u32::MAX as f64 {
        return Err(AsciiError::InvalidDimension { width, height: u32::MAX });
    }
    Ok((width, rows as u32))
}

/// Samples images into a fixed-width color grid.
#[derive(Debug, Clone, Copy)]
pub struct GridSampler {
    width: u32,
    filter: FilterType,
}

impl GridSampler {
    pub fn new(width: u32) -> Self {
        Self { width, filter: FilterType::Triangle }
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Resample `image` to exactly `width x rows` pixels, one per cell.
    pub fn sample(&self, image: &DynamicImage) -> Result<RgbaImage> {
        let (cols, rows) = grid_dimensions(image.width(), image.height(), self.width)?;
        log::debug!(
            "sampling {}x{} image into {cols}x{rows} grid",
            image.width(),
            image.height()
        );
        Ok(image::imageops::resize(image, cols, rows, self.filter))
    }
}
