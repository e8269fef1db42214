//! Rasterize a character grid back into an image.

use crate::config::GlyphOptions;
use crate::grid::CharGrid;
use crate::{AsciiError, Result};
use fontdue::{Font, FontSettings};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Largest canvas side accepted, matching common canvas backends.
pub const MAX_CANVAS_SIDE: u32 = 32767;

/// Coverage bitmap for one glyph, positioned relative to the baseline.
#[derive(Debug, Clone, Default)]
pub struct Glyph {
    pub width: usize,
    pub height: usize,
    /// Left bearing from the pen position.
    pub xmin: i32,
    /// Offset of the bitmap's bottom edge above the baseline.
    pub ymin: i32,
    /// Row-major coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

/// Anything that can turn characters into coverage bitmaps.
pub trait GlyphRasterizer {
    /// Distance from the top of the line box down to the baseline.
    fn ascent(&self, px: f32) -> f32;

    fn rasterize(&self, ch: char, px: f32) -> Glyph;
}

impl GlyphRasterizer for Font {
    fn ascent(&self, px: f32) -> f32 {
        self.horizontal_line_metrics(px)
            .map(|m| m.ascent)
            .unwrap_or(px * 0.75)
    }

    fn rasterize(&self, ch: char, px: f32) -> Glyph {
        let (metrics, coverage) = Font::rasterize(self, ch, px);
        Glyph {
            width: metrics.width,
            height: metrics.height,
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            coverage,
        }
    }
}

/// Parse a TrueType/OpenType font from memory.
pub fn font_from_bytes(bytes: &[u8]) -> Result<Font> {
    Font::from_bytes(bytes, FontSettings::default())
        .map_err(|e| AsciiError::Render(format!("invalid font: {e}")))
}

/// Resolve a font file.
pub fn load_font(path: impl AsRef<Path>) -> Result<Font> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| AsciiError::Render(format!("cannot read font {}: {e}", path.display())))?;
    font_from_bytes(&bytes)
}

/// `(cols * cell_width + 2 * padding) x (rows * cell_height + 2 * padding)`.
pub fn canvas_size(cols: usize, rows: usize, opts: &GlyphOptions) -> Result<(u32, u32)> {
    let side = |cells: usize, pitch: u32| -> Option<u32> {
        let cells = u32::try_from(cells).ok()?;
        cells
            .checked_mul(pitch)?
            .checked_add(opts.padding.checked_mul(2)?)
            .filter(|&s| s <= MAX_CANVAS_SIDE)
    };
    match (side(cols, opts.cell_width), side(rows, opts.cell_height)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(AsciiError::Render(format!(
            "canvas for {cols}x{rows} cells exceeds {MAX_CANVAS_SIDE}px"
        ))),
    }
}

/// Draw every cell of `grid` onto a fresh background-filled canvas.
///
/// Each character's line box is top-aligned at its cell origin; glyph pixels
/// are blended from background to foreground by coverage and clipped to the
/// canvas.
pub fn render(grid: &CharGrid, opts: &GlyphOptions, font: &impl GlyphRasterizer) -> Result<RgbImage> {
    let (width, height) = canvas_size(grid.width(), grid.height(), opts)?;
    log::debug!("rendering {}x{} grid onto {width}x{height} canvas", grid.width(), grid.height());

    let mut canvas = RgbImage::from_pixel(width, height, Rgb(opts.background));
    let ascent = font.ascent(opts.font_size).round() as i64;

    for (col, row, ch) in grid.cells() {
        if ch.is_whitespace() {
            continue;
        }
        let glyph = font.rasterize(ch, opts.font_size);
        if glyph.width == 0 || glyph.height == 0 {
            continue;
        }

        let origin_x = (opts.padding + col as u32 * opts.cell_width) as i64;
        let origin_y = (opts.padding + row as u32 * opts.cell_height) as i64;
        let left = origin_x + glyph.xmin as i64;
        let top = origin_y + ascent - glyph.height as i64 - glyph.ymin as i64;

        for gy in 0..glyph.height {
            for gx in 0..glyph.width {
                let (x, y) = (left + gx as i64, top + gy as i64);
                if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                    continue;
                }
                let alpha = glyph.coverage[gy * glyph.width + gx];
                if alpha > 0 {
                    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                    *pixel = blend(*pixel, Rgb(opts.foreground), alpha);
                }
            }
        }
    }
    Ok(canvas)
}

fn blend(under: Rgb<u8>, over: Rgb<u8>, alpha: u8) -> Rgb<u8> {
    let a = alpha as u32;
    let mix = |u: u8, o: u8| ((u as u32 * (255 - a) + o as u32 * a + 127) / 255) as u8;
    Rgb([
        mix(under[0], over[0]),
        mix(under[1], over[1]),
        mix(under[2], over[2]),
    ])
}

/// Encode a canvas as PNG.
pub fn encode_png(canvas: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| AsciiError::Render(format!("png encoding failed: {e}")))?;
    Ok(bytes)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Solid block glyphs, `w x h`, sitting on the baseline.
    pub(crate) struct BlockFont {
        pub w: usize,
        pub h: usize,
    }

    impl GlyphRasterizer for BlockFont {
        fn ascent(&self, _px: f32) -> f32 {
            self.h as f32
        }

        fn rasterize(&self, _ch: char, _px: f32) -> Glyph {
            Glyph {
                width: self.w,
                height: self.h,
                xmin: 0,
                ymin: 0,
                coverage: vec![255; self.w * self.h],
            }
        }
    }

    fn opts() -> GlyphOptions {
        GlyphOptions {
            cell_width: 8,
            cell_height: 12,
            font_size: 12.0,
            padding: 20,
            background: [255, 255, 255],
            foreground: [0, 0, 0],
            font: Default::default(),
        }
    }

    #[test]
    fn single_cell_canvas_size() {
        assert_eq!(canvas_size(1, 1, &opts()).unwrap(), (48, 52));
        let grid = CharGrid::filled(1, 1, '@');
        let canvas = render(&grid, &opts(), &BlockFont { w: 4, h: 6 }).unwrap();
        assert_eq!(canvas.dimensions(), (48, 52));
    }

    #[test]
    fn oversized_canvas_rejected() {
        assert!(matches!(canvas_size(5000, 10, &opts()), Err(AsciiError::Render(_))));
        assert!(matches!(canvas_size(10, usize::MAX, &opts()), Err(AsciiError::Render(_))));
    }

    #[test]
    fn glyphs_land_in_their_cells() {
        let grid = CharGrid::from_rows(&["@ ", " @"]).unwrap();
        let canvas = render(&grid, &opts(), &BlockFont { w: 4, h: 6 }).unwrap();
        let black = Rgb([0, 0, 0]);
        let white = Rgb([255, 255, 255]);

        // top-left cell origin (20, 20), block is 4x6 from the top of the cell
        assert_eq!(*canvas.get_pixel(20, 20), black);
        assert_eq!(*canvas.get_pixel(23, 25), black);
        assert_eq!(*canvas.get_pixel(24, 20), white);
        assert_eq!(*canvas.get_pixel(20, 26), white);
        // blank cell stays background
        assert_eq!(*canvas.get_pixel(28, 20), white);
        // bottom-right cell origin (28, 32)
        assert_eq!(*canvas.get_pixel(28, 32), black);
        // padding untouched
        assert_eq!(*canvas.get_pixel(0, 0), white);
        assert_eq!(*canvas.get_pixel(47, 63), white);
    }

    #[test]
    fn blend_endpoints() {
        let bg = Rgb([200, 100, 0]);
        let fg = Rgb([0, 50, 255]);
        assert_eq!(blend(bg, fg, 0), bg);
        assert_eq!(blend(bg, fg, 255), fg);
    }

    #[test]
    fn png_roundtrip_dimensions() {
        let canvas = RgbImage::from_pixel(48, 52, Rgb([1, 2, 3]));
        let png = encode_png(&canvas).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (48, 52));
    }

    fn bundled_font() -> Font {
        load_font(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/DejaVuSansMono.ttf")).unwrap()
    }

    /// Rows of every non-background pixel.
    fn ink_rows(canvas: &RgbImage) -> Vec<u32> {
        canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [255, 255, 255])
            .map(|(_, y, _)| y)
            .collect()
    }

    #[test]
    fn fontdue_metrics() {
        let font = bundled_font();
        let ascent = GlyphRasterizer::ascent(&font, 12.0);
        assert!(ascent > 6.0 && ascent < 12.0, "ascent {ascent}");

        let glyph = GlyphRasterizer::rasterize(&font, '@', 12.0);
        assert!(glyph.width > 0 && glyph.height > 0);
        assert_eq!(glyph.coverage.len(), glyph.width * glyph.height);
        assert!(glyph.coverage.iter().any(|&c| c > 0));
    }

    #[test]
    fn fontdue_glyph_stays_near_its_cell() {
        let grid = CharGrid::filled(1, 1, '@');
        let canvas = render(&grid, &opts(), &bundled_font()).unwrap();
        assert_eq!(canvas.dimensions(), (48, 52));

        let inked: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [255, 255, 255])
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());
        // cell spans x 20..28, y 20..32; allow a descender's worth of spill
        assert!(inked.iter().all(|&(x, y)| (18..31).contains(&x) && (18..36).contains(&y)));
    }

    #[test]
    fn fontdue_baseline_orders_glyphs() {
        let font = bundled_font();
        let mean = |ch: char| {
            let canvas = render(&CharGrid::filled(1, 1, ch), &opts(), &font).unwrap();
            let rows = ink_rows(&canvas);
            assert!(!rows.is_empty(), "no ink for {ch:?}");
            rows.iter().sum::<u32>() as f32 / rows.len() as f32
        };
        // top-aligned line box: carets high, underscores at the bottom
        assert!(mean('^') < mean('x'));
        assert!(mean('x') < mean('_'));
    }

    #[test]
    fn missing_font_is_render_error() {
        assert!(matches!(
            load_font("/nonexistent/font.ttf"),
            Err(AsciiError::Render(_))
        ));
        assert!(matches!(font_from_bytes(b"not a font"), Err(AsciiError::Render(_))));
    }
}
