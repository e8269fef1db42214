//! Image to ASCII art: sample, measure brightness, optionally trace edges,
//! quantize onto a character ramp, then print or rasterize the grid.

pub mod config;
pub mod edge;
pub mod glyph;
pub mod grid;
pub mod luma;
pub mod ramp;
pub mod sample;
pub mod text;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::{EdgeOptions, GlyphOptions, OutputMode, PipelineConfig, Preset, TextOptions};
pub use glyph::GlyphRasterizer;
pub use grid::CharGrid;
pub use ramp::Ramp;
pub use sample::GridSampler;

use image::DynamicImage;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AsciiError {
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Invalid dimensions: width {width}, height {height}")]
    InvalidDimension { width: u32, height: u32 },
    #[error("Character ramp is empty")]
    EmptyRamp,
    #[error("Render error: {0}")]
    Render(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AsciiError>;

/// Finished output of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendition {
    /// One or more messages, in order.
    Text(Vec<String>),
    /// Encoded PNG.
    Png(Vec<u8>),
}

/// Runs the whole pipeline for one configuration.
///
/// Holds nothing but its config, so one converter can serve any number of
/// images, from any number of threads.
#[derive(Debug, Clone)]
pub struct Converter {
    config: PipelineConfig,
}

impl Converter {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_preset(preset: Preset) -> Self {
        Self { config: preset.config() }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.config.width = width;
        self
    }

    pub fn with_ramp(mut self, ramp: Ramp) -> Self {
        self.config.ramp = ramp;
        self
    }

    /// Font file for glyph output; ignored for text.
    pub fn with_font(mut self, font: impl Into<PathBuf>) -> Self {
        if let OutputMode::Glyph(glyph) = &mut self.config.output {
            glyph.font = font.into();
        }
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Sample, measure and quantize `image` into a character grid.
    pub fn grid(&self, image: &DynamicImage) -> Result<CharGrid> {
        let samples = GridSampler::new(self.config.width).sample(image)?;
        let luma = luma::luminance_grid(&samples, self.config.contrast);

        let values = match self.config.edges {
            Some(edges) => {
                log::debug!("edge detection on, threshold {}", edges.threshold);
                let field = edge::detect_edges(&luma, edges.threshold);
                edge::combine(&luma, &field)
            }
            None => luma,
        };
        Ok(CharGrid::quantize(&values, &self.config.ramp))
    }

    /// Convert a decoded image, resolving the configured font if needed.
    pub fn convert(&self, image: &DynamicImage) -> Result<Rendition> {
        match &self.config.output {
            OutputMode::Text(opts) => self.convert_text(image, opts),
            OutputMode::Glyph(opts) => {
                let font = glyph::load_font(&opts.font)?;
                self.convert_with_font(image, &font)
            }
        }
    }

    /// Decode `bytes` and convert.
    pub fn convert_bytes(&self, bytes: &[u8]) -> Result<Rendition> {
        self.convert(&sample::decode(bytes)?)
    }

    /// Convert with a caller-supplied glyph source instead of the font path.
    pub fn convert_with_font(
        &self,
        image: &DynamicImage,
        font: &impl GlyphRasterizer,
    ) -> Result<Rendition> {
        match &self.config.output {
            OutputMode::Text(opts) => self.convert_text(image, opts),
            OutputMode::Glyph(opts) => {
                let grid = self.grid(image)?;
                let canvas = glyph::render(&grid, opts, font)?;
                Ok(Rendition::Png(glyph::encode_png(&canvas)?))
            }
        }
    }

    fn convert_text(&self, image: &DynamicImage, opts: &TextOptions) -> Result<Rendition> {
        let grid = self.grid(image)?;
        let rendered = text::render(&grid, opts.duplicate);

        // the fence counts against the message limit
        let max_len = match (opts.max_chunk_len, opts.fence) {
            (Some(n), true) => n.saturating_sub(text::FENCE_OVERHEAD),
            (Some(n), false) => n,
            (None, _) => usize::MAX,
        };
        let messages: Vec<String> = text::chunks(&rendered, max_len)
            .map(|chunk| if opts.fence { text::fence(chunk) } else { chunk.to_string() })
            .collect();
        log::debug!("text rendition: {} bytes in {} message(s)", rendered.len(), messages.len());
        Ok(Rendition::Text(messages))
    }
}
