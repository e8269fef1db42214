//! Pipeline configuration and the built-in presets.
//!
//! Every historical rendition of the bot is one [`PipelineConfig`]; a JSON file
//! with the same shape can replace any of them.

use crate::edge::DEFAULT_THRESHOLD;
use crate::ramp::{Ramp, RAMP_BASIC, RAMP_DETAILED, RAMP_SIMPLE};
use crate::text::{DEFAULT_CHUNK_LEN, FENCE_OVERHEAD};
use crate::{AsciiError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Font looked up when a glyph config does not name one.
pub const DEFAULT_FONT: &str = "assets/DejaVuSansMono.ttf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Grid columns; rows follow from the image aspect ratio.
    pub width: u32,
    pub ramp: Ramp,
    /// Contrast factor applied to brightness before quantization.
    #[serde(default)]
    pub contrast: Option<f32>,
    #[serde(default)]
    pub edges: Option<EdgeOptions>,
    pub output: OutputMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeOptions {
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD }
    }
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum OutputMode {
    Text(TextOptions),
    Glyph(GlyphOptions),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextOptions {
    /// Print every character twice.
    #[serde(default)]
    pub duplicate: bool,
    /// Split into messages of at most this many characters.
    #[serde(default)]
    pub max_chunk_len: Option<usize>,
    /// Wrap each message in a Markdown code block.
    #[serde(default)]
    pub fence: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphOptions {
    pub cell_width: u32,
    pub cell_height: u32,
    pub font_size: f32,
    #[serde(default)]
    pub padding: u32,
    pub background: [u8; 3],
    pub foreground: [u8; 3],
    #[serde(default = "default_font")]
    pub font: PathBuf,
}

fn default_font() -> PathBuf {
    PathBuf::from(DEFAULT_FONT)
}

impl Default for GlyphOptions {
    fn default() -> Self {
        Self {
            cell_width: 8,
            cell_height: 12,
            font_size: 12.0,
            padding: 20,
            background: [255, 255, 255],
            foreground: [0, 0, 0],
            font: default_font(),
        }
    }
}

/// The four renditions the bot has shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// 50 columns, one monospace message.
    Monospace,
    /// 100 columns, doubled characters, split into 4096-char messages.
    Chunked,
    /// 150 columns, Sobel edges and contrast, rendered to PNG.
    Edges,
    /// 60 columns, nine-step ramp, rendered to PNG.
    Simple,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Monospace, Preset::Chunked, Preset::Edges, Preset::Simple];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Monospace => "monospace",
            Preset::Chunked => "chunked",
            Preset::Edges => "edges",
            Preset::Simple => "simple",
        }
    }

    pub fn config(&self) -> PipelineConfig {
        let ramp = |chars: &str| Ramp::new(chars).unwrap_or_default();
        match self {
            Preset::Monospace => PipelineConfig {
                width: 50,
                ramp: ramp(RAMP_BASIC),
                contrast: None,
                edges: None,
                output: OutputMode::Text(TextOptions { fence: true, ..Default::default() }),
            },
            Preset::Chunked => PipelineConfig {
                width: 100,
                ramp: ramp(RAMP_BASIC),
                contrast: None,
                edges: None,
                output: OutputMode::Text(TextOptions {
                    duplicate: true,
                    max_chunk_len: Some(DEFAULT_CHUNK_LEN),
                    fence: true,
                }),
            },
            Preset::Edges => PipelineConfig {
                width: 150,
                ramp: ramp(RAMP_DETAILED),
                contrast: Some(1.5),
                edges: Some(EdgeOptions::default()),
                output: OutputMode::Glyph(GlyphOptions::default()),
            },
            Preset::Simple => PipelineConfig {
                width: 60,
                ramp: ramp(RAMP_SIMPLE),
                contrast: None,
                edges: None,
                output: OutputMode::Glyph(GlyphOptions {
                    cell_width: 10,
                    cell_height: 16,
                    font_size: 14.0,
                    ..Default::default()
                }),
            },
        }
    }
}

impl FromStr for Preset {
    type Err = AsciiError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| AsciiError::Config(format!("unknown preset '{s}'")))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Preset::Monospace.config()
    }
}

impl PipelineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| AsciiError::Config(e.to_string()))?;
        // checked before the typed parse so it surfaces as EmptyRamp, not Config
        if value.get("ramp").and_then(|r| r.as_str()) == Some("") {
            return Err(AsciiError::EmptyRamp);
        }
        let config: PipelineConfig =
            serde_json::from_value(value).map_err(|e| AsciiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(AsciiError::InvalidDimension { width: 0, height: 0 });
        }
        if self.ramp.is_empty() {
            return Err(AsciiError::EmptyRamp);
        }
        match &self.output {
            OutputMode::Text(text) if text.max_chunk_len == Some(0) => {
                Err(AsciiError::Config("max_chunk_len must be positive".into()))
            }
            OutputMode::Text(text)
                if text.fence && text.max_chunk_len.is_some_and(|n| n <= FENCE_OVERHEAD) =>
            {
                Err(AsciiError::Config(format!(
                    "max_chunk_len must exceed {FENCE_OVERHEAD} to fit the code fence"
                )))
            }
            OutputMode::Glyph(glyph) if glyph.cell_width == 0 || glyph.cell_height == 0 => {
                Err(AsciiError::Config("cell pitch must be positive".into()))
            }
            OutputMode::Glyph(glyph) if !(glyph.font_size > 0.0) => {
                Err(AsciiError::Config("font_size must be positive".into()))
            }
            _ => Ok(()),
        }
    }
}
