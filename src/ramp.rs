//! Character ramps and brightness quantization.

use crate::{AsciiError, Result};
use serde::{Deserialize, Serialize};

/// Ten-step ramp used by the plain text bots.
pub const RAMP_BASIC: &str = "@%#*+=-:. ";

/// Nine-step ramp for glyph images, no blank cell.
pub const RAMP_SIMPLE: &str = "@%#*+=-:.";

/// 71-step ramp for the edge-detection renditions.
pub const RAMP_DETAILED: &str =
    r#"$@B%8&WM#*oaehkbdpqwmZO0QLCJUYXzcvunxrjft/\|()1{}[]?-_+~<>i!lI;:,"^`'. "#;

/// Ordered characters, index 0 = most ink, last = most empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ramp {
    chars: Vec<char>,
}

impl Ramp {
    pub fn new(chars: &str) -> Result<Self> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            return Err(AsciiError::EmptyRamp);
        }
        Ok(Self { chars })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Map a brightness-like value onto the ramp.
    ///
    /// `index = floor(value / 255 * (N - 1))`, clamped into the ramp. Values
    /// outside `[0, 255]` (and NaN) are clamped first.
    pub fn quantize(&self, value: f32) -> char {
        self.chars[ramp_index(value, self.chars.len() - 1)]
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Self { chars: RAMP_BASIC.chars().collect() }
    }
}

impl TryFrom<String> for Ramp {
    type Error = AsciiError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Ramp> for String {
    fn from(ramp: Ramp) -> Self {
        ramp.chars.into_iter().collect()
    }
}

/// Quantize against a raw character slice.
pub fn quantize(value: f32, ramp: &[char]) -> Result<char> {
    let last = ramp.len().checked_sub(1).ok_or(AsciiError::EmptyRamp)?;
    Ok(ramp[ramp_index(value, last)])
}

fn ramp_index(value: f32, last: usize) -> usize {
    let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 255.0) };
    let index = ((value / 255.0) * last as f32).floor() as usize;
    index.min(last)
}
