//! WebAssembly bindings for asciigram

use crate::{glyph, Converter, PipelineConfig, Preset, Ramp, Rendition};
use image::DynamicImage;
use wasm_bindgen::prelude::*;

fn to_js(e: crate::AsciiError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WasmConverter {
    converter: Converter,
}

#[wasm_bindgen]
impl WasmConverter {
    /// Create a converter from a preset name (`monospace`, `chunked`, `edges`, `simple`)
    #[wasm_bindgen(constructor)]
    pub fn new(preset: &str) -> Result<WasmConverter, JsValue> {
        let preset: Preset = preset.parse().map_err(to_js)?;
        Ok(WasmConverter { converter: Converter::from_preset(preset) })
    }

    /// Create a converter from a JSON pipeline config
    #[wasm_bindgen]
    pub fn from_config(json: &str) -> Result<WasmConverter, JsValue> {
        let config = PipelineConfig::from_json(json).map_err(to_js)?;
        Ok(WasmConverter { converter: Converter::new(config).map_err(to_js)? })
    }

    #[wasm_bindgen]
    pub fn set_width(&mut self, width: u32) {
        self.converter = self.converter.clone().with_width(width);
    }

    #[wasm_bindgen]
    pub fn set_ramp(&mut self, ramp: &str) -> Result<(), JsValue> {
        let ramp = Ramp::new(ramp).map_err(to_js)?;
        self.converter = self.converter.clone().with_ramp(ramp);
        Ok(())
    }

    /// Convert raw RGBA pixels with the configured output.
    ///
    /// Text presets return an array of messages; glyph presets need `font_data`
    /// and return PNG bytes.
    #[wasm_bindgen]
    pub fn convert(
        &self,
        image_data: &[u8],
        width: u32,
        height: u32,
        font_data: Option<Vec<u8>>,
    ) -> Result<JsValue, JsValue> {
        let image = rgba_image(image_data, width, height)?;
        let rendition = match font_data {
            Some(bytes) => {
                let font = glyph::font_from_bytes(&bytes).map_err(to_js)?;
                self.converter.convert_with_font(&image, &font)
            }
            None => self.converter.convert(&image),
        };
        match rendition.map_err(to_js)? {
            Rendition::Text(messages) => {
                let array = js_sys::Array::new();
                for message in messages {
                    array.push(&JsValue::from_str(&message));
                }
                Ok(array.into())
            }
            Rendition::Png(png) => Ok(js_sys::Uint8Array::from(&png[..]).into()),
        }
    }
}

fn rgba_image(image_data: &[u8], width: u32, height: u32) -> Result<DynamicImage, JsValue> {
    let img = image::RgbaImage::from_raw(width, height, image_data.to_vec())
        .ok_or_else(|| JsValue::from_str("Invalid image dimensions"))?;
    Ok(DynamicImage::ImageRgba8(img))
}
