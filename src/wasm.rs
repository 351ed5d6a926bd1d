//! WASM bindings for vf-delivery.
//!
//! Samples cross the boundary as flat `Float32Array`s: one float per cell
//! for scalar fields, three (x, y, z) for vector fields.

use crate::{GridDescriptor, Sample, ValueKind};
use glam::Vec3;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

fn to_js(e: crate::DeliveryError) -> JsError {
    JsError::new(&e.to_string())
}

fn samples_from_flat(values: &[f32], vector: bool) -> Result<(ValueKind, Vec<Sample>), JsError> {
    if !vector {
        return Ok((ValueKind::Scalar, values.iter().map(|v| Sample::Scalar(*v)).collect()));
    }
    if values.len() % 3 != 0 {
        return Err(JsError::new(&format!(
            "vector field needs a multiple of 3 floats, got {}",
            values.len()
        )));
    }
    let samples = values
        .chunks_exact(3)
        .map(|c| Sample::Vector(Vec3::new(c[0], c[1], c[2])))
        .collect();
    Ok((ValueKind::Vector3, samples))
}

/// Encoded RGBA strip.
#[wasm_bindgen]
pub struct StripResult {
    width: u32,
    height: u32,
    pixels: Vec<f32>,
}

#[wasm_bindgen]
impl StripResult {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA floats, row-major, first row first.
    #[wasm_bindgen(getter)]
    pub fn pixels(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.pixels.as_slice())
    }
}

/// Encode a grid as VF binary bytes.
#[wasm_bindgen(js_name = encodeVolumeBinary)]
pub fn encode_volume_binary(
    size_x: u16,
    size_y: u16,
    size_z: u16,
    values: &[f32],
    vector: bool,
) -> Result<Vec<u8>, JsError> {
    let grid = GridDescriptor::new(size_x, size_y, size_z);
    let (kind, samples) = samples_from_flat(values, vector)?;
    crate::encode_binary(&grid, &samples, kind).map_err(to_js)
}

/// Encode a grid as an RGBA 3D-texture strip.
#[wasm_bindgen(js_name = encodeVolumeStrip)]
pub fn encode_volume_strip(
    size_x: u16,
    size_y: u16,
    size_z: u16,
    values: &[f32],
    vector: bool,
    range_lo: f32,
    range_hi: f32,
) -> Result<StripResult, JsError> {
    let grid = GridDescriptor::new(size_x, size_y, size_z);
    let (kind, samples) = samples_from_flat(values, vector)?;
    let strip =
        crate::encode_image_strip(&grid, &samples, kind, range_lo, range_hi).map_err(to_js)?;
    Ok(StripResult {
        width: strip.width,
        height: strip.height,
        pixels: strip.data,
    })
}

/// Encode a grid as a 16-bit PNG strip.
#[wasm_bindgen(js_name = encodeVolumePng)]
pub fn encode_volume_png(
    size_x: u16,
    size_y: u16,
    size_z: u16,
    values: &[f32],
    vector: bool,
    range_lo: f32,
    range_hi: f32,
) -> Result<Vec<u8>, JsError> {
    let grid = GridDescriptor::new(size_x, size_y, size_z);
    let (kind, samples) = samples_from_flat(values, vector)?;
    crate::encode_image_strip(&grid, &samples, kind, range_lo, range_hi)
        .and_then(|strip| strip.to_png())
        .map_err(to_js)
}
