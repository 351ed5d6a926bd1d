//! 3D-texture strip packing.
//!
//! The lattice is folded into a single RGBA raster `size_x * size_y` wide and
//! `size_z` tall, so a GPU sampler can rebuild 3D addressing from 2D
//! coordinates. The flat sample list is read as a `(size_x, size_z, size_y)`
//! array and turned a quarter in its first plane: output row `r`, column
//! `b * size_y + k` holds input cell `(b, size_z - 1 - r, k)`.

use crate::error::{DeliveryError, Result};
use crate::types::{swap_yz, GridDescriptor, Sample, ValueKind};
use glam::Vec3;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba32FImage};
use std::io::Cursor;

/// Channels per strip pixel.
pub const CHANNELS: u32 = 4;

/// Affine normalization into the unit interval. Never clamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemapRange {
    lo: f32,
    hi: f32,
}

impl RemapRange {
    pub fn new(lo: f32, hi: f32) -> Result<Self> {
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(DeliveryError::InvalidRange { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    pub fn lo(&self) -> f32 {
        self.lo
    }

    pub fn hi(&self) -> f32 {
        self.hi
    }

    pub fn remap(&self, v: f32) -> f32 {
        (v - self.lo) / (self.hi - self.lo)
    }

    pub fn unmap(&self, t: f32) -> f32 {
        t * (self.hi - self.lo) + self.lo
    }
}

/// Floating-point RGBA raster produced by the strip encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    /// Row-major RGBA values, first row first.
    pub data: Vec<f32>,
}

impl PixelBuffer {
    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// RGBA value at (column, row).
    pub fn pixel(&self, col: u32, row: u32) -> Option<[f32; 4]> {
        if col >= self.width || row >= self.height {
            return None;
        }
        if self.channels != CHANNELS {
            return None;
        }
        let start = (row as usize * self.width as usize + col as usize) * CHANNELS as usize;
        match self.data.get(start..start + CHANNELS as usize)? {
            &[r, g, b, a] => Some([r, g, b, a]),
            _ => None,
        }
    }

    /// Encode as a 16-bit RGBA PNG.
    ///
    /// Values are clamped to `[0, 1]` here and nowhere else. Row 0 of the
    /// buffer becomes the bottom row of the image, as host images store
    /// their pixels from the lower-left corner.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let buffer: Rgba32FImage = ImageBuffer::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| {
                DeliveryError::Export(format!(
                    "pixel data of {} values does not fill {}x{}",
                    self.data.len(),
                    self.width,
                    self.height
                ))
            })?;
        let flipped = image::imageops::flip_vertical(&buffer);
        let rgba16 = DynamicImage::ImageRgba32F(flipped).into_rgba16();

        let mut bytes = Vec::new();
        rgba16.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// Strip (column, row) of the input cell at `index`.
pub fn strip_position(grid: &GridDescriptor, index: usize) -> (u32, u32) {
    let sy = grid.size_y as usize;
    let sz = grid.size_z as usize;
    let k = index % sy;
    let j = (index / sy) % sz;
    let b = index / (sy * sz);
    ((b * sy + k) as u32, (sz - 1 - j) as u32)
}

fn sample_rgba(sample: &Sample, kind: ValueKind, range: &RemapRange, index: usize) -> Result<[f32; 4]> {
    match kind {
        ValueKind::Scalar => {
            let v = range.remap(sample.scalar(index)?);
            Ok([v, v, v, 1.0])
        }
        ValueKind::Vector3 => {
            let v = swap_yz(sample.vector(index)?);
            Ok([range.remap(v.x), range.remap(v.y), range.remap(v.z), 1.0])
        }
    }
}

/// Encode a grid of samples as a normalized RGBA strip.
pub fn encode_image_strip(
    grid: &GridDescriptor,
    samples: &[Sample],
    kind: ValueKind,
    range_lo: f32,
    range_hi: f32,
) -> Result<PixelBuffer> {
    let range = RemapRange::new(range_lo, range_hi)?;
    grid.validate(samples.len())?;

    let width = grid.size_x as u32 * grid.size_y as u32;
    let height = grid.size_z as u32;
    let mut data = vec![0.0f32; samples.len() * CHANNELS as usize];

    for (index, sample) in samples.iter().enumerate() {
        let rgba = sample_rgba(sample, kind, &range, index)?;
        let (col, row) = strip_position(grid, index);
        let start = (row as usize * width as usize + col as usize) * CHANNELS as usize;
        data[start..start + CHANNELS as usize].copy_from_slice(&rgba);
    }

    Ok(PixelBuffer {
        width,
        height,
        channels: CHANNELS,
        data,
    })
}

/// Recover samples from a strip produced by [`encode_image_strip`].
pub fn decode_image_strip(
    pixels: &PixelBuffer,
    grid: &GridDescriptor,
    kind: ValueKind,
    range_lo: f32,
    range_hi: f32,
) -> Result<Vec<Sample>> {
    let range = RemapRange::new(range_lo, range_hi)?;
    grid.check_ceiling()?;
    let expected_width = grid.size_x as u32 * grid.size_y as u32;
    if pixels.width != expected_width || pixels.height != grid.size_z as u32 {
        return Err(DeliveryError::InvalidFormat(format!(
            "strip is {}x{}, grid {:?} needs {}x{}",
            pixels.width,
            pixels.height,
            grid.dims(),
            expected_width,
            grid.size_z
        )));
    }
    if pixels.channels != CHANNELS || pixels.data.len() != grid.volume() * CHANNELS as usize {
        return Err(DeliveryError::InvalidFormat(format!(
            "strip holds {} values in {} channels, grid {:?} needs {} RGBA values",
            pixels.data.len(),
            pixels.channels,
            grid.dims(),
            grid.volume() * CHANNELS as usize
        )));
    }

    (0..grid.volume())
        .map(|index| {
            let (col, row) = strip_position(grid, index);
            let [r, g, b, _] = pixels.pixel(col, row).ok_or_else(|| {
                DeliveryError::InvalidFormat(format!("pixel ({}, {}) out of bounds", col, row))
            })?;
            Ok(match kind {
                ValueKind::Scalar => Sample::Scalar(range.unmap(r)),
                ValueKind::Vector3 => Sample::Vector(swap_yz(Vec3::new(
                    range.unmap(r),
                    range.unmap(g),
                    range.unmap(b),
                ))),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(grid: &GridDescriptor) -> Vec<Sample> {
        (0..grid.volume()).map(|i| Sample::Scalar(i as f32)).collect()
    }

    #[test]
    fn test_remap_linearity() {
        let range = RemapRange::new(-1.0, 1.0).unwrap();
        assert_eq!(range.remap(-1.0), 0.0);
        assert_eq!(range.remap(1.0), 1.0);
        assert_eq!(range.remap(0.0), 0.5);
        assert_eq!(range.remap(3.0), 2.0);
    }

    #[test]
    fn test_invalid_range() {
        let grid = GridDescriptor::new(1, 1, 1);
        for (lo, hi) in [(1.0, 1.0), (2.0, -2.0), (f32::NAN, 1.0)] {
            let result = encode_image_strip(&grid, &[Sample::Scalar(0.0)], ValueKind::Scalar, lo, hi);
            assert!(matches!(result, Err(DeliveryError::InvalidRange { .. })));
        }
    }

    #[test]
    fn test_image_sizing() {
        let grid = GridDescriptor::new(4, 3, 2);
        let strip = encode_image_strip(&grid, &ramp(&grid), ValueKind::Scalar, 0.0, 1.0).unwrap();
        assert_eq!(strip.width, 12);
        assert_eq!(strip.height, 2);
        assert_eq!(strip.pixel_count(), 24);
        assert_eq!(strip.channels, 4);
        assert_eq!(strip.data.len(), 96);
    }

    #[test]
    fn test_scalar_broadcast_and_remap() {
        let grid = GridDescriptor::new(3, 1, 1);
        let samples = [Sample::Scalar(-1.0), Sample::Scalar(0.0), Sample::Scalar(1.0)];
        let strip = encode_image_strip(&grid, &samples, ValueKind::Scalar, -1.0, 1.0).unwrap();
        assert_eq!(strip.pixel(0, 0), Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(strip.pixel(1, 0), Some([0.5, 0.5, 0.5, 1.0]));
        assert_eq!(strip.pixel(2, 0), Some([1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_vector_remap_and_swap() {
        let grid = GridDescriptor::new(1, 1, 1);
        let samples = [Sample::Vector(Vec3::new(1.0, 2.0, 3.0))];
        let strip = encode_image_strip(&grid, &samples, ValueKind::Vector3, -1.0, 1.0).unwrap();
        let range = RemapRange::new(-1.0, 1.0).unwrap();
        assert_eq!(
            strip.pixel(0, 0),
            Some([range.remap(1.0), range.remap(3.0), range.remap(2.0), 1.0])
        );

        let vectors = [
            Sample::Vector(Vec3::new(-1.0, -1.0, -1.0)),
            Sample::Vector(Vec3::new(0.0, 0.0, 0.0)),
        ];
        let grid = GridDescriptor::new(2, 1, 1);
        let strip = encode_image_strip(&grid, &vectors, ValueKind::Vector3, -1.0, 1.0).unwrap();
        assert_eq!(strip.pixel(0, 0), Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(strip.pixel(1, 0), Some([0.5, 0.5, 0.5, 1.0]));
    }

    #[test]
    fn test_quarter_turn_layout() {
        // Input cell (b, j, k) is flat index (b * sz + j) * sy + k.
        let grid = GridDescriptor::new(4, 3, 2);
        let strip = encode_image_strip(&grid, &ramp(&grid), ValueKind::Scalar, 0.0, 1.0).unwrap();

        // Top row comes from the last Z slice, reading cells (b, 1, k).
        let top: Vec<f32> = (0..12).map(|c| strip.pixel(c, 0).unwrap()[0]).collect();
        assert_eq!(
            top,
            vec![3.0, 4.0, 5.0, 9.0, 10.0, 11.0, 15.0, 16.0, 17.0, 21.0, 22.0, 23.0]
        );
        let bottom: Vec<f32> = (0..12).map(|c| strip.pixel(c, 1).unwrap()[0]).collect();
        assert_eq!(
            bottom,
            vec![0.0, 1.0, 2.0, 6.0, 7.0, 8.0, 12.0, 13.0, 14.0, 18.0, 19.0, 20.0]
        );
    }

    #[test]
    fn test_values_outside_range_are_not_clamped() {
        let grid = GridDescriptor::new(1, 1, 1);
        let strip = encode_image_strip(&grid, &[Sample::Scalar(5.0)], ValueKind::Scalar, 0.0, 1.0).unwrap();
        assert_eq!(strip.pixel(0, 0), Some([5.0, 5.0, 5.0, 1.0]));
    }

    #[test]
    fn test_decode_inverts_encode() {
        let grid = GridDescriptor::new(2, 3, 4);
        let samples: Vec<Sample> = (0..grid.volume())
            .map(|i| Sample::Vector(Vec3::new(i as f32, 0.5 * i as f32, -(i as f32))))
            .collect();
        let strip = encode_image_strip(&grid, &samples, ValueKind::Vector3, -32.0, 32.0).unwrap();
        let decoded = decode_image_strip(&strip, &grid, ValueKind::Vector3, -32.0, 32.0).unwrap();
        for (a, b) in samples.iter().zip(&decoded) {
            let (Sample::Vector(a), Sample::Vector(b)) = (a, b) else {
                panic!("expected vectors");
            };
            assert!(a.abs_diff_eq(*b, 1e-4), "{a} != {b}");
        }
    }

    #[test]
    fn test_decode_rejects_short_buffer() {
        let grid = GridDescriptor::new(1, 1, 1);
        let truncated = PixelBuffer {
            width: 1,
            height: 1,
            channels: 4,
            data: vec![],
        };
        assert_eq!(truncated.pixel(0, 0), None);
        assert!(matches!(
            decode_image_strip(&truncated, &grid, ValueKind::Scalar, 0.0, 1.0),
            Err(DeliveryError::InvalidFormat(_))
        ));

        let rgb = PixelBuffer {
            width: 1,
            height: 1,
            channels: 3,
            data: vec![0.5; 3],
        };
        assert!(matches!(
            decode_image_strip(&rgb, &grid, ValueKind::Scalar, 0.0, 1.0),
            Err(DeliveryError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let grid = GridDescriptor::new(2, 2, 2);
        let a = encode_image_strip(&grid, &ramp(&grid), ValueKind::Scalar, 0.0, 8.0).unwrap();
        let b = encode_image_strip(&grid, &ramp(&grid), ValueKind::Scalar, 0.0, 8.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_png_encoding_flips_and_clamps() {
        let grid = GridDescriptor::new(1, 1, 2);
        let samples = [Sample::Scalar(-1.0), Sample::Scalar(2.0)];
        let strip = encode_image_strip(&grid, &samples, ValueKind::Scalar, 0.0, 1.0).unwrap();
        // Buffer row 0 holds the last Z slice (2.0), row 1 the first (-1.0).
        assert_eq!(strip.pixel(0, 0).unwrap()[0], 2.0);

        let png = strip.to_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba16();
        assert_eq!(decoded.dimensions(), (1, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 65535]);
        assert_eq!(decoded.get_pixel(0, 1).0, [65535, 65535, 65535, 65535]);
    }
}
