//! The VF binary volume format.
//!
//! Layout (little-endian):
//! - tag: [u8; 4]     @ 0   "VF_F" (scalar) or "VF_V" (vector)
//! - size_x: u16      @ 4
//! - size_z: u16      @ 6   logical Z stored in the Y slot
//! - size_y: u16      @ 8   logical Y stored in the Z slot
//! - samples          @ 10  one f32 per scalar, or three f32 per vector in (x, z, y) order

use super::VolumeField;
use crate::error::{DeliveryError, Result};
use crate::types::{swap_yz, GridDescriptor, Sample, ValueKind};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::Vec3;
use std::io::Cursor;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 10;

/// Parsed VF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VfHeader {
    pub kind: ValueKind,
    /// Dimensions exactly as stored, i.e. (x, z, y).
    pub on_disk: [u16; 3],
}

impl VfHeader {
    /// Logical grid with Y and Z restored.
    pub fn grid(&self) -> GridDescriptor {
        GridDescriptor::from_on_disk(self.on_disk)
    }

    /// Expected total file length for this header.
    pub fn file_len(&self) -> usize {
        HEADER_LEN + self.grid().volume() * self.kind.components() * 4
    }
}

/// Encode a grid of samples as VF bytes.
pub fn encode_binary(grid: &GridDescriptor, samples: &[Sample], kind: ValueKind) -> Result<Vec<u8>> {
    grid.validate(samples.len())?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + samples.len() * kind.components() * 4);
    bytes.extend_from_slice(kind.tag());
    for dim in grid.on_disk() {
        bytes.write_u16::<LittleEndian>(dim)?;
    }

    for (index, sample) in samples.iter().enumerate() {
        match kind {
            ValueKind::Scalar => bytes.write_f32::<LittleEndian>(sample.scalar(index)?)?,
            ValueKind::Vector3 => {
                for component in swap_yz(sample.vector(index)?).to_array() {
                    bytes.write_f32::<LittleEndian>(component)?;
                }
            }
        }
    }

    Ok(bytes)
}

/// Read only the header of a VF file.
pub fn read_header(bytes: &[u8]) -> Result<VfHeader> {
    if bytes.len() < HEADER_LEN {
        return Err(DeliveryError::InvalidFormat(format!(
            "{} bytes is shorter than the {}-byte header",
            bytes.len(),
            HEADER_LEN
        )));
    }

    let kind = ValueKind::from_tag(&bytes[..4]).ok_or_else(|| {
        DeliveryError::InvalidFormat(format!(
            "unknown tag {:?}",
            String::from_utf8_lossy(&bytes[..4])
        ))
    })?;

    let mut cursor = Cursor::new(&bytes[4..HEADER_LEN]);
    let mut on_disk = [0u16; 3];
    for dim in &mut on_disk {
        *dim = cursor.read_u16::<LittleEndian>()?;
    }

    Ok(VfHeader { kind, on_disk })
}

/// Decode VF bytes back into a logical volume field.
pub fn decode_binary(bytes: &[u8]) -> Result<VolumeField> {
    let header = read_header(bytes)?;
    let grid = header.grid();
    grid.check_ceiling()?;

    if bytes.len() != header.file_len() {
        return Err(DeliveryError::InvalidFormat(format!(
            "expected {} bytes for a {} grid of {:?}, found {}",
            header.file_len(),
            header.kind,
            grid.dims(),
            bytes.len()
        )));
    }

    let mut cursor = Cursor::new(&bytes[HEADER_LEN..]);
    let mut samples = Vec::with_capacity(grid.volume());
    for _ in 0..grid.volume() {
        let sample = match header.kind {
            ValueKind::Scalar => Sample::Scalar(cursor.read_f32::<LittleEndian>()?),
            ValueKind::Vector3 => {
                let x = cursor.read_f32::<LittleEndian>()?;
                let z = cursor.read_f32::<LittleEndian>()?;
                let y = cursor.read_f32::<LittleEndian>()?;
                Sample::Vector(Vec3::new(x, y, z))
            }
        };
        samples.push(sample);
    }

    VolumeField::new(grid, header.kind, samples)
}
