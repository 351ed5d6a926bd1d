//! Volume field encoding.
//!
//! A volume field is a dense lattice of scalar or vector samples. It can be
//! written as a compact VF binary or packed into an RGBA strip for use as a
//! 3D texture. Both encodings convert from Z-up to Y-up by exchanging the Y
//! and Z axes of the grid and of every vector.

pub mod binary;
pub mod strip;

pub use binary::{decode_binary, encode_binary, read_header, VfHeader};
pub use strip::{decode_image_strip, encode_image_strip, PixelBuffer, RemapRange};

use crate::error::{DeliveryError, Result};
use crate::types::{AttributeRecord, GridDescriptor, Sample, ValueKind};

/// A validated, homogeneous grid of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeField {
    pub grid: GridDescriptor,
    pub kind: ValueKind,
    pub samples: Vec<Sample>,
}

impl VolumeField {
    /// Build a field, checking the shape and that every sample is of `kind`.
    pub fn new(grid: GridDescriptor, kind: ValueKind, samples: Vec<Sample>) -> Result<Self> {
        grid.validate(samples.len())?;
        if let Some(index) = samples.iter().position(|s| s.kind() != kind) {
            return Err(DeliveryError::MissingValues {
                index,
                expected: kind.name(),
            });
        }
        Ok(Self {
            grid,
            kind,
            samples,
        })
    }

    /// Build a field from host attribute records.
    ///
    /// The kind follows the first record: vector data wins when a record
    /// carries both.
    pub fn from_attributes(grid: GridDescriptor, records: &[AttributeRecord]) -> Result<Self> {
        grid.validate(records.len())?;
        let kind = match records.first() {
            Some(record) if record.vector.is_some() => ValueKind::Vector3,
            Some(record) if record.value.is_some() => ValueKind::Scalar,
            Some(_) => {
                return Err(DeliveryError::MissingValues {
                    index: 0,
                    expected: "scalar or vector",
                })
            }
            None => ValueKind::Scalar,
        };

        let samples = records
            .iter()
            .enumerate()
            .map(|(index, record)| record.to_sample(kind, index))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            grid,
            kind,
            samples,
        })
    }

    /// Encode as VF bytes.
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        encode_binary(&self.grid, &self.samples, self.kind)
    }

    /// Encode as an RGBA strip normalized over `range`.
    pub fn to_strip(&self, range: RemapRange) -> Result<PixelBuffer> {
        encode_image_strip(&self.grid, &self.samples, self.kind, range.lo(), range.hi())
    }

    /// Smallest and largest component value, if any samples exist.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.samples
            .iter()
            .flat_map(|s| match s {
                Sample::Scalar(v) => vec![*v],
                Sample::Vector(v) => v.to_array().to_vec(),
            })
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
