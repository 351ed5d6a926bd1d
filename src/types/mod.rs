//! Shared types used throughout the library.

mod axis;

pub use axis::{swap_yz, Axis, AxisDirection};

use crate::error::{DeliveryError, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Largest number of samples a single grid may hold.
pub const MAX_GRID_SAMPLES: usize = 65536;

/// Dimensions of a dense 3D lattice, in the Z-up authoring convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDescriptor {
    pub size_x: u16,
    pub size_y: u16,
    pub size_z: u16,
}

impl GridDescriptor {
    pub fn new(size_x: u16, size_y: u16, size_z: u16) -> Self {
        Self {
            size_x,
            size_y,
            size_z,
        }
    }

    /// Build a descriptor from host integer grid properties.
    pub fn from_host(size: [u32; 3]) -> Result<Self> {
        let axis = |i: usize| {
            u16::try_from(size[i]).map_err(|_| {
                DeliveryError::GridTooLarge(format!(
                    "axis {} has {} cells, limit is {}",
                    i,
                    size[i],
                    u16::MAX
                ))
            })
        };
        Ok(Self::new(axis(0)?, axis(1)?, axis(2)?))
    }

    /// Rebuild the logical descriptor from a header stored as (x, z, y).
    pub fn from_on_disk(dims: [u16; 3]) -> Self {
        Self::new(dims[0], dims[2], dims[1])
    }

    /// Number of cells in the lattice.
    pub fn volume(&self) -> usize {
        self.size_x as usize * self.size_y as usize * self.size_z as usize
    }

    /// Logical dimensions as (x, y, z).
    pub fn dims(&self) -> [u16; 3] {
        [self.size_x, self.size_y, self.size_z]
    }

    /// Dimensions in header order, with Y and Z exchanged.
    pub fn on_disk(&self) -> [u16; 3] {
        [self.size_x, self.size_z, self.size_y]
    }

    /// Check a sample count against this grid and the format ceiling.
    pub fn validate(&self, sample_count: usize) -> Result<()> {
        self.check_ceiling()?;
        let volume = self.volume();
        if sample_count != volume {
            return Err(DeliveryError::ShapeMismatch {
                size: self.dims(),
                expected: volume,
                actual: sample_count,
            });
        }
        Ok(())
    }

    /// Cell count computed without overflow on any target.
    pub fn cell_count(&self) -> u64 {
        self.size_x as u64 * self.size_y as u64 * self.size_z as u64
    }

    /// Reject grids with more cells than the format allows.
    ///
    /// Once this passes, `volume()` is exact on every target.
    pub fn check_ceiling(&self) -> Result<()> {
        let cells = self.cell_count();
        if cells > MAX_GRID_SAMPLES as u64 {
            return Err(DeliveryError::GridTooLarge(format!(
                "{} cells exceed the limit of {}",
                cells, MAX_GRID_SAMPLES
            )));
        }
        Ok(())
    }
}

/// Whether each lattice cell holds a scalar or a 3-vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Scalar,
    Vector3,
}

impl ValueKind {
    /// Four-byte VF file tag.
    pub fn tag(&self) -> &'static [u8; 4] {
        match self {
            ValueKind::Scalar => b"VF_F",
            ValueKind::Vector3 => b"VF_V",
        }
    }

    /// Parse a VF file tag.
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"VF_F" => Some(ValueKind::Scalar),
            b"VF_V" => Some(ValueKind::Vector3),
            _ => None,
        }
    }

    /// Number of f32 components per sample.
    pub fn components(&self) -> usize {
        match self {
            ValueKind::Scalar => 1,
            ValueKind::Vector3 => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Scalar => "scalar",
            ValueKind::Vector3 => "vector",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One lattice cell value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sample {
    Scalar(f32),
    Vector(Vec3),
}

impl Sample {
    pub fn kind(&self) -> ValueKind {
        match self {
            Sample::Scalar(_) => ValueKind::Scalar,
            Sample::Vector(_) => ValueKind::Vector3,
        }
    }

    /// Scalar value, or `MissingValues` for a vector sample.
    pub fn scalar(&self, index: usize) -> Result<f32> {
        match self {
            Sample::Scalar(v) => Ok(*v),
            Sample::Vector(_) => Err(DeliveryError::MissingValues {
                index,
                expected: ValueKind::Scalar.name(),
            }),
        }
    }

    /// Vector value, or `MissingValues` for a scalar sample.
    pub fn vector(&self, index: usize) -> Result<Vec3> {
        match self {
            Sample::Vector(v) => Ok(*v),
            Sample::Scalar(_) => Err(DeliveryError::MissingValues {
                index,
                expected: ValueKind::Vector3.name(),
            }),
        }
    }
}

/// Per-point attribute record as read from a host mesh.
///
/// A point may carry a scalar `value`, a `vector`, or both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    #[serde(default)]
    pub value: Option<f32>,
    #[serde(default)]
    pub vector: Option<Vec3>,
}

impl AttributeRecord {
    pub fn scalar(value: f32) -> Self {
        Self {
            value: Some(value),
            vector: None,
        }
    }

    pub fn vector(vector: Vec3) -> Self {
        Self {
            value: None,
            vector: Some(vector),
        }
    }

    /// Classify this record as a sample of the given kind.
    pub fn to_sample(&self, kind: ValueKind, index: usize) -> Result<Sample> {
        let sample = match kind {
            ValueKind::Scalar => self.value.map(Sample::Scalar),
            ValueKind::Vector3 => self.vector.map(Sample::Vector),
        };
        sample.ok_or(DeliveryError::MissingValues {
            index,
            expected: kind.name(),
        })
    }
}
