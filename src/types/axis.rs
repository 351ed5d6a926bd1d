//! Axis and axis-direction types for up-axis conversion.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Get the unit vector for this axis.
    pub fn unit_vector(&self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// A signed axis, as used for exporter forward/up settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisDirection {
    #[serde(rename = "X")]
    PosX,
    #[serde(rename = "Y")]
    PosY,
    #[serde(rename = "Z")]
    PosZ,
    #[serde(rename = "-X")]
    NegX,
    #[serde(rename = "-Y")]
    NegY,
    #[serde(rename = "-Z")]
    NegZ,
}

impl AxisDirection {
    /// Get the axis this direction lies on.
    pub fn axis(&self) -> Axis {
        match self {
            AxisDirection::PosX | AxisDirection::NegX => Axis::X,
            AxisDirection::PosY | AxisDirection::NegY => Axis::Y,
            AxisDirection::PosZ | AxisDirection::NegZ => Axis::Z,
        }
    }

    /// Get the unit vector for this direction.
    pub fn vector(&self) -> Vec3 {
        match self {
            AxisDirection::NegX | AxisDirection::NegY | AxisDirection::NegZ => {
                -self.axis().unit_vector()
            }
            _ => self.axis().unit_vector(),
        }
    }
}

impl std::fmt::Display for AxisDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisDirection::PosX => write!(f, "X"),
            AxisDirection::PosY => write!(f, "Y"),
            AxisDirection::PosZ => write!(f, "Z"),
            AxisDirection::NegX => write!(f, "-X"),
            AxisDirection::NegY => write!(f, "-Y"),
            AxisDirection::NegZ => write!(f, "-Z"),
        }
    }
}

/// Exchange the Y and Z components (Z-up authoring to Y-up consumers).
///
/// The swap is its own inverse.
pub fn swap_yz(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, v.y)
}
