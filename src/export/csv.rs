//! CSV position track export.
//!
//! One `x,y,z` row per frame of the scene's frame range, holding the
//! object's translation in world or local space.

use crate::delivery::{CsvSpace, SceneObject};
use glam::Vec3;
use std::fmt::Write;
use std::ops::RangeInclusive;

/// Sample an object's position over a frame range and format it as CSV.
pub fn export_positions_csv(
    object: &SceneObject,
    frames: RangeInclusive<i32>,
    space: CsvSpace,
) -> String {
    let positions: Vec<Vec3> = frames
        .map(|frame| object.matrix_at(frame, space).w_axis.truncate())
        .collect();
    format_positions_csv(&positions)
}

/// Format positions as CSV with an `x,y,z` header.
///
/// Components are widened to `f64` before printing, so `0.1f32` is written
/// as `0.10000000149011612`, the exact value the host stores.
pub fn format_positions_csv(positions: &[Vec3]) -> String {
    // ~16 bytes per value
    let mut csv = String::with_capacity(8 + positions.len() * 48);
    writeln!(csv, "x,y,z").unwrap();
    for p in positions {
        writeln!(
            csv,
            "{:?},{:?},{:?}",
            f64::from(p.x),
            f64::from(p.y),
            f64::from(p.z)
        )
        .unwrap();
    }
    csv
}
