//! Delivery formats.
//!
//! Mesh formats are written by the host editor's own exporters; this module
//! only carries their fixed configuration. Volume fields and position tracks
//! are written natively.

pub mod csv;
pub mod volume;

pub use csv::{export_positions_csv, format_positions_csv};
pub use volume::{export_png, export_vf};

use crate::types::AxisDirection;
use serde::{Deserialize, Serialize};

/// Fixed settings handed to a host mesh exporter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostPreset {
    /// Forward and up axes, when the exporter performs axis conversion.
    pub axes: Option<(AxisDirection, AxisDirection)>,
    /// Convert Z-up to Y-up inside the exporter, for formats that take a flag
    /// rather than an axis pair.
    pub y_up: bool,
    pub global_scale: f32,
    pub triangulate: bool,
    pub apply_modifiers: bool,
    pub animation: bool,
    pub materials: bool,
    /// Draco compression level, for exporters that support it.
    pub compression_level: Option<u8>,
}

/// Volume field encodings written natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeEncoding {
    Binary,
    Strip,
}

/// How a format gets written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route {
    Host(HostPreset),
    Volume(VolumeEncoding),
    Csv,
}

/// Output format for a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "UPPERCASE")]
pub enum ExportFormat {
    /// FBX binary for Unity
    #[default]
    Fbx,
    /// Compressed glTF binary for ThreeJS
    Glb,
    /// Wavefront OBJ for Element 3D
    Obj,
    /// USDZ for Apple platforms
    Usdz,
    /// STL for 3D printing
    Stl,
    /// Alembic cache
    Abc,
    /// VF binary volume field
    Vf,
    /// PNG 3D-texture strip
    Png,
    /// CSV position track
    Csv,
}

impl ExportFormat {
    /// All formats in menu order.
    pub const ALL: [ExportFormat; 9] = [
        ExportFormat::Fbx,
        ExportFormat::Glb,
        ExportFormat::Obj,
        ExportFormat::Usdz,
        ExportFormat::Stl,
        ExportFormat::Abc,
        ExportFormat::Vf,
        ExportFormat::Png,
        ExportFormat::Csv,
    ];

    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Fbx => ".fbx",
            ExportFormat::Glb => ".glb",
            ExportFormat::Obj => ".obj",
            ExportFormat::Usdz => ".usdz",
            ExportFormat::Stl => ".stl",
            ExportFormat::Abc => ".abc",
            ExportFormat::Vf => ".vf",
            ExportFormat::Png => ".png",
            ExportFormat::Csv => ".csv",
        }
    }

    /// Menu label naming the downstream consumer.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Fbx => "FBX — Unity3D",
            ExportFormat::Glb => "GLB — ThreeJS",
            ExportFormat::Obj => "OBJ — Element3D",
            ExportFormat::Usdz => "USDZ — Xcode",
            ExportFormat::Stl => "STL — 3D Printing",
            ExportFormat::Abc => "ABC — Houdini",
            ExportFormat::Vf => "VF — Unity3D Volume Field",
            ExportFormat::Png => "PNG — 3D Texture Strip",
            ExportFormat::Csv => "CSV — Position",
        }
    }

    pub fn route(&self) -> Route {
        match self {
            ExportFormat::Fbx => Route::Host(HostPreset {
                axes: Some((AxisDirection::NegZ, AxisDirection::PosY)),
                y_up: false,
                global_scale: 1.0,
                triangulate: true,
                apply_modifiers: true,
                animation: true,
                materials: true,
                compression_level: None,
            }),
            ExportFormat::Glb => Route::Host(HostPreset {
                axes: None,
                y_up: true,
                global_scale: 1.0,
                triangulate: false,
                apply_modifiers: true,
                animation: true,
                materials: true,
                compression_level: Some(6),
            }),
            ExportFormat::Obj => Route::Host(HostPreset {
                axes: Some((AxisDirection::NegZ, AxisDirection::PosY)),
                y_up: false,
                global_scale: 100.0,
                triangulate: true,
                apply_modifiers: true,
                animation: false,
                materials: true,
                compression_level: None,
            }),
            ExportFormat::Usdz => Route::Host(HostPreset {
                axes: None,
                y_up: false,
                global_scale: 1.0,
                triangulate: false,
                apply_modifiers: true,
                animation: false,
                materials: true,
                compression_level: None,
            }),
            ExportFormat::Stl => Route::Host(HostPreset {
                axes: Some((AxisDirection::PosY, AxisDirection::PosZ)),
                y_up: false,
                global_scale: 1.0,
                triangulate: true,
                apply_modifiers: true,
                animation: false,
                materials: false,
                compression_level: None,
            }),
            ExportFormat::Abc => Route::Host(HostPreset {
                axes: None,
                y_up: false,
                global_scale: 1.0,
                triangulate: false,
                apply_modifiers: true,
                animation: true,
                materials: false,
                compression_level: None,
            }),
            ExportFormat::Vf => Route::Volume(VolumeEncoding::Binary),
            ExportFormat::Png => Route::Volume(VolumeEncoding::Strip),
            ExportFormat::Csv => Route::Csv,
        }
    }

    /// Whether the format goes through a host exporter.
    pub fn is_host(&self) -> bool {
        matches!(self.route(), Route::Host(_))
    }

    /// Whether non-geometry objects are dropped before export.
    pub fn filters_object_kinds(&self) -> bool {
        !matches!(self, ExportFormat::Csv)
    }

    /// Whether several objects can share one output file.
    pub fn supports_combined(&self) -> bool {
        self.is_host()
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.extension()[1..].to_uppercase())
    }
}
