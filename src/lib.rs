//! # VF Delivery
//!
//! Export scene objects to delivery files: volume fields as compact VF
//! binaries or PNG 3D-texture strips, position tracks as CSV, and meshes
//! through the host editor's exporters.
//!
//! ## Volume fields
//!
//! ```ignore
//! use vf_delivery::{encode_binary, encode_image_strip, GridDescriptor, Sample, ValueKind};
//!
//! let grid = GridDescriptor::new(4, 3, 2);
//! let samples = vec![Sample::Scalar(0.0); grid.volume()];
//!
//! // VF binary: header with Y and Z exchanged, then little-endian floats
//! let bytes = encode_binary(&grid, &samples, ValueKind::Scalar)?;
//!
//! // RGBA strip, 12 x 2 pixels, values mapped from [-1, 1] onto [0, 1]
//! let strip = encode_image_strip(&grid, &samples, ValueKind::Scalar, -1.0, 1.0)?;
//! let png = strip.to_png()?;
//! ```
//!
//! ## Delivery
//!
//! The editor state is passed in as a [`SceneContext`] snapshot. Mesh
//! formats need a [`HostExporter`] implementation backed by the editor.
//!
//! ```ignore
//! use vf_delivery::{deliver, DeliverySettings, ExportFormat, SceneContext};
//!
//! let scene = SceneContext::from_json(&std::fs::read_to_string("scene.json")?)?;
//! let settings = DeliverySettings::new("/deliveries", ExportFormat::Vf);
//! let report = deliver(&scene, &settings, &mut my_host)?;
//! ```

pub mod error;
pub mod types;
pub mod volume;
pub mod export;
pub mod delivery;

// Re-export main types for convenience
pub use error::{DeliveryError, Result};
pub use types::{AttributeRecord, Axis, AxisDirection, GridDescriptor, Sample, ValueKind, MAX_GRID_SAMPLES};
pub use volume::{
    decode_binary, decode_image_strip, encode_binary, encode_image_strip, read_header,
    PixelBuffer, RemapRange, VfHeader, VolumeField,
};
pub use export::{ExportFormat, HostPreset, Route};
pub use delivery::{
    deliver, delivery_label, plan_delivery, CsvSpace, DeliveryLabel, DeliveryPlan,
    DeliveryReport, DeliverySettings, Grouping, HostExportRequest, HostExporter, NoHostExporter,
    ObjectKind, SceneContext, SceneObject, VolumeAttributes,
};

/// Read a VF file from disk.
pub fn load_volume<P: AsRef<std::path::Path>>(path: P) -> Result<VolumeField> {
    decode_binary(&std::fs::read(path)?)
}

#[cfg(feature = "wasm")]
pub mod wasm;
