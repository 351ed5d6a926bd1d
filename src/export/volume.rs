//! VF binary and PNG strip export for objects carrying volume attributes.

use crate::delivery::VolumeAttributes;
use crate::error::Result;
use crate::volume::RemapRange;

/// Export volume attributes as VF bytes.
pub fn export_vf(attributes: &VolumeAttributes) -> Result<Vec<u8>> {
    let field = attributes.to_field()?;
    log::debug!(
        "Encoding {} VF grid {:?} ({} samples)",
        field.kind,
        field.grid.dims(),
        field.samples.len()
    );
    field.to_binary()
}

/// Export volume attributes as a PNG-encoded 3D-texture strip.
pub fn export_png(attributes: &VolumeAttributes, range: RemapRange) -> Result<Vec<u8>> {
    let field = attributes.to_field()?;
    let strip = field.to_strip(range)?;
    log::debug!(
        "Encoding {} strip {}x{} over [{}, {}]",
        field.kind,
        strip.width,
        strip.height,
        range.lo(),
        range.hi()
    );
    strip.to_png()
}
