//! Delivery settings.

use crate::error::{DeliveryError, Result};
use crate::export::ExportFormat;
use crate::volume::RemapRange;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Whether a selection goes to one file or one file per object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "UPPERCASE")]
pub enum Grouping {
    /// Export the selection in one file
    #[default]
    Combined,
    /// Export each object to its own file
    Individual,
}

/// Coordinate space for CSV position tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "UPPERCASE")]
pub enum CsvSpace {
    /// World space
    #[default]
    World,
    /// Parent-relative object space
    Local,
}

/// Delivery configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliverySettings {
    /// Directory all files are written to.
    pub location: PathBuf,
    pub format: ExportFormat,
    pub grouping: Grouping,
    pub csv_space: CsvSpace,
    /// Source range mapped onto [0, 1] for PNG strips.
    pub strip_range: [f32; 2],
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            location: PathBuf::from("/"),
            format: ExportFormat::default(),
            grouping: Grouping::default(),
            csv_space: CsvSpace::default(),
            strip_range: [0.0, 1.0],
        }
    }
}

impl DeliverySettings {
    pub fn new(location: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self {
            location: location.into(),
            format,
            ..Self::default()
        }
    }

    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_csv_space(mut self, space: CsvSpace) -> Self {
        self.csv_space = space;
        self
    }

    pub fn with_strip_range(mut self, lo: f32, hi: f32) -> Self {
        self.strip_range = [lo, hi];
        self
    }

    /// Parse settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.location.as_os_str().is_empty() {
            return Err(DeliveryError::Settings(
                "delivery location is empty".to_string(),
            ));
        }
        self.strip_range()?;
        Ok(())
    }

    pub fn strip_range(&self) -> Result<RemapRange> {
        RemapRange::new(self.strip_range[0], self.strip_range[1])
    }

    /// Grouping actually applied: only host formats can combine objects.
    pub fn effective_grouping(&self) -> Grouping {
        if self.format.supports_combined() {
            self.grouping
        } else {
            Grouping::Individual
        }
    }

    /// File name for an output named `name`.
    pub fn file_name(&self, name: &str) -> String {
        format!("{}{}", name, self.format.extension())
    }

    /// Output path for an output named `name`.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.location.join(self.file_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DeliverySettings::default();
        assert_eq!(settings.format, ExportFormat::Fbx);
        assert_eq!(settings.grouping, Grouping::Combined);
        assert_eq!(settings.csv_space, CsvSpace::World);
        assert_eq!(settings.location, PathBuf::from("/"));
    }

    #[test]
    fn test_from_json_partial() {
        let settings =
            DeliverySettings::from_json(r#"{"location": "/tmp/out", "format": "PNG", "strip_range": [-1, 1]}"#)
                .unwrap();
        assert_eq!(settings.format, ExportFormat::Png);
        assert_eq!(settings.grouping, Grouping::Combined);
        assert_eq!(settings.effective_grouping(), Grouping::Individual);
        assert_eq!(settings.strip_range().unwrap().remap(0.0), 0.5);
        assert_eq!(
            settings.file_path("Smoke"),
            PathBuf::from("/tmp/out/Smoke.png")
        );
    }

    #[test]
    fn test_from_json_rejects_bad_range() {
        let result = DeliverySettings::from_json(r#"{"strip_range": [1, 0]}"#);
        assert!(matches!(result, Err(DeliveryError::InvalidRange { .. })));
    }

    #[test]
    fn test_empty_location_rejected() {
        let settings = DeliverySettings::new("", ExportFormat::Obj);
        assert!(matches!(
            settings.validate(),
            Err(DeliveryError::Settings(_))
        ));
    }
}
