//! Delivering scene objects to files.
//!
//! A delivery takes a [`SceneContext`] snapshot and [`DeliverySettings`],
//! plans the output files, and writes them. Volume fields and CSV tracks are
//! written here; mesh formats are handed to a [`HostExporter`].

mod plan;
mod scene;
mod settings;

pub use plan::{delivery_label, plan_delivery, DeliveryJob, DeliveryLabel, DeliveryPlan, LabelIcon};
pub use scene::{
    ObjectKind, SceneCollection, SceneContext, SceneObject, TransformKey, VolumeAttributes,
};
pub use settings::{CsvSpace, DeliverySettings, Grouping};

use crate::error::{DeliveryError, Result};
use crate::export::{
    export_png, export_positions_csv, export_vf, ExportFormat, HostPreset, Route, VolumeEncoding,
};
use std::fs;
use std::path::{Path, PathBuf};

/// A request for the host editor to write one mesh file.
#[derive(Debug, Clone, Copy)]
pub struct HostExportRequest<'a> {
    pub format: ExportFormat,
    pub preset: &'a HostPreset,
    pub path: &'a Path,
    /// Objects to select for this file.
    pub objects: &'a [String],
}

/// Host-provided mesh exporters (FBX, GLB, OBJ, USDZ, STL, Alembic).
pub trait HostExporter {
    /// Write the requested file, or fail without leaving a partial one.
    fn export(&mut self, request: &HostExportRequest<'_>) -> Result<()>;
}

/// Stand-in used outside the editor: every mesh export fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHostExporter;

impl HostExporter for NoHostExporter {
    fn export(&mut self, request: &HostExportRequest<'_>) -> Result<()> {
        Err(DeliveryError::Host(format!(
            "{} export of {} needs the host editor",
            request.format,
            request.path.display()
        )))
    }
}

/// What a delivery produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryReport {
    /// Files written by this crate.
    pub written: Vec<PathBuf>,
    /// Files handed to the host exporter.
    pub host_exports: Vec<PathBuf>,
    /// Objects left out, with the reason.
    pub skipped: Vec<(String, &'static str)>,
}

impl DeliveryReport {
    pub fn file_count(&self) -> usize {
        self.written.len() + self.host_exports.len()
    }
}

/// Plan and run a delivery.
///
/// Stops at the first failing file. Each native file is fully encoded before
/// it is written, so a failure never leaves a truncated file behind.
pub fn deliver(
    scene: &SceneContext,
    settings: &DeliverySettings,
    host: &mut dyn HostExporter,
) -> Result<DeliveryReport> {
    let plan = plan_delivery(scene, settings)?;
    let mut report = DeliveryReport {
        skipped: plan.skipped.clone(),
        ..DeliveryReport::default()
    };

    for job in &plan.jobs {
        log::debug!("Delivering {:?} to {}", job.objects, job.path.display());
        match plan.format.route() {
            Route::Host(preset) => {
                host.export(&HostExportRequest {
                    format: plan.format,
                    preset: &preset,
                    path: &job.path,
                    objects: &job.objects,
                })?;
                report.host_exports.push(job.path.clone());
            }
            Route::Volume(encoding) => {
                let object = job_object(scene, job)?;
                let volume = object
                    .volume
                    .as_ref()
                    .ok_or_else(|| DeliveryError::MissingVolume(object.name.clone()))?;
                let bytes = match encoding {
                    VolumeEncoding::Binary => export_vf(volume)?,
                    VolumeEncoding::Strip => export_png(volume, settings.strip_range()?)?,
                };
                fs::write(&job.path, bytes)?;
                report.written.push(job.path.clone());
            }
            Route::Csv => {
                let object = job_object(scene, job)?;
                let csv = export_positions_csv(object, scene.frames(), settings.csv_space);
                fs::write(&job.path, csv)?;
                report.written.push(job.path.clone());
            }
        }
        log::info!("Delivered {}", job.path.display());
    }

    Ok(report)
}

fn job_object<'a>(scene: &'a SceneContext, job: &DeliveryJob) -> Result<&'a SceneObject> {
    job.objects
        .first()
        .and_then(|name| scene.object(name))
        .ok_or_else(|| DeliveryError::Export(format!("no object for {}", job.path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        requests: Vec<(ExportFormat, PathBuf, Vec<String>)>,
        fail: bool,
    }

    impl HostExporter for RecordingHost {
        fn export(&mut self, request: &HostExportRequest<'_>) -> Result<()> {
            if self.fail {
                return Err(DeliveryError::Host("exporter unavailable".into()));
            }
            self.requests.push((
                request.format,
                request.path.to_path_buf(),
                request.objects.to_vec(),
            ));
            Ok(())
        }
    }

    fn scene() -> SceneContext {
        let mut scene = SceneContext::new(vec![
            SceneObject::new("Cube", ObjectKind::Mesh).selected(),
            SceneObject::new("Cone", ObjectKind::Mesh).selected(),
        ]);
        scene.active_object = Some("Cube".into());
        scene
    }

    #[test]
    fn test_host_formats_go_to_host() {
        let settings =
            DeliverySettings::new("/out", ExportFormat::Fbx).with_grouping(Grouping::Individual);
        let mut host = RecordingHost::default();
        let report = deliver(&scene(), &settings, &mut host).unwrap();

        assert_eq!(report.host_exports.len(), 2);
        assert!(report.written.is_empty());
        assert_eq!(host.requests[1].1, PathBuf::from("/out/Cone.fbx"));
        assert_eq!(host.requests[1].2, vec!["Cone"]);
    }

    #[test]
    fn test_host_failure_aborts() {
        let settings = DeliverySettings::new("/out", ExportFormat::Glb);
        let mut host = RecordingHost {
            fail: true,
            ..RecordingHost::default()
        };
        assert!(matches!(
            deliver(&scene(), &settings, &mut host),
            Err(DeliveryError::Host(_))
        ));
    }
}
