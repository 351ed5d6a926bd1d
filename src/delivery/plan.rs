//! Deciding which files a delivery produces.

use super::{DeliverySettings, Grouping, SceneContext, SceneObject};
use crate::error::{DeliveryError, Result};
use crate::export::{ExportFormat, Route};
use std::path::PathBuf;

/// One output file and the objects that go into it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryJob {
    pub name: String,
    pub path: PathBuf,
    pub objects: Vec<String>,
}

/// Every file a delivery will write.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryPlan {
    pub format: ExportFormat,
    pub jobs: Vec<DeliveryJob>,
    /// Objects left out, with the reason.
    pub skipped: Vec<(String, &'static str)>,
}

impl DeliveryPlan {
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.jobs.iter().map(|job| &job.path)
    }
}

/// Objects a delivery draws from, and the name used for combined output.
struct Source<'a> {
    name: String,
    objects: Vec<&'a SceneObject>,
    from_selection: bool,
}

impl<'a> Source<'a> {
    /// The selection when the active object is selected, else the active collection.
    fn resolve(scene: &'a SceneContext) -> Self {
        match scene.active_selection() {
            Some(active) => Self {
                name: active.name.clone(),
                objects: scene.selected_objects().collect(),
                from_selection: true,
            },
            _ => Self {
                name: scene.active_collection.name.clone(),
                objects: scene.collection_objects(),
                from_selection: false,
            },
        }
    }

    fn candidates(&self, format: ExportFormat) -> impl Iterator<Item = &'a SceneObject> + '_ {
        self.objects
            .iter()
            .copied()
            .filter(move |o| skip_reason(format, o).is_none())
    }
}

/// Why an object cannot go into a delivery of this format, if it can't.
fn skip_reason(format: ExportFormat, object: &SceneObject) -> Option<&'static str> {
    if format.filters_object_kinds() && !object.kind.is_deliverable() {
        Some("not a geometry object")
    } else if matches!(format.route(), Route::Volume(_)) && object.volume.is_none() {
        Some("no volume attributes")
    } else {
        None
    }
}

/// Work out the files a delivery writes, without touching the filesystem.
pub fn plan_delivery(scene: &SceneContext, settings: &DeliverySettings) -> Result<DeliveryPlan> {
    settings.validate()?;
    let format = settings.format;
    let source = Source::resolve(scene);

    let mut skipped = Vec::new();
    let mut candidates = Vec::new();
    for object in &source.objects {
        match skip_reason(format, object) {
            Some(reason) => {
                log::warn!("Skipping '{}': {}", object.name, reason);
                skipped.push((object.name.clone(), reason));
            }
            None => candidates.push(*object),
        }
    }

    let job = |name: &str, objects: Vec<String>| DeliveryJob {
        name: name.to_string(),
        path: settings.file_path(name),
        objects,
    };

    let jobs: Vec<DeliveryJob> = match format.route() {
        Route::Host(_) if settings.effective_grouping() == Grouping::Combined => {
            if candidates.is_empty() {
                Vec::new()
            } else {
                let names = candidates.iter().map(|o| o.name.clone()).collect();
                vec![job(&source.name, names)]
            }
        }
        Route::Host(_) | Route::Volume(_) | Route::Csv => candidates
            .iter()
            .map(|o| job(&o.name, vec![o.name.clone()]))
            .collect(),
    };

    if jobs.is_empty() {
        let origin = if source.from_selection {
            "selection".to_string()
        } else {
            format!("collection '{}'", source.name)
        };
        return Err(DeliveryError::NothingToDeliver(format!(
            "{} has no objects for {}",
            origin, format
        )));
    }

    log::debug!(
        "Planned {} {} file(s), skipped {} object(s)",
        jobs.len(),
        format,
        skipped.len()
    );

    Ok(DeliveryPlan {
        format,
        jobs,
        skipped,
    })
}

/// Icon shown on the delivery button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelIcon {
    Mesh,
    Collection,
    Disabled,
}

/// Text and state of the delivery button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryLabel {
    pub text: String,
    pub icon: LabelIcon,
    pub enabled: bool,
}

/// Describe what pressing the delivery button would produce.
pub fn delivery_label(scene: &SceneContext, settings: &DeliverySettings) -> DeliveryLabel {
    let format = settings.format;
    let is_csv = format == ExportFormat::Csv;
    let combined = settings.effective_grouping() == Grouping::Combined;
    let source = Source::resolve(scene);
    let count = source.candidates(format).count();

    let (text, icon) = match scene.active_selection() {
        Some(active) => {
            let text = if count > 1 && combined && !is_csv {
                settings.file_name(&active.name)
            } else if count == 1 {
                let active_delivers = source.candidates(format).any(|o| o.name == active.name);
                if !active_delivers && !combined {
                    let name = source
                        .candidates(format)
                        .last()
                        .map_or(active.name.as_str(), |o| o.name.as_str());
                    settings.file_name(name)
                } else {
                    settings.file_name(&active.name)
                }
            } else {
                format!("{} files", count)
            };
            (text, LabelIcon::Mesh)
        }
        None => {
            let text = if combined && !is_csv {
                settings.file_name(&source.name)
            } else {
                format!("{} files", count)
            };
            (text, LabelIcon::Collection)
        }
    };

    if count == 0 {
        let text = if is_csv { "Select object" } else { "Select mesh" };
        return DeliveryLabel {
            text: text.to_string(),
            icon: LabelIcon::Disabled,
            enabled: false,
        };
    }

    DeliveryLabel {
        text,
        icon,
        enabled: true,
    }
}
