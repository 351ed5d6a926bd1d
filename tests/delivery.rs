use glam::{Mat4, Vec3};
use std::fs;
use vf_delivery::delivery::TransformKey;
use vf_delivery::{
    deliver, load_volume, AttributeRecord, CsvSpace, DeliveryError, DeliverySettings, ExportFormat,
    NoHostExporter, ObjectKind, SceneContext, SceneObject, ValueKind, VolumeAttributes,
};

fn vector_field() -> VolumeAttributes {
    VolumeAttributes {
        size: [2, 1, 2],
        records: (0..4)
            .map(|i| AttributeRecord::vector(Vec3::new(i as f32, 1.0, -1.0)))
            .collect(),
    }
}

fn scene() -> SceneContext {
    let mut mover = SceneObject::new("Mover", ObjectKind::Empty).selected();
    mover.transforms = (1..=3)
        .map(|frame| TransformKey {
            frame,
            world: Mat4::from_translation(Vec3::new(frame as f32, 0.0, 0.5)),
            local: None,
        })
        .collect();

    let mut scene = SceneContext::new(vec![
        SceneObject::new("Wind", ObjectKind::Mesh)
            .selected()
            .with_volume(vector_field()),
        mover,
    ]);
    scene.active_object = Some("Wind".into());
    scene.frame_start = 1;
    scene.frame_end = 3;
    scene
}

#[test]
fn vf_delivery_writes_decodable_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = DeliverySettings::new(dir.path(), ExportFormat::Vf);

    let report = deliver(&scene(), &settings, &mut NoHostExporter).unwrap();
    assert_eq!(report.written, vec![dir.path().join("Wind.vf")]);
    assert!(report
        .skipped
        .iter()
        .any(|(name, _)| name == "Mover"));

    let field = load_volume(dir.path().join("Wind.vf")).unwrap();
    assert_eq!(field.kind, ValueKind::Vector3);
    assert_eq!(field.grid.dims(), [2, 1, 2]);
    assert_eq!(field.samples.len(), 4);

    let bytes = fs::read(dir.path().join("Wind.vf")).unwrap();
    assert_eq!(&bytes[..4], b"VF_V");
    assert_eq!(bytes.len(), 10 + 12 * 4);
}

#[test]
fn png_delivery_writes_strip() {
    let dir = tempfile::tempdir().unwrap();
    let settings =
        DeliverySettings::new(dir.path(), ExportFormat::Png).with_strip_range(-4.0, 4.0);

    deliver(&scene(), &settings, &mut NoHostExporter).unwrap();

    let image = image::open(dir.path().join("Wind.png")).unwrap();
    assert_eq!((image.width(), image.height()), (2, 2));
}

#[test]
fn csv_delivery_writes_every_selected_object() {
    let dir = tempfile::tempdir().unwrap();
    let settings =
        DeliverySettings::new(dir.path(), ExportFormat::Csv).with_csv_space(CsvSpace::Local);

    let report = deliver(&scene(), &settings, &mut NoHostExporter).unwrap();
    assert_eq!(report.written.len(), 2);

    let csv = fs::read_to_string(dir.path().join("Mover.csv")).unwrap();
    assert_eq!(csv, "x,y,z\n1.0,0.0,0.5\n2.0,0.0,0.5\n3.0,0.0,0.5\n");

    let still = fs::read_to_string(dir.path().join("Wind.csv")).unwrap();
    assert_eq!(still.lines().count(), 4);
}

#[test]
fn invalid_volume_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut scene = scene();
    scene.objects[0].volume = Some(VolumeAttributes {
        size: [3, 3, 3],
        records: vec![AttributeRecord::scalar(0.0); 5],
    });
    let settings = DeliverySettings::new(dir.path(), ExportFormat::Vf);

    let result = deliver(&scene, &settings, &mut NoHostExporter);
    assert!(matches!(result, Err(DeliveryError::ShapeMismatch { .. })));
    assert!(!dir.path().join("Wind.vf").exists());
}

#[test]
fn mesh_formats_need_a_host() {
    let dir = tempfile::tempdir().unwrap();
    let settings = DeliverySettings::new(dir.path(), ExportFormat::Fbx);
    let result = deliver(&scene(), &settings, &mut NoHostExporter);
    assert!(matches!(result, Err(DeliveryError::Host(_))));
}

#[test]
fn settings_round_trip_through_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = DeliverySettings::new(dir.path(), ExportFormat::Png).with_strip_range(-1.0, 1.0);
    fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

    assert_eq!(DeliverySettings::load(&path).unwrap(), settings);
}
