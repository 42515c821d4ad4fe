use std::fs;
use std::path::PathBuf;

use floorplan_core::document::{
    DoorType, Element, ElementKind, GridSettings, MeasurementSettings, MeasurementUnit, Viewport,
    WallType, WindowType,
};
use floorplan_core::geometry::Point2;
use floorplan_io::{DocumentLoader, DocumentSaver, IoError, JsonPlanFacade, import_document};
use serde_json::{Value, json};

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data");
    path.push(name);
    path
}

#[test]
fn load_studio_reads_every_element_kind() {
    let loader = JsonPlanFacade::new();
    let document = loader.load(&fixture("studio.json")).expect("读取 studio.json 失败");

    let counts = document.counts();
    assert_eq!(counts.walls, 2);
    assert_eq!(counts.doors, 1);
    assert_eq!(counts.windows, 1);
    assert_eq!(counts.rooms, 1);
    assert_eq!(counts.measurements, 1);
    assert_eq!(document.count_by_kind(ElementKind::Wall), 2);

    match document.element(&"w-east".into()) {
        Some(Element::Wall(wall)) => {
            assert_eq!(wall.wall_type, WallType::LoadBearing);
            assert_eq!(wall.end_point, Point2::new(6000.0, 4000.0));
        }
        other => panic!("unexpected element: {other:?}"),
    }
    match document.element(&"d-entry".into()) {
        Some(Element::Door(door)) => {
            assert_eq!(door.door_type, DoorType::Sliding);
            assert_eq!(door.wall_id.as_str(), "w-east");
        }
        other => panic!("unexpected element: {other:?}"),
    }
    match document.element(&"win-1".into()) {
        Some(Element::Window(window)) => assert_eq!(window.window_type, WindowType::Bay),
        other => panic!("unexpected element: {other:?}"),
    }
    match document.element(&"m-width".into()) {
        Some(Element::Measurement(measurement)) => {
            assert_eq!(measurement.label.as_deref(), Some("Width"));
            assert_eq!(measurement.formatted(), "6.00m");
        }
        other => panic!("unexpected element: {other:?}"),
    }

    assert!((document.total_room_area() - 24_000_000.0).abs() < 1e-6);
    assert_eq!(
        document.viewport,
        Viewport {
            x: 3000.0,
            y: 2000.0,
            zoom: 0.5,
        }
    );
    assert_eq!(
        document.grid,
        GridSettings {
            enabled: false,
            size: 50.0,
            snap: false,
        }
    );
    assert_eq!(
        document.measurement_settings,
        MeasurementSettings::new(true, MeasurementUnit::Cm)
    );
}

#[test]
fn save_then_load_round_trips_through_disk() {
    let facade = JsonPlanFacade::new();
    let document = facade.load(&fixture("studio.json")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studio-copy.json");
    facade.save(&document, &path).unwrap();

    let restored = facade.load(&path).unwrap();
    assert_eq!(restored, document);

    let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["version"], json!("1.0.0"));
    assert!(written["timestamp"].as_str().is_some_and(|ts| ts.ends_with('Z')));
    assert_eq!(written["elements"].as_array().map(Vec::len), Some(6));
    assert_eq!(written["elements"][4]["kind"], json!("room"));
    assert_eq!(written["elements"][4]["roomType"], json!("living"));
    assert_eq!(written["measurements"]["unit"], json!("cm"));
}

#[test]
fn elements_only_payload_uses_default_settings() {
    let document = JsonPlanFacade::new()
        .load(&fixture("elements_only.json"))
        .unwrap();
    assert_eq!(document.len(), 2);
    assert_eq!(document.viewport, Viewport::default());
    assert_eq!(document.grid, GridSettings::default());
    assert_eq!(document.measurement_settings, MeasurementSettings::default());
    assert!(
        document
            .elements()
            .iter()
            .all(|element| element.id().as_str() == "wall_1")
    );
}

#[test]
fn non_array_elements_are_rejected() {
    let err = JsonPlanFacade::new()
        .load(&fixture("elements_not_array.json"))
        .unwrap_err();
    assert!(matches!(err, IoError::MalformedDocument(_)), "{err:?}");

    let data = fs::read_to_string(fixture("elements_not_array.json")).unwrap();
    assert!(import_document(&data).is_err());
}

#[test]
fn missing_file_reports_path() {
    let path = fixture("does-not-exist.json");
    let err = JsonPlanFacade::new().load(&path).unwrap_err();
    match err {
        IoError::ReadError { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unwritable_target_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("plan.json");
    let document = import_document(r#"{"elements": []}"#).unwrap();
    let err = JsonPlanFacade::new().save(&document, &path).unwrap_err();
    match err {
        IoError::WriteError { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
}
