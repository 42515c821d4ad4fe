use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use floorplan_core::document::{Document, Element, GridSettings, MeasurementSettings, Viewport};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

/// 导出文件的格式版本。
pub const FORMAT_VERSION: &str = "1.0.0";

#[derive(Debug, Error)]
pub enum IoError {
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to read file {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path:?}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<Document, IoError>;
}

pub trait DocumentSaver {
    fn save(&self, document: &Document, path: &Path) -> Result<(), IoError>;
}

/// 导出 JSON 的完整结构。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanFile {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub elements: Vec<Element>,
    pub viewport: Viewport,
    pub grid: GridSettings,
    pub measurements: MeasurementSettings,
}

impl PlanFile {
    pub fn from_document(document: &Document, timestamp: DateTime<Utc>) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            timestamp,
            elements: document.elements().to_vec(),
            viewport: document.viewport,
            grid: document.grid,
            measurements: document.measurement_settings,
        }
    }

    pub fn into_document(self) -> Document {
        let mut document = Document::with_elements(self.elements);
        document.viewport = self.viewport;
        document.grid = self.grid;
        document.measurement_settings = self.measurements;
        document
    }
}

/// 以当前时间戳导出文档，输出带缩进的 JSON。
pub fn export_document(document: &Document) -> Result<String, IoError> {
    export_document_at(document, Utc::now())
}

pub fn export_document_at(
    document: &Document,
    timestamp: DateTime<Utc>,
) -> Result<String, IoError> {
    let file = PlanFile::from_document(document, timestamp);
    serde_json::to_string_pretty(&file).map_err(IoError::Serialize)
}

/// 解析导出 JSON。
///
/// `elements` 必须存在且为数组；`viewport`、`grid`、`measurements` 缺省或为
/// `null` 时取默认值，存在但格式错误时整体拒绝。元素 ID 重复不在此处处理。
pub fn import_document(data: &str) -> Result<Document, IoError> {
    let root: Value = serde_json::from_str(data)
        .map_err(|err| IoError::MalformedDocument(format!("invalid JSON: {err}")))?;
    let Value::Object(root) = root else {
        return Err(IoError::MalformedDocument(
            "top-level value must be an object".to_string(),
        ));
    };

    if let Some(version) = root.get("version").and_then(Value::as_str) {
        if version != FORMAT_VERSION {
            warn!(version, expected = FORMAT_VERSION, "导入文件版本与当前格式不一致");
        }
    }

    let raw_elements = match root.get("elements") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(IoError::MalformedDocument(
                "`elements` must be an array".to_string(),
            ));
        }
        None => {
            return Err(IoError::MalformedDocument(
                "missing `elements` array".to_string(),
            ));
        }
    };

    let mut elements = Vec::with_capacity(raw_elements.len());
    for (index, raw) in raw_elements.iter().enumerate() {
        let element = Element::deserialize(raw).map_err(|err| {
            IoError::MalformedDocument(format!("element #{index} is invalid: {err}"))
        })?;
        elements.push(element);
    }

    let mut document = Document::with_elements(elements);
    document.viewport = optional_section(&root, "viewport")?.unwrap_or_default();
    document.grid = optional_section(&root, "grid")?.unwrap_or_default();
    document.measurement_settings = optional_section(&root, "measurements")?.unwrap_or_default();

    document
        .validate()
        .map_err(|err| IoError::MalformedDocument(err.to_string()))?;
    debug!(elements = document.len(), "已解析平面图 JSON");
    Ok(document)
}

fn optional_section<T>(root: &Map<String, Value>, key: &str) -> Result<Option<T>, IoError>
where
    T: DeserializeOwned,
{
    match root.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|err| IoError::MalformedDocument(format!("`{key}` is invalid: {err}"))),
    }
}

/// 基于文件的 JSON 平面图读写。
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPlanFacade;

impl JsonPlanFacade {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for JsonPlanFacade {
    fn load(&self, path: &Path) -> Result<Document, IoError> {
        let data = fs::read_to_string(path).map_err(|source| IoError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let document = import_document(&data)?;
        info!(path = %path.display(), elements = document.len(), "已读取平面图文件");
        Ok(document)
    }
}

impl DocumentSaver for JsonPlanFacade {
    fn save(&self, document: &Document, path: &Path) -> Result<(), IoError> {
        let data = export_document(document)?;
        fs::write(path, data).map_err(|source| IoError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), elements = document.len(), "已写出平面图文件");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use floorplan_core::document::{MeasurementUnit, Room, RoomType, Wall, WallType};
    use floorplan_core::geometry::Point2;
    use serde_json::json;

    fn sample_document() -> Document {
        let mut wall = Wall::new(
            Point2::new(0.0, 0.0),
            Point2::new(4000.0, 0.0),
            200.0,
            WallType::Exterior,
            "brick",
        );
        wall.id = "wall_1".into();
        let mut room = Room::new(
            "Office",
            RoomType::Office,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(4000.0, 0.0),
                Point2::new(4000.0, 3000.0),
                Point2::new(0.0, 3000.0),
            ],
        );
        room.id = "room_1".into();
        let mut document = Document::with_elements(vec![Element::Wall(wall), Element::Room(room)]);
        document.measurement_settings = MeasurementSettings::new(false, MeasurementUnit::Cm);
        document
    }

    #[test]
    fn export_writes_all_sections() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        let text = export_document_at(&sample_document(), timestamp).unwrap();
        assert!(text.contains('\n'), "export should be pretty-printed");

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], json!("1.0.0"));
        assert_eq!(value["timestamp"], json!("2024-03-01T08:30:00Z"));
        assert_eq!(value["elements"][0]["kind"], json!("wall"));
        assert_eq!(value["elements"][0]["startPoint"], json!({"x": 0.0, "y": 0.0}));
        assert_eq!(value["elements"][0]["wallType"], json!("exterior"));
        assert_eq!(value["elements"][1]["area"], json!(12_000_000.0));
        assert_eq!(value["viewport"], json!({"x": 0.0, "y": 0.0, "zoom": 1.0}));
        assert_eq!(value["grid"], json!({"enabled": true, "size": 20.0, "snap": true}));
        assert_eq!(value["measurements"], json!({"show": false, "unit": "cm"}));
    }

    #[test]
    fn export_then_import_preserves_document() {
        let document = sample_document();
        let text = export_document(&document).unwrap();
        let restored = import_document(&text).unwrap();
        assert_eq!(restored, document);
    }

    #[test]
    fn missing_settings_fall_back_to_defaults() {
        let document = import_document(r#"{"elements": [], "grid": null}"#).unwrap();
        assert!(document.is_empty());
        assert_eq!(document.viewport, Viewport::default());
        assert_eq!(document.grid, GridSettings::default());
        assert_eq!(document.measurement_settings, MeasurementSettings::default());
    }

    #[test]
    fn rejects_payloads_without_element_array() {
        for payload in [
            r#"{"elements": {"kind": "wall"}}"#,
            r#"{"elements": "none"}"#,
            r#"{"viewport": {"x": 0, "y": 0, "zoom": 1}}"#,
            r#"[1, 2, 3]"#,
            "not json",
        ] {
            let err = import_document(payload).unwrap_err();
            assert!(
                matches!(err, IoError::MalformedDocument(_)),
                "payload {payload} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_malformed_sections_and_invalid_geometry() {
        let payloads = [
            json!({"elements": [], "grid": {"enabled": true, "size": "big", "snap": true}}),
            json!({"elements": [], "viewport": {"x": 0, "y": 0, "zoom": 0}}),
            json!({"elements": [{"kind": "stair", "id": "s1"}]}),
            json!({"elements": [{
                "kind": "room", "id": "r1", "name": "Tiny", "roomType": "other",
                "vertices": [{"x": 0, "y": 0}, {"x": 1, "y": 0}],
                "area": 0, "perimeter": 0
            }]}),
        ];
        for payload in payloads {
            let err = import_document(&payload.to_string()).unwrap_err();
            assert!(matches!(err, IoError::MalformedDocument(_)), "{payload}");
        }
    }

    #[test]
    fn room_metrics_are_taken_verbatim() {
        let payload = json!({"elements": [{
            "kind": "room", "id": "r1", "name": "Den", "roomType": "living",
            "vertices": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 10, "y": 10}],
            "area": 123.0, "perimeter": 45.0
        }]});
        let document = import_document(&payload.to_string()).unwrap();
        match &document.elements()[0] {
            Element::Room(room) => {
                assert_eq!(room.area, 123.0);
                assert_eq!(room.perimeter, 45.0);
            }
            other => panic!("unexpected element: {other:?}"),
        }
    }
}
