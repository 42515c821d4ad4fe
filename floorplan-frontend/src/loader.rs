use std::env;
use std::path::{Path, PathBuf};

use floorplan_config::EditorConfig;
use floorplan_core::document::{GridSettings, MeasurementSettings};
use floorplan_engine::scene::{DemoPlan, DrawDefaults, Scene};
use floorplan_io::{DocumentLoader, JsonPlanFacade};
use tracing::{info, warn};

use crate::errors::FrontendError;

/// 未通过 `--plan` 指定文件时读取的环境变量。
pub const PLAN_ENV: &str = "FLOORPLAN_CLI_PLAN";

/// 平面图来源请求。显式路径加载失败即报错，环境变量路径失败则回退到内置示例。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanRequest {
    Explicit(PathBuf),
    FromEnv(PathBuf),
    Demo,
}

impl PlanRequest {
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return PlanRequest::Explicit(path);
        }
        match env::var_os(PLAN_ENV) {
            Some(path) => PlanRequest::FromEnv(PathBuf::from(path)),
            None => PlanRequest::Demo,
        }
    }
}

/// 文档来源，便于前端呈现加载信息。
#[derive(Debug, Clone)]
pub enum DocumentSource {
    File(PathBuf),
    Demo,
}

/// 统一封装加载后的场景与元信息。
#[derive(Debug)]
pub struct LoadedScene {
    pub scene: Scene,
    pub source: DocumentSource,
    pub demo: Option<DemoPlan>,
}

pub fn load_scene(
    request: &PlanRequest,
    editor: &EditorConfig,
) -> Result<LoadedScene, FrontendError> {
    match request {
        PlanRequest::Explicit(path) => load_file(path, editor),
        PlanRequest::FromEnv(path) => match load_file(path, editor) {
            Ok(loaded) => Ok(loaded),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "加载平面图失败，回退到内置示例");
                load_demo(editor)
            }
        },
        PlanRequest::Demo => load_demo(editor),
    }
}

fn load_file(path: &Path, editor: &EditorConfig) -> Result<LoadedScene, FrontendError> {
    let document = JsonPlanFacade::new()
        .load(path)
        .map_err(FrontendError::Load)?;
    let mut scene = Scene::with_document(document)?;
    scene.set_draw_defaults(draw_defaults(editor))?;
    info!(path = %path.display(), elements = scene.elements().len(), "从 JSON 加载平面图成功");
    Ok(LoadedScene {
        scene,
        source: DocumentSource::File(path.to_path_buf()),
        demo: None,
    })
}

fn load_demo(editor: &EditorConfig) -> Result<LoadedScene, FrontendError> {
    let mut scene = Scene::new();
    scene.set_grid(GridSettings {
        enabled: editor.grid_enabled,
        size: editor.grid_size,
        snap: editor.snap,
    })?;
    scene.set_measurement_settings(MeasurementSettings::new(true, editor.measurement_unit));
    scene.set_draw_defaults(draw_defaults(editor))?;

    let demo = scene.populate_demo()?;
    // 选中两个房间后聚焦，便于命令直接作用于示例。
    scene.set_selection([demo.living_room.clone(), demo.bedroom.clone()]);
    scene.focus_on_selection();

    Ok(LoadedScene {
        scene,
        source: DocumentSource::Demo,
        demo: Some(demo),
    })
}

fn draw_defaults(editor: &EditorConfig) -> DrawDefaults {
    DrawDefaults {
        wall_thickness: editor.wall_thickness,
        wall_type: editor.wall_type,
        wall_material: editor.wall_material.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::document::{MeasurementUnit, WallType};
    use floorplan_io::DocumentSaver;

    #[test]
    fn demo_uses_editor_defaults() {
        let editor = EditorConfig {
            grid_size: 50.0,
            snap: false,
            wall_type: WallType::LoadBearing,
            measurement_unit: MeasurementUnit::Cm,
            ..EditorConfig::default()
        };
        let loaded = load_scene(&PlanRequest::Demo, &editor).unwrap();
        assert!(matches!(loaded.source, DocumentSource::Demo));
        assert!(loaded.demo.is_some());
        assert_eq!(loaded.scene.grid().size, 50.0);
        assert!(!loaded.scene.grid().snap);
        assert_eq!(loaded.scene.measurement_settings().unit, MeasurementUnit::Cm);
        assert_eq!(loaded.scene.draw_defaults().wall_type, WallType::LoadBearing);
        assert_eq!(loaded.scene.selection_len(), 2);
    }

    #[test]
    fn explicit_missing_plan_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let request = PlanRequest::Explicit(dir.path().join("absent.json"));
        let err = load_scene(&request, &EditorConfig::default()).unwrap_err();
        assert!(matches!(err, FrontendError::Load(_)));
    }

    #[test]
    fn env_plan_failure_falls_back_to_demo() {
        let dir = tempfile::tempdir().unwrap();
        let request = PlanRequest::FromEnv(dir.path().join("absent.json"));
        let loaded = load_scene(&request, &EditorConfig::default()).unwrap();
        assert!(matches!(loaded.source, DocumentSource::Demo));
    }

    #[test]
    fn invalid_editor_grid_is_rejected() {
        let editor = EditorConfig {
            grid_size: 0.0,
            ..EditorConfig::default()
        };
        let err = load_scene(&PlanRequest::Demo, &editor).unwrap_err();
        assert!(matches!(err, FrontendError::Engine(_)));
    }

    #[test]
    fn invalid_editor_wall_thickness_is_rejected() {
        let editor = EditorConfig {
            wall_thickness: 0.0,
            ..EditorConfig::default()
        };
        let err = load_scene(&PlanRequest::Demo, &editor).unwrap_err();
        assert!(matches!(err, FrontendError::Engine(_)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        JsonPlanFacade::new()
            .save(Scene::new().document(), &path)
            .unwrap();
        let err = load_scene(&PlanRequest::Explicit(path), &editor).unwrap_err();
        assert!(matches!(err, FrontendError::Engine(_)));
    }
}
