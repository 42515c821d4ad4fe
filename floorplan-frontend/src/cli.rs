use std::path::PathBuf;

use floorplan_config::AppConfig;
use floorplan_core::document::{Element, ElementId, KindCounts, MeasurementUnit, Viewport};
use floorplan_engine::command::{CommandBus, CommandContext, CommandRequest};
use floorplan_engine::scene::Scene;
use floorplan_io::{DocumentSaver, JsonPlanFacade};
use tracing::{info, warn};

use crate::errors::FrontendError;
use crate::loader::{DocumentSource, LoadedScene, PlanRequest, load_scene};

/// CLI 运行参数。
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub plan: Option<PathBuf>,
    pub export: Option<PathBuf>,
    pub commands: Vec<CommandRequest>,
}

/// 运行结束时的平面图概览。
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSummary {
    pub counts: KindCounts,
    /// 房间总面积（平方米）。
    pub total_room_area_m2: f64,
    pub selection: Vec<ElementId>,
    pub viewport: Viewport,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl PlanSummary {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            counts: scene.counts(),
            total_room_area_m2: scene.total_room_area() / 1_000_000.0,
            selection: scene.selection().sorted(),
            viewport: scene.viewport(),
            can_undo: scene.can_undo(),
            can_redo: scene.can_redo(),
        }
    }
}

/// 加载平面图、依次执行命令、打印概览，并按需导出 JSON。
pub fn run(options: &CliOptions, config: &AppConfig) -> Result<PlanSummary, FrontendError> {
    let request = PlanRequest::resolve(options.plan.clone());
    let loaded = load_scene(&request, &config.editor)?;
    run_loaded(loaded, options)
}

fn run_loaded(loaded: LoadedScene, options: &CliOptions) -> Result<PlanSummary, FrontendError> {
    let LoadedScene {
        mut scene,
        source,
        demo,
    } = loaded;

    println!("平面图 CLI");
    match &source {
        DocumentSource::File(path) => println!("已从 JSON 加载平面图：{}", path.display()),
        DocumentSource::Demo => {
            if let Some(demo) = &demo {
                println!("已构建内置示例平面图：");
                let walls: Vec<&str> = demo.exterior_walls.iter().map(ElementId::as_str).collect();
                println!("  - 外墙 ID = {}", walls.join(", "));
                println!("  - 隔墙 ID = {}", demo.partition);
                println!("  - 门 ID = {}, 窗 ID = {}", demo.door, demo.window);
                println!("  - 客厅 ID = {}, 卧室 ID = {}", demo.living_room, demo.bedroom);
                println!("  - 标注 ID = {}", demo.measurement);
            }
        }
    }

    let bus = CommandBus::new();
    println!("支持的命令: {}", bus.available_commands().join(", "));
    {
        let mut context = CommandContext { scene: &mut scene };
        for request in &options.commands {
            if let Err(err) = dispatch_cli_command(&bus, request, &mut context) {
                warn!(command = %request.name, "CLI 命令执行失败: {err}");
            }
        }
    }

    let summary = PlanSummary::from_scene(&scene);
    print_summary(&scene, &summary);

    if let Some(path) = &options.export {
        JsonPlanFacade::new()
            .save(scene.document(), path)
            .map_err(FrontendError::Export)?;
        println!("已导出平面图：{}", path.display());
    }

    Ok(summary)
}

fn dispatch_cli_command(
    bus: &CommandBus,
    request: &CommandRequest,
    context: &mut CommandContext<'_>,
) -> Result<(), String> {
    let response = bus.dispatch(request, context);
    if response.success {
        if let Some(message) = response.message {
            println!("[命令] {message}");
        }
        Ok(())
    } else {
        Err(response.message.unwrap_or_else(|| "未知错误".to_string()))
    }
}

fn print_summary(scene: &Scene, summary: &PlanSummary) {
    let counts = summary.counts;
    info!(
        walls = counts.walls,
        doors = counts.doors,
        windows = counts.windows,
        rooms = counts.rooms,
        measurements = counts.measurements,
        "CLI 平面图统计"
    );

    println!(
        "元素统计: 墙体 {}, 门 {}, 窗 {}, 房间 {}, 标注 {} (共 {})",
        counts.walls,
        counts.doors,
        counts.windows,
        counts.rooms,
        counts.measurements,
        counts.total()
    );
    println!("房间总面积: {:.2} m²", summary.total_room_area_m2);

    if summary.selection.is_empty() {
        println!("当前尚未选中任何元素。");
    } else {
        let ids: Vec<&str> = summary.selection.iter().map(ElementId::as_str).collect();
        println!("选中集包含元素 ID：{}", ids.join(", "));
    }
    println!(
        "视口中心=({:.2}, {:.2}), 缩放={:.3}",
        summary.viewport.x, summary.viewport.y, summary.viewport.zoom
    );

    println!("当前平面图元素：");
    let unit = scene.measurement_settings().unit;
    for element in scene.elements() {
        println!("  - {}", describe_element(element, unit));
    }
}

fn describe_element(element: &Element, unit: MeasurementUnit) -> String {
    match element {
        Element::Wall(wall) => format!(
            "墙体 {}: ({:.0}, {:.0}) -> ({:.0}, {:.0}), 厚度={}, 类型={:?}, 材质={}",
            wall.id,
            wall.start_point.x(),
            wall.start_point.y(),
            wall.end_point.x(),
            wall.end_point.y(),
            unit.format(wall.thickness),
            wall.wall_type,
            wall.material
        ),
        Element::Door(door) => format!(
            "门 {}: 位置=({:.0}, {:.0}), 宽={}, 朝向={:.0}°, 所属墙体={}",
            door.id,
            door.position.x(),
            door.position.y(),
            unit.format(door.width),
            door.direction,
            door.wall_id
        ),
        Element::Window(window) => format!(
            "窗 {}: 位置=({:.0}, {:.0}), 宽={}, 高={}, 所属墙体={}",
            window.id,
            window.position.x(),
            window.position.y(),
            unit.format(window.width),
            unit.format(window.height),
            window.wall_id
        ),
        Element::Room(room) => format!(
            "房间 {} ({}): 顶点数={}, 面积={:.2} m², 周长={}",
            room.id,
            room.name,
            room.vertices.len(),
            room.area_square_meters(),
            unit.format(room.perimeter)
        ),
        Element::Measurement(measurement) => format!(
            "标注 {}: {}{}",
            measurement.id,
            measurement.formatted(),
            measurement
                .label
                .as_deref()
                .map(|label| format!(" ({label})"))
                .unwrap_or_default()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_config::EditorConfig;
    use floorplan_io::{DocumentLoader, JsonPlanFacade};

    fn demo() -> LoadedScene {
        load_scene(&PlanRequest::Demo, &EditorConfig::default()).unwrap()
    }

    #[test]
    fn demo_summary_reports_rooms_in_square_meters() {
        let summary = run_loaded(demo(), &CliOptions::default()).unwrap();
        assert_eq!(summary.counts.total(), 10);
        assert!((summary.total_room_area_m2 - 48.0).abs() < 1e-9);
        assert_eq!(summary.selection.len(), 2);
        assert!(!summary.can_undo);
    }

    #[test]
    fn commands_run_in_order_and_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("plan.json");
        let options = CliOptions {
            plan: None,
            export: Some(export.clone()),
            commands: vec![
                CommandRequest::new("delete_selection"),
                CommandRequest::new("select_all"),
                CommandRequest::with_args("move_selection", ["bad"]),
                CommandRequest::new("undo"),
            ],
        };

        let summary = run_loaded(demo(), &options).unwrap();
        assert_eq!(summary.counts.rooms, 2);
        assert!(summary.selection.is_empty());
        assert!(summary.can_redo);

        let exported = JsonPlanFacade::new().load(&export).unwrap();
        assert_eq!(exported.counts(), summary.counts);
    }

    #[test]
    fn describes_measurement_with_label() {
        let loaded = demo();
        let measurement = loaded
            .scene
            .elements()
            .iter()
            .find(|element| matches!(element, Element::Measurement(_)))
            .unwrap();
        let text = describe_element(measurement, MeasurementUnit::Mm);
        assert!(text.contains("8000mm"), "{text}");
        assert!(text.contains("Overall width"), "{text}");
    }
}
