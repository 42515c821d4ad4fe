pub mod command;
pub mod history;
pub mod selection;

pub mod errors {
    use floorplan_core::document::{ElementId, ElementKind, GeometryError};
    use thiserror::Error;

    #[derive(Debug, Clone, PartialEq, Error)]
    pub enum EngineError {
        #[error("element {0} not found")]
        NotFound(ElementId),
        #[error("cannot apply a {patch} patch to {element} element {id}")]
        KindMismatch {
            id: ElementId,
            element: ElementKind,
            patch: ElementKind,
        },
        #[error("invalid geometry: {0}")]
        InvalidGeometry(#[from] GeometryError),
    }
}

pub mod scene {
    use std::collections::HashSet;

    use floorplan_core::document::{
        Document, Door, DoorType, Element, ElementId, ElementKind, ElementPatch, GeometryError,
        GridSettings, KindCounts, Measurement, MeasurementSettings, Room, RoomType, Viewport,
        Wall, WallType, Window, WindowType,
    };
    use floorplan_core::geometry::{self, Bounds2D, Point2, Vector2};
    use tracing::{debug, info, warn};

    use crate::errors::EngineError;
    use crate::history::History;
    use crate::selection::Selection;

    const MIN_ZOOM: f64 = 0.01;
    const MAX_ZOOM: f64 = 1_000.0;

    /// 交互绘制的最短长度（毫米）；不超过该长度的拖拽直接丢弃。
    pub const MIN_DRAW_LENGTH: f64 = 10.0;
    /// 复制元素时施加的固定偏移（毫米）。
    pub const DUPLICATE_OFFSET: f64 = 50.0;

    /// 交互绘制墙体时使用的默认属性。
    #[derive(Debug, Clone, PartialEq)]
    pub struct DrawDefaults {
        pub wall_thickness: f64,
        pub wall_type: WallType,
        pub wall_material: String,
    }

    impl Default for DrawDefaults {
        fn default() -> Self {
            Self {
                wall_thickness: 150.0,
                wall_type: WallType::Interior,
                wall_material: "concrete".to_string(),
            }
        }
    }

    impl DrawDefaults {
        pub fn validate(&self) -> Result<(), GeometryError> {
            if self.wall_thickness.is_finite() && self.wall_thickness > 0.0 {
                Ok(())
            } else {
                Err(GeometryError::NonPositiveDimension {
                    field: "wall_thickness",
                    value: self.wall_thickness,
                })
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum LineTool {
        Wall,
        Measurement,
    }

    /// 进行中的交互手势。预览只改动临时状态，结束时至多提交一次历史。
    #[derive(Debug, Clone, PartialEq)]
    pub enum Gesture {
        /// 拖拽绘制线段，文档保持不变，仅记录预览端点。
        Draw {
            tool: LineTool,
            start: Point2,
            current: Point2,
        },
        /// 拖拽移动。`offset` 是相对起点的累计位移，活动元素随预览实时偏移。
        Move { ids: Vec<ElementId>, offset: Vector2 },
    }

    #[derive(Debug, Clone)]
    pub struct DemoPlan {
        pub exterior_walls: Vec<ElementId>,
        pub partition: ElementId,
        pub door: ElementId,
        pub window: ElementId,
        pub living_room: ElementId,
        pub bedroom: ElementId,
        pub measurement: ElementId,
    }

    /// 平面图编辑场景：持有文档、历史、选中集与进行中的手势。
    ///
    /// 所有写操作都经由这里完成。不存在手势时，文档元素始终与历史的
    /// `present` 快照一致。
    #[derive(Debug)]
    pub struct Scene {
        document: Document,
        history: History<Vec<Element>>,
        selection: Selection,
        gesture: Option<Gesture>,
        draw_defaults: DrawDefaults,
        next_serial: u64,
    }

    impl Scene {
        pub fn new() -> Self {
            Self {
                document: Document::new(),
                history: History::new(Vec::new()),
                selection: Selection::new(),
                gesture: None,
                draw_defaults: DrawDefaults::default(),
                next_serial: 0,
            }
        }

        /// 使用现有文档初始化场景。
        pub fn with_document(document: Document) -> Result<Self, EngineError> {
            let mut scene = Self::new();
            scene.load_document(document)?;
            Ok(scene)
        }

        /// 打开文档：替换当前内容，并以其作为新的历史起点。
        pub fn load_document(&mut self, document: Document) -> Result<(), EngineError> {
            let document = self.prepare_document(document)?;
            self.gesture = None;
            self.selection.clear();
            self.history.reset(document.elements().to_vec());
            self.document = document;
            info!(elements = self.document.len(), "已载入平面图文档");
            Ok(())
        }

        /// 导入文档：整体替换并提交一条历史记录，同时清空选中集。
        ///
        /// 校验失败时当前文档保持不变。
        pub fn import_document(&mut self, document: Document) -> Result<(), EngineError> {
            let document = self.prepare_document(document)?;
            self.gesture = None;
            self.selection.clear();
            self.document = document;
            self.commit("import");
            info!(elements = self.document.len(), "已导入平面图文档");
            Ok(())
        }

        #[inline]
        pub fn document(&self) -> &Document {
            &self.document
        }

        #[inline]
        pub fn elements(&self) -> &[Element] {
            self.document.elements()
        }

        #[inline]
        pub fn history(&self) -> &History<Vec<Element>> {
            &self.history
        }

        #[inline]
        pub fn gesture(&self) -> Option<&Gesture> {
            self.gesture.as_ref()
        }

        #[inline]
        pub fn draw_defaults(&self) -> &DrawDefaults {
            &self.draw_defaults
        }

        /// 无效厚度直接拒绝，保持原有默认值不变。
        pub fn set_draw_defaults(&mut self, defaults: DrawDefaults) -> Result<(), EngineError> {
            defaults.validate()?;
            self.draw_defaults = defaults;
            Ok(())
        }

        pub fn element(&self, id: &ElementId) -> Option<&Element> {
            self.document.element(id)
        }

        pub fn element_at(&self, point: Point2, tolerance: f64) -> Option<&Element> {
            self.document.element_at(point, tolerance)
        }

        pub fn counts(&self) -> KindCounts {
            self.document.counts()
        }

        pub fn count_by_kind(&self, kind: ElementKind) -> usize {
            self.document.count_by_kind(kind)
        }

        /// 房间总面积（平方毫米），每次调用实时计算。
        pub fn total_room_area(&self) -> f64 {
            self.document.total_room_area()
        }

        // ---- 变更入口 ----

        /// 新增元素并分配唯一 ID；调用方提供的 ID 会被覆盖。
        pub fn add(&mut self, mut element: Element) -> Result<ElementId, EngineError> {
            self.abandon_gesture();
            element.normalize();
            element.validate()?;
            let id = fresh_id(&mut self.next_serial, element.kind(), |candidate| {
                self.document.contains(candidate)
            });
            element.set_id(id.clone());
            debug!(id = %id, kind = %element.kind(), "添加元素");
            self.document.push(element);
            self.commit("add");
            Ok(id)
        }

        /// 合并局部字段。补丁未带来任何变化时不提交历史。
        pub fn update(&mut self, id: &ElementId, patch: &ElementPatch) -> Result<(), EngineError> {
            self.abandon_gesture();
            let current = self
                .document
                .element(id)
                .ok_or_else(|| EngineError::NotFound(id.clone()))?;
            let mut candidate = current.clone();
            if !candidate.apply_patch(patch) {
                return Err(EngineError::KindMismatch {
                    id: id.clone(),
                    element: current.kind(),
                    patch: patch.kind(),
                });
            }
            candidate.validate()?;
            if patch.carries_room_metrics() {
                debug!(id = %id, "补丁中的房间面积/周长不会被采用");
            }
            if candidate == *current {
                return Ok(());
            }
            if let Some(slot) = self.document.element_mut(id) {
                *slot = candidate;
            }
            self.commit("update");
            Ok(())
        }

        /// 删除单个元素并从选中集中移除。
        pub fn remove(&mut self, id: &ElementId) -> Result<Element, EngineError> {
            self.abandon_gesture();
            let removed = self
                .document
                .remove(id)
                .ok_or_else(|| EngineError::NotFound(id.clone()))?;
            self.selection.deselect(id);
            self.commit("remove");
            Ok(removed)
        }

        /// 批量平移，文档中不存在的 ID 被忽略。整批只提交一次历史。
        pub fn move_elements(
            &mut self,
            ids: &[ElementId],
            offset: Vector2,
        ) -> Result<usize, EngineError> {
            if !offset.is_finite() {
                return Err(GeometryError::NonFinite { field: "offset" }.into());
            }
            self.abandon_gesture();
            if offset.length_squared() == 0.0 {
                return Ok(0);
            }
            let moved = translate_elements(&mut self.document, ids, offset);
            if moved > 0 {
                debug!(moved, dx = offset.x(), dy = offset.y(), "平移元素");
                self.commit("move");
            }
            Ok(moved)
        }

        pub fn move_selection(&mut self, offset: Vector2) -> Result<usize, EngineError> {
            let ids = self.selection.sorted();
            self.move_elements(&ids, offset)
        }

        /// 复制元素并偏移 (+50, +50)，新元素成为选中集。整批只提交一次历史。
        pub fn duplicate(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
            self.abandon_gesture();
            let wanted: HashSet<&ElementId> = ids.iter().collect();
            let sources: Vec<Element> = self
                .document
                .elements()
                .iter()
                .filter(|element| wanted.contains(element.id()))
                .cloned()
                .collect();
            if sources.is_empty() {
                return Vec::new();
            }

            let offset = Vector2::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
            let mut created = Vec::with_capacity(sources.len());
            for mut copy in sources {
                let id = fresh_id(&mut self.next_serial, copy.kind(), |candidate| {
                    self.document.contains(candidate)
                });
                copy.set_id(id.clone());
                copy.translate(offset);
                self.document.push(copy);
                created.push(id);
            }
            self.selection.replace(created.iter().cloned());
            debug!(count = created.len(), "复制元素");
            self.commit("duplicate");
            created
        }

        pub fn duplicate_selection(&mut self) -> Vec<ElementId> {
            let ids = self.selection.sorted();
            self.duplicate(&ids)
        }

        /// 删除全部选中元素，返回实际删除的数量。
        pub fn delete_selection(&mut self) -> usize {
            self.abandon_gesture();
            let mut removed = 0;
            for id in self.selection.sorted() {
                if self.document.remove(&id).is_some() {
                    removed += 1;
                }
            }
            self.selection.clear();
            if removed > 0 {
                debug!(removed, "删除选中元素");
                self.commit("delete_selection");
            }
            removed
        }

        /// 清空画布：移除全部元素并重置视口。
        pub fn clear(&mut self) {
            self.abandon_gesture();
            self.document.replace_elements(Vec::new());
            self.document.viewport = Viewport::default();
            self.selection.clear();
            self.commit("clear");
        }

        pub fn undo(&mut self) -> bool {
            self.abandon_gesture();
            let Some(snapshot) = self.history.undo() else {
                return false;
            };
            self.document.replace_elements(snapshot.clone());
            self.selection.clear();
            debug!(
                past = self.history.past_len(),
                future = self.history.future_len(),
                "撤销"
            );
            true
        }

        pub fn redo(&mut self) -> bool {
            self.abandon_gesture();
            let Some(snapshot) = self.history.redo() else {
                return false;
            };
            self.document.replace_elements(snapshot.clone());
            self.selection.clear();
            debug!(
                past = self.history.past_len(),
                future = self.history.future_len(),
                "重做"
            );
            true
        }

        #[inline]
        pub fn can_undo(&self) -> bool {
            self.history.can_undo()
        }

        #[inline]
        pub fn can_redo(&self) -> bool {
            self.history.can_redo()
        }

        // ---- 交互手势 ----

        /// 对交互输入的坐标应用网格吸附策略。
        #[inline]
        pub fn author_point(&self, raw: Point2) -> Point2 {
            self.document.grid.apply(raw)
        }

        pub fn begin_draw(&mut self, tool: LineTool, raw: Point2) {
            self.abandon_gesture();
            let start = self.author_point(raw);
            self.gesture = Some(Gesture::Draw {
                tool,
                start,
                current: start,
            });
        }

        /// 更新绘制预览的终点，无绘制手势时返回 `false`。
        pub fn update_draw(&mut self, raw: Point2) -> bool {
            let snapped = self.author_point(raw);
            match &mut self.gesture {
                Some(Gesture::Draw { current, .. }) => {
                    *current = snapped;
                    true
                }
                _ => false,
            }
        }

        pub fn draw_preview(&self) -> Option<(LineTool, Point2, Point2)> {
            match self.gesture {
                Some(Gesture::Draw {
                    tool,
                    start,
                    current,
                }) => Some((tool, start, current)),
                _ => None,
            }
        }

        /// 结束绘制。长度不超过 [`MIN_DRAW_LENGTH`] 时丢弃且不提交历史。
        pub fn finish_draw(&mut self) -> Result<Option<ElementId>, EngineError> {
            let (tool, start, end) = match self.gesture {
                Some(Gesture::Draw {
                    tool,
                    start,
                    current,
                }) => (tool, start, current),
                _ => return Ok(None),
            };
            self.gesture = None;

            let length = geometry::distance(start, end);
            if length <= MIN_DRAW_LENGTH {
                debug!(length, "拖拽过短，已丢弃");
                return Ok(None);
            }

            let element = match tool {
                LineTool::Wall => Element::Wall(Wall::new(
                    start,
                    end,
                    self.draw_defaults.wall_thickness,
                    self.draw_defaults.wall_type,
                    self.draw_defaults.wall_material.clone(),
                )),
                LineTool::Measurement => Element::Measurement(Measurement::new(
                    start,
                    end,
                    self.document.measurement_settings.unit,
                )),
            };
            self.add(element).map(Some)
        }

        pub fn begin_move(&mut self, ids: Vec<ElementId>) {
            self.abandon_gesture();
            self.gesture = Some(Gesture::Move {
                ids,
                offset: Vector2::new(0.0, 0.0),
            });
        }

        pub fn begin_move_selection(&mut self) {
            let ids = self.selection.sorted();
            self.begin_move(ids);
        }

        /// 更新移动预览，`offset` 为相对拖拽起点的累计位移。
        pub fn update_move(&mut self, offset: Vector2) -> bool {
            if !offset.is_finite() {
                return false;
            }
            let Some(Gesture::Move {
                ids,
                offset: applied,
            }) = &mut self.gesture
            else {
                return false;
            };
            self.document
                .replace_elements(self.history.present().clone());
            translate_elements(&mut self.document, ids, offset);
            *applied = offset;
            true
        }

        /// 结束移动并提交一次历史，返回被移动的元素数量。
        pub fn finish_move(&mut self) -> usize {
            let (ids, offset) = match self.gesture.take() {
                Some(Gesture::Move { ids, offset }) => (ids, offset),
                other => {
                    self.gesture = other;
                    return 0;
                }
            };
            if offset.length_squared() == 0.0 {
                return 0;
            }
            let unique: HashSet<&ElementId> = ids.iter().collect();
            let moved = unique
                .iter()
                .filter(|id| self.document.contains(id))
                .count();
            if moved > 0 {
                debug!(moved, dx = offset.x(), dy = offset.y(), "拖拽移动完成");
                self.commit("move");
            }
            moved
        }

        /// 放弃进行中的手势，恢复到最近一次提交的状态。
        pub fn cancel_gesture(&mut self) -> bool {
            match self.gesture.take() {
                None => false,
                Some(Gesture::Draw { .. }) => {
                    debug!("取消绘制");
                    true
                }
                Some(Gesture::Move { .. }) => {
                    self.document
                        .replace_elements(self.history.present().clone());
                    debug!("取消拖拽移动");
                    true
                }
            }
        }

        // ---- 选中集 ----

        #[inline]
        pub fn selection(&self) -> &Selection {
            &self.selection
        }

        #[inline]
        pub fn selection_len(&self) -> usize {
            self.selection.len()
        }

        #[inline]
        pub fn is_selected(&self, id: &ElementId) -> bool {
            self.selection.contains(id)
        }

        /// 选中指定 ID。文档中不存在的 ID 同样允许选中。
        pub fn select(&mut self, id: ElementId) -> bool {
            self.selection.select(id)
        }

        pub fn select_only(&mut self, id: ElementId) {
            self.selection.select_only(id);
        }

        pub fn set_selection<I>(&mut self, ids: I)
        where
            I: IntoIterator<Item = ElementId>,
        {
            self.selection.replace(ids);
        }

        pub fn toggle_selection(&mut self, id: ElementId) -> bool {
            self.selection.toggle(id)
        }

        pub fn deselect(&mut self, id: &ElementId) -> bool {
            self.selection.deselect(id)
        }

        #[inline]
        pub fn clear_selection(&mut self) {
            self.selection.clear();
        }

        pub fn select_all(&mut self) {
            let ids: Vec<ElementId> = self
                .document
                .elements()
                .iter()
                .map(|element| element.id().clone())
                .collect();
            self.selection.replace(ids);
        }

        /// 按文档顺序返回当前选中且存在的元素。
        pub fn selected_elements(&self) -> impl Iterator<Item = &Element> {
            self.document
                .elements()
                .iter()
                .filter(|element| self.selection.contains(element.id()))
        }

        pub fn selection_bounds(&self) -> Option<Bounds2D> {
            let mut bounds = Bounds2D::empty();
            let mut has = false;
            for element in self.selected_elements() {
                if let Some(element_bounds) = element.bounds() {
                    bounds.include_bounds(&element_bounds);
                    has = true;
                }
            }
            if has { Some(bounds) } else { None }
        }

        // ---- 视口与网格 ----

        /// 视口的 `x`/`y` 表示视图中心在平面图坐标系中的位置。
        #[inline]
        pub fn viewport(&self) -> Viewport {
            self.document.viewport
        }

        pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), EngineError> {
            viewport.validate()?;
            self.document.viewport = viewport;
            Ok(())
        }

        #[inline]
        pub fn reset_viewport(&mut self) {
            self.document.viewport = Viewport::default();
        }

        pub fn set_viewport_center(&mut self, center: Point2) {
            if center.is_finite() {
                self.document.viewport.x = center.x();
                self.document.viewport.y = center.y();
            }
        }

        pub fn pan_viewport(&mut self, delta: Vector2) {
            let viewport = self.document.viewport;
            self.set_viewport_center(Point2::new(viewport.x, viewport.y).translate(delta));
        }

        /// 设置缩放倍数（自动限制在合法范围内）。
        pub fn set_viewport_zoom(&mut self, zoom: f64) {
            if zoom.is_nan() {
                return;
            }
            self.document.viewport.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }

        pub fn scale_viewport_zoom(&mut self, factor: f64) {
            let current = self.document.viewport.zoom;
            let target = if factor.is_finite() {
                current * factor
            } else {
                current
            };
            self.set_viewport_zoom(target);
        }

        /// 聚焦当前选中元素，若为空则退化到整个平面图范围。
        pub fn focus_on_selection(&mut self) {
            let target = self.selection_bounds().or_else(|| self.document.bounds());
            if let Some(bounds) = target {
                self.set_viewport_center(bounds.center());
            }
        }

        #[inline]
        pub fn grid(&self) -> GridSettings {
            self.document.grid
        }

        /// 修改网格设置。已有几何不会因开启吸附而被重新对齐。
        pub fn set_grid(&mut self, grid: GridSettings) -> Result<(), EngineError> {
            grid.validate()?;
            self.document.grid = grid;
            Ok(())
        }

        /// 切换吸附开关，返回切换后的状态。
        pub fn toggle_snap(&mut self) -> bool {
            self.document.grid.snap = !self.document.grid.snap;
            self.document.grid.snap
        }

        #[inline]
        pub fn measurement_settings(&self) -> MeasurementSettings {
            self.document.measurement_settings
        }

        pub fn set_measurement_settings(&mut self, settings: MeasurementSettings) {
            self.document.measurement_settings = settings;
        }

        /// 为 CLI / 快速验证构建一套两居室示例，并以其作为历史起点。
        pub fn populate_demo(&mut self) -> Result<DemoPlan, EngineError> {
            self.clear_selection();

            let corners = [
                Point2::new(0.0, 0.0),
                Point2::new(8000.0, 0.0),
                Point2::new(8000.0, 6000.0),
                Point2::new(0.0, 6000.0),
            ];
            let mut exterior = Vec::with_capacity(4);
            for (index, start) in corners.iter().enumerate() {
                let end = corners[(index + 1) % corners.len()];
                exterior.push(self.add(Element::Wall(Wall::new(
                    *start,
                    end,
                    200.0,
                    WallType::Exterior,
                    "brick",
                )))?);
            }
            let partition = self.add(Element::Wall(Wall::new(
                Point2::new(5000.0, 0.0),
                Point2::new(5000.0, 6000.0),
                100.0,
                WallType::Interior,
                "drywall",
            )))?;

            let mut door = Door::new(Point2::new(5000.0, 3000.0), 900.0, 2100.0, partition.clone());
            door.door_type = DoorType::Single;
            door.direction = 90.0;
            let door = self.add(Element::Door(door))?;

            let mut window = Window::new(
                Point2::new(2500.0, 0.0),
                1500.0,
                1200.0,
                exterior[0].clone(),
            );
            window.window_type = WindowType::Double;
            let window = self.add(Element::Window(window))?;

            let living_room = self.add(Element::Room(Room::new(
                "Living Room",
                RoomType::Living,
                vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(5000.0, 0.0),
                    Point2::new(5000.0, 6000.0),
                    Point2::new(0.0, 6000.0),
                ],
            )))?;
            let bedroom = self.add(Element::Room(Room::new(
                "Bedroom",
                RoomType::Bedroom,
                vec![
                    Point2::new(5000.0, 0.0),
                    Point2::new(8000.0, 0.0),
                    Point2::new(8000.0, 6000.0),
                    Point2::new(5000.0, 6000.0),
                ],
            )))?;

            let mut measurement = Measurement::new(
                Point2::new(0.0, -500.0),
                Point2::new(8000.0, -500.0),
                self.document.measurement_settings.unit,
            );
            measurement.label = Some("Overall width".to_string());
            let measurement = self.add(Element::Measurement(measurement))?;

            self.history.reset(self.document.elements().to_vec());

            let plan = DemoPlan {
                exterior_walls: exterior,
                partition,
                door,
                window,
                living_room,
                bedroom,
                measurement,
            };
            debug!(
                elements = self.document.len(),
                living_room = %plan.living_room,
                bedroom = %plan.bedroom,
                "已创建示例平面图"
            );
            Ok(plan)
        }

        // ---- 内部工具 ----

        fn commit(&mut self, action: &'static str) {
            self.history.commit(self.document.elements().to_vec());
            debug!(
                action,
                past = self.history.past_len(),
                elements = self.document.len(),
                "提交历史快照"
            );
        }

        fn abandon_gesture(&mut self) {
            if self.gesture.is_some() {
                self.cancel_gesture();
            }
        }

        /// 整理待载入的文档：校验几何、规范化字段，并为空或重复的 ID 重新编号。
        fn prepare_document(&mut self, mut document: Document) -> Result<Document, EngineError> {
            document.validate()?;
            let mut elements = document.replace_elements(Vec::new());
            let taken: HashSet<ElementId> =
                elements.iter().map(|element| element.id().clone()).collect();
            let mut seen: HashSet<ElementId> = HashSet::with_capacity(elements.len());
            for element in &mut elements {
                element.normalize();
                if !element.id().is_empty() && seen.insert(element.id().clone()) {
                    continue;
                }
                let id = fresh_id(&mut self.next_serial, element.kind(), |candidate| {
                    taken.contains(candidate) || seen.contains(candidate)
                });
                warn!(previous = %element.id(), id = %id, "元素 ID 为空或重复，已重新编号");
                element.set_id(id.clone());
                seen.insert(id);
            }
            document.replace_elements(elements);
            Ok(document)
        }
    }

    impl Default for Scene {
        fn default() -> Self {
            Self::new()
        }
    }

    /// 生成 `{kind}_{n}` 形式的新 ID，跳过 `taken` 判定为已占用的候选。
    fn fresh_id<F>(serial: &mut u64, kind: ElementKind, taken: F) -> ElementId
    where
        F: Fn(&ElementId) -> bool,
    {
        loop {
            *serial += 1;
            let candidate = ElementId::new(format!("{}_{}", kind.as_str(), serial));
            if !taken(&candidate) {
                return candidate;
            }
        }
    }

    fn translate_elements(document: &mut Document, ids: &[ElementId], offset: Vector2) -> usize {
        let unique: HashSet<&ElementId> = ids.iter().collect();
        let mut moved = 0;
        for id in unique {
            if let Some(element) = document.element_mut(id) {
                element.translate(offset);
                moved += 1;
            }
        }
        moved
    }

}
