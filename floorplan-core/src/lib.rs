pub mod geometry {
    use std::f64::consts::TAU;

    use glam::DVec2;
    use serde::{Deserialize, Serialize};

    /// 线段求交时判定平行（含共线）的分母阈值。
    pub const PARALLEL_EPSILON: f64 = 1e-3;

    /// 二维点，单位为毫米，内部以 `glam::DVec2` 表示。
    ///
    /// 序列化形式固定为 `{ "x": .., "y": .. }`，与导出格式保持一致。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    #[serde(from = "PointRepr", into = "PointRepr")]
    pub struct Point2(pub DVec2);

    #[derive(Serialize, Deserialize)]
    struct PointRepr {
        x: f64,
        y: f64,
    }

    impl From<PointRepr> for Point2 {
        fn from(value: PointRepr) -> Self {
            Self::new(value.x, value.y)
        }
    }

    impl From<Point2> for PointRepr {
        fn from(value: Point2) -> Self {
            Self {
                x: value.x(),
                y: value.y(),
            }
        }
    }

    impl Point2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: DVec2) -> Self {
            Self(vec)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn translate(self, offset: Vector2) -> Self {
            Self(self.0 + offset.0)
        }

        #[inline]
        pub fn vector_to(self, other: Point2) -> Vector2 {
            Vector2(other.0 - self.0)
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }

        #[inline]
        pub fn is_finite(self) -> bool {
            self.0.is_finite()
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self::from_vec(value)
        }
    }

    /// 二维位移向量，用于平移与复制偏移。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Vector2(pub DVec2);

    impl Vector2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_points(start: Point2, end: Point2) -> Self {
            Self(end.0 - start.0)
        }

        #[inline]
        pub fn length(self) -> f64 {
            self.0.length()
        }

        #[inline]
        pub fn length_squared(self) -> f64 {
            self.0.length_squared()
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn is_finite(self) -> bool {
            self.0.is_finite()
        }
    }

    impl From<DVec2> for Vector2 {
        fn from(value: DVec2) -> Self {
            Self(value)
        }
    }

    /// 轴对齐边界框，用于估算平面图/选中集范围。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Bounds2D {
        min: Point2,
        max: Point2,
    }

    impl Bounds2D {
        #[inline]
        pub fn new(min: Point2, max: Point2) -> Self {
            Self { min, max }
        }

        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point2::new(f64::INFINITY, f64::INFINITY),
                max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point2 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point2 {
            self.max
        }

        #[inline]
        pub fn width(&self) -> f64 {
            if self.is_empty() {
                0.0
            } else {
                self.max.x() - self.min.x()
            }
        }

        #[inline]
        pub fn height(&self) -> f64 {
            if self.is_empty() {
                0.0
            } else {
                self.max.y() - self.min.y()
            }
        }

        pub fn include_point(&mut self, point: Point2) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            let min_vec = self.min.as_vec2().min(point.as_vec2());
            let max_vec = self.max.as_vec2().max(point.as_vec2());
            self.min = Point2::from_vec(min_vec);
            self.max = Point2::from_vec(max_vec);
        }

        pub fn include_bounds(&mut self, other: &Bounds2D) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        #[inline]
        pub fn center(&self) -> Point2 {
            debug_assert!(!self.is_empty());
            let center = (self.min.as_vec2() + self.max.as_vec2()) * 0.5;
            Point2::from_vec(center)
        }
    }

    #[inline]
    pub fn distance(p1: Point2, p2: Point2) -> f64 {
        let delta = p2.as_vec2() - p1.as_vec2();
        (delta.x * delta.x + delta.y * delta.y).sqrt()
    }

    /// 从 `p1` 指向 `p2` 的方向角（弧度，`atan2` 值域）。
    #[inline]
    pub fn angle_radians(p1: Point2, p2: Point2) -> f64 {
        (p2.y() - p1.y()).atan2(p2.x() - p1.x())
    }

    #[inline]
    pub fn to_degrees(radians: f64) -> f64 {
        radians * 180.0 / std::f64::consts::PI
    }

    #[inline]
    pub fn to_radians(degrees: f64) -> f64 {
        degrees * std::f64::consts::PI / 180.0
    }

    /// 绕 `center` 旋转 `angle` 弧度（数学正方向）。
    pub fn rotate_point(point: Point2, center: Point2, angle: f64) -> Point2 {
        let (sin, cos) = angle.sin_cos();
        let dx = point.x() - center.x();
        let dy = point.y() - center.y();
        Point2::new(
            center.x() + dx * cos - dy * sin,
            center.y() + dx * sin + dy * cos,
        )
    }

    /// 将弧度折算到 `[0, 2π]`；正的整圈保留为 `2π`，非有限值原样返回。
    pub fn normalize_angle(angle: f64) -> f64 {
        if !angle.is_finite() {
            return angle;
        }
        let wrapped = angle.rem_euclid(TAU);
        if wrapped == 0.0 && angle > 0.0 {
            TAU
        } else {
            wrapped
        }
    }

    /// 将坐标吸附到最近的网格交点。半数向正无穷取整；`size` 非正时原样返回。
    pub fn snap_to_grid(point: Point2, size: f64) -> Point2 {
        if !(size.is_finite() && size > 0.0) {
            return point;
        }
        let snap = |value: f64| (value / size + 0.5).floor() * size;
        Point2::new(snap(point.x()), snap(point.y()))
    }

    /// 求线段 `p1p2` 与 `p3p4` 的交点。
    ///
    /// 平行、近似平行或共线时返回 `None`；交点落在任一线段之外时同样返回 `None`。
    pub fn segment_intersection(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> Option<Point2> {
        let denom = (p1.x() - p2.x()) * (p3.y() - p4.y()) - (p1.y() - p2.y()) * (p3.x() - p4.x());
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = ((p1.x() - p3.x()) * (p3.y() - p4.y()) - (p1.y() - p3.y()) * (p3.x() - p4.x()))
            / denom;
        let u = -((p1.x() - p2.x()) * (p1.y() - p3.y()) - (p1.y() - p2.y()) * (p1.x() - p3.x()))
            / denom;

        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(Point2::new(
                p1.x() + t * (p2.x() - p1.x()),
                p1.y() + t * (p2.y() - p1.y()),
            ))
        } else {
            None
        }
    }

    /// 鞋带公式求多边形面积（取绝对值），少于 3 个顶点时为 0。
    pub fn polygon_area(vertices: &[Point2]) -> f64 {
        if vertices.len() < 3 {
            return 0.0;
        }
        let mut twice_area = 0.0;
        for (i, current) in vertices.iter().enumerate() {
            let next = vertices[(i + 1) % vertices.len()];
            twice_area += current.x() * next.y();
            twice_area -= next.x() * current.y();
        }
        (twice_area / 2.0).abs()
    }

    /// 多边形周长，包含首尾闭合边；少于 2 个顶点时为 0。
    pub fn polygon_perimeter(vertices: &[Point2]) -> f64 {
        if vertices.len() < 2 {
            return 0.0;
        }
        vertices
            .iter()
            .enumerate()
            .map(|(i, current)| distance(*current, vertices[(i + 1) % vertices.len()]))
            .sum()
    }

    /// 射线法奇偶判定。边界上的点按半开区间处理，结果不作保证。
    pub fn point_in_polygon(point: Point2, vertices: &[Point2]) -> bool {
        let mut inside = false;
        let count = vertices.len();
        if count == 0 {
            return false;
        }
        let mut j = count - 1;
        for i in 0..count {
            let (xi, yi) = (vertices[i].x(), vertices[i].y());
            let (xj, yj) = (vertices[j].x(), vertices[j].y());
            let crosses = (yi > point.y()) != (yj > point.y())
                && point.x() < (xj - xi) * (point.y() - yi) / (yj - yi) + xi;
            if crosses {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// 线段上距 `point` 最近的点；零长度线段返回起点。
    pub fn closest_point_on_segment(point: Point2, start: Point2, end: Point2) -> Point2 {
        let segment = end.as_vec2() - start.as_vec2();
        let length_squared = segment.length_squared();
        if length_squared == 0.0 {
            return start;
        }
        let t = ((point.as_vec2() - start.as_vec2()).dot(segment) / length_squared).clamp(0.0, 1.0);
        Point2::from_vec(start.as_vec2() + segment * t)
    }

    #[inline]
    pub fn point_near_segment(point: Point2, start: Point2, end: Point2, threshold: f64) -> bool {
        distance(point, closest_point_on_segment(point, start, end)) <= threshold
    }

}

pub mod document {
    use std::fmt;

    use serde::{Deserialize, Deserializer, Serialize};
    use thiserror::Error;

    use crate::geometry::{self, Bounds2D, Point2, Vector2};

    /// 元素标识。导入的文档可能携带任意字符串，新建元素由引擎统一分配。
    #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ElementId(String);

    impl ElementId {
        #[inline]
        pub fn new(raw: impl Into<String>) -> Self {
            Self(raw.into())
        }

        #[inline]
        pub fn as_str(&self) -> &str {
            &self.0
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }
    }

    impl fmt::Display for ElementId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<&str> for ElementId {
        fn from(value: &str) -> Self {
            Self::new(value)
        }
    }

    impl From<String> for ElementId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ElementKind {
        Wall,
        Door,
        Window,
        Room,
        Measurement,
    }

    impl ElementKind {
        pub const ALL: [ElementKind; 5] = [
            ElementKind::Wall,
            ElementKind::Door,
            ElementKind::Window,
            ElementKind::Room,
            ElementKind::Measurement,
        ];

        pub fn as_str(self) -> &'static str {
            match self {
                ElementKind::Wall => "wall",
                ElementKind::Door => "door",
                ElementKind::Window => "window",
                ElementKind::Room => "room",
                ElementKind::Measurement => "measurement",
            }
        }
    }

    impl fmt::Display for ElementKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum WallType {
        Exterior,
        #[default]
        Interior,
        LoadBearing,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DoorType {
        #[default]
        Single,
        Double,
        Sliding,
        Folding,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum WindowType {
        #[default]
        Single,
        Double,
        Bay,
        Sliding,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RoomType {
        Bedroom,
        Bathroom,
        Kitchen,
        Living,
        Dining,
        Office,
        Storage,
        Garage,
        #[default]
        Other,
    }

    /// 标注单位。内部长度一律为毫米，仅在显示时换算。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum MeasurementUnit {
        #[default]
        Mm,
        Cm,
        M,
        Inch,
        Ft,
    }

    impl MeasurementUnit {
        pub fn from_millimeters(self, millimeters: f64) -> f64 {
            match self {
                MeasurementUnit::Mm => millimeters,
                MeasurementUnit::Cm => millimeters / 10.0,
                MeasurementUnit::M => millimeters / 1000.0,
                MeasurementUnit::Inch => millimeters / 25.4,
                MeasurementUnit::Ft => millimeters / 304.8,
            }
        }

        /// 按单位惯用精度格式化长度，例如 `1234mm`、`123.4cm`、`1.23m`。
        pub fn format(self, millimeters: f64) -> String {
            let value = self.from_millimeters(millimeters);
            match self {
                MeasurementUnit::Mm => format!("{}mm", value.round()),
                MeasurementUnit::Cm => format!("{value:.1}cm"),
                MeasurementUnit::M => format!("{value:.2}m"),
                MeasurementUnit::Inch => format!("{value:.1}\""),
                MeasurementUnit::Ft => format!("{value:.2}'"),
            }
        }

        pub fn as_str(self) -> &'static str {
            match self {
                MeasurementUnit::Mm => "mm",
                MeasurementUnit::Cm => "cm",
                MeasurementUnit::M => "m",
                MeasurementUnit::Inch => "inch",
                MeasurementUnit::Ft => "ft",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Wall {
        pub id: ElementId,
        pub start_point: Point2,
        pub end_point: Point2,
        pub thickness: f64,
        pub wall_type: WallType,
        pub material: String,
    }

    impl Wall {
        pub fn new(
            start_point: Point2,
            end_point: Point2,
            thickness: f64,
            wall_type: WallType,
            material: impl Into<String>,
        ) -> Self {
            Self {
                id: ElementId::default(),
                start_point,
                end_point,
                thickness,
                wall_type,
                material: material.into(),
            }
        }

        #[inline]
        pub fn length(&self) -> f64 {
            geometry::distance(self.start_point, self.end_point)
        }

        /// 墙体方向角（度）。
        #[inline]
        pub fn angle_degrees(&self) -> f64 {
            geometry::to_degrees(geometry::angle_radians(self.start_point, self.end_point))
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Door {
        pub id: ElementId,
        pub position: Point2,
        pub width: f64,
        pub height: f64,
        pub door_type: DoorType,
        /// 开启方向，单位为度，保存时折算到 `[0, 360)`。
        pub direction: f64,
        #[serde(default)]
        pub wall_id: ElementId,
    }

    impl Door {
        pub fn new(position: Point2, width: f64, height: f64, wall_id: impl Into<ElementId>) -> Self {
            Self {
                id: ElementId::default(),
                position,
                width,
                height,
                door_type: DoorType::default(),
                direction: 0.0,
                wall_id: wall_id.into(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Window {
        pub id: ElementId,
        pub position: Point2,
        pub width: f64,
        pub height: f64,
        pub window_type: WindowType,
        #[serde(default)]
        pub wall_id: ElementId,
    }

    impl Window {
        pub fn new(position: Point2, width: f64, height: f64, wall_id: impl Into<ElementId>) -> Self {
            Self {
                id: ElementId::default(),
                position,
                width,
                height,
                window_type: WindowType::default(),
                wall_id: wall_id.into(),
            }
        }
    }

    /// 房间多边形。`area`（平方毫米）与 `perimeter`（毫米）由顶点推导。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Room {
        pub id: ElementId,
        pub name: String,
        pub room_type: RoomType,
        pub vertices: Vec<Point2>,
        pub area: f64,
        pub perimeter: f64,
    }

    impl Room {
        pub fn new(name: impl Into<String>, room_type: RoomType, vertices: Vec<Point2>) -> Self {
            let mut room = Self {
                id: ElementId::default(),
                name: name.into(),
                room_type,
                vertices,
                area: 0.0,
                perimeter: 0.0,
            };
            room.recompute_metrics();
            room
        }

        pub fn recompute_metrics(&mut self) {
            self.area = geometry::polygon_area(&self.vertices);
            self.perimeter = geometry::polygon_perimeter(&self.vertices);
        }

        #[inline]
        pub fn contains(&self, point: Point2) -> bool {
            geometry::point_in_polygon(point, &self.vertices)
        }

        /// 面积换算为平方米。
        #[inline]
        pub fn area_square_meters(&self) -> f64 {
            self.area / 1_000_000.0
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Measurement {
        pub id: ElementId,
        pub start_point: Point2,
        pub end_point: Point2,
        pub value: f64,
        pub unit: MeasurementUnit,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub label: Option<String>,
    }

    impl Measurement {
        /// 以两点间实测距离作为标注值。
        pub fn new(start_point: Point2, end_point: Point2, unit: MeasurementUnit) -> Self {
            Self {
                id: ElementId::default(),
                start_point,
                end_point,
                value: geometry::distance(start_point, end_point),
                unit,
                label: None,
            }
        }

        #[inline]
        pub fn length(&self) -> f64 {
            geometry::distance(self.start_point, self.end_point)
        }

        /// 显示用长度：`value` 为 0 时退化为端点间实测距离。
        pub fn displayed_length(&self) -> f64 {
            if self.value != 0.0 {
                self.value
            } else {
                self.length()
            }
        }

        pub fn formatted(&self) -> String {
            self.unit.format(self.displayed_length())
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "snake_case")]
    pub enum Element {
        Wall(Wall),
        Door(Door),
        Window(Window),
        Room(Room),
        Measurement(Measurement),
    }

    impl Element {
        #[inline]
        pub fn id(&self) -> &ElementId {
            match self {
                Element::Wall(wall) => &wall.id,
                Element::Door(door) => &door.id,
                Element::Window(window) => &window.id,
                Element::Room(room) => &room.id,
                Element::Measurement(measurement) => &measurement.id,
            }
        }

        pub fn set_id(&mut self, id: ElementId) {
            match self {
                Element::Wall(wall) => wall.id = id,
                Element::Door(door) => door.id = id,
                Element::Window(window) => window.id = id,
                Element::Room(room) => room.id = id,
                Element::Measurement(measurement) => measurement.id = id,
            }
        }

        #[inline]
        pub fn kind(&self) -> ElementKind {
            match self {
                Element::Wall(_) => ElementKind::Wall,
                Element::Door(_) => ElementKind::Door,
                Element::Window(_) => ElementKind::Window,
                Element::Room(_) => ElementKind::Room,
                Element::Measurement(_) => ElementKind::Measurement,
            }
        }

        /// 按元素类型平移。房间只移动顶点，面积与周长保持不变。
        pub fn translate(&mut self, offset: Vector2) {
            match self {
                Element::Wall(wall) => {
                    wall.start_point = wall.start_point.translate(offset);
                    wall.end_point = wall.end_point.translate(offset);
                }
                Element::Door(door) => {
                    door.position = door.position.translate(offset);
                }
                Element::Window(window) => {
                    window.position = window.position.translate(offset);
                }
                Element::Room(room) => {
                    for vertex in &mut room.vertices {
                        *vertex = vertex.translate(offset);
                    }
                }
                Element::Measurement(measurement) => {
                    measurement.start_point = measurement.start_point.translate(offset);
                    measurement.end_point = measurement.end_point.translate(offset);
                }
            }
        }

        /// 规范化可折算的字段（目前仅门的开启方向）。
        pub fn normalize(&mut self) {
            if let Element::Door(door) = self {
                door.direction = normalize_degrees(door.direction);
            }
        }

        /// 检查尺寸与坐标约束。导入时提供的房间面积/周长按原值接受，不在此处复核，
        /// 但必须是有限值，否则导出后无法再读回。
        pub fn validate(&self) -> Result<(), GeometryError> {
            match self {
                Element::Wall(wall) => {
                    ensure_finite_point("startPoint", wall.start_point)?;
                    ensure_finite_point("endPoint", wall.end_point)?;
                    ensure_positive("thickness", wall.thickness)
                }
                Element::Door(door) => {
                    ensure_finite_point("position", door.position)?;
                    ensure_positive("width", door.width)?;
                    ensure_positive("height", door.height)?;
                    ensure_finite("direction", door.direction)
                }
                Element::Window(window) => {
                    ensure_finite_point("position", window.position)?;
                    ensure_positive("width", window.width)?;
                    ensure_positive("height", window.height)
                }
                Element::Room(room) => {
                    if room.vertices.len() < 3 {
                        return Err(GeometryError::TooFewVertices {
                            count: room.vertices.len(),
                        });
                    }
                    for vertex in &room.vertices {
                        ensure_finite_point("vertices", *vertex)?;
                    }
                    ensure_finite("area", room.area)?;
                    ensure_finite("perimeter", room.perimeter)
                }
                Element::Measurement(measurement) => {
                    ensure_finite_point("startPoint", measurement.start_point)?;
                    ensure_finite_point("endPoint", measurement.end_point)?;
                    ensure_finite("value", measurement.value)
                }
            }
        }

        /// 合并局部字段。类型不匹配时返回 `false` 且不做任何修改。
        ///
        /// 房间顶点变化时重新计算面积与周长；补丁中单独给出的面积/周长不会被采用。
        pub fn apply_patch(&mut self, patch: &ElementPatch) -> bool {
            match (self, patch) {
                (Element::Wall(wall), ElementPatch::Wall(patch)) => {
                    if let Some(point) = patch.start_point {
                        wall.start_point = point;
                    }
                    if let Some(point) = patch.end_point {
                        wall.end_point = point;
                    }
                    if let Some(thickness) = patch.thickness {
                        wall.thickness = thickness;
                    }
                    if let Some(wall_type) = patch.wall_type {
                        wall.wall_type = wall_type;
                    }
                    if let Some(material) = &patch.material {
                        wall.material = material.clone();
                    }
                    true
                }
                (Element::Door(door), ElementPatch::Door(patch)) => {
                    if let Some(position) = patch.position {
                        door.position = position;
                    }
                    if let Some(width) = patch.width {
                        door.width = width;
                    }
                    if let Some(height) = patch.height {
                        door.height = height;
                    }
                    if let Some(door_type) = patch.door_type {
                        door.door_type = door_type;
                    }
                    if let Some(direction) = patch.direction {
                        door.direction = normalize_degrees(direction);
                    }
                    if let Some(wall_id) = &patch.wall_id {
                        door.wall_id = wall_id.clone();
                    }
                    true
                }
                (Element::Window(window), ElementPatch::Window(patch)) => {
                    if let Some(position) = patch.position {
                        window.position = position;
                    }
                    if let Some(width) = patch.width {
                        window.width = width;
                    }
                    if let Some(height) = patch.height {
                        window.height = height;
                    }
                    if let Some(window_type) = patch.window_type {
                        window.window_type = window_type;
                    }
                    if let Some(wall_id) = &patch.wall_id {
                        window.wall_id = wall_id.clone();
                    }
                    true
                }
                (Element::Room(room), ElementPatch::Room(patch)) => {
                    if let Some(name) = &patch.name {
                        room.name = name.clone();
                    }
                    if let Some(room_type) = patch.room_type {
                        room.room_type = room_type;
                    }
                    if let Some(vertices) = &patch.vertices {
                        room.vertices = vertices.clone();
                        room.recompute_metrics();
                    }
                    true
                }
                (Element::Measurement(measurement), ElementPatch::Measurement(patch)) => {
                    if let Some(point) = patch.start_point {
                        measurement.start_point = point;
                    }
                    if let Some(point) = patch.end_point {
                        measurement.end_point = point;
                    }
                    if let Some(value) = patch.value {
                        measurement.value = value;
                    }
                    if let Some(unit) = patch.unit {
                        measurement.unit = unit;
                    }
                    if let Some(label) = &patch.label {
                        measurement.label = label.clone();
                    }
                    true
                }
                _ => false,
            }
        }

        pub fn bounds(&self) -> Option<Bounds2D> {
            let mut bounds = Bounds2D::empty();
            match self {
                Element::Wall(wall) => {
                    bounds.include_point(wall.start_point);
                    bounds.include_point(wall.end_point);
                }
                Element::Door(Door {
                    position, width, ..
                })
                | Element::Window(Window {
                    position, width, ..
                }) => {
                    let half = width.abs() / 2.0;
                    bounds.include_point(Point2::new(position.x() - half, position.y() - half));
                    bounds.include_point(Point2::new(position.x() + half, position.y() + half));
                }
                Element::Room(room) => {
                    for vertex in &room.vertices {
                        bounds.include_point(*vertex);
                    }
                }
                Element::Measurement(measurement) => {
                    bounds.include_point(measurement.start_point);
                    bounds.include_point(measurement.end_point);
                }
            }
            if bounds.is_empty() {
                None
            } else {
                Some(bounds)
            }
        }

        /// 点选判定。墙体容差至少为半个墙厚，门窗至少为半个宽度。
        pub fn hit_test(&self, point: Point2, tolerance: f64) -> bool {
            match self {
                Element::Wall(wall) => geometry::point_near_segment(
                    point,
                    wall.start_point,
                    wall.end_point,
                    (wall.thickness / 2.0).max(tolerance),
                ),
                Element::Door(Door {
                    position, width, ..
                })
                | Element::Window(Window {
                    position, width, ..
                }) => geometry::distance(point, *position) <= (width / 2.0).max(tolerance),
                Element::Room(room) => room.contains(point),
                Element::Measurement(measurement) => geometry::point_near_segment(
                    point,
                    measurement.start_point,
                    measurement.end_point,
                    tolerance,
                ),
            }
        }
    }

    /// 将角度（度）折算到 `[0, 360)`。
    pub fn normalize_degrees(degrees: f64) -> f64 {
        if !degrees.is_finite() {
            return degrees;
        }
        let wrapped = degrees.rem_euclid(360.0);
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    }

    fn ensure_positive(field: &'static str, value: f64) -> Result<(), GeometryError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(GeometryError::NonPositiveDimension { field, value })
        }
    }

    fn ensure_finite(field: &'static str, value: f64) -> Result<(), GeometryError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(GeometryError::NonFinite { field })
        }
    }

    fn ensure_finite_point(field: &'static str, point: Point2) -> Result<(), GeometryError> {
        if point.is_finite() {
            Ok(())
        } else {
            Err(GeometryError::NonFinite { field })
        }
    }

    #[derive(Debug, Clone, PartialEq, Error)]
    pub enum GeometryError {
        #[error("{field} must be a positive finite number, got {value}")]
        NonPositiveDimension { field: &'static str, value: f64 },
        #[error("room requires at least 3 vertices, got {count}")]
        TooFewVertices { count: usize },
        #[error("{field} must be finite")]
        NonFinite { field: &'static str },
        #[error("grid size must be positive, got {0}")]
        NonPositiveGridSize(f64),
        #[error("viewport zoom must be positive, got {0}")]
        NonPositiveZoom(f64),
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WallPatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub start_point: Option<Point2>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub end_point: Option<Point2>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub thickness: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub wall_type: Option<WallType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub material: Option<String>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DoorPatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub position: Option<Point2>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub width: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub height: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub door_type: Option<DoorType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub direction: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub wall_id: Option<ElementId>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WindowPatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub position: Option<Point2>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub width: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub height: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub window_type: Option<WindowType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub wall_id: Option<ElementId>,
    }

    /// 房间补丁。`area`/`perimeter` 仅为兼容 UI 的整对象提交而保留，合并时总是忽略。
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RoomPatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub room_type: Option<RoomType>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub vertices: Option<Vec<Point2>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub area: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub perimeter: Option<f64>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MeasurementPatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub start_point: Option<Point2>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub end_point: Option<Point2>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub unit: Option<MeasurementUnit>,
        /// 外层 `None` 表示不修改；`Some(None)`（JSON 中的 `null`）清除标签。
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "deserialize_label_update"
        )]
        pub label: Option<Option<String>>,
    }

    fn deserialize_label_update<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Some)
    }

    /// 元素局部更新，变体必须与目标元素一致。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "snake_case")]
    pub enum ElementPatch {
        Wall(WallPatch),
        Door(DoorPatch),
        Window(WindowPatch),
        Room(RoomPatch),
        Measurement(MeasurementPatch),
    }

    impl ElementPatch {
        #[inline]
        pub fn kind(&self) -> ElementKind {
            match self {
                ElementPatch::Wall(_) => ElementKind::Wall,
                ElementPatch::Door(_) => ElementKind::Door,
                ElementPatch::Window(_) => ElementKind::Window,
                ElementPatch::Room(_) => ElementKind::Room,
                ElementPatch::Measurement(_) => ElementKind::Measurement,
            }
        }

        /// 补丁是否携带会被丢弃的房间面积/周长。
        pub fn carries_room_metrics(&self) -> bool {
            matches!(
                self,
                ElementPatch::Room(RoomPatch { area: Some(_), .. })
                    | ElementPatch::Room(RoomPatch {
                        perimeter: Some(_),
                        ..
                    })
            )
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Viewport {
        pub x: f64,
        pub y: f64,
        pub zoom: f64,
    }

    impl Default for Viewport {
        fn default() -> Self {
            Self {
                x: 0.0,
                y: 0.0,
                zoom: 1.0,
            }
        }
    }

    impl Viewport {
        pub fn validate(&self) -> Result<(), GeometryError> {
            if !(self.x.is_finite() && self.y.is_finite()) {
                return Err(GeometryError::NonFinite { field: "viewport" });
            }
            if self.zoom.is_finite() && self.zoom > 0.0 {
                Ok(())
            } else {
                Err(GeometryError::NonPositiveZoom(self.zoom))
            }
        }
    }

    /// 网格与吸附策略。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct GridSettings {
        pub enabled: bool,
        pub size: f64,
        pub snap: bool,
    }

    impl Default for GridSettings {
        fn default() -> Self {
            Self {
                enabled: true,
                size: 20.0,
                snap: true,
            }
        }
    }

    impl GridSettings {
        /// 交互输入的新坐标在开启吸附时对齐网格，否则原样返回。
        #[inline]
        pub fn apply(&self, point: Point2) -> Point2 {
            if self.snap {
                geometry::snap_to_grid(point, self.size)
            } else {
                point
            }
        }

        pub fn validate(&self) -> Result<(), GeometryError> {
            if self.size.is_finite() && self.size > 0.0 {
                Ok(())
            } else {
                Err(GeometryError::NonPositiveGridSize(self.size))
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct MeasurementSettings {
        pub show: bool,
        pub unit: MeasurementUnit,
    }

    impl Default for MeasurementSettings {
        fn default() -> Self {
            Self {
                show: true,
                unit: MeasurementUnit::Mm,
            }
        }
    }

    impl MeasurementSettings {
        pub fn new(show: bool, unit: MeasurementUnit) -> Self {
            Self { show, unit }
        }
    }

    /// 各类元素数量统计。
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct KindCounts {
        pub walls: usize,
        pub doors: usize,
        pub windows: usize,
        pub rooms: usize,
        pub measurements: usize,
    }

    impl KindCounts {
        pub fn get(&self, kind: ElementKind) -> usize {
            match kind {
                ElementKind::Wall => self.walls,
                ElementKind::Door => self.doors,
                ElementKind::Window => self.windows,
                ElementKind::Room => self.rooms,
                ElementKind::Measurement => self.measurements,
            }
        }

        pub fn total(&self) -> usize {
            self.walls + self.doors + self.windows + self.rooms + self.measurements
        }
    }

    /// 平面图文档：有序元素序列与视图设置。
    ///
    /// 文档本身只是值类型，唯一性与几何约束由引擎层的变更入口维护。
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Document {
        elements: Vec<Element>,
        #[serde(default)]
        pub viewport: Viewport,
        #[serde(default)]
        pub grid: GridSettings,
        #[serde(default, rename = "measurements")]
        pub measurement_settings: MeasurementSettings,
    }

    impl Document {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_elements(elements: Vec<Element>) -> Self {
            Self {
                elements,
                ..Self::new()
            }
        }

        #[inline]
        pub fn elements(&self) -> &[Element] {
            &self.elements
        }

        #[inline]
        pub fn len(&self) -> usize {
            self.elements.len()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.elements.is_empty()
        }

        pub fn element(&self, id: &ElementId) -> Option<&Element> {
            self.elements.iter().find(|element| element.id() == id)
        }

        pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
            self.elements.iter_mut().find(|element| element.id() == id)
        }

        #[inline]
        pub fn contains(&self, id: &ElementId) -> bool {
            self.element(id).is_some()
        }

        pub fn position(&self, id: &ElementId) -> Option<usize> {
            self.elements.iter().position(|element| element.id() == id)
        }

        pub fn push(&mut self, element: Element) {
            self.elements.push(element);
        }

        pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
            let index = self.position(id)?;
            Some(self.elements.remove(index))
        }

        /// 替换整个元素序列，返回旧序列。
        pub fn replace_elements(&mut self, elements: Vec<Element>) -> Vec<Element> {
            std::mem::replace(&mut self.elements, elements)
        }

        /// 整体检查：每个元素的几何约束与视图设置。
        pub fn validate(&self) -> Result<(), GeometryError> {
            for element in &self.elements {
                element.validate()?;
            }
            self.viewport.validate()?;
            self.grid.validate()
        }

        pub fn count_by_kind(&self, kind: ElementKind) -> usize {
            self.elements
                .iter()
                .filter(|element| element.kind() == kind)
                .count()
        }

        pub fn counts(&self) -> KindCounts {
            let mut counts = KindCounts::default();
            for element in &self.elements {
                match element.kind() {
                    ElementKind::Wall => counts.walls += 1,
                    ElementKind::Door => counts.doors += 1,
                    ElementKind::Window => counts.windows += 1,
                    ElementKind::Room => counts.rooms += 1,
                    ElementKind::Measurement => counts.measurements += 1,
                }
            }
            counts
        }

        /// 所有房间面积之和（平方毫米）。
        pub fn total_room_area(&self) -> f64 {
            self.rooms().map(|room| room.area).sum()
        }

        pub fn rooms(&self) -> impl Iterator<Item = &Room> {
            self.elements.iter().filter_map(|element| match element {
                Element::Room(room) => Some(room),
                _ => None,
            })
        }

        pub fn walls(&self) -> impl Iterator<Item = &Wall> {
            self.elements.iter().filter_map(|element| match element {
                Element::Wall(wall) => Some(wall),
                _ => None,
            })
        }

        /// 返回命中点位的最上层元素（最后绘制者优先）。
        pub fn element_at(&self, point: Point2, tolerance: f64) -> Option<&Element> {
            self.elements
                .iter()
                .rev()
                .find(|element| element.hit_test(point, tolerance))
        }

        pub fn element_bounds(&self, id: &ElementId) -> Option<Bounds2D> {
            self.element(id).and_then(Element::bounds)
        }

        pub fn bounds(&self) -> Option<Bounds2D> {
            let mut bounds = Bounds2D::empty();
            let mut has = false;
            for element in &self.elements {
                if let Some(element_bounds) = element.bounds() {
                    bounds.include_bounds(&element_bounds);
                    has = true;
                }
            }
            if has { Some(bounds) } else { None }
        }
    }

}
