//! 绘制多段线 Action
//!
//! 参考 LibreCAD 的 RS_ActionDrawPolyline：每一段可以是直线、
//! 与上一段相切的圆弧、给定半径的相切圆弧，或与上一段成固定角度的直线。
//! 圆弧段以起点顶点的凸度表示。

use crate::action::{self, Action, ActionResult, ActionType, MouseButton, PreviewGeometry};
use crate::error::ActionError;
use crate::event::{CapturedPoint, CommandEvent, CoordinateEvent, PointerEvent};
use crate::options::{self, PolylineOptions};
use crate::settings::Settings;
use zdraft_core::geometry::{self, Geometry, Line, Polyline, PolylineVertex};
use zdraft_core::math::{self, Point2, Vector2};
use zdraft_core::solver::{self, Segment, Solutions};

const CMD_LINE: &str = "line";
const CMD_TANGENTIAL: &str = "tangential";
const CMD_TANRAD: &str = "tanrad";
const CMD_ANGLED: &str = "angled";
const CMD_RADIUS: &str = "radius";
const CMD_ANGLE: &str = "angle";
const CMD_REVERSED: &str = "reversed";
const CMD_UNDO: &str = "undo";
const CMD_CLOSE: &str = "close";
const CMD_FINISH: &str = "finish";

/// 段模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentMode {
    /// 直线
    Line,
    /// 与上一段相切的圆弧
    Tangential,
    /// 给定半径的相切圆弧
    TanRad,
    /// 与上一段成固定角度的直线
    Ang,
}

impl SegmentMode {
    /// 设置中保存的序号；超出范围时为直线
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => SegmentMode::Tangential,
            2 => SegmentMode::TanRad,
            3 => SegmentMode::Ang,
            _ => SegmentMode::Line,
        }
    }

    pub fn index(self) -> i64 {
        match self {
            SegmentMode::Line => 0,
            SegmentMode::Tangential => 1,
            SegmentMode::TanRad => 2,
            SegmentMode::Ang => 3,
        }
    }
}

/// 多段线绘制状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 等待起点
    SetStartpoint,
    /// 等待下一点
    SetNextPoint,
}

impl Status {
    /// 由状态序号得到状态，超出范围时取最后一个
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Status::SetStartpoint,
            _ => Status::SetNextPoint,
        }
    }
}

/// 绘制多段线 Action
pub struct DrawPolylineAction {
    status: Status,
    options: PolylineOptions,
    mode: Option<SegmentMode>,
    vertices: Vec<PolylineVertex>,
    /// TanRad 模式的半径
    radius: Option<f64>,
    /// Ang 模式的角度（度）
    angle: Option<f64>,
    reversed: bool,
    pending: Option<Polyline>,
    preview: Vec<PreviewGeometry>,
}

impl DrawPolylineAction {
    pub fn new(options: PolylineOptions) -> Self {
        let mut action = Self {
            status: Status::SetStartpoint,
            options,
            mode: None,
            vertices: Vec::new(),
            radius: None,
            angle: None,
            reversed: false,
            pending: None,
            preview: Vec::new(),
        };
        action.init(0);
        action
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn mode(&self) -> Option<SegmentMode> {
        self.mode
    }

    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    pub fn angle(&self) -> Option<f64> {
        self.angle
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn vertices(&self) -> &[PolylineVertex] {
        &self.vertices
    }

    fn current_mode(&self) -> SegmentMode {
        self.mode.unwrap_or(SegmentMode::Line)
    }

    /// 补齐当前模式需要而尚未设置的参数
    fn seed_parameters(&mut self) {
        match self.current_mode() {
            SegmentMode::TanRad => {
                self.radius.get_or_insert(self.options.radius);
            }
            SegmentMode::Ang => {
                if self.angle.is_none() {
                    self.angle = Some(self.options.angle);
                    self.reversed = self.options.reversed;
                }
            }
            SegmentMode::Line | SegmentMode::Tangential => {}
        }
    }

    /// 切换段模式，清除新模式下无意义的参数
    pub fn set_mode(&mut self, mode: SegmentMode) {
        if mode != SegmentMode::TanRad {
            self.radius = None;
        }
        if mode != SegmentMode::Ang {
            self.angle = None;
            self.reversed = false;
        }
        self.mode = Some(mode);
        self.options.mode = mode.index();
        self.seed_parameters();
        self.preview.clear();
        tracing::debug!("Polyline segment mode {:?}", mode);
    }

    /// 当前终点处的切线方向；少于两个顶点时为 None
    fn end_tangent(&self) -> Option<Vector2> {
        let n = self.vertices.len();
        if n < 2 {
            return None;
        }
        let (v1, v2) = (&self.vertices[n - 2], &self.vertices[n - 1]);
        geometry::segment_end_tangent(&v1.point, &v2.point, v1.bulge)
    }

    /// 从最后一个顶点出发、朝向 `target` 的下一段
    fn next_segment(&self, target: &Point2) -> Solutions<Segment> {
        let Some(last) = self.vertices.last().map(|v| v.point) else {
            return Solutions::None;
        };
        let straight = || {
            if math::points_coincide(&last, target) {
                Solutions::None
            } else {
                Solutions::One(Segment {
                    end: *target,
                    bulge: 0.0,
                })
            }
        };
        let tangent = self.end_tangent();
        match self.current_mode() {
            SegmentMode::Line => straight(),
            SegmentMode::Tangential => match tangent {
                Some(t) => solver::tangential_segment(&last, &t, target),
                None => straight(),
            },
            SegmentMode::TanRad => match (tangent, self.radius) {
                (Some(t), Some(r)) => solver::tangent_radius_segment(&last, &t, r, target),
                (None, _) => straight(),
                (Some(_), None) => Solutions::None,
            },
            SegmentMode::Ang => match self.angle {
                Some(angle) => {
                    let reference = tangent.unwrap_or_else(|| Vector2::new(1.0, 0.0));
                    solver::angled_segment(&last, &reference, angle, self.reversed, target)
                }
                None => Solutions::None,
            },
        }
    }

    /// 计算鼠标位置对应的预览，返回是否得到有效的下一段
    pub fn prepare_preview(&mut self, mouse: &Point2) -> bool {
        self.preview.clear();
        if self.vertices.is_empty() {
            return false;
        }
        let mut vertices = self.vertices.clone();
        let segment = self.next_segment(mouse).single();
        if let Some(segment) = &segment {
            append_segment(&mut vertices, segment);
        } else if let Some(last) = self.vertices.last() {
            self.preview
                .push(PreviewGeometry::reference(Geometry::Line(Line::new(last.point, *mouse))));
        }
        let polyline = Polyline::new(vertices, false);
        self.preview
            .extend(polyline.explode().into_iter().map(PreviewGeometry::new));
        segment.is_some()
    }

    fn capture(&mut self, point: CapturedPoint) -> ActionResult {
        match self.status {
            Status::SetStartpoint => {
                self.vertices.clear();
                self.vertices.push(PolylineVertex::new(point.position));
                self.status = Status::SetNextPoint;
            }
            Status::SetNextPoint => match self.next_segment(&point.position).single() {
                Some(segment) => append_segment(&mut self.vertices, &segment),
                None => {
                    tracing::debug!("No {:?} segment to ({}, {})", self.current_mode(), point.position.x, point.position.y);
                    return ActionResult::Continue;
                }
            },
        }
        self.preview.clear();
        ActionResult::Continue
    }

    /// 删除最后一个顶点
    fn undo(&mut self) {
        self.vertices.pop();
        match self.vertices.last_mut() {
            // 被删除的段的凸度存在前一个顶点上
            Some(last) => last.bulge = 0.0,
            None => self.status = Status::SetStartpoint,
        }
        self.preview.clear();
    }

    fn complete(&mut self, closed: bool) -> ActionResult {
        let mut vertices = self.vertices.clone();
        if closed {
            let returns_to_start = match (vertices.first(), vertices.last()) {
                (Some(first), Some(last)) if vertices.len() > 1 => math::points_coincide(&first.point, &last.point),
                _ => false,
            };
            if returns_to_start {
                // 最后一段已经回到起点，它就是闭合段
                vertices.pop();
            } else if let Some(last) = vertices.last_mut() {
                last.bulge = 0.0;
            }
        }
        self.pending = Some(Polyline::new(vertices, closed));
        action::commit(self)
    }

    fn set_radius(&mut self, radius: f64) -> Result<(), ActionError> {
        if !(radius > 0.0) {
            return Err(ActionError::InvalidValue {
                parameter: CMD_RADIUS,
                value: radius,
            });
        }
        self.radius = Some(radius);
        self.options.radius = radius;
        Ok(())
    }

    fn set_angle(&mut self, angle: f64) {
        let clamped = options::clamp_angle(angle);
        if clamped != angle {
            tracing::debug!("Polyline angle {} clamped to {}", angle, clamped);
        }
        self.angle = Some(clamped);
        self.options.angle = clamped;
    }

    fn set_reversed(&mut self, reversed: bool) {
        self.reversed = reversed;
        self.options.reversed = reversed;
    }
}

/// 在顶点列表末尾接上一段
fn append_segment(vertices: &mut Vec<PolylineVertex>, segment: &Segment) {
    if let Some(last) = vertices.last_mut() {
        last.bulge = segment.bulge;
    }
    vertices.push(PolylineVertex::new(segment.end));
}

impl Default for DrawPolylineAction {
    fn default() -> Self {
        Self::new(PolylineOptions::default())
    }
}

impl Action for DrawPolylineAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawPolyline
    }

    fn init(&mut self, status: usize) {
        self.status = match Status::from_index(status) {
            Status::SetNextPoint if self.vertices.is_empty() => Status::SetStartpoint,
            s => s,
        };
        if self.mode.is_none() {
            self.mode = Some(SegmentMode::from_index(self.options.mode));
        }
        self.seed_parameters();
        self.pending = None;
        self.preview.clear();
    }

    fn reset(&mut self) {
        self.status = Status::SetStartpoint;
        self.mode = None;
        self.vertices.clear();
        self.radius = None;
        self.angle = None;
        self.reversed = false;
        self.pending = None;
        self.preview.clear();
    }

    fn on_mouse_move(&mut self, pointer: &PointerEvent) -> ActionResult {
        self.prepare_preview(&pointer.captured().position);
        ActionResult::Continue
    }

    fn on_mouse_click(&mut self, pointer: &PointerEvent, button: MouseButton) -> ActionResult {
        match button {
            MouseButton::Left => self.capture(pointer.captured()),
            MouseButton::Right => {
                // 右键结束多段线（不闭合）
                if self.status == Status::SetNextPoint && self.vertices.len() >= 2 {
                    self.complete(false)
                } else {
                    ActionResult::Cancel
                }
            }
            MouseButton::Middle => ActionResult::Continue,
        }
    }

    fn on_coordinate(&mut self, event: &CoordinateEvent) -> ActionResult {
        // TanRad/Ang 模式的顶点是投影点，以实际顶点为基准
        let reference = self.vertices.last().map(|v| v.point);
        self.capture(event.resolve(reference))
    }

    fn on_command(&mut self, event: &CommandEvent) -> Result<ActionResult, ActionError> {
        let vocabulary = self.get_available_commands();
        let command = match event.resolve(&vocabulary)? {
            Some(command) => command,
            // 纯数值设置当前模式的参数
            None => match self.current_mode() {
                SegmentMode::TanRad => CMD_RADIUS,
                SegmentMode::Ang => CMD_ANGLE,
                SegmentMode::Line | SegmentMode::Tangential => {
                    return Err(ActionError::UnknownCommand(event.text.clone()));
                }
            },
        };

        match command {
            CMD_LINE => self.set_mode(SegmentMode::Line),
            CMD_TANGENTIAL => self.set_mode(SegmentMode::Tangential),
            CMD_TANRAD => self.set_mode(SegmentMode::TanRad),
            CMD_ANGLED => self.set_mode(SegmentMode::Ang),
            CMD_RADIUS => self.set_radius(event.require_value(CMD_RADIUS)?)?,
            CMD_ANGLE => self.set_angle(event.require_value(CMD_ANGLE)?),
            CMD_REVERSED => {
                let reversed = match event.value {
                    Some(v) => v != 0.0,
                    None => !self.reversed,
                };
                self.set_reversed(reversed);
            }
            CMD_UNDO => self.undo(),
            CMD_CLOSE => return Ok(self.complete(true)),
            CMD_FINISH => return Ok(self.complete(false)),
            other => return Err(ActionError::UnknownCommand(other.to_string())),
        }
        Ok(ActionResult::Continue)
    }

    fn get_available_commands(&self) -> Vec<&'static str> {
        let mut cmds = vec![CMD_LINE, CMD_TANGENTIAL, CMD_TANRAD, CMD_ANGLED];
        match self.current_mode() {
            SegmentMode::TanRad => cmds.push(CMD_RADIUS),
            SegmentMode::Ang => cmds.extend([CMD_ANGLE, CMD_REVERSED]),
            SegmentMode::Line | SegmentMode::Tangential => {}
        }
        if self.status == Status::SetNextPoint {
            cmds.push(CMD_UNDO);
            if self.vertices.len() >= 2 {
                cmds.push(CMD_FINISH);
            }
            if self.vertices.len() >= 3 {
                cmds.push(CMD_CLOSE);
            }
        }
        cmds
    }

    fn trigger(&mut self) -> Result<Geometry, ActionError> {
        let polyline = self.pending.take().ok_or(ActionError::Undetermined)?;
        let required = if polyline.closed { 3 } else { 2 };
        if polyline.vertex_count() < required {
            return Err(ActionError::Undetermined);
        }
        tracing::info!(
            "Polyline: {} vertices, closed {}, length {}",
            polyline.vertex_count(),
            polyline.closed,
            polyline.length()
        );
        self.reset();
        self.init(0);
        Ok(Geometry::Polyline(polyline))
    }

    fn get_prompt(&self) -> &str {
        match self.status {
            Status::SetStartpoint => "指定起点:",
            Status::SetNextPoint => match self.current_mode() {
                SegmentMode::Line => "指定下一点 或 [闭合(C)/放弃(U)/完成(F)]:",
                SegmentMode::Tangential => "指定相切圆弧的终点 或 [闭合(C)/放弃(U)/完成(F)]:",
                SegmentMode::TanRad => "指定相切圆弧的终点 或 [半径(R)/放弃(U)/完成(F)]:",
                SegmentMode::Ang => "指定下一点 或 [角度(A)/反向/放弃(U)/完成(F)]:",
            },
        }
    }

    fn preview(&self) -> &[PreviewGeometry] {
        &self.preview
    }

    fn save_settings(&self, settings: &mut Settings) {
        self.options.write_settings(settings);
    }
}
