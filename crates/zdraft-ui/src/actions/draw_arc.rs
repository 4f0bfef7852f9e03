//! 绘制圆弧 Action（三点法）

use crate::action::{self, Action, ActionResult, ActionType, MouseButton, PreviewGeometry};
use crate::error::ActionError;
use crate::event::{CapturedPoint, CommandEvent, CoordinateEvent, PointerEvent};
use zdraft_core::geometry::{Arc, Geometry, Line};
use zdraft_core::math::{self, Point2};

/// 圆弧绘制状态（三点法）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 等待第一点（起点）
    SetPoint1,
    /// 等待第二点（弧上的点）
    SetPoint2,
    /// 等待第三点（终点）
    SetPoint3,
}

impl Status {
    /// 由状态序号得到状态，超出范围时取最后一个
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Status::SetPoint1,
            1 => Status::SetPoint2,
            _ => Status::SetPoint3,
        }
    }
}

/// 绘制圆弧 Action
pub struct DrawArcAction {
    status: Status,
    point1: Option<CapturedPoint>,
    point2: Option<CapturedPoint>,
    point3: Option<CapturedPoint>,
    preview: Vec<PreviewGeometry>,
}

impl DrawArcAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetPoint1,
            point1: None,
            point2: None,
            point3: None,
            preview: Vec::new(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    fn arc_through(&self, p3: &Point2) -> Option<Arc> {
        let (p1, p2) = (self.point1?, self.point2?);
        Arc::from_three_points(p1.position, p2.position, *p3)
    }

    fn last_point(&self) -> Option<Point2> {
        self.point2.or(self.point1).map(|p| p.position)
    }

    fn capture(&mut self, point: CapturedPoint) -> ActionResult {
        match self.status {
            Status::SetPoint1 => {
                self.point1 = Some(point);
                self.status = Status::SetPoint2;
            }
            Status::SetPoint2 => {
                if self.point1.is_some_and(|p1| math::points_coincide(&p1.position, &point.position)) {
                    tracing::debug!("Arc point 2 coincides with point 1");
                    return ActionResult::Continue;
                }
                self.point2 = Some(point);
                self.status = Status::SetPoint3;
            }
            Status::SetPoint3 => {
                if self.arc_through(&point.position).is_none() {
                    tracing::debug!("No arc through collinear points");
                    return ActionResult::Continue;
                }
                self.point3 = Some(point);
                return action::commit(self);
            }
        }
        self.preview.clear();
        ActionResult::Continue
    }
}

impl Default for DrawArcAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawArcAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawArc
    }

    fn init(&mut self, status: usize) {
        let status = match Status::from_index(status) {
            Status::SetPoint3 if self.point2.is_none() => Status::SetPoint2,
            s => s,
        };
        self.status = match status {
            Status::SetPoint2 if self.point1.is_none() => Status::SetPoint1,
            s => s,
        };
        self.point3 = None;
        self.preview.clear();
    }

    fn reset(&mut self) {
        self.status = Status::SetPoint1;
        self.point1 = None;
        self.point2 = None;
        self.point3 = None;
        self.preview.clear();
    }

    fn on_mouse_move(&mut self, pointer: &PointerEvent) -> ActionResult {
        self.preview.clear();
        let mouse = pointer.captured().position;
        match self.status {
            Status::SetPoint1 => {}
            Status::SetPoint2 => {
                if let Some(p1) = self.point1 {
                    self.preview
                        .push(PreviewGeometry::reference(Geometry::Line(Line::new(p1.position, mouse))));
                }
            }
            Status::SetPoint3 => {
                if let Some(arc) = self.arc_through(&mouse) {
                    self.preview.push(PreviewGeometry::new(Geometry::Arc(arc)));
                }
            }
        }
        ActionResult::Continue
    }

    fn on_mouse_click(&mut self, pointer: &PointerEvent, button: MouseButton) -> ActionResult {
        match button {
            MouseButton::Left => self.capture(pointer.captured()),
            MouseButton::Right => {
                if self.status != Status::SetPoint1 {
                    self.reset();
                    ActionResult::Continue
                } else {
                    ActionResult::Cancel
                }
            }
            MouseButton::Middle => ActionResult::Continue,
        }
    }

    fn on_coordinate(&mut self, event: &CoordinateEvent) -> ActionResult {
        self.capture(event.resolve(self.last_point()))
    }

    fn on_command(&mut self, event: &CommandEvent) -> Result<ActionResult, ActionError> {
        Err(ActionError::UnknownCommand(event.text.clone()))
    }

    fn trigger(&mut self) -> Result<Geometry, ActionError> {
        let p3 = self.point3.ok_or(ActionError::Undetermined)?;
        let arc = self.arc_through(&p3.position).ok_or(ActionError::NoSolution)?;
        tracing::info!(
            "Arc: center ({}, {}), radius {}, sweep {}",
            arc.center.x,
            arc.center.y,
            arc.radius,
            arc.sweep_angle()
        );
        self.reset();
        self.init(0);
        Ok(Geometry::Arc(arc))
    }

    fn get_prompt(&self) -> &str {
        match self.status {
            Status::SetPoint1 => "指定圆弧的起点:",
            Status::SetPoint2 => "指定圆弧上的第二点:",
            Status::SetPoint3 => "指定圆弧的终点:",
        }
    }

    fn preview(&self) -> &[PreviewGeometry] {
        &self.preview
    }
}
