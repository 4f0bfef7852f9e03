//! 绘制圆 Action（圆心 + 半径）

use crate::action::{self, Action, ActionResult, ActionType, MouseButton, PreviewGeometry};
use crate::error::ActionError;
use crate::event::{CapturedPoint, CommandEvent, CoordinateEvent, PointerEvent};
use zdraft_core::geometry::{Circle, Geometry, Line};
use zdraft_core::solver::{self, Solutions};

const CMD_RADIUS: &str = "radius";

/// 圆绘制状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 等待设置圆心
    SetCenter,
    /// 等待设置半径
    SetRadius,
}

impl Status {
    /// 由状态序号得到状态，超出范围时取最后一个
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Status::SetCenter,
            _ => Status::SetRadius,
        }
    }
}

/// 绘制圆 Action
pub struct DrawCircleAction {
    status: Status,
    center: Option<CapturedPoint>,
    /// 已确定的圆（点或半径输入后）
    circle: Option<Circle>,
    preview: Vec<PreviewGeometry>,
}

impl DrawCircleAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetCenter,
            center: None,
            circle: None,
            preview: Vec::new(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    fn finish_with(&mut self, candidates: Solutions<Circle>) -> ActionResult {
        match candidates.single() {
            Some(circle) => {
                self.circle = Some(circle);
                action::commit(self)
            }
            None => {
                tracing::debug!("Degenerate circle ignored");
                ActionResult::Continue
            }
        }
    }

    fn capture(&mut self, point: CapturedPoint) -> ActionResult {
        match self.status {
            Status::SetCenter => {
                self.center = Some(point);
                self.status = Status::SetRadius;
                self.preview.clear();
                ActionResult::Continue
            }
            Status::SetRadius => match self.center {
                Some(center) => {
                    self.finish_with(solver::circle_center_point(&center.position, &point.position))
                }
                None => ActionResult::Continue,
            },
        }
    }
}

impl Default for DrawCircleAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawCircleAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawCircle
    }

    fn init(&mut self, status: usize) {
        self.status = match Status::from_index(status) {
            Status::SetRadius if self.center.is_none() => Status::SetCenter,
            s => s,
        };
        self.circle = None;
        self.preview.clear();
    }

    fn reset(&mut self) {
        self.status = Status::SetCenter;
        self.center = None;
        self.circle = None;
        self.preview.clear();
    }

    fn on_mouse_move(&mut self, pointer: &PointerEvent) -> ActionResult {
        self.preview.clear();
        if let (Status::SetRadius, Some(center)) = (self.status, self.center) {
            let mouse = pointer.captured().position;
            if let Some(circle) = solver::circle_center_point(&center.position, &mouse).single() {
                self.preview
                    .push(PreviewGeometry::reference(Geometry::Line(Line::new(center.position, mouse))));
                self.preview.push(PreviewGeometry::new(Geometry::Circle(circle)));
            }
        }
        ActionResult::Continue
    }

    fn on_mouse_click(&mut self, pointer: &PointerEvent, button: MouseButton) -> ActionResult {
        match button {
            MouseButton::Left => self.capture(pointer.captured()),
            MouseButton::Right => {
                if self.status == Status::SetRadius {
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
        let reference = self.center.map(|c| c.position);
        self.capture(event.resolve(reference))
    }

    fn on_command(&mut self, event: &CommandEvent) -> Result<ActionResult, ActionError> {
        let vocabulary = self.get_available_commands();
        if vocabulary.is_empty() {
            return Err(ActionError::UnknownCommand(event.text.clone()));
        }
        // 直接输入半径值
        event.resolve(&vocabulary)?;
        let radius = event.require_value(CMD_RADIUS)?;
        let Some(center) = self.center else {
            return Err(ActionError::Undetermined);
        };
        match solver::circle_center_radius(&center.position, radius) {
            Solutions::None => Err(ActionError::InvalidValue {
                parameter: CMD_RADIUS,
                value: radius,
            }),
            candidates => Ok(self.finish_with(candidates)),
        }
    }

    fn get_available_commands(&self) -> Vec<&'static str> {
        match self.status {
            Status::SetCenter => vec![],
            Status::SetRadius => vec![CMD_RADIUS],
        }
    }

    fn trigger(&mut self) -> Result<Geometry, ActionError> {
        let circle = self.circle.take().ok_or(ActionError::Undetermined)?;
        tracing::info!("Circle: center ({}, {}), radius {}", circle.center.x, circle.center.y, circle.radius);
        self.reset();
        self.init(0);
        Ok(Geometry::Circle(circle))
    }

    fn get_prompt(&self) -> &str {
        match self.status {
            Status::SetCenter => "指定圆心:",
            Status::SetRadius => "指定圆上一点 或 [半径(R)]:",
        }
    }

    fn preview(&self) -> &[PreviewGeometry] {
        &self.preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdraft_core::math::Point2;

    #[test]
    fn test_center_and_point() {
        let mut action = DrawCircleAction::new();
        action.on_mouse_click(&PointerEvent::at(1.0, 1.0), MouseButton::Left);
        assert_eq!(action.status(), Status::SetRadius);
        let result = action.on_mouse_click(&PointerEvent::at(4.0, 5.0), MouseButton::Left);
        assert_eq!(
            result,
            ActionResult::CreateEntities(vec![Geometry::Circle(Circle::new(Point2::new(1.0, 1.0), 5.0))])
        );
        assert_eq!(action.status(), Status::SetCenter);
    }

    #[test]
    fn test_typed_radius() {
        let mut action = DrawCircleAction::new();
        assert!(action.on_command(&CommandEvent::value(2.0)).is_err());
        action.on_coordinate(&CoordinateEvent::absolute(Point2::new(0.0, 0.0)));
        assert_eq!(
            action.on_command(&CommandEvent::value(-2.0)),
            Err(ActionError::InvalidValue {
                parameter: "radius",
                value: -2.0
            })
        );
        assert_eq!(action.status(), Status::SetRadius);
        let result = action.on_command(&CommandEvent::keyword("radius", Some(2.0))).unwrap();
        assert_eq!(
            result,
            ActionResult::CreateEntities(vec![Geometry::Circle(Circle::new(Point2::origin(), 2.0))])
        );
    }

    #[test]
    fn test_zero_radius_point_ignored() {
        let mut action = DrawCircleAction::new();
        action.on_mouse_click(&PointerEvent::at(1.0, 1.0), MouseButton::Left);
        let result = action.on_mouse_click(&PointerEvent::at(1.0, 1.0), MouseButton::Left);
        assert_eq!(result, ActionResult::Continue);
        assert_eq!(action.status(), Status::SetRadius);
        assert_eq!(action.trigger(), Err(ActionError::Undetermined));
    }

    #[test]
    fn test_preview_follows_pointer() {
        let mut action = DrawCircleAction::new();
        action.on_mouse_move(&PointerEvent::at(3.0, 0.0));
        assert!(action.preview().is_empty());
        action.on_mouse_click(&PointerEvent::at(0.0, 0.0), MouseButton::Left);
        action.on_mouse_move(&PointerEvent::at(3.0, 0.0));
        assert!(action
            .preview()
            .iter()
            .any(|p| p.geometry == Geometry::Circle(Circle::new(Point2::origin(), 3.0))));
    }
}
