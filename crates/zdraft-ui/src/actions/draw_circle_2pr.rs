//! 两点 + 半径画圆 Action
//!
//! 状态流转：`SetPoint1 → SetPoint2 → SelectCenter`。
//! 两点距离小于直径时有两个候选圆心，进入 `SelectCenter`，
//! 由下一次点击选择离点击位置较近的一个。

use crate::action::{self, Action, ActionResult, ActionType, CursorShape, MouseButton, PreviewGeometry};
use crate::error::ActionError;
use crate::event::{CapturedPoint, CommandEvent, CoordinateEvent, PointerEvent};
use crate::options::CircleOptions;
use crate::settings::Settings;
use zdraft_core::geometry::{Circle, Geometry, Line};
use zdraft_core::math::Point2;
use zdraft_core::solver::{self, Solutions};

const CMD_RADIUS: &str = "radius";

/// 交互状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 等待第一点
    SetPoint1,
    /// 等待第二点
    SetPoint2,
    /// 在两个候选圆心之间选择
    SelectCenter,
}

impl Status {
    /// 由状态序号得到状态，超出范围时取最后一个
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Status::SetPoint1,
            1 => Status::SetPoint2,
            _ => Status::SelectCenter,
        }
    }
}

/// 两点 + 半径画圆 Action
pub struct DrawCircle2PRAction {
    status: Status,
    options: CircleOptions,
    point1: Option<CapturedPoint>,
    point2: Option<CapturedPoint>,
    radius: Option<f64>,
    /// SelectCenter 中被选中的候选
    selected: Option<Circle>,
    preview: Vec<PreviewGeometry>,
}

impl DrawCircle2PRAction {
    pub fn new(options: CircleOptions) -> Self {
        let mut action = Self {
            status: Status::SetPoint1,
            options,
            point1: None,
            point2: None,
            radius: None,
            selected: None,
            preview: Vec::new(),
        };
        action.init(0);
        action
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    pub fn point1(&self) -> Option<Point2> {
        self.point1.map(|p| p.position)
    }

    pub fn point2(&self) -> Option<Point2> {
        self.point2.map(|p| p.position)
    }

    /// 进入指定状态
    ///
    /// 清除预览，保留已采集的约束；缺少前置约束时退回到能满足的状态。
    pub fn init_with(&mut self, status: Status) {
        let status = match status {
            Status::SelectCenter if self.point2.is_none() => Status::SetPoint2,
            s => s,
        };
        let status = match status {
            Status::SetPoint2 if self.point1.is_none() => Status::SetPoint1,
            s => s,
        };
        self.status = status;
        self.selected = None;
        self.preview.clear();
        if self.radius.is_none() {
            self.radius = Some(self.options.radius);
        }
    }

    /// 当前约束下的候选圆
    fn candidates_for(&self, point2: &Point2) -> Solutions<Circle> {
        match (self.point1, self.radius) {
            (Some(p1), Some(r)) => solver::circles_through_two_points(&p1.position, point2, r),
            _ => Solutions::None,
        }
    }

    fn candidates(&self) -> Solutions<Circle> {
        match self.point2 {
            Some(p2) => self.candidates_for(&p2.position),
            None => Solutions::None,
        }
    }

    /// 计算鼠标位置对应的预览，返回是否得到有效预览
    ///
    /// SelectCenter 中取离鼠标较近的候选圆心。
    pub fn prepare_preview(&mut self, mouse: &Point2) -> bool {
        self.preview.clear();
        let (reference, candidates) = match self.status {
            Status::SetPoint1 => return false,
            Status::SetPoint2 => (self.point1, self.candidates_for(mouse)),
            Status::SelectCenter => (self.point2, self.candidates()),
        };

        if self.status == Status::SelectCenter {
            let Some(circle) = candidates.nearest(mouse, |c| c.center) else {
                return false;
            };
            self.preview
                .push(PreviewGeometry::reference(Geometry::Line(Line::new(*mouse, circle.center))));
            self.preview.push(PreviewGeometry::new(Geometry::Circle(circle)));
            return true;
        }

        if candidates.is_empty() {
            return false;
        }
        if let Some(p) = reference {
            self.preview
                .push(PreviewGeometry::reference(Geometry::Line(Line::new(p.position, *mouse))));
        }
        for circle in candidates.iter() {
            self.preview.push(PreviewGeometry::new(Geometry::Circle(circle.clone())));
        }
        true
    }

    /// 采集一个点（鼠标释放或坐标输入）
    fn capture(&mut self, point: CapturedPoint) -> ActionResult {
        match self.status {
            Status::SetPoint1 => {
                self.point1 = Some(point);
                self.init_with(Status::SetPoint2);
                ActionResult::Continue
            }
            Status::SetPoint2 => {
                let candidates = self.candidates_for(&point.position);
                match candidates.len() {
                    0 => {
                        tracing::debug!("No circle through both points with radius {:?}", self.radius);
                        self.preview.clear();
                        ActionResult::Continue
                    }
                    1 => {
                        self.point2 = Some(point);
                        action::commit(self)
                    }
                    _ => {
                        self.point2 = Some(point);
                        self.init_with(Status::SelectCenter);
                        self.prepare_preview(&point.position);
                        ActionResult::Continue
                    }
                }
            }
            Status::SelectCenter => {
                self.selected = self.candidates().nearest(&point.position, |c| c.center);
                action::commit(self)
            }
        }
    }

    fn set_radius(&mut self, radius: f64) -> Result<(), ActionError> {
        if !(radius > 0.0) {
            return Err(ActionError::InvalidValue {
                parameter: CMD_RADIUS,
                value: radius,
            });
        }
        tracing::debug!("Circle radius set to {}", radius);
        self.radius = Some(radius);
        self.options.radius = radius;
        Ok(())
    }
}

impl Default for DrawCircle2PRAction {
    fn default() -> Self {
        Self::new(CircleOptions::default())
    }
}

impl Action for DrawCircle2PRAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawCircle2PR
    }

    fn init(&mut self, status: usize) {
        self.init_with(Status::from_index(status));
    }

    fn reset(&mut self) {
        self.status = Status::SetPoint1;
        self.point1 = None;
        self.point2 = None;
        self.radius = None;
        self.selected = None;
        self.preview.clear();
    }

    fn on_mouse_move(&mut self, pointer: &PointerEvent) -> ActionResult {
        self.prepare_preview(&pointer.captured().position);
        ActionResult::Continue
    }

    fn on_mouse_click(&mut self, pointer: &PointerEvent, button: MouseButton) -> ActionResult {
        match button {
            MouseButton::Left => self.capture(pointer.captured()),
            MouseButton::Right => match self.status {
                Status::SetPoint1 => ActionResult::Cancel,
                Status::SetPoint2 => {
                    self.point1 = None;
                    self.init_with(Status::SetPoint1);
                    ActionResult::Continue
                }
                Status::SelectCenter => {
                    self.point2 = None;
                    self.init_with(Status::SetPoint2);
                    ActionResult::Continue
                }
            },
            MouseButton::Middle => ActionResult::Continue,
        }
    }

    fn on_coordinate(&mut self, event: &CoordinateEvent) -> ActionResult {
        let reference = self.point2.or(self.point1).map(|p| p.position);
        self.capture(event.resolve(reference))
    }

    fn on_command(&mut self, event: &CommandEvent) -> Result<ActionResult, ActionError> {
        let vocabulary = self.get_available_commands();
        if vocabulary.is_empty() {
            return Err(ActionError::UnknownCommand(event.text.clone()));
        }
        match event.resolve(&vocabulary)? {
            Some(CMD_RADIUS) | None => {
                let radius = event.require_value(CMD_RADIUS)?;
                self.set_radius(radius)?;
                Ok(ActionResult::Continue)
            }
            Some(other) => Err(ActionError::UnknownCommand(other.to_string())),
        }
    }

    fn get_available_commands(&self) -> Vec<&'static str> {
        match self.status {
            Status::SetPoint1 | Status::SetPoint2 => vec![CMD_RADIUS],
            Status::SelectCenter => vec![],
        }
    }

    fn trigger(&mut self) -> Result<Geometry, ActionError> {
        let circle = match self.selected.take() {
            Some(circle) => circle,
            None => {
                if self.point1.is_none() || self.point2.is_none() {
                    return Err(ActionError::Undetermined);
                }
                match self.candidates() {
                    Solutions::One(circle) => circle,
                    Solutions::Two(_, _) => return Err(ActionError::Undetermined),
                    Solutions::None => return Err(ActionError::NoSolution),
                }
            }
        };
        tracing::info!("Circle 2P+R: center ({}, {}), radius {}", circle.center.x, circle.center.y, circle.radius);
        self.reset();
        self.init(0);
        Ok(Geometry::Circle(circle))
    }

    fn get_prompt(&self) -> &str {
        match self.status {
            Status::SetPoint1 => "指定第一点 或 [半径(R)]:",
            Status::SetPoint2 => "指定第二点 或 [半径(R)]:",
            Status::SelectCenter => "选择圆心:",
        }
    }

    fn cursor(&self) -> CursorShape {
        match self.status {
            Status::SelectCenter => CursorShape::Select,
            _ => CursorShape::CrossHair,
        }
    }

    fn preview(&self) -> &[PreviewGeometry] {
        &self.preview
    }

    fn save_settings(&self, settings: &mut Settings) {
        self.options.write_settings(settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn action_with_radius(radius: f64) -> DrawCircle2PRAction {
        DrawCircle2PRAction::new(CircleOptions { radius })
    }

    fn click(action: &mut DrawCircle2PRAction, x: f64, y: f64) -> ActionResult {
        action.on_mouse_click(&PointerEvent::at(x, y), MouseButton::Left)
    }

    #[test]
    fn test_select_center_commits_nearer_candidate() {
        let mut action = action_with_radius(2.5);
        assert_eq!(click(&mut action, 0.0, 0.0), ActionResult::Continue);
        assert_eq!(action.status(), Status::SetPoint2);
        assert_eq!(click(&mut action, 4.0, 0.0), ActionResult::Continue);
        assert_eq!(action.status(), Status::SelectCenter);
        assert!(action.get_available_commands().is_empty());

        match click(&mut action, 2.0, 5.0) {
            ActionResult::CreateEntities(entities) => {
                assert_eq!(entities.len(), 1);
                let Geometry::Circle(c) = &entities[0] else {
                    panic!("Expected circle, got {:?}", entities[0]);
                };
                assert_relative_eq!(c.center.x, 2.0);
                assert_relative_eq!(c.center.y, 1.5);
                assert_relative_eq!(c.radius, 2.5);
            }
            other => panic!("Expected CreateEntities, got {other:?}"),
        }
        // 提交后回到初始状态，可继续使用
        assert_eq!(action.status(), Status::SetPoint1);
        assert_eq!(action.point1(), None);
        assert_eq!(action.point2(), None);
    }

    #[test]
    fn test_lower_candidate_selected_below_chord() {
        let mut action = action_with_radius(2.5);
        click(&mut action, 0.0, 0.0);
        click(&mut action, 4.0, 0.0);
        let ActionResult::CreateEntities(entities) = click(&mut action, 1.0, -3.0) else {
            panic!("Expected commit");
        };
        let Geometry::Circle(c) = &entities[0] else {
            panic!("Expected circle");
        };
        assert_relative_eq!(c.center.y, -1.5);
    }

    #[test]
    fn test_too_far_apart_has_no_solution() {
        let mut action = action_with_radius(2.0);
        click(&mut action, 0.0, 0.0);
        assert_eq!(click(&mut action, 5.0, 0.0), ActionResult::Continue);
        // 第二点未被采集，状态不变
        assert_eq!(action.status(), Status::SetPoint2);
        assert_eq!(action.point2(), None);
        assert!(action.trigger().is_err());
        assert_eq!(action.point1(), Some(Point2::new(0.0, 0.0)));
    }

    #[test]
    fn test_diameter_distance_commits_immediately() {
        let mut action = action_with_radius(2.0);
        click(&mut action, 0.0, 0.0);
        match click(&mut action, 4.0, 0.0) {
            ActionResult::CreateEntities(entities) => {
                assert_eq!(entities, vec![Geometry::Circle(Circle::new(Point2::new(2.0, 0.0), 2.0))]);
            }
            other => panic!("Expected CreateEntities, got {other:?}"),
        }
    }

    #[test]
    fn test_coincident_points_rejected() {
        let mut action = action_with_radius(1.0);
        click(&mut action, 1.0, 1.0);
        assert_eq!(click(&mut action, 1.0, 1.0), ActionResult::Continue);
        assert_eq!(action.status(), Status::SetPoint2);
        assert_eq!(action.point2(), None);
    }

    #[test]
    fn test_radius_command() {
        let mut action = action_with_radius(1.0);
        assert_eq!(
            action.on_command(&CommandEvent::keyword("radius", Some(2.0))),
            Ok(ActionResult::Continue)
        );
        assert_eq!(action.radius(), Some(2.0));
        assert_eq!(action.on_command(&CommandEvent::value(3.0)), Ok(ActionResult::Continue));
        assert_eq!(action.radius(), Some(3.0));
        assert_eq!(action.on_command(&CommandEvent::keyword("R", Some(4.0))), Ok(ActionResult::Continue));
        assert_eq!(action.radius(), Some(4.0));
    }

    #[test]
    fn test_invalid_commands_leave_state() {
        let mut action = action_with_radius(1.5);
        click(&mut action, 0.0, 0.0);
        assert_eq!(
            action.on_command(&CommandEvent::value(-1.0)),
            Err(ActionError::InvalidValue {
                parameter: "radius",
                value: -1.0
            })
        );
        assert_eq!(
            action.on_command(&CommandEvent::keyword("radius", None)),
            Err(ActionError::MissingValue("radius"))
        );
        assert!(matches!(
            action.on_command(&CommandEvent::keyword("zoom", None)),
            Err(ActionError::UnknownCommand(_))
        ));
        assert_eq!(action.radius(), Some(1.5));
        assert_eq!(action.status(), Status::SetPoint2);
        assert_eq!(action.point1(), Some(Point2::new(0.0, 0.0)));
    }

    #[test]
    fn test_commands_rejected_in_select_center() {
        let mut action = action_with_radius(2.5);
        click(&mut action, 0.0, 0.0);
        click(&mut action, 4.0, 0.0);
        assert!(action.on_command(&CommandEvent::value(1.0)).is_err());
        assert_eq!(action.radius(), Some(2.5));
        assert_eq!(action.status(), Status::SelectCenter);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut action = action_with_radius(2.5);
        click(&mut action, 0.0, 0.0);
        click(&mut action, 4.0, 0.0);
        action.reset();
        assert_eq!(action.status(), Status::SetPoint1);
        assert_eq!(action.point1(), None);
        assert_eq!(action.point2(), None);
        assert_eq!(action.radius(), None);
        assert!(action.preview().is_empty());
    }

    #[test]
    fn test_init_keeps_captured_values() {
        let mut action = action_with_radius(2.5);
        click(&mut action, 0.0, 0.0);
        action.on_command(&CommandEvent::value(3.0)).unwrap();
        action.init_with(Status::SetPoint2);
        assert_eq!(action.point1(), Some(Point2::new(0.0, 0.0)));
        assert_eq!(action.radius(), Some(3.0));
        assert_eq!(action.status(), Status::SetPoint2);

        // 缺少第一点时不能直接进入 SetPoint2
        action.reset();
        action.init_with(Status::SetPoint2);
        assert_eq!(action.status(), Status::SetPoint1);
    }

    #[test]
    fn test_mouse_move_previews_without_capturing() {
        let mut action = action_with_radius(2.5);
        click(&mut action, 0.0, 0.0);
        assert!(action.prepare_preview(&Point2::new(4.0, 0.0)));
        // 参考线 + 两个候选圆
        assert_eq!(action.preview().len(), 3);
        assert!(!action.prepare_preview(&Point2::new(10.0, 0.0)));
        assert!(action.preview().is_empty());

        action.on_mouse_move(&PointerEvent::at(4.0, 0.0));
        assert_eq!(action.point2(), None);
        assert_eq!(action.status(), Status::SetPoint2);
    }

    #[test]
    fn test_select_center_preview_follows_pointer() {
        let mut action = action_with_radius(2.5);
        click(&mut action, 0.0, 0.0);
        click(&mut action, 4.0, 0.0);
        action.on_mouse_move(&PointerEvent::at(2.0, -4.0));
        let circles: Vec<&Circle> = action
            .preview()
            .iter()
            .filter_map(|p| match &p.geometry {
                Geometry::Circle(c) => Some(c),
                _ => None,
            })
            .collect();
        assert_eq!(circles.len(), 1);
        assert_relative_eq!(circles[0].center.y, -1.5);
        assert_eq!(action.cursor(), CursorShape::Select);
    }

    #[test]
    fn test_relative_coordinate_from_point1() {
        let mut action = action_with_radius(2.5);
        action.on_coordinate(&CoordinateEvent::absolute(Point2::new(1.0, 1.0)));
        action.on_coordinate(&CoordinateEvent::relative(Point2::new(4.0, 0.0)));
        assert_eq!(action.point2(), Some(Point2::new(5.0, 1.0)));
        assert_eq!(action.status(), Status::SelectCenter);
    }

    #[test]
    fn test_right_click_steps_back() {
        let mut action = action_with_radius(2.5);
        click(&mut action, 0.0, 0.0);
        click(&mut action, 4.0, 0.0);
        let right = PointerEvent::at(0.0, 0.0);
        assert_eq!(action.on_mouse_click(&right, MouseButton::Right), ActionResult::Continue);
        assert_eq!(action.status(), Status::SetPoint2);
        assert_eq!(action.on_mouse_click(&right, MouseButton::Right), ActionResult::Continue);
        assert_eq!(action.status(), Status::SetPoint1);
        assert_eq!(action.on_mouse_click(&right, MouseButton::Right), ActionResult::Cancel);
    }

    #[test]
    fn test_typed_radius_is_saved() {
        let mut action = action_with_radius(1.0);
        action.on_command(&CommandEvent::value(4.5)).unwrap();
        let mut settings = Settings::new();
        action.save_settings(&mut settings);
        assert_eq!(CircleOptions::from_settings(&settings).radius, 4.5);
    }
}
