//! 绘制线段 Action
//!
//! 参考 LibreCAD 的 RS_ActionDrawLine 实现：每个终点提交一条线段，
//! 终点成为下一条线段的起点。

use crate::action::{self, Action, ActionResult, ActionType, MouseButton, PreviewGeometry};
use crate::error::ActionError;
use crate::event::{CapturedPoint, CommandEvent, CoordinateEvent, PointerEvent};
use zdraft_core::geometry::{Geometry, Line};
use zdraft_core::math::{self, Point2};

const CMD_UNDO: &str = "undo";
const CMD_CLOSE: &str = "close";

/// 线段绘制状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 等待设置起点
    SetStartpoint,
    /// 等待设置终点
    SetEndpoint,
}

impl Status {
    /// 由状态序号得到状态，超出范围时取最后一个
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Status::SetStartpoint,
            _ => Status::SetEndpoint,
        }
    }
}

/// 绘制线段 Action
pub struct DrawLineAction {
    status: Status,
    /// 当前折线链上已确定的点
    points: Vec<CapturedPoint>,
    /// 等待提交的线段
    pending: Option<Line>,
    preview: Vec<PreviewGeometry>,
}

impl DrawLineAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetStartpoint,
            points: Vec::new(),
            pending: None,
            preview: Vec::new(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// 当前起点（链上最后一个点）
    pub fn start_point(&self) -> Option<Point2> {
        self.points.last().map(|p| p.position)
    }

    fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// 提交 `start → end`，零长度线段被拒绝
    fn commit_segment(&mut self, start: Point2, end: Point2) -> ActionResult {
        if math::points_coincide(&start, &end) {
            tracing::debug!("Zero-length line rejected");
            return ActionResult::Continue;
        }
        self.pending = Some(Line::new(start, end));
        action::commit(self)
    }

    fn capture(&mut self, point: CapturedPoint) -> ActionResult {
        match self.status {
            Status::SetStartpoint => {
                self.points.clear();
                self.points.push(point);
                self.status = Status::SetEndpoint;
                self.preview.clear();
                ActionResult::Continue
            }
            Status::SetEndpoint => {
                let Some(start) = self.start_point() else {
                    return ActionResult::Continue;
                };
                let result = self.commit_segment(start, point.position);
                if matches!(result, ActionResult::CreateEntities(_)) {
                    // 继续画线：终点变成下一条线的起点
                    self.points.push(point);
                }
                result
            }
        }
    }

    /// 回退到上一个点
    fn undo(&mut self) {
        self.points.pop();
        if self.points.is_empty() {
            self.status = Status::SetStartpoint;
        }
        self.preview.clear();
    }

    /// 闭合：连接当前点与链首，然后开始新的链
    fn close(&mut self) -> ActionResult {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return ActionResult::Continue;
        };
        let (first, last) = (first.position, last.position);
        let result = self.commit_segment(last, first);
        self.points.clear();
        self.status = Status::SetStartpoint;
        result
    }
}

impl Default for DrawLineAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawLineAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawLine
    }

    fn init(&mut self, status: usize) {
        self.status = match Status::from_index(status) {
            Status::SetEndpoint if self.points.is_empty() => Status::SetStartpoint,
            s => s,
        };
        self.pending = None;
        self.preview.clear();
    }

    fn reset(&mut self) {
        self.status = Status::SetStartpoint;
        self.points.clear();
        self.pending = None;
        self.preview.clear();
    }

    fn on_mouse_move(&mut self, pointer: &PointerEvent) -> ActionResult {
        // 鼠标移动只更新预览，不改变状态
        self.preview.clear();
        if let (Status::SetEndpoint, Some(start)) = (self.status, self.start_point()) {
            let end = pointer.captured().position;
            self.preview.push(PreviewGeometry::new(Geometry::Line(Line::new(start, end))));
        }
        ActionResult::Continue
    }

    fn on_mouse_click(&mut self, pointer: &PointerEvent, button: MouseButton) -> ActionResult {
        match button {
            MouseButton::Left => self.capture(pointer.captured()),
            MouseButton::Right => {
                // 右键：在 SetEndpoint 状态下开始新序列，否则取消
                match self.status {
                    Status::SetStartpoint => ActionResult::Cancel,
                    Status::SetEndpoint => {
                        self.reset();
                        ActionResult::Continue
                    }
                }
            }
            MouseButton::Middle => ActionResult::Continue,
        }
    }

    fn on_coordinate(&mut self, event: &CoordinateEvent) -> ActionResult {
        self.capture(event.resolve(self.start_point()))
    }

    fn on_command(&mut self, event: &CommandEvent) -> Result<ActionResult, ActionError> {
        let vocabulary = self.get_available_commands();
        match event.resolve(&vocabulary)? {
            Some(CMD_UNDO) => {
                self.undo();
                Ok(ActionResult::Continue)
            }
            Some(CMD_CLOSE) => Ok(self.close()),
            _ => Err(ActionError::UnknownCommand(event.text.clone())),
        }
    }

    fn get_available_commands(&self) -> Vec<&'static str> {
        match self.status {
            Status::SetStartpoint => vec![],
            Status::SetEndpoint => {
                let mut cmds = vec![CMD_UNDO];
                if self.segment_count() >= 2 {
                    cmds.push(CMD_CLOSE);
                }
                cmds
            }
        }
    }

    fn trigger(&mut self) -> Result<Geometry, ActionError> {
        let line = self.pending.take().ok_or(ActionError::Undetermined)?;
        tracing::info!(
            "Line: ({}, {}) -> ({}, {})",
            line.start.x,
            line.start.y,
            line.end.x,
            line.end.y
        );
        self.init(0);
        Ok(Geometry::Line(line))
    }

    fn get_prompt(&self) -> &str {
        match self.status {
            Status::SetStartpoint => "指定第一点:",
            Status::SetEndpoint => {
                if self.segment_count() >= 2 {
                    "指定下一点 或 [闭合(C)/放弃(U)]:"
                } else {
                    "指定下一点 或 [放弃(U)]:"
                }
            }
        }
    }

    fn preview(&self) -> &[PreviewGeometry] {
        &self.preview
    }
}
