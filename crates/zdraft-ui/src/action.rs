//! Action 系统 - 参考 LibreCAD 的状态机设计
//!
//! 每个绘图工具是一个独立的 Action 实现，内部用带标签的 `Status`
//! 枚举描述交互状态，逐个事件累积约束，直到几何完全确定后提交。
//!
//! Action 与外部协作者之间只通过返回值和显式的 sink trait 通信：
//! - [`EntitySink`]: 接收最终实体
//! - [`PreviewSink`]: 接收临时预览
//! - [`HintSink`]: 接收提示文本和光标（仅作为界面反馈）

use crate::error::ActionError;
use crate::event::{CommandEvent, CoordinateEvent, PointerEvent};
use crate::settings::Settings;
use zdraft_core::document::Document;
use zdraft_core::entity::EntityId;
use zdraft_core::geometry::Geometry;

/// Action 执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// 继续当前 action
    Continue,
    /// 提交实体（action 随后回到可继续使用的状态）
    CreateEntities(Vec<Geometry>),
    /// 退出当前 action
    Cancel,
}

/// Action 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    DrawLine,
    DrawCircle,
    DrawCircle2PR,
    DrawArc,
    DrawPolyline,
}

impl ActionType {
    /// 全部工具
    pub const ALL: [ActionType; 5] = [
        ActionType::DrawLine,
        ActionType::DrawCircle,
        ActionType::DrawCircle2PR,
        ActionType::DrawArc,
        ActionType::DrawPolyline,
    ];

    /// 获取 action 的名称
    pub fn name(&self) -> &'static str {
        match self {
            ActionType::DrawLine => "Line",
            ActionType::DrawCircle => "Circle",
            ActionType::DrawCircle2PR => "Circle 2P+R",
            ActionType::DrawArc => "Arc",
            ActionType::DrawPolyline => "Polyline",
        }
    }
}

/// 预览几何体
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewGeometry {
    pub geometry: Geometry,
    pub is_reference: bool, // 是否是参考线（虚线显示）
}

impl PreviewGeometry {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            is_reference: false,
        }
    }

    pub fn reference(geometry: Geometry) -> Self {
        Self {
            geometry,
            is_reference: true,
        }
    }
}

/// 鼠标按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// 光标形状
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    CrossHair,
    Select,
}

/// 实体接收者（文档）
pub trait EntitySink {
    /// 插入一个完全确定的实体
    fn add_entity(&mut self, geometry: Geometry) -> EntityId;
}

impl EntitySink for Document {
    fn add_entity(&mut self, geometry: Geometry) -> EntityId {
        Document::add_entity(self, geometry)
    }
}

/// 预览接收者，每次调用覆盖上一次的预览
pub trait PreviewSink {
    fn draw_preview(&mut self, previews: &[PreviewGeometry]);
}

/// 界面提示接收者，不影响正确性
pub trait HintSink {
    fn update_mouse_button_hints(&mut self, _prompt: &str, _commands: &[&'static str]) {}

    fn update_mouse_cursor(&mut self, _cursor: CursorShape) {}
}

/// Action trait - 所有绘图工具的核心接口
///
/// 参考 LibreCAD 的 RS_ActionInterface
pub trait Action: Send {
    /// 获取 action 类型
    fn action_type(&self) -> ActionType;

    /// 获取 action 名称
    fn name(&self) -> &str {
        self.action_type().name()
    }

    /// （重新）进入序号为 `status` 的状态（0 为初始状态），清除预览
    ///
    /// 已采集的约束保留；缺少进入该状态所需的约束时退回到能进入的最后一个状态。
    fn init(&mut self, status: usize);

    /// 清空全部约束并回到初始状态
    fn reset(&mut self);

    // ========== 事件处理 ==========

    /// 鼠标移动：只更新预览，不修改已采集的约束
    fn on_mouse_move(&mut self, pointer: &PointerEvent) -> ActionResult;

    /// 鼠标释放
    fn on_mouse_click(&mut self, pointer: &PointerEvent, button: MouseButton) -> ActionResult;

    /// 坐标输入事件（来自命令行）
    fn on_coordinate(&mut self, event: &CoordinateEvent) -> ActionResult;

    /// 命令/数值输入；不匹配当前词表时拒绝，状态不变
    fn on_command(&mut self, event: &CommandEvent) -> Result<ActionResult, ActionError>;

    /// 获取当前状态可用的命令关键字
    fn get_available_commands(&self) -> Vec<&'static str> {
        vec![]
    }

    /// 提交唯一确定的几何，然后回到可继续使用的状态
    fn trigger(&mut self) -> Result<Geometry, ActionError>;

    // ========== UI 提示 ==========

    /// 获取当前状态的提示文本
    fn get_prompt(&self) -> &str;

    fn cursor(&self) -> CursorShape {
        CursorShape::CrossHair
    }

    // ========== 预览 ==========

    /// 当前预览几何体
    fn preview(&self) -> &[PreviewGeometry];

    // ========== 设置 ==========

    /// 停用时把工具参数写回设置
    fn save_settings(&self, _settings: &mut Settings) {}
}

/// 把 `trigger` 的结果转成事件返回值
///
/// 提交失败时记录原因并继续等待输入。
pub(crate) fn commit(action: &mut dyn Action) -> ActionResult {
    match action.trigger() {
        Ok(geometry) => ActionResult::CreateEntities(vec![geometry]),
        Err(e) => {
            tracing::debug!("{}: nothing to commit: {}", action.name(), e);
            ActionResult::Continue
        }
    }
}
