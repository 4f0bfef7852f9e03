//! ZDraft 交互层
//!
//! 绘图工具状态机及其协作接口：
//! - `event`: 把指针位置和命令行文本归一化为坐标/命令事件
//! - `action` / `actions`: 每个工具一个状态机，逐步累积约束后提交实体
//! - `host`: 路由输入、驱动预览/提交/提示接收者，管理工具激活与设置读写

pub mod action;
pub mod actions;
pub mod command_registry;
pub mod error;
pub mod event;
pub mod host;
pub mod options;
pub mod settings;

pub use action::{
    Action, ActionResult, ActionType, CursorShape, EntitySink, HintSink, MouseButton, PreviewGeometry,
    PreviewSink,
};
pub use actions::create_action;
pub use error::{ActionError, SettingsError};
pub use event::{CapturedPoint, CommandEvent, CoordinateEvent, EventAdapter, InputEvent, PointSource, PointerEvent};
pub use host::{ActionHost, View};
pub use options::{CircleOptions, PolylineOptions};
pub use settings::{SettingValue, Settings};
