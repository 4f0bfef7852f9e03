//! 具体的 Action 实现
//!
//! 每个绘图工具对应一个 Action 实现

mod draw_arc;
mod draw_circle;
mod draw_circle_2pr;
mod draw_line;
mod draw_polyline;

pub use draw_arc::DrawArcAction;
pub use draw_circle::DrawCircleAction;
pub use draw_circle_2pr::DrawCircle2PRAction;
pub use draw_line::DrawLineAction;
pub use draw_polyline::{DrawPolylineAction, SegmentMode};

pub mod status {
    //! 各工具的交互状态
    pub use super::draw_arc::Status as ArcStatus;
    pub use super::draw_circle::Status as CircleStatus;
    pub use super::draw_circle_2pr::Status as Circle2PRStatus;
    pub use super::draw_line::Status as LineStatus;
    pub use super::draw_polyline::Status as PolylineStatus;
}

use crate::action::{Action, ActionType};
use crate::options::{CircleOptions, PolylineOptions};
use crate::settings::Settings;

/// 创建指定类型的 Action，工具参数取自设置
pub fn create_action(action_type: ActionType, settings: &Settings) -> Box<dyn Action> {
    match action_type {
        ActionType::DrawLine => Box::new(DrawLineAction::new()),
        ActionType::DrawCircle => Box::new(DrawCircleAction::new()),
        ActionType::DrawCircle2PR => {
            Box::new(DrawCircle2PRAction::new(CircleOptions::from_settings(settings)))
        }
        ActionType::DrawArc => Box::new(DrawArcAction::new()),
        ActionType::DrawPolyline => {
            Box::new(DrawPolylineAction::new(PolylineOptions::from_settings(settings)))
        }
    }
}
