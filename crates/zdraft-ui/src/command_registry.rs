//! 工具命令表
//!
//! 命令行上的工具名和快捷键到 [`ActionType`] 的映射。
//! 解析规则与工具内的关键字一致：大小写不敏感，先完全匹配，再唯一前缀匹配。

use crate::action::ActionType;
use crate::error::ActionError;
use crate::event::match_keyword;

/// 工具名/快捷键 → 工具
const COMMANDS: [(&str, ActionType); 14] = [
    ("line", ActionType::DrawLine),
    ("l", ActionType::DrawLine),
    ("circle", ActionType::DrawCircle),
    ("c", ActionType::DrawCircle),
    ("cr", ActionType::DrawCircle),
    ("circle2pr", ActionType::DrawCircle2PR),
    ("c2", ActionType::DrawCircle2PR),
    ("c2pr", ActionType::DrawCircle2PR),
    ("arc", ActionType::DrawArc),
    ("a", ActionType::DrawArc),
    ("arc3p", ActionType::DrawArc),
    ("polyline", ActionType::DrawPolyline),
    ("pl", ActionType::DrawPolyline),
    ("pline", ActionType::DrawPolyline),
];

/// 解析命令行上的工具名
///
/// 前缀命中的名字都属于同一工具时（如 `p`）视为唯一匹配；命中不同工具时报歧义。
pub fn lookup(input: &str) -> Result<ActionType, ActionError> {
    let names: Vec<&'static str> = COMMANDS.iter().map(|(name, _)| *name).collect();
    match match_keyword(input, &names) {
        Ok(name) => find(name),
        Err(ActionError::AmbiguousCommand { input, candidates }) => {
            let mut tools = candidates.iter().filter_map(|name| find(name).ok());
            let first = tools.next();
            match first {
                Some(tool) if tools.all(|t| t == tool) => Ok(tool),
                _ => Err(ActionError::AmbiguousCommand { input, candidates }),
            }
        }
        Err(e) => Err(e),
    }
}

fn find(name: &str) -> Result<ActionType, ActionError> {
    COMMANDS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, tool)| *tool)
        .ok_or_else(|| ActionError::UnknownCommand(name.to_string()))
}
