//! 交互层错误定义

use thiserror::Error;
use zdraft_core::input_parser::ParseError;

/// Action 拒绝事件或无法提交时的原因
///
/// 所有错误都不会修改 Action 的状态，也不会影响文档。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("No solution for the current constraints")]
    NoSolution,

    #[error("Geometry is not fully determined yet")]
    Undetermined,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Ambiguous command '{input}', candidates: {}", .candidates.join(", "))]
    AmbiguousCommand {
        input: String,
        candidates: Vec<&'static str>,
    },

    #[error("Command '{0}' needs a value")]
    MissingValue(&'static str),

    #[error("Invalid {parameter}: {value}")]
    InvalidValue { parameter: &'static str, value: f64 },

    #[error("No active action")]
    NoActiveAction,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// 设置存储读写错误
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
