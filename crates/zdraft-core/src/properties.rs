//! 视觉属性：颜色、线型、画笔

use serde::{Deserialize, Serialize};

/// RGB 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const CYAN: Color = Color::new(0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// 线型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineType {
    #[default]
    Continuous,
    Dashed,
    Dotted,
    DashDot,
}

/// 画笔
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pen {
    pub color: Color,
    /// 线宽（毫米），0 表示最细
    pub width: f64,
    pub line_type: LineType,
}

impl Pen {
    pub fn new(color: Color, width: f64, line_type: LineType) -> Self {
        Self {
            color,
            width,
            line_type,
        }
    }
}
