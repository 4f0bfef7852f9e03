//! ZDraft 核心
//!
//! 交互式构造工具依赖的无状态部分：
//! - `geometry`: 最终提交的几何图元（线、圆、弧、多段线）
//! - `solver`: 闭式几何求解，返回 0/1/2 个候选解
//! - `expr` / `input_parser`: 命令行数值表达式与坐标/关键字解析
//! - `layer` / `document`: 图层属性与实体容器（外部协作者）
//!
//! # 示例
//!
//! ```rust
//! use zdraft_core::prelude::*;
//!
//! let p1 = Point2::new(0.0, 0.0);
//! let p2 = Point2::new(4.0, 0.0);
//! let candidates = circles_through_two_points(&p1, &p2, 2.5);
//! assert_eq!(candidates.len(), 2);
//! ```

pub mod document;
pub mod entity;
pub mod expr;
pub mod geometry;
pub mod input_parser;
pub mod layer;
pub mod math;
pub mod properties;
pub mod solver;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::document::Document;
    pub use crate::entity::{Entity, EntityId};
    pub use crate::geometry::{Arc, Circle, Geometry, Line, Polyline, PolylineVertex};
    pub use crate::input_parser::{InputParser, InputValue, ParseError};
    pub use crate::layer::{Layer, LayerTable};
    pub use crate::math::{Point2, Vector2};
    pub use crate::properties::{Color, LineType, Pen};
    pub use crate::solver::{circles_through_two_points, Segment, Solutions};
}
