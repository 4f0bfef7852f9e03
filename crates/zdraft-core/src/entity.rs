//! 实体：提交到文档中的几何对象

use crate::geometry::Geometry;
use crate::properties::Pen;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 实体唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub geometry: Geometry,
    /// 所在图层名
    pub layer: String,
    /// 画笔，创建时取自图层默认画笔
    pub pen: Pen,
}
