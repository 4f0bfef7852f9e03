//! 文档：实体容器与图层表

use crate::entity::{Entity, EntityId};
use crate::geometry::Geometry;
use crate::layer::LayerTable;
use serde::{Deserialize, Serialize};

/// 文档
///
/// 所有修改都发生在交互线程上：Action 完成时一次性插入实体。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    entities: Vec<Entity>,
    layers: LayerTable,
    next_id: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入一个完全确定的几何，属性取自当前图层
    pub fn add_entity(&mut self, geometry: Geometry) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        let layer = self.layers.current();
        tracing::debug!("Adding {} {} on layer {}", geometry.type_name(), id, layer.name());
        self.entities.push(Entity {
            id,
            geometry,
            layer: layer.name().to_string(),
            pen: layer.pen(),
        });
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn layers(&self) -> &LayerTable {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerTable {
        &mut self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Circle;
    use crate::layer::Layer;
    use crate::math::Point2;
    use crate::properties::{Color, LineType, Pen};

    #[test]
    fn test_add_entity_takes_layer_attributes() {
        let mut doc = Document::new();
        let pen = Pen::new(Color::CYAN, 0.25, LineType::Continuous);
        doc.layers_mut().add(Layer::new("circles").with_pen(pen));
        doc.layers_mut().activate("circles");

        let id = doc.add_entity(Geometry::Circle(Circle::new(Point2::new(1.0, 2.0), 3.0)));
        let entity = doc.entity(id).unwrap();
        assert_eq!(entity.layer, "circles");
        assert_eq!(entity.pen, pen);
        assert_eq!(doc.entity_count(), 1);

        let id2 = doc.add_entity(Geometry::Circle(Circle::new(Point2::origin(), 1.0)));
        assert_ne!(id, id2);
    }
}
