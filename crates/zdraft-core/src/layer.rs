//! 图层
//!
//! 被动的属性存储：名称、默认画笔和若干标志位。只被渲染和
//! 实体默认属性分配读取，与求解器、Action 状态机无关。

use crate::properties::Pen;
use serde::{Deserialize, Serialize};

/// 默认图层名
pub const DEFAULT_LAYER: &str = "0";

/// 图层
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    name: String,
    pen: Pen,
    frozen: bool,
    locked: bool,
    print: bool,
    /// CAM 转换标记
    converted: bool,
    /// 构造图层：实体无限长，永不打印
    construction: bool,
    visible_in_layer_list: bool,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pen: Pen::default(),
            frozen: false,
            locked: false,
            print: true,
            converted: false,
            construction: false,
            visible_in_layer_list: true,
        }
    }

    pub fn with_pen(mut self, pen: Pen) -> Self {
        self.pen = pen;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// 切换冻结（隐藏）状态
    pub fn toggle(&mut self) {
        self.frozen = !self.frozen;
    }

    pub fn freeze(&mut self, freeze: bool) {
        self.frozen = freeze;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn toggle_lock(&mut self) {
        self.locked = !self.locked;
    }

    pub fn lock(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_print(&self) -> bool {
        self.print
    }

    pub fn toggle_print(&mut self) {
        self.print = !self.print;
    }

    pub fn set_print(&mut self, print: bool) {
        self.print = print;
    }

    pub fn is_converted(&self) -> bool {
        self.converted
    }

    pub fn set_converted(&mut self, converted: bool) {
        self.converted = converted;
    }

    pub fn is_construction(&self) -> bool {
        self.construction
    }

    /// 切换构造图层；构造图层同时关闭打印
    pub fn toggle_construction(&mut self) {
        self.construction = !self.construction;
        if self.construction {
            self.print = false;
        }
    }

    pub fn is_visible_in_layer_list(&self) -> bool {
        self.visible_in_layer_list
    }

    pub fn set_visible_in_layer_list(&mut self, visible: bool) {
        self.visible_in_layer_list = visible;
    }
}

/// 图层表，始终包含图层 "0"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "LayerTableData")]
pub struct LayerTable {
    layers: Vec<Layer>,
    current: usize,
}

/// 反序列化得到的原始图层表
#[derive(Deserialize)]
struct LayerTableData {
    layers: Vec<Layer>,
    current: usize,
}

impl From<LayerTableData> for LayerTable {
    /// 补齐图层 "0"，当前图层序号越界时退回图层 "0"
    fn from(data: LayerTableData) -> Self {
        let mut table = Self {
            layers: data.layers,
            current: data.current,
        };
        if table.find(DEFAULT_LAYER).is_none() {
            table.layers.insert(0, Layer::new(DEFAULT_LAYER));
            table.current = table.current.saturating_add(1);
        }
        if table.current >= table.layers.len() {
            tracing::warn!("Current layer index {} out of range, using layer {}", data.current, DEFAULT_LAYER);
            table.current = table
                .layers
                .iter()
                .position(|l| l.name == DEFAULT_LAYER)
                .unwrap_or(0);
        }
        table
    }
}

impl LayerTable {
    pub fn new() -> Self {
        Self {
            layers: vec![Layer::new(DEFAULT_LAYER)],
            current: 0,
        }
    }

    /// 添加图层；同名图层已存在时替换其属性
    pub fn add(&mut self, layer: Layer) {
        match self.layers.iter_mut().find(|l| l.name == layer.name) {
            Some(existing) => *existing = layer,
            None => self.layers.push(layer),
        }
    }

    pub fn find(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// 设置当前图层，图层不存在时返回 false
    pub fn activate(&mut self, name: &str) -> bool {
        match self.layers.iter().position(|l| l.name == name) {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> &Layer {
        &self.layers[self.current]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::{Color, LineType};

    #[test]
    fn test_layer_defaults() {
        let layer = Layer::new("walls");
        assert_eq!(layer.name(), "walls");
        assert!(!layer.is_frozen());
        assert!(!layer.is_locked());
        assert!(layer.is_print());
        assert!(!layer.is_construction());
        assert!(layer.is_visible_in_layer_list());
    }

    #[test]
    fn test_layer_toggles() {
        let mut layer = Layer::new("aux");
        layer.toggle();
        assert!(layer.is_frozen());
        layer.toggle_lock();
        assert!(layer.is_locked());
        layer.lock(false);
        assert!(!layer.is_locked());
        layer.toggle_construction();
        assert!(layer.is_construction());
        assert!(!layer.is_print());
        layer.set_converted(true);
        assert!(layer.is_converted());
    }

    #[test]
    fn test_layer_table() {
        let mut table = LayerTable::new();
        assert_eq!(table.current().name(), DEFAULT_LAYER);

        let pen = Pen::new(Color::RED, 0.5, LineType::Dashed);
        table.add(Layer::new("dims").with_pen(pen));
        assert!(table.activate("dims"));
        assert_eq!(table.current().pen(), pen);
        assert!(!table.activate("missing"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_deserialize_repairs_table() {
        let empty: LayerTable = serde_json::from_str(r#"{"layers":[],"current":3}"#).unwrap();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty.current().name(), DEFAULT_LAYER);

        let mut table = LayerTable::new();
        table.add(Layer::new("dims"));
        table.activate("dims");
        let json = serde_json::to_string(&table).unwrap();
        let loaded: LayerTable = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.current().name(), "dims");

        let json = json.replace(r#""current":1"#, r#""current":9"#);
        let loaded: LayerTable = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.current().name(), DEFAULT_LAYER);
    }
}
