//! 设置存储
//!
//! 字符串路径 → 值的简单键值表，例如 `"/Draw/PolylineRadius"`。
//! 只由宿主在工具激活/停用时读写，Action 本身不直接访问。

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 设置键
pub mod keys {
    pub const CIRCLE_RADIUS: &str = "/Draw/CircleRadius";
    pub const POLYLINE_MODE: &str = "/Draw/PolylineMode";
    pub const POLYLINE_RADIUS: &str = "/Draw/PolylineRadius";
    pub const POLYLINE_ANGLE: &str = "/Draw/PolylineAngle";
    pub const POLYLINE_REVERSED: &str = "/Draw/PolylineReversed";
}

/// 设置值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Int(i64),
    Text(String),
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        SettingValue::Int(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Text(v.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        SettingValue::Text(v)
    }
}

/// 设置存储
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    entries: BTreeMap<String, SettingValue>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文件加载；文件不存在时返回空设置
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::info!("Settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        tracing::info!("Loaded {} settings from {}", settings.len(), path.display());
        Ok(settings)
    }

    /// 保存为 JSON 文件
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// 读取文本项
    pub fn read_entry(&self, key: &str, default: &str) -> String {
        match self.entries.get(key) {
            Some(SettingValue::Text(s)) => s.clone(),
            Some(SettingValue::Int(v)) => v.to_string(),
            None => default.to_string(),
        }
    }

    /// 读取整数项；文本无法解析时使用默认值
    pub fn read_num_entry(&self, key: &str, default: i64) -> i64 {
        match self.entries.get(key) {
            Some(SettingValue::Int(v)) => *v,
            Some(SettingValue::Text(s)) => s.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Setting {} is not an integer: {:?}", key, s);
                default
            }),
            None => default,
        }
    }

    pub fn write_entry(&mut self, key: &str, value: impl Into<SettingValue>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
