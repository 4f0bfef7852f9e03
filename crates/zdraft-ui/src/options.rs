//! 工具选项
//!
//! 由宿主在激活工具时从 [`Settings`] 构造并传给 Action，
//! 停用时再写回设置。文本项按数值表达式求值。

use crate::settings::{keys, Settings};
use zdraft_core::expr;

/// 定角模式角度的取值范围（度）
pub const MAX_ANGLE: f64 = 359.999;

/// 求值设置中的数值表达式，失败时使用默认值
fn eval_entry(settings: &Settings, key: &str, default: f64) -> f64 {
    let text = settings.read_entry(key, &default.to_string());
    match expr::eval(&text) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Setting {} = {:?} is not a number ({}), using {}", key, text, e, default);
            default
        }
    }
}

/// 把角度限制在 [0, 359.999]
pub fn clamp_angle(angle: f64) -> f64 {
    angle.clamp(0.0, MAX_ANGLE)
}

/// 圆工具选项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleOptions {
    /// 上次使用的半径
    pub radius: f64,
}

impl Default for CircleOptions {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

impl CircleOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut radius = eval_entry(settings, keys::CIRCLE_RADIUS, 1.0);
        if !(radius > 0.0) {
            tracing::warn!("Ignoring non-positive circle radius {}", radius);
            radius = Self::default().radius;
        }
        Self { radius }
    }

    pub fn write_settings(&self, settings: &mut Settings) {
        settings.write_entry(keys::CIRCLE_RADIUS, self.radius.to_string());
    }
}

/// 多段线工具选项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineOptions {
    /// 段模式序号（0..=3）
    pub mode: i64,
    pub radius: f64,
    /// 度
    pub angle: f64,
    pub reversed: bool,
}

impl Default for PolylineOptions {
    fn default() -> Self {
        Self {
            mode: 0,
            radius: 1.0,
            angle: 180.0,
            reversed: false,
        }
    }
}

impl PolylineOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let defaults = Self::default();
        let mut radius = eval_entry(settings, keys::POLYLINE_RADIUS, defaults.radius);
        if !(radius > 0.0) {
            tracing::warn!("Ignoring non-positive polyline radius {}", radius);
            radius = defaults.radius;
        }
        Self {
            mode: settings.read_num_entry(keys::POLYLINE_MODE, defaults.mode),
            radius,
            angle: clamp_angle(eval_entry(settings, keys::POLYLINE_ANGLE, defaults.angle)),
            reversed: settings.read_num_entry(keys::POLYLINE_REVERSED, 0) != 0,
        }
    }

    pub fn write_settings(&self, settings: &mut Settings) {
        settings.write_entry(keys::POLYLINE_MODE, self.mode);
        settings.write_entry(keys::POLYLINE_RADIUS, self.radius.to_string());
        settings.write_entry(keys::POLYLINE_ANGLE, self.angle.to_string());
        settings.write_entry(keys::POLYLINE_REVERSED, self.reversed as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_defaults() {
        let options = PolylineOptions::from_settings(&Settings::new());
        assert_eq!(options, PolylineOptions::default());
    }

    #[test]
    fn test_polyline_from_settings() {
        let mut settings = Settings::new();
        settings.write_entry(keys::POLYLINE_MODE, 2);
        settings.write_entry(keys::POLYLINE_RADIUS, "5/2");
        settings.write_entry(keys::POLYLINE_ANGLE, "400");
        settings.write_entry(keys::POLYLINE_REVERSED, 1);

        let options = PolylineOptions::from_settings(&settings);
        assert_eq!(options.mode, 2);
        assert_eq!(options.radius, 2.5);
        assert_eq!(options.angle, MAX_ANGLE);
        assert!(options.reversed);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let mut settings = Settings::new();
        settings.write_entry(keys::CIRCLE_RADIUS, "abc");
        assert_eq!(CircleOptions::from_settings(&settings).radius, 1.0);
        settings.write_entry(keys::CIRCLE_RADIUS, "-2");
        assert_eq!(CircleOptions::from_settings(&settings).radius, 1.0);
    }

    #[test]
    fn test_write_back() {
        let mut settings = Settings::new();
        let options = PolylineOptions {
            mode: 3,
            radius: 4.0,
            angle: 90.0,
            reversed: true,
        };
        options.write_settings(&mut settings);
        assert_eq!(PolylineOptions::from_settings(&settings), options);

        CircleOptions { radius: 2.5 }.write_settings(&mut settings);
        assert_eq!(settings.read_entry(keys::CIRCLE_RADIUS, "1.0"), "2.5");
    }
}
