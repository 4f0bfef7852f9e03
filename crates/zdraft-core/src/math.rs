//! 数学基础类型
//!
//! 基于 nalgebra 的 2D 点/向量别名，以及几何求解使用的容差。

pub use nalgebra::{Point2 as NPoint2, Rotation2, Vector2 as NVector2};

/// 2D 点（世界坐标）
pub type Point2 = NPoint2<f64>;

/// 2D 向量
pub type Vector2 = NVector2<f64>;

/// 绝对容差，用于零长度、共线等判断
pub const EPSILON: f64 = 1e-10;

/// 相对容差，用于 d 与 2r 等量级相关的比较
pub const RELATIVE_TOLERANCE: f64 = 1e-9;

/// 两个量是否在相对容差内相等
///
/// 比较尺度取两者绝对值的较大者，下限为 1，避免在原点附近退化为零容差。
pub fn nearly_equal(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= RELATIVE_TOLERANCE * scale
}

/// 两点是否重合（相对容差）
pub fn points_coincide(a: &Point2, b: &Point2) -> bool {
    let scale = a.coords.norm().max(b.coords.norm()).max(1.0);
    (b - a).norm() <= RELATIVE_TOLERANCE * scale
}

/// 两点中点
pub fn midpoint(a: &Point2, b: &Point2) -> Point2 {
    nalgebra::center(a, b)
}

/// 向量逆时针旋转 90°
pub fn left_normal(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// 二维叉积（z 分量）
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// 从 `from` 转到 `to` 的有符号角度，范围 (-π, π]
pub fn signed_angle(from: &Vector2, to: &Vector2) -> f64 {
    cross(from, to).atan2(from.dot(to))
}

/// 单位方向向量
pub fn direction(angle: f64) -> Vector2 {
    Vector2::new(angle.cos(), angle.sin())
}

/// 把向量旋转指定弧度
pub fn rotate(v: &Vector2, angle: f64) -> Vector2 {
    Rotation2::new(angle) * *v
}

/// 角度归一化到 [0, 2π)
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(std::f64::consts::TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_nearly_equal_is_relative() {
        assert!(nearly_equal(1e6, 1e6 + 1e-4));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6));
    }

    #[test]
    fn test_signed_angle() {
        let x = Vector2::new(1.0, 0.0);
        assert_relative_eq!(signed_angle(&x, &Vector2::new(0.0, 1.0)), FRAC_PI_2);
        assert_relative_eq!(signed_angle(&x, &Vector2::new(0.0, -1.0)), -FRAC_PI_2);
    }

    #[test]
    fn test_rotate_and_normalize() {
        let v = rotate(&Vector2::new(1.0, 0.0), FRAC_PI_2);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, 1.0);
        assert_relative_eq!(normalize_angle(-FRAC_PI_2), 1.5 * PI);
    }
}
