//! 闭式几何求解器
//!
//! 无状态的纯函数集合：根据交互工具已采集的约束（点、半径、角度、相切）
//! 计算候选几何。每个函数返回 0、1 或 2 个候选解，由调用方（Action）
//! 决定是否需要用户在多个候选之间做选择。
//!
//! 距离比较一律使用相对容差（见 [`crate::math::RELATIVE_TOLERANCE`]），
//! 避免在 `d ≈ 2r` 这类退化情形附近出现解个数来回跳变。

use crate::geometry::{self, Circle};
use crate::math::{self, Point2, Vector2, RELATIVE_TOLERANCE};

/// 候选解集合
#[derive(Debug, Clone, PartialEq)]
pub enum Solutions<T> {
    /// 无解
    None,
    /// 唯一解
    One(T),
    /// 两个解
    Two(T, T),
}

impl<T> Solutions<T> {
    /// 解的个数
    pub fn len(&self) -> usize {
        match self {
            Solutions::None => 0,
            Solutions::One(_) => 1,
            Solutions::Two(_, _) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Solutions::None)
    }

    /// 遍历所有候选
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (a, b) = match self {
            Solutions::None => (None, None),
            Solutions::One(a) => (Some(a), None),
            Solutions::Two(a, b) => (Some(a), Some(b)),
        };
        a.into_iter().chain(b)
    }

    /// 唯一解（恰好一个候选时）
    pub fn single(self) -> Option<T> {
        match self {
            Solutions::One(a) => Some(a),
            _ => None,
        }
    }

    /// 选出距离 `point` 最近的候选
    ///
    /// `key` 给出每个候选的参考位置（例如圆心）。距离相等时取第一个。
    pub fn nearest(self, point: &Point2, key: impl Fn(&T) -> Point2) -> Option<T> {
        match self {
            Solutions::None => None,
            Solutions::One(a) => Some(a),
            Solutions::Two(a, b) => {
                let da = (key(&a) - point).norm_squared();
                let db = (key(&b) - point).norm_squared();
                if db < da {
                    Some(b)
                } else {
                    Some(a)
                }
            }
        }
    }
}

/// 经过两点且半径为 `radius` 的圆
///
/// 设 `d = |p1 p2|`：
/// - `d > 2r`：无解
/// - `d == 2r`（相对容差内）：唯一解，圆心为两点中点
/// - `d < 2r`：两个解，圆心为 `中点 ± h·n`，`n` 为弦的单位法向，
///   `h = sqrt(r² − (d/2)²)`；第一个解位于从 p1 看向 p2 的左侧
///
/// 半径非正、两点重合（有无穷多解）或结果超出浮点范围时返回无解。
pub fn circles_through_two_points(p1: &Point2, p2: &Point2, radius: f64) -> Solutions<Circle> {
    if !(radius > 0.0) || !radius.is_finite() || math::points_coincide(p1, p2) {
        return Solutions::None;
    }

    let chord = p2 - p1;
    let d = chord.norm();
    let diameter = 2.0 * radius;
    if !d.is_finite() || !diameter.is_finite() {
        return Solutions::None;
    }
    let tolerance = RELATIVE_TOLERANCE * diameter.max(d);
    let mid = math::midpoint(p1, p2);

    if d > diameter + tolerance {
        return Solutions::None;
    }
    if (d - diameter).abs() <= tolerance {
        return Solutions::One(Circle::new(mid, radius));
    }

    let half = d / 2.0;
    // 因式分解形式，避免 r² 溢出
    let h = ((radius - half) * (radius + half)).sqrt();
    let offset = math::left_normal(&(chord / d)) * h;
    let (c1, c2) = (mid + offset, mid - offset);
    if !h.is_finite() || !finite(&c1) || !finite(&c2) {
        return Solutions::None;
    }
    Solutions::Two(Circle::new(c1, radius), Circle::new(c2, radius))
}

fn finite(p: &Point2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// 圆心 + 圆上一点确定的圆
pub fn circle_center_point(center: &Point2, point: &Point2) -> Solutions<Circle> {
    let radius = (point - center).norm();
    if math::points_coincide(center, point) || !radius.is_finite() {
        return Solutions::None;
    }
    Solutions::One(Circle::new(*center, radius))
}

/// 圆心 + 半径确定的圆
pub fn circle_center_radius(center: &Point2, radius: f64) -> Solutions<Circle> {
    if radius > 0.0 && radius.is_finite() {
        Solutions::One(Circle::new(*center, radius))
    } else {
        Solutions::None
    }
}

/// 多段线的一段：终点 + 起点顶点的凸度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub end: Point2,
    pub bulge: f64,
}

/// 相切弧段：起点切线方向固定为 `tangent`，弧段终止于 `end`
///
/// `end` 恰好在切线正方向上时退化为直线段（凸度 0）；
/// 在切线反方向上时需要整圆，无解。
pub fn tangential_segment(start: &Point2, tangent: &Vector2, end: &Point2) -> Solutions<Segment> {
    if math::points_coincide(start, end) || tangent.norm() == 0.0 {
        return Solutions::None;
    }
    let theta = math::signed_angle(tangent, &(end - start));
    if (std::f64::consts::PI - theta.abs()).abs() <= RELATIVE_TOLERANCE {
        return Solutions::None;
    }
    // 圆心角是切线与弦夹角的两倍：bulge = tan(2θ/4)
    let bulge = if theta.abs() <= RELATIVE_TOLERANCE {
        0.0
    } else {
        (theta / 2.0).tan()
    };
    Solutions::One(Segment { end: *end, bulge })
}

/// 给定半径的相切弧段
///
/// 圆弧在 `start` 处与 `tangent` 相切，圆心位于 `mouse` 所在一侧，
/// 终点取 `mouse` 在该圆上的投影。鼠标在切线上（无法判断侧向）、
/// 与圆心重合或投影回到起点时无解。
pub fn tangent_radius_segment(
    start: &Point2,
    tangent: &Vector2,
    radius: f64,
    mouse: &Point2,
) -> Solutions<Segment> {
    if !(radius > 0.0) || tangent.norm() == 0.0 {
        return Solutions::None;
    }
    let tangent = tangent.normalize();
    let to_mouse = mouse - start;
    let side = math::cross(&tangent, &to_mouse);
    if side.abs() <= RELATIVE_TOLERANCE * to_mouse.norm().max(1.0) {
        return Solutions::None;
    }
    let side = side.signum();

    let center = start + math::left_normal(&tangent) * (side * radius);
    let radial = mouse - center;
    if radial.norm() <= RELATIVE_TOLERANCE * radius {
        return Solutions::None;
    }
    let end = center + radial.normalize() * radius;

    let start_angle = (start - center).y.atan2((start - center).x);
    let end_angle = radial.y.atan2(radial.x);
    // 左侧圆心逆时针走，右侧圆心顺时针走
    let sweep = if side > 0.0 {
        math::normalize_angle(end_angle - start_angle)
    } else {
        -math::normalize_angle(start_angle - end_angle)
    };
    if sweep.abs() <= RELATIVE_TOLERANCE {
        return Solutions::None;
    }
    Solutions::One(Segment {
        end,
        bulge: geometry::sweep_to_bulge(sweep),
    })
}

/// 定角直线段
///
/// 方向为 `reference` 旋转 `angle_deg` 度（`reversed` 时顺时针），
/// 长度取 `mouse` 在该射线上的投影，必须为正。
pub fn angled_segment(
    start: &Point2,
    reference: &Vector2,
    angle_deg: f64,
    reversed: bool,
    mouse: &Point2,
) -> Solutions<Segment> {
    if reference.norm() == 0.0 {
        return Solutions::None;
    }
    let angle = if reversed {
        -angle_deg.to_radians()
    } else {
        angle_deg.to_radians()
    };
    let dir = math::rotate(&reference.normalize(), angle);
    let length = (mouse - start).dot(&dir);
    if length <= RELATIVE_TOLERANCE * (mouse - start).norm().max(1.0) {
        return Solutions::None;
    }
    Solutions::One(Segment {
        end: start + dir * length,
        bulge: 0.0,
    })
}
