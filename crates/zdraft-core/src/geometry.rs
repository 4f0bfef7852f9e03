//! 几何图元定义
//!
//! 交互工具最终提交的图元：
//! - 线段 (Line)
//! - 圆 (Circle)
//! - 圆弧 (Arc)，始终按逆时针方向从起始角扫到终止角
//! - 多段线 (Polyline)，顶点带凸度 (bulge)，凸度为正表示逆时针圆弧段

use crate::math::{self, Point2, Vector2, EPSILON, RELATIVE_TOLERANCE};
use serde::{Deserialize, Serialize};

/// 几何类型枚举
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Line(Line),
    Circle(Circle),
    Arc(Arc),
    Polyline(Polyline),
}

impl Geometry {
    /// 获取几何的类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Line(_) => "Line",
            Geometry::Circle(_) => "Circle",
            Geometry::Arc(_) => "Arc",
            Geometry::Polyline(_) => "Polyline",
        }
    }
}

/// 线段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// 计算线段长度
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// 圆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// 圆弧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point2,
    pub radius: f64,
    /// 起始角度（弧度）
    pub start_angle: f64,
    /// 终止角度（弧度），从起始角逆时针到达
    pub end_angle: f64,
}

impl Arc {
    pub fn new(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// 从三点创建圆弧，圆弧依次经过 p1、p2、p3
    ///
    /// 三点共线或有重合点时返回 `None`。
    pub fn from_three_points(p1: Point2, p2: Point2, p3: Point2) -> Option<Self> {
        let a = p2 - p1;
        let b = p3 - p1;
        let d = 2.0 * math::cross(&a, &b);

        if d.abs() <= RELATIVE_TOLERANCE * 2.0 * a.norm() * b.norm() || d.abs() < EPSILON {
            return None;
        }

        let a2 = a.norm_squared();
        let b2 = b.norm_squared();
        let center = p1 + Vector2::new((b.y * a2 - a.y * b2) / d, (a.x * b2 - b.x * a2) / d);
        let radius = (p1 - center).norm();

        let angle_of = |p: Point2| (p.y - center.y).atan2(p.x - center.x);
        let (a1, a2, a3) = (angle_of(p1), angle_of(p2), angle_of(p3));

        // p2 落在 p1→p3 的逆时针扫掠内则保持方向，否则反向
        let arc = Self::new(center, radius, a1, a3);
        if arc.contains_angle(a2) {
            Some(arc)
        } else {
            Some(Self::new(center, radius, a3, a1))
        }
    }

    /// 计算弧长
    pub fn length(&self) -> f64 {
        self.sweep_angle() * self.radius
    }

    /// 计算扫过的角度，范围 [0, 2π)
    pub fn sweep_angle(&self) -> f64 {
        math::normalize_angle(self.end_angle - self.start_angle)
    }

    /// 获取起点
    pub fn start_point(&self) -> Point2 {
        self.center + math::direction(self.start_angle) * self.radius
    }

    /// 获取终点
    pub fn end_point(&self) -> Point2 {
        self.center + math::direction(self.end_angle) * self.radius
    }

    /// 检查角度是否在弧的范围内
    pub fn contains_angle(&self, angle: f64) -> bool {
        math::normalize_angle(angle - self.start_angle) <= self.sweep_angle()
    }
}

/// 多段线顶点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineVertex {
    pub point: Point2,
    /// 凸度（bulge）- 到下一顶点的弧线段，0表示直线，tan(圆心角/4)
    pub bulge: f64,
}

impl PolylineVertex {
    pub fn new(point: Point2) -> Self {
        Self { point, bulge: 0.0 }
    }

    pub fn with_bulge(point: Point2, bulge: f64) -> Self {
        Self { point, bulge }
    }
}

/// 多段线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub vertices: Vec<PolylineVertex>,
    /// 是否闭合
    pub closed: bool,
}

impl Polyline {
    pub fn new(vertices: Vec<PolylineVertex>, closed: bool) -> Self {
        Self { vertices, closed }
    }

    /// 从点列表创建（所有顶点都是直线连接）
    pub fn from_points(points: impl IntoIterator<Item = Point2>, closed: bool) -> Self {
        Self {
            vertices: points.into_iter().map(PolylineVertex::new).collect(),
            closed,
        }
    }

    /// 顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 线段数量
    pub fn segment_count(&self) -> usize {
        match self.vertices.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// 计算总长度
    pub fn length(&self) -> f64 {
        self.explode()
            .iter()
            .map(|g| match g {
                Geometry::Line(l) => l.length(),
                Geometry::Arc(a) => a.length(),
                _ => 0.0,
            })
            .sum()
    }

    /// 爆炸为独立的线段/圆弧
    pub fn explode(&self) -> Vec<Geometry> {
        let n = self.vertices.len();
        (0..self.segment_count())
            .map(|i| {
                let v1 = &self.vertices[i];
                let v2 = &self.vertices[(i + 1) % n];
                if v1.bulge.abs() < EPSILON {
                    return Geometry::Line(Line::new(v1.point, v2.point));
                }
                match bulge_to_arc(&v1.point, &v2.point, v1.bulge) {
                    Some(arc) => Geometry::Arc(arc),
                    // 退化的弧段按直线处理
                    None => Geometry::Line(Line::new(v1.point, v2.point)),
                }
            })
            .collect()
    }
}

/// 凸度对应的圆心角（正值逆时针）
pub fn bulge_sweep(bulge: f64) -> f64 {
    4.0 * bulge.atan()
}

/// 由圆心角求凸度
pub fn sweep_to_bulge(sweep: f64) -> f64 {
    (sweep / 4.0).tan()
}

/// 线段/弧段在终点处的切线方向
pub fn segment_end_tangent(start: &Point2, end: &Point2, bulge: f64) -> Option<Vector2> {
    let chord = end - start;
    if chord.norm() < EPSILON {
        return None;
    }
    // 弧段终点切线 = 弦方向逆时针转过半个圆心角
    Some(math::rotate(&chord.normalize(), bulge_sweep(bulge) / 2.0))
}

/// 把带凸度的顶点对转换为圆弧
pub fn bulge_to_arc(start: &Point2, end: &Point2, bulge: f64) -> Option<Arc> {
    let chord = end - start;
    let chord_len = chord.norm();
    if chord_len < EPSILON || bulge.abs() < EPSILON {
        return None;
    }

    let sweep = bulge_sweep(bulge);
    let half = chord_len / 2.0;
    let radius = half / (sweep / 2.0).sin().abs();
    let normal = math::left_normal(&chord.normalize());
    let center = math::midpoint(start, end) + normal * (half / (sweep / 2.0).tan());

    let angle_of = |p: &Point2| (p.y - center.y).atan2(p.x - center.x);
    let (a1, a2) = (angle_of(start), angle_of(end));

    if sweep > 0.0 {
        Some(Arc::new(center, radius, a1, a2))
    } else {
        Some(Arc::new(center, radius, a2, a1))
    }
}
