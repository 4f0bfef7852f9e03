//! 事件适配器
//!
//! 把原始指针位置和命令行文本归一化为 Action 消费的两类事件：
//! - [`CoordinateEvent`]: 已解析的世界坐标（绝对点或相对偏移）
//! - [`CommandEvent`]: 关键字和/或已求值的数值
//!
//! 捕捉由外部协作者完成，这里只携带捕捉结果。

use crate::error::ActionError;
use zdraft_core::input_parser::{InputParser, InputValue};
use zdraft_core::math::Point2;

/// 点的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSource {
    /// 命令行键入
    Typed,
    /// 对象捕捉得到
    Snapped,
    /// 鼠标自由点取
    Freehand,
}

/// 已采集的点，采集后不再修改
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapturedPoint {
    pub position: Point2,
    pub source: PointSource,
}

impl CapturedPoint {
    pub fn new(position: Point2, source: PointSource) -> Self {
        Self { position, source }
    }

    pub fn typed(position: Point2) -> Self {
        Self::new(position, PointSource::Typed)
    }
}

/// 原始指针事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// 鼠标世界坐标
    pub position: Point2,
    /// 捕捉后的坐标（如果有）
    pub snapped: Option<Point2>,
}

impl PointerEvent {
    pub fn new(position: Point2) -> Self {
        Self {
            position,
            snapped: None,
        }
    }

    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Point2::new(x, y))
    }

    pub fn with_snap(position: Point2, snapped: Point2) -> Self {
        Self {
            position,
            snapped: Some(snapped),
        }
    }

    /// 获取有效点（优先使用捕捉点）
    pub fn captured(&self) -> CapturedPoint {
        match self.snapped {
            Some(p) => CapturedPoint::new(p, PointSource::Snapped),
            None => CapturedPoint::new(self.position, PointSource::Freehand),
        }
    }
}

/// 坐标事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateEvent {
    pub point: Point2,
    /// 为 true 时 `point` 是相对上一个采集点的偏移
    pub relative: bool,
}

impl CoordinateEvent {
    pub fn absolute(point: Point2) -> Self {
        Self {
            point,
            relative: false,
        }
    }

    pub fn relative(offset: Point2) -> Self {
        Self {
            point: offset,
            relative: true,
        }
    }

    /// 换算为绝对坐标；没有参考点时以原点为基准
    pub fn resolve(&self, reference: Option<Point2>) -> CapturedPoint {
        let position = match (self.relative, reference) {
            (true, Some(base)) => base + self.point.coords,
            _ => self.point,
        };
        CapturedPoint::typed(position)
    }
}

/// 命令事件，消费一次即丢弃
#[derive(Debug, Clone, PartialEq)]
pub struct CommandEvent {
    /// 原始文本
    pub text: String,
    /// 关键字（小写，未与词表匹配）
    pub keyword: Option<String>,
    /// 已求值的数值参数
    pub value: Option<f64>,
}

impl CommandEvent {
    pub fn value(value: f64) -> Self {
        Self {
            text: value.to_string(),
            keyword: None,
            value: Some(value),
        }
    }

    pub fn keyword(keyword: &str, value: Option<f64>) -> Self {
        let text = match value {
            Some(v) => format!("{keyword} {v}"),
            None => keyword.to_string(),
        };
        Self {
            text,
            keyword: Some(keyword.to_lowercase()),
            value,
        }
    }

    /// 把关键字与当前可用命令词表匹配
    ///
    /// 返回 `Ok(None)` 表示这是一个不带关键字的纯数值。
    pub fn resolve(&self, vocabulary: &[&'static str]) -> Result<Option<&'static str>, ActionError> {
        match &self.keyword {
            Some(keyword) => match_keyword(keyword, vocabulary).map(Some),
            None => Ok(None),
        }
    }

    /// 数值参数，缺失时报错
    pub fn require_value(&self, command: &'static str) -> Result<f64, ActionError> {
        self.value.ok_or(ActionError::MissingValue(command))
    }
}

/// 适配器输出
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Coordinate(CoordinateEvent),
    Command(CommandEvent),
}

/// 在词表中匹配关键字
///
/// 大小写不敏感；先找完全匹配，再找唯一前缀匹配。
/// 没有匹配或前缀有歧义时返回错误。
pub fn match_keyword(input: &str, vocabulary: &[&'static str]) -> Result<&'static str, ActionError> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return Err(ActionError::UnknownCommand(input));
    }
    if let Some(exact) = vocabulary.iter().find(|cmd| cmd.eq_ignore_ascii_case(&input)) {
        return Ok(*exact);
    }

    let candidates: Vec<&'static str> = vocabulary
        .iter()
        .copied()
        .filter(|cmd| cmd.to_lowercase().starts_with(&input))
        .collect();

    match candidates.len() {
        0 => Err(ActionError::UnknownCommand(input)),
        1 => Ok(candidates[0]),
        _ => Err(ActionError::AmbiguousCommand { input, candidates }),
    }
}

/// 命令行文本 → 类型化事件
pub struct EventAdapter;

impl EventAdapter {
    /// 解析一行命令行输入
    pub fn parse(text: &str) -> Result<InputEvent, ActionError> {
        let event = match InputParser::parse(text)? {
            InputValue::Coordinate { point, relative } => {
                InputEvent::Coordinate(CoordinateEvent { point, relative })
            }
            InputValue::Number(value) => InputEvent::Command(CommandEvent {
                text: text.trim().to_string(),
                keyword: None,
                value: Some(value),
            }),
            InputValue::Keyword { keyword, value } => InputEvent::Command(CommandEvent {
                text: text.trim().to_string(),
                keyword: Some(keyword),
                value,
            }),
        };
        tracing::trace!("Parsed command line {:?} as {:?}", text, event);
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdraft_core::input_parser::ParseError;

    const VOCAB: &[&str] = &["radius", "angle", "angled", "undo", "close"];

    #[test]
    fn test_match_keyword() {
        assert_eq!(match_keyword("RADIUS", VOCAB), Ok("radius"));
        assert_eq!(match_keyword("r", VOCAB), Ok("radius"));
        assert_eq!(match_keyword("angle", VOCAB), Ok("angle"));
        assert_eq!(match_keyword("angled", VOCAB), Ok("angled"));
        assert!(matches!(
            match_keyword("an", VOCAB),
            Err(ActionError::AmbiguousCommand { candidates, .. }) if candidates == vec!["angle", "angled"]
        ));
        assert_eq!(
            match_keyword("zoom", VOCAB),
            Err(ActionError::UnknownCommand("zoom".to_string()))
        );
        assert!(matches!(match_keyword("r", &[]), Err(ActionError::UnknownCommand(_))));
    }

    #[test]
    fn test_parse_events() {
        assert_eq!(
            EventAdapter::parse("@3,4").unwrap(),
            InputEvent::Coordinate(CoordinateEvent::relative(Point2::new(3.0, 4.0)))
        );
        match EventAdapter::parse("Radius 5/2").unwrap() {
            InputEvent::Command(cmd) => {
                assert_eq!(cmd.keyword.as_deref(), Some("radius"));
                assert_eq!(cmd.value, Some(2.5));
            }
            other => panic!("Expected Command, got {other:?}"),
        }
        match EventAdapter::parse("2*1.25").unwrap() {
            InputEvent::Command(cmd) => {
                assert_eq!(cmd.keyword, None);
                assert_eq!(cmd.value, Some(2.5));
            }
            other => panic!("Expected Command, got {other:?}"),
        }
        assert_eq!(
            EventAdapter::parse("1/0"),
            Err(ActionError::Parse(ParseError::DivisionByZero))
        );
    }

    #[test]
    fn test_resolve_relative_coordinate() {
        let event = CoordinateEvent::relative(Point2::new(1.0, 2.0));
        let p = event.resolve(Some(Point2::new(10.0, 10.0)));
        assert_eq!(p.position, Point2::new(11.0, 12.0));
        assert_eq!(p.source, PointSource::Typed);
        // 没有参考点时以原点为基准
        assert_eq!(event.resolve(None).position, Point2::new(1.0, 2.0));
    }

    #[test]
    fn test_pointer_prefers_snap() {
        let free = PointerEvent::at(1.0, 1.0).captured();
        assert_eq!(free.source, PointSource::Freehand);
        let snapped = PointerEvent::with_snap(Point2::new(1.0, 1.0), Point2::new(1.0, 0.0)).captured();
        assert_eq!(snapped.position, Point2::new(1.0, 0.0));
        assert_eq!(snapped.source, PointSource::Snapped);
    }
}
