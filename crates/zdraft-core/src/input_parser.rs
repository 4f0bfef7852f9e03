//! CAD输入解析器
//!
//! 支持多种输入格式（每个分量都可以是算术表达式，见 [`crate::expr`]）：
//! - 绝对坐标: `100,50`
//! - 相对坐标: `@100,50`
//! - 极坐标: `@100<45` (相对) 或 `100<45` (绝对，以原点为基准)
//! - 数值: `2.5`、`(3+4)/2`
//! - 关键字: `close`、`radius 2.5`
//!
//! 相对坐标在这里不做解析，保留偏移量和相对标记，由当前 Action
//! 以其最后采集的点为基准换算。

use crate::expr;
use crate::math::{self, Point2};
use thiserror::Error;

/// 解析后的输入值
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    /// 坐标：绝对点或相对偏移
    Coordinate { point: Point2, relative: bool },
    /// 纯数值
    Number(f64),
    /// 关键字，可带一个数值参数
    Keyword { keyword: String, value: Option<f64> },
}

/// 解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Empty input")]
    Empty,

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),

    #[error("Result is not a finite number: {0}")]
    NotFinite(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// 输入解析器
pub struct InputParser;

impl InputParser {
    /// 解析一行命令行输入
    pub fn parse(input: &str) -> Result<InputValue, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::Empty);
        }

        let (relative, body) = match input.strip_prefix('@') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, input),
        };

        // 极坐标 "100<45" 或 "@100<45"
        if let Some(angle_pos) = body.rfind('<') {
            let (length_str, angle_str) = body.split_at(angle_pos);
            let angle_str = &angle_str[1..];
            if length_str.trim().is_empty() {
                return Err(ParseError::InvalidFormat(format!(
                    "polar coordinate needs a length: {input}"
                )));
            }
            let length = expr::eval(length_str)?;
            let angle = expr::eval(angle_str)?.to_radians();
            let offset = math::direction(angle) * length;
            return Ok(InputValue::Coordinate {
                point: Point2::from(offset),
                relative,
            });
        }

        // 直角坐标 "100,50" 或 "@100,50"
        if let Some(comma_pos) = body.find(',') {
            let (x_str, y_str) = body.split_at(comma_pos);
            let x = expr::eval(x_str)?;
            let y = expr::eval(&y_str[1..])?;
            return Ok(InputValue::Coordinate {
                point: Point2::new(x, y),
                relative,
            });
        }

        if relative {
            return Err(ParseError::InvalidFormat(format!(
                "'@' must be followed by a coordinate: {input}"
            )));
        }

        if expr::looks_numeric(input) {
            return expr::eval(input).map(InputValue::Number);
        }

        Self::parse_keyword(input)
    }

    /// 解析 `keyword [expr]`
    fn parse_keyword(input: &str) -> Result<InputValue, ParseError> {
        let (word, rest) = match input.find(char::is_whitespace) {
            Some(pos) => (&input[..pos], input[pos..].trim()),
            None => (input, ""),
        };

        if !word.chars().all(|c| c.is_alphabetic() || c == '_') {
            return Err(ParseError::InvalidFormat(format!("Cannot parse input: {input}")));
        }

        let value = if rest.is_empty() {
            None
        } else {
            Some(expr::eval(rest)?)
        };

        Ok(InputValue::Keyword {
            keyword: word.to_lowercase(),
            value,
        })
    }
}
