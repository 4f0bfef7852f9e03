//! 数值表达式求值
//!
//! 命令行中的数值允许写成算术表达式，例如 `2*1.25`、`(3+4)/2`、`sqrt(2)*10`。
//!
//! 文法（优先级从低到高）：
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := ('+' | '-') unary | power
//! power  := atom ('^' unary)?
//! atom   := number | ident | ident '(' expr ')' | '(' expr ')'
//! ```
//!
//! 同时接受 Unicode 运算符 `−`、`×`、`÷`。函数参数为弧度。

use crate::input_parser::ParseError;

/// 对表达式求值
pub fn eval(input: &str) -> Result<f64, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let value = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(ParseError::InvalidExpression(format!(
            "unexpected {tok:?} in `{input}`"
        )));
    }
    if !value.is_finite() {
        return Err(ParseError::NotFinite(input.trim().to_string()));
    }
    Ok(value)
}

/// 输入是否像一个数值表达式（而不是关键字）
///
/// 以数字、小数点、正负号、左括号开头，或者是已知常量/函数名。
pub fn looks_numeric(input: &str) -> bool {
    let trimmed = input.trim_start();
    match trimmed.chars().next() {
        Some(c) if c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '−' | '(') => true,
        Some(c) if c.is_alphabetic() => {
            let ident: String = trimmed.chars().take_while(|c| c.is_alphanumeric()).collect();
            let rest = trimmed[ident.len()..].trim_start();
            let ident = ident.to_ascii_lowercase();
            constant(&ident).is_some() && rest.is_empty()
                || function(&ident).is_some() && rest.starts_with('(')
        }
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(i, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut end = i;
                while let Some(&(j, d)) = chars.peek() {
                    // 科学计数法：1e-3
                    let exponent_sign = matches!(d, '+' | '-')
                        && input[..j].ends_with(|x: char| x == 'e' || x == 'E')
                        && input[i..j].chars().all(|x| x.is_ascii_digit() || matches!(x, '.' | 'e' | 'E'));
                    if d.is_ascii_digit() || d == '.' || d == 'e' || d == 'E' || exponent_sign {
                        end = j + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let text = &input[i..end];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidNumber(text.to_string()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' {
                        ident.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident.to_ascii_lowercase()));
            }
            _ => {
                let token = match c {
                    '+' => Token::Plus,
                    '-' | '−' => Token::Minus,
                    '*' | '×' => Token::Star,
                    '/' | '÷' => Token::Slash,
                    '^' => Token::Caret,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    other => {
                        return Err(ParseError::InvalidExpression(format!(
                            "unexpected character '{other}' at {i}"
                        )))
                    }
                };
                tokens.push(token);
                chars.next();
            }
        }
    }

    Ok(tokens)
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        _ => None,
    }
}

fn function(name: &str) -> Option<fn(f64) -> f64> {
    match name {
        "sqrt" => Some(f64::sqrt),
        "abs" => Some(f64::abs),
        "sin" => Some(f64::sin),
        "cos" => Some(f64::cos),
        "tan" => Some(f64::tan),
        _ => None,
    }
}

/// 括号与一元运算符的最大嵌套层数
const MAX_DEPTH: usize = 128;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Result<f64, ParseError> {
        let mut value = self.term()?;
        loop {
            if self.eat(&Token::Plus) {
                value += self.term()?;
            } else if self.eat(&Token::Minus) {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> Result<f64, ParseError> {
        let mut value = self.unary()?;
        loop {
            if self.eat(&Token::Star) {
                value *= self.unary()?;
            } else if self.eat(&Token::Slash) {
                let divisor = self.unary()?;
                if divisor == 0.0 {
                    return Err(ParseError::DivisionByZero);
                }
                value /= divisor;
            } else {
                return Ok(value);
            }
        }
    }

    /// 所有递归都经过这里，嵌套过深时报错而不是耗尽栈
    fn unary(&mut self) -> Result<f64, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::InvalidExpression(format!(
                "expression nested deeper than {MAX_DEPTH} levels"
            )));
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<f64, ParseError> {
        if self.eat(&Token::Minus) {
            return Ok(-self.unary()?);
        }
        if self.eat(&Token::Plus) {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> Result<f64, ParseError> {
        let base = self.atom()?;
        if self.eat(&Token::Caret) {
            // 右结合：2^3^2 = 2^9
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<f64, ParseError> {
        match self.next() {
            Some(Token::Number(v)) => Ok(v),
            Some(Token::LParen) => {
                let value = self.expr()?;
                if !self.eat(&Token::RParen) {
                    return Err(ParseError::UnbalancedParentheses);
                }
                Ok(value)
            }
            Some(Token::Ident(name)) => {
                if let Some(f) = function(&name) {
                    if !self.eat(&Token::LParen) {
                        return Err(ParseError::InvalidExpression(format!(
                            "function `{name}` needs parentheses"
                        )));
                    }
                    let arg = self.expr()?;
                    if !self.eat(&Token::RParen) {
                        return Err(ParseError::UnbalancedParentheses);
                    }
                    return Ok(f(arg));
                }
                constant(&name).ok_or(ParseError::UnknownIdentifier(name))
            }
            Some(Token::RParen) => Err(ParseError::UnbalancedParentheses),
            Some(tok) => Err(ParseError::InvalidExpression(format!("unexpected {tok:?}"))),
            None => Err(ParseError::InvalidExpression("unexpected end of input".to_string())),
        }
    }
}
