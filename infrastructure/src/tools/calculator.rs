//! `calculator` tool: evaluate a math expression without `eval`.
//!
//! A small recursive-descent parser over a fixed grammar. Only the operators,
//! functions and constants listed below are accepted; anything else is an
//! error returned to the model as text.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('**' unary)?
//! primary := number | name | name '(' args ')' | '(' expr ')'
//! ```
//!
//! `-2**2` is `-4` and `2**3**2` is `512`, as in most calculators.
//!
//! | Functions | Constants |
//! |-----------|-----------|
//! | `abs round min max sum sqrt factorial log log10 exp sin cos tan` | `pi e` |

use async_trait::async_trait;
use parley_application::ports::tool::{Tool, string_arg};
use parley_domain::{ConversationHistory, ToolDefinition, ToolError, ToolParameter};
use thiserror::Error;
use tracing::debug;

/// Canonical tool name for the calculator.
pub const CALCULATOR: &str = "calculator";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected token {0}")]
    UnexpectedToken(String),

    #[error("Name {0} not allowed")]
    UnknownName(String),

    #[error("Function {0} not allowed")]
    UnknownFunction(String),

    #[error("{name}() takes {expected} argument(s), got {got}")]
    Arity {
        name: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("math domain error: {0}")]
    Domain(String),

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
}

type CalcResult<T> = Result<T, CalcError>;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Name(String),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    LParen,
    RParen,
    Comma,
}

fn tokenize(input: &str) -> CalcResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    let exponent_sign = (d == '+' || d == '-') && literal.ends_with(['e', 'E']);
                    if d.is_ascii_digit() || d == '.' || d == '_' || d == 'e' || d == 'E' || exponent_sign {
                        if d != '_' {
                            literal.push(d);
                        }
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::UnexpectedToken(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        name.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Name(name));
            }
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::StarStar);
                } else {
                    tokens.push(Token::Star);
                }
            }
            '+' | '-' | '/' | '%' | '(' | ')' | ',' => {
                chars.next();
                tokens.push(match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '/' => Token::Slash,
                    '%' => Token::Percent,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    _ => Token::Comma,
                });
            }
            other => return Err(CalcError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

/// Nesting limit for parentheses, unary signs and exponents combined
const MAX_DEPTH: usize = 256;

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
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> CalcResult<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(CalcError::UnexpectedToken(format!("{token:?}"))),
            None => Err(CalcError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> CalcResult<f64> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> CalcResult<f64> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value /= rhs;
                }
                Some(Token::Percent) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    // floored modulo: the result takes the divisor's sign
                    value -= rhs * (value / rhs).floor();
                }
                _ => return Ok(value),
            }
        }
    }

    // Every recursive path passes through here, so this is where depth is counted.
    fn unary(&mut self) -> CalcResult<f64> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> CalcResult<f64> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> CalcResult<f64> {
        let base = self.primary()?;
        if self.peek() == Some(&Token::StarStar) {
            self.pos += 1;
            let exponent = self.unary()?;
            if base == 0.0 && exponent < 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> CalcResult<f64> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Some(Token::Name(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    let args = self.args()?;
                    call_function(&name, &args)
                } else {
                    constant(&name)
                }
            }
            Some(token) => Err(CalcError::UnexpectedToken(format!("{token:?}"))),
            None => Err(CalcError::UnexpectedEnd),
        }
    }

    /// Arguments after an opening parenthesis, through the closing one
    fn args(&mut self) -> CalcResult<Vec<f64>> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                Some(token) => return Err(CalcError::UnexpectedToken(format!("{token:?}"))),
                None => return Err(CalcError::UnexpectedEnd),
            }
        }
    }
}

fn constant(name: &str) -> CalcResult<f64> {
    match name {
        "pi" => Ok(std::f64::consts::PI),
        "e" => Ok(std::f64::consts::E),
        _ => Err(CalcError::UnknownName(name.to_string())),
    }
}

fn one(name: &'static str, args: &[f64]) -> CalcResult<f64> {
    match args {
        [x] => Ok(*x),
        _ => Err(CalcError::Arity {
            name,
            expected: "1",
            got: args.len(),
        }),
    }
}

fn call_function(name: &str, args: &[f64]) -> CalcResult<f64> {
    match name {
        "abs" => Ok(one("abs", args)?.abs()),
        "sqrt" => {
            let x = one("sqrt", args)?;
            if x < 0.0 {
                return Err(CalcError::Domain("sqrt of a negative number".to_string()));
            }
            Ok(x.sqrt())
        }
        "exp" => Ok(one("exp", args)?.exp()),
        "sin" => Ok(one("sin", args)?.sin()),
        "cos" => Ok(one("cos", args)?.cos()),
        "tan" => Ok(one("tan", args)?.tan()),
        "log10" => positive(one("log10", args)?).map(f64::log10),
        "log" => match args {
            [x] => positive(*x).map(f64::ln),
            [x, base] => Ok(positive(*x)?.ln() / positive(*base)?.ln()),
            _ => Err(CalcError::Arity {
                name: "log",
                expected: "1 or 2",
                got: args.len(),
            }),
        },
        "round" => match args {
            [x] => Ok(round_half_even(*x)),
            [x, digits] => {
                let scale = 10f64.powi(*digits as i32);
                Ok(round_half_even(x * scale) / scale)
            }
            _ => Err(CalcError::Arity {
                name: "round",
                expected: "1 or 2",
                got: args.len(),
            }),
        },
        "factorial" => factorial(one("factorial", args)?),
        "min" | "max" if args.is_empty() => Err(CalcError::Arity {
            name: if name == "min" { "min" } else { "max" },
            expected: "at least 1",
            got: 0,
        }),
        "min" => Ok(args.iter().copied().fold(f64::INFINITY, f64::min)),
        "max" => Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        "sum" => Ok(args.iter().sum()),
        _ => Err(CalcError::UnknownFunction(name.to_string())),
    }
}

fn positive(x: f64) -> CalcResult<f64> {
    if x <= 0.0 {
        Err(CalcError::Domain("log of a non-positive number".to_string()))
    } else {
        Ok(x)
    }
}

fn round_half_even(x: f64) -> f64 {
    let rounded = x.round();
    if (x - x.trunc()).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded - x.signum()
    } else {
        rounded
    }
}

fn factorial(x: f64) -> CalcResult<f64> {
    if x < 0.0 || x.fract() != 0.0 {
        return Err(CalcError::Domain(
            "factorial() only accepts non-negative integral values".to_string(),
        ));
    }
    if x > 170.0 {
        return Err(CalcError::Domain("factorial() result too large".to_string()));
    }
    Ok((1..=x as u32).fold(1.0, |acc, n| acc * f64::from(n)))
}

/// Evaluate `expression` to a number
pub fn evaluate(expression: &str) -> CalcResult<f64> {
    let mut parser = Parser {
        tokens: tokenize(expression)?,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    match parser.next() {
        None => Ok(value),
        Some(token) => Err(CalcError::UnexpectedToken(format!("{token:?}"))),
    }
}

/// Integral results print without a fractional part
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

pub struct CalculatorTool {
    definition: ToolDefinition,
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self {
            definition: calculator_definition(),
        }
    }
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the [`ToolDefinition`] for `calculator`.
pub fn calculator_definition() -> ToolDefinition {
    ToolDefinition::new(
        CALCULATOR,
        "Evaluate a mathematical expression: + - * / % **, parentheses, \
         abs round min max sum sqrt factorial log log10 exp sin cos tan, pi, e",
    )
    .with_parameter(
        ToolParameter::new(
            "expression",
            "Math expression, e.g. \"5 * 8\", \"factorial(6)\", \"sin(pi/2)\"",
            true,
        )
        .with_type("string"),
    )
}

#[async_trait]
impl Tool for CalculatorTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(
        &self,
        args: &serde_json::Value,
        _context: &ConversationHistory,
    ) -> Result<String, ToolError> {
        let expression = string_arg(args, "expression")?;
        let output = match evaluate(expression) {
            Ok(value) => format_number(value),
            Err(e) => format!("Error evaluating expression: {e}"),
        };
        debug!("calculator({}) = {}", expression, output);
        Ok(output)
    }
}
