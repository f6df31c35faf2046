//! Calculator tool — evaluates arithmetic expressions.
//!
//! Supports `+`, `-`, `*`, `/`, `%`, `^`, parentheses, decimals, and unary
//! signs via a small precedence-climbing parser.

use async_trait::async_trait;
use remind_core::error::ToolError;
use remind_core::tool::{Tool, ToolInput};

pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Evaluate an arithmetic expression such as (2 + 3) * 4. \
         Input is the bare expression or {\"expression\": \"...\"}."
    }

    async fn execute(&self, input: ToolInput) -> Result<String, ToolError> {
        let expr = input
            .field_or_text("expression")
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'expression' argument".into()))?;

        let value = evaluate(expr).map_err(|reason| ToolError::ExecutionFailed {
            tool_name: "calculator".into(),
            reason,
        })?;
        Ok(format_number(value))
    }
}

/// Drop the trailing `.0` for integral results.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ── Expression evaluator ─────────────────────────────────────────────────

/// Evaluate an arithmetic expression string.
pub fn evaluate(expr: &str) -> Result<f64, String> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr(0)?;
    match parser.tokens.get(parser.pos) {
        None => Ok(value),
        Some(tok) => Err(format!("Unexpected token {tok:?} at position {}", parser.pos)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Op(char),
    Open,
    Close,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '+' | '-' | '*' | '/' | '%' | '^' => tokens.push(Token::Op(c)),
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, d)) = chars.peek() {
                    if !(d.is_ascii_digit() || d == '.') {
                        break;
                    }
                    end = i + d.len_utf8();
                    chars.next();
                }
                let literal = &input[start..end];
                let n = literal
                    .parse()
                    .map_err(|_| format!("Invalid number: {literal}"))?;
                tokens.push(Token::Num(n));
            }
            c => return Err(format!("Unexpected character: '{c}'")),
        }
    }

    Ok(tokens)
}

/// Left and right binding power of an infix operator.
fn binding_power(op: char) -> Option<(u8, u8)> {
    match op {
        '+' | '-' => Some((1, 2)),
        '*' | '/' | '%' => Some((3, 4)),
        // right-associative
        '^' => Some((6, 5)),
        _ => None,
    }
}

const PREFIX_POWER: u8 = 5;

/// Deepest nesting of parentheses, prefix signs and `^` chains accepted.
const MAX_DEPTH: usize = 256;

/// Precedence-climbing parser over the token stream.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).copied();
        self.pos += usize::from(tok.is_some());
        tok
    }

    fn expr(&mut self, min_power: u8) -> Result<f64, String> {
        if self.depth >= MAX_DEPTH {
            return Err("Expression nested too deeply".into());
        }
        self.depth += 1;
        let value = self.climb(min_power);
        self.depth -= 1;
        value
    }

    fn climb(&mut self, min_power: u8) -> Result<f64, String> {
        let mut lhs = match self.next() {
            Some(Token::Num(n)) => n,
            Some(Token::Op('-')) => -self.expr(PREFIX_POWER)?,
            Some(Token::Op('+')) => self.expr(PREFIX_POWER)?,
            Some(Token::Open) => {
                let inner = self.expr(0)?;
                if self.next() != Some(Token::Close) {
                    return Err("Expected closing parenthesis".into());
                }
                inner
            }
            Some(tok) => return Err(format!("Unexpected token: {tok:?}")),
            None => return Err("Unexpected end of expression".into()),
        };

        while let Some(Token::Op(op)) = self.tokens.get(self.pos).copied() {
            let Some((left, right)) = binding_power(op) else {
                break;
            };
            if left < min_power {
                break;
            }
            self.pos += 1;
            let rhs = self.expr(right)?;
            lhs = apply(op, lhs, rhs)?;
        }

        Ok(lhs)
    }
}

fn apply(op: char, lhs: f64, rhs: f64) -> Result<f64, String> {
    match op {
        '+' => Ok(lhs + rhs),
        '-' => Ok(lhs - rhs),
        '*' => Ok(lhs * rhs),
        '/' | '%' if rhs == 0.0 => Err("Division by zero".into()),
        '/' => Ok(lhs / rhs),
        '%' => Ok(lhs % rhs),
        '^' => Ok(lhs.powf(rhs)),
        _ => Err(format!("Unknown operator: {op}")),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
    }

    #[test]
    fn nested_parentheses() {
        assert_eq!(evaluate("((1 + 2) * (3 + 4))").unwrap(), 21.0);
    }

    #[test]
    fn division_by_zero() {
        assert!(evaluate("1 / 0").is_err());
    }

    #[test]
    fn unary_negation() {
        assert_eq!(evaluate("-5 + 3").unwrap(), -2.0);
        assert_eq!(evaluate("-(2 + 3)").unwrap(), -5.0);
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(evaluate("2 ^ 3 ^ 2").unwrap(), 512.0);
        assert_eq!(evaluate("-2 ^ 2").unwrap(), -4.0);
        assert_eq!(evaluate("2 * 3 ^ 2").unwrap(), 18.0);
    }

    #[test]
    fn remainder() {
        assert_eq!(evaluate("17 % 5").unwrap(), 2.0);
        assert!(evaluate("1 % 0").is_err());
    }

    #[test]
    fn left_associative_subtraction() {
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(evaluate("12 / 3 / 2").unwrap(), 2.0);
    }

    #[test]
    fn malformed_expressions() {
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("").is_err());
        assert!(evaluate("(1 + 2").is_err());
        assert!(evaluate("2 $ 3").is_err());
    }

    #[test]
    fn deep_nesting_is_rejected_without_overflow() {
        let parens = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(evaluate(&parens).unwrap_err(), "Expression nested too deeply");

        let negations = format!("{}1", "-".repeat(100_000));
        assert_eq!(evaluate(&negations).unwrap_err(), "Expression nested too deeply");

        let powers = format!("1{}", "^1".repeat(100_000));
        assert_eq!(evaluate(&powers).unwrap_err(), "Expression nested too deeply");
    }

    #[test]
    fn moderate_nesting_still_evaluates() {
        let parens = format!("{}7{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(evaluate(&parens).unwrap(), 7.0);
        assert_eq!(evaluate(&format!("{}2", "-".repeat(50))).unwrap(), 2.0);
    }

    #[tokio::test]
    async fn accepts_bare_text() {
        let out = CalculatorTool.execute("2+2".into()).await.unwrap();
        assert_eq!(out, "4");
    }

    #[tokio::test]
    async fn accepts_structured_input() {
        let input = ToolInput::from(serde_json::json!({"expression": "10 / 4"}));
        let out = CalculatorTool.execute(input).await.unwrap();
        assert_eq!(out, "2.5");
    }

    #[tokio::test]
    async fn formats_integers_and_decimals() {
        assert_eq!(CalculatorTool.execute("10 / 2".into()).await.unwrap(), "5");
        let third = CalculatorTool.execute("10 / 3".into()).await.unwrap();
        assert!(third.starts_with("3.333"));
    }

    #[tokio::test]
    async fn missing_expression_field() {
        let input = ToolInput::from(serde_json::json!({"expr": "1"}));
        let err = CalculatorTool.execute(input).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn evaluation_fault_is_an_error() {
        let err = CalculatorTool.execute("1 / 0".into()).await.unwrap_err();
        assert!(err.to_string().contains("Division by zero"));
    }
}
