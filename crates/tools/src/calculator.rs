//! Calculator tool — evaluates arithmetic expressions.
//!
//! Input is screened against a fixed character set before anything else
//! happens; only digits, `+ - * / . ( )` and spaces get through. What passes
//! is evaluated by a small recursive-descent parser. The input is never
//! handed to anything that could execute it.
//!
//! Supported: `+`, `-`, `*`, `/`, `//` (floor division), `**` (power),
//! parentheses, unary `+`/`-`, decimals.

use async_trait::async_trait;
use reactloop_core::error::ToolError;
use reactloop_core::tool::Tool;

const REJECTION: &str = "Invalid expression. Only numbers and basic operators allowed.";

pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Simple calculator tool. Evaluates arithmetic using numbers, + - * / and parentheses, e.g. (2 + 3) * 4."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        if !is_allowed(input) {
            return Err(ToolError::InvalidInput(REJECTION.into()));
        }

        let value = evaluate(input).map_err(ToolError::Failed)?;
        Ok(format!("Result: {}", format_number(value)))
    }
}

/// Whether every character is in the accepted set. Empty input is rejected.
pub fn is_allowed(expr: &str) -> bool {
    !expr.is_empty()
        && expr.chars().all(|c| {
            c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '.' | '(' | ')' | ' ')
        })
}

fn format_number(value: f64) -> String {
    // Remove trailing .0 for integers.
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ── Recursive-descent expression evaluator ────────────────────────────────

/// Evaluate an arithmetic expression string.
pub fn evaluate(expr: &str) -> Result<f64, String> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser::new(&tokens);
    let result = parser.parse_expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(format!(
            "Unexpected token at position {}: {:?}",
            parser.pos, parser.tokens[parser.pos]
        ));
    }
    if !result.is_finite() {
        return Err("Result out of range".into());
    }
    Ok(result)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            ' ' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::DoubleStar);
                i += 2;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                tokens.push(Token::DoubleSlash);
                i += 2;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let num_str: String = chars[start..i].iter().collect();
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| format!("Invalid number: {}", num_str))?;
                tokens.push(Token::Number(num));
            }
            c => return Err(format!("Unexpected character: '{}'", c)),
        }
    }

    Ok(tokens)
}

/// Nesting limit for parentheses, signs and exponents combined.
const MAX_DEPTH: usize = 256;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    // expr = term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<f64, String> {
        let mut left = self.parse_term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.consume();
                    left += self.parse_term()?;
                }
                Token::Minus => {
                    self.consume();
                    left -= self.parse_term()?;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    // term = unary (('*' | '/' | '//') unary)*
    fn parse_term(&mut self) -> Result<f64, String> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.consume();
                    left *= self.parse_unary()?;
                }
                Token::Slash => {
                    self.consume();
                    let right = self.parse_unary()?;
                    if right == 0.0 {
                        return Err("Division by zero".into());
                    }
                    left /= right;
                }
                Token::DoubleSlash => {
                    self.consume();
                    let right = self.parse_unary()?;
                    if right == 0.0 {
                        return Err("Division by zero".into());
                    }
                    left = (left / right).floor();
                }
                _ => break,
            }
        }
        Ok(left)
    }

    // unary = ('-' | '+') unary | power
    //
    // Every recursive path passes through here, so this is where depth is
    // bounded.
    fn parse_unary(&mut self) -> Result<f64, String> {
        if self.depth >= MAX_DEPTH {
            return Err("Expression nested too deeply".into());
        }
        self.depth += 1;
        let result = self.parse_signed();
        self.depth -= 1;
        result
    }

    fn parse_signed(&mut self) -> Result<f64, String> {
        match self.peek() {
            Some(Token::Minus) => {
                self.consume();
                Ok(-self.parse_unary()?)
            }
            Some(Token::Plus) => {
                self.consume();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    // power = primary ('**' unary)?
    // Right-associative; binds tighter than a unary minus on its left.
    fn parse_power(&mut self) -> Result<f64, String> {
        let base = self.parse_primary()?;
        if let Some(Token::DoubleStar) = self.peek() {
            self.consume();
            let exponent = self.parse_unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    // primary = NUMBER | '(' expr ')'
    fn parse_primary(&mut self) -> Result<f64, String> {
        match self.consume() {
            Some(Token::Number(n)) => Ok(*n),
            Some(Token::LParen) => {
                let val = self.parse_expr()?;
                match self.consume() {
                    Some(Token::RParen) => Ok(val),
                    _ => Err("Expected closing parenthesis".into()),
                }
            }
            Some(tok) => Err(format!("Unexpected token: {:?}", tok)),
            None => Err("Unexpected end of expression".into()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_addition() {
        assert_eq!(evaluate("2 + 3").unwrap(), 5.0);
    }

    #[test]
    fn operator_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
    }

    #[test]
    fn parentheses() {
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
    }

    #[test]
    fn division() {
        assert_eq!(evaluate("10 / 4").unwrap(), 2.5);
    }

    #[test]
    fn division_by_zero() {
        assert!(evaluate("1 / 0").is_err());
        assert!(evaluate("1 // 0").is_err());
    }

    #[test]
    fn floor_division_and_power() {
        assert_eq!(evaluate("7 // 2").unwrap(), 3.0);
        assert_eq!(evaluate("-7 // 2").unwrap(), -4.0);
        assert_eq!(evaluate("2 ** 3 ** 2").unwrap(), 512.0);
        assert_eq!(evaluate("-2 ** 2").unwrap(), -4.0);
    }

    #[test]
    fn unary_operators() {
        assert_eq!(evaluate("-5 + 3").unwrap(), -2.0);
        assert_eq!(evaluate("+5 - -3").unwrap(), 8.0);
    }

    #[test]
    fn decimals() {
        assert_eq!(evaluate("12 * 0.5 * 8.50 + 12 * 3.25").unwrap(), 90.0);
    }

    #[test]
    fn invalid_expression() {
        assert!(evaluate("2 +").is_err());
        assert!(evaluate("1.2.3").is_err());
        assert!(evaluate("(1 + 2").is_err());
    }

    #[test]
    fn overflow_is_error() {
        assert!(evaluate("10 ** 400").is_err());
    }

    #[test]
    fn nesting_within_limit() {
        let expr = format!("{}7{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(evaluate(&expr).unwrap(), 7.0);
        assert_eq!(evaluate(&format!("{}3", "-".repeat(100))).unwrap(), 3.0);
    }

    #[test]
    fn deep_nesting_is_error() {
        let parens = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(evaluate(&parens).unwrap_err(), "Expression nested too deeply");

        let signs = format!("{}1", "-".repeat(10_000));
        assert!(evaluate(&signs).is_err());

        let powers = vec!["2"; 10_000].join("**");
        assert!(evaluate(&powers).is_err());
    }

    #[test]
    fn character_screen() {
        assert!(is_allowed("2+2"));
        assert!(is_allowed("(1.5 * 4) / 2"));
        assert!(!is_allowed(""));
        assert!(!is_allowed("__import__('os')"));
        assert!(!is_allowed("2\t+ 2"));
        assert!(!is_allowed("2 % 3"));
    }

    #[tokio::test]
    async fn tool_returns_result_prefix() {
        let out = CalculatorTool.invoke("2+2").await.unwrap();
        assert_eq!(out, "Result: 4");

        let out = CalculatorTool.invoke("12*7").await.unwrap();
        assert_eq!(out, "Result: 84");
    }

    #[tokio::test]
    async fn tool_formats_decimals() {
        let out = CalculatorTool.invoke("10 / 4").await.unwrap();
        assert_eq!(out, "Result: 2.5");
    }

    #[tokio::test]
    async fn tool_rejects_code_without_evaluating() {
        let err = CalculatorTool.invoke("__import__('os')").await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
        assert!(err.to_string().contains("Only numbers and basic operators"));
    }

    #[tokio::test]
    async fn tool_fails_cleanly_on_deep_nesting() {
        let input = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(is_allowed(&input));
        let err = CalculatorTool.invoke(&input).await.unwrap_err();
        assert!(matches!(err, ToolError::Failed(_)));
        assert!(err.to_string().contains("nested too deeply"));
    }

    #[tokio::test]
    async fn tool_reports_evaluation_errors() {
        let err = CalculatorTool.invoke("1 / 0").await.unwrap_err();
        assert!(matches!(err, ToolError::Failed(_)));
        assert!(err.to_string().contains("Division by zero"));
    }
}
