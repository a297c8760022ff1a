//! Closed-grammar arithmetic evaluation.
//!
//! Formulas never reach a general-purpose interpreter. After cell references
//! have been substituted, the remaining text is evaluated here against a
//! fixed grammar:
//!
//! ```text
//! expr    --> term ( ("+" | "-") term )*
//! term    --> unary ( ("*" | "/") unary )*
//! unary   --> ("+" | "-") unary | primary
//! primary --> NUMBER | "(" expr ")"
//! ```
//!
//! Identifiers and calls are not part of the grammar, so there is nothing to
//! resolve or execute. Division follows IEEE-754; callers decide what to do
//! with non-finite results.

use thiserror::Error;

/// Maximum nesting of parentheses and unary operators.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("malformed number {0:?}")]
    BadNumber(String),

    #[error("unexpected {0}")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("expression nested deeper than {} levels", MAX_DEPTH)]
    TooDeep,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn describe(self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        let token = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n = literal
                    .parse::<f64>()
                    .map_err(|_| ExprError::BadNumber(literal.clone()))?;
                tokens.push(Token::Number(n));
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => return Err(ExprError::UnexpectedChar { ch: other, offset }),
        };
        tokens.push(token);
        chars.next();
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn descend(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::TooDeep);
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<f64, ExprError> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    acc += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    acc -= self.term()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn term(&mut self) -> Result<f64, ExprError> {
        let mut acc = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    acc *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    acc /= self.unary()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, ExprError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.descend()?;
                let value = -self.unary()?;
                self.depth -= 1;
                Ok(value)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.descend()?;
                let value = self.unary()?;
                self.depth -= 1;
                Ok(value)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, ExprError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                self.descend()?;
                let value = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => {
                        self.depth -= 1;
                        Ok(value)
                    }
                    Some(other) => Err(ExprError::UnexpectedToken(other.describe())),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            Some(other) => Err(ExprError::UnexpectedToken(other.describe())),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

/// Evaluate an arithmetic expression.
pub fn evaluate(text: &str) -> Result<f64, ExprError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    match parser.peek() {
        None => Ok(value),
        Some(extra) => Err(ExprError::UnexpectedToken(extra.describe())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("2 + 3 * 4"), Ok(14.0));
        assert_eq!(evaluate("(2 + 3) * 4"), Ok(20.0));
        assert_eq!(evaluate("10 - 4 / 2"), Ok(8.0));
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(evaluate("10 - 3 - 2"), Ok(5.0));
        assert_eq!(evaluate("8 / 4 / 2"), Ok(1.0));
        assert_eq!(evaluate("2 * 3 / 4"), Ok(1.5));
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(evaluate("-3"), Ok(-3.0));
        assert_eq!(evaluate("2*-3"), Ok(-6.0));
        assert_eq!(evaluate("2 - -3"), Ok(5.0));
        assert_eq!(evaluate("-(1 + 1)"), Ok(-2.0));
        assert_eq!(evaluate("+4"), Ok(4.0));
    }

    #[test]
    fn test_decimal_literals() {
        assert_eq!(evaluate("1.5 + .5"), Ok(2.0));
        assert_eq!(evaluate("5. * 2"), Ok(10.0));
        assert!(matches!(evaluate("1.2.3"), Err(ExprError::BadNumber(_))));
        assert!(matches!(evaluate("."), Err(ExprError::BadNumber(_))));
    }

    #[test]
    fn test_division_is_ieee() {
        assert_eq!(evaluate("1/0"), Ok(f64::INFINITY));
        assert!(evaluate("0/0").unwrap().is_nan());
    }

    #[test]
    fn test_rejects_identifiers() {
        assert_eq!(
            evaluate("DELETE(1)"),
            Err(ExprError::UnexpectedChar { ch: 'D', offset: 0 })
        );
        assert!(evaluate("1 + x").is_err());
    }

    #[test]
    fn test_malformed_structure() {
        assert_eq!(evaluate(""), Err(ExprError::Empty));
        assert_eq!(evaluate("   "), Err(ExprError::Empty));
        assert_eq!(evaluate("1 +"), Err(ExprError::UnexpectedEnd));
        assert_eq!(evaluate("(1 + 2"), Err(ExprError::UnexpectedEnd));
        assert!(matches!(evaluate("1 2"), Err(ExprError::UnexpectedToken(_))));
        assert!(matches!(evaluate("2(3)"), Err(ExprError::UnexpectedToken(_))));
        assert!(matches!(evaluate("()"), Err(ExprError::UnexpectedToken(_))));
        assert!(matches!(evaluate("1 )"), Err(ExprError::UnexpectedToken(_))));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(evaluate(&deep), Err(ExprError::TooDeep));

        let ok = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(evaluate(&ok), Ok(1.0));

        let negations = "-".repeat(MAX_DEPTH + 1) + "1";
        assert_eq!(evaluate(&negations), Err(ExprError::TooDeep));
    }
}
