//! Restricted expression language for custom steps.
//!
//! Custom step sources are evaluated against the run context only; there is
//! no host access of any kind. An expression can read `step` (the step
//! settings), `inputs` (the raw input values), and `previous` (the prior
//! step's result), combine them with literals and operators, and produce a
//! single JSON value that becomes this step's result.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr     := or ( "?" expr ":" expr )?
//! or       := and ( "||" and )*
//! and      := equality ( "&&" equality )*
//! equality := compare ( ("==" | "!=") compare )*
//! compare  := additive ( ("<" | "<=" | ">" | ">=") additive )*
//! additive := term ( ("+" | "-") term )*
//! term     := unary ( ("*" | "/") unary )*
//! unary    := ("-" | "!") unary | postfix
//! postfix  := primary ( "." ident | "[" expr "]" )*
//! primary  := number | string | "true" | "false" | "null"
//!           | "step" | "inputs" | "previous"
//!           | "[" ( expr ("," expr)* )? "]"
//!           | "{" ( member ("," member)* )? "}"
//!           | "(" expr ")"
//! ```
//!
//! Missing path segments evaluate to `null`; operator type mismatches are
//! evaluation errors.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("parse error at offset {pos}: {msg}")]
    Parse { pos: usize, msg: String },
    #[error("type error: {0}")]
    Type(String),
    #[error("division by zero")]
    DivisionByZero,
}

/// Context a custom step expression evaluates against.
pub struct StepContext<'a> {
    pub step: &'a Value,
    pub inputs: &'a Value,
    pub previous: &'a Value,
}

/// Parses and evaluates `source` against `ctx`.
pub fn evaluate(source: &str, ctx: &StepContext<'_>) -> Result<Value, ExprError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expression()?;
    parser.expect_end()?;
    eval(&expr, ctx)
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    Question,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ExprError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                i += 1;
            }
            '(' => {
                tokens.push((Token::LParen, i));
                i += 1;
            }
            ')' => {
                tokens.push((Token::RParen, i));
                i += 1;
            }
            '[' => {
                tokens.push((Token::LBracket, i));
                i += 1;
            }
            ']' => {
                tokens.push((Token::RBracket, i));
                i += 1;
            }
            '{' => {
                tokens.push((Token::LBrace, i));
                i += 1;
            }
            '}' => {
                tokens.push((Token::RBrace, i));
                i += 1;
            }
            ',' => {
                tokens.push((Token::Comma, i));
                i += 1;
            }
            ':' => {
                tokens.push((Token::Colon, i));
                i += 1;
            }
            '.' => {
                tokens.push((Token::Dot, i));
                i += 1;
            }
            '?' => {
                tokens.push((Token::Question, i));
                i += 1;
            }
            '+' => {
                tokens.push((Token::Plus, i));
                i += 1;
            }
            '-' => {
                tokens.push((Token::Minus, i));
                i += 1;
            }
            '*' => {
                tokens.push((Token::Star, i));
                i += 1;
            }
            '/' => {
                tokens.push((Token::Slash, i));
                i += 1;
            }
            '=' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((Token::EqEq, i));
                    i += 2;
                } else {
                    return Err(ExprError::Parse {
                        pos: i,
                        msg: "assignment is not supported; use '=='".to_string(),
                    });
                }
            }
            '!' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((Token::NotEq, i));
                    i += 2;
                } else {
                    tokens.push((Token::Bang, i));
                    i += 1;
                }
            }
            '<' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((Token::Le, i));
                    i += 2;
                } else {
                    tokens.push((Token::Lt, i));
                    i += 1;
                }
            }
            '>' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push((Token::Ge, i));
                    i += 2;
                } else {
                    tokens.push((Token::Gt, i));
                    i += 1;
                }
            }
            '&' => {
                if bytes.get(i + 1) == Some(&b'&') {
                    tokens.push((Token::AndAnd, i));
                    i += 2;
                } else {
                    return Err(ExprError::Parse {
                        pos: i,
                        msg: "expected '&&'".to_string(),
                    });
                }
            }
            '|' => {
                if bytes.get(i + 1) == Some(&b'|') {
                    tokens.push((Token::OrOr, i));
                    i += 2;
                } else {
                    return Err(ExprError::Parse {
                        pos: i,
                        msg: "expected '||'".to_string(),
                    });
                }
            }
            '"' | '\'' => {
                let (s, next) = scan_string(source, i, c)?;
                tokens.push((Token::Str(s), i));
                i = next;
            }
            _ if c.is_ascii_digit() => {
                let start = i;
                while i < bytes.len()
                    && ((bytes[i] as char).is_ascii_digit() || bytes[i] == b'.')
                {
                    i += 1;
                }
                let text = &source[start..i];
                let num: f64 = text.parse().map_err(|_| ExprError::Parse {
                    pos: start,
                    msg: format!("invalid number '{}'", text),
                })?;
                tokens.push((Token::Number(num), start));
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < bytes.len()
                    && ((bytes[i] as char).is_ascii_alphanumeric() || bytes[i] == b'_')
                {
                    i += 1;
                }
                tokens.push((Token::Ident(source[start..i].to_string()), start));
            }
            _ => {
                return Err(ExprError::Parse {
                    pos: i,
                    msg: format!("unexpected character '{}'", c),
                });
            }
        }
    }

    Ok(tokens)
}

fn scan_string(source: &str, start: usize, quote: char) -> Result<(String, usize), ExprError> {
    let body_start = start + 1;
    let mut out = String::new();
    let mut iter = source[body_start..].char_indices();
    while let Some((off, c)) = iter.next() {
        let abs = body_start + off;
        if c == quote {
            return Ok((out, abs + 1));
        }
        if c == '\\' {
            match iter.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, '"')) => out.push('"'),
                Some((_, '\'')) => out.push('\''),
                Some((_, other)) => {
                    return Err(ExprError::Parse {
                        pos: abs,
                        msg: format!("unsupported escape '\\{}'", other),
                    });
                }
                None => {
                    return Err(ExprError::Parse {
                        pos: abs,
                        msg: "unterminated escape".to_string(),
                    });
                }
            }
        } else {
            out.push(c);
        }
    }
    Err(ExprError::Parse {
        pos: start,
        msg: "unterminated string".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum ContextRoot {
    Step,
    Inputs,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone)]
enum Expr {
    Literal(Value),
    Root(ContextRoot),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
    Not(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
    Array(Vec<Expr>),
    Object(Vec<(String, Expr)>),
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn here(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|(_, p)| *p)
            .unwrap_or(0)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        self.pos += 1;
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<(), ExprError> {
        if self.eat(&token) {
            Ok(())
        } else {
            Err(ExprError::Parse {
                pos: self.here(),
                msg: format!("expected {}", what),
            })
        }
    }

    fn expect_end(&mut self) -> Result<(), ExprError> {
        if self.pos == self.tokens.len() {
            Ok(())
        } else {
            Err(ExprError::Parse {
                pos: self.here(),
                msg: "unexpected trailing input".to_string(),
            })
        }
    }

    fn expression(&mut self) -> Result<Expr, ExprError> {
        let cond = self.or_expr()?;
        if self.eat(&Token::Question) {
            let then = self.expression()?;
            self.expect(Token::Colon, "':' in conditional")?;
            let other = self.expression()?;
            return Ok(Expr::Ternary(
                Box::new(cond),
                Box::new(then),
                Box::new(other),
            ));
        }
        Ok(cond)
    }

    fn or_expr(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.and_expr()?;
        while self.eat(&Token::OrOr) {
            let right = self.and_expr()?;
            left = Expr::Binary(BinOp::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.equality()?;
        while self.eat(&Token::AndAnd) {
            let right = self.equality()?;
            left = Expr::Binary(BinOp::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.comparison()?;
        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => BinOp::Eq,
                Some(Token::NotEq) => BinOp::Ne,
                _ => break,
            };
            self.pos += 1;
            let right = self.comparison()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn comparison(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => BinOp::Lt,
                Some(Token::Le) => BinOp::Le,
                Some(Token::Gt) => BinOp::Gt,
                Some(Token::Ge) => BinOp::Ge,
                _ => break,
            };
            self.pos += 1;
            let right = self.additive()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let right = self.term()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.pos += 1;
            let right = self.unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        if self.eat(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        if self.eat(&Token::Bang) {
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.primary()?;
        loop {
            if self.eat(&Token::Dot) {
                let pos = self.here();
                match self.advance() {
                    Some(Token::Ident(name)) => {
                        expr = Expr::Member(Box::new(expr), name);
                    }
                    _ => {
                        return Err(ExprError::Parse {
                            pos,
                            msg: "expected field name after '.'".to_string(),
                        });
                    }
                }
            } else if self.eat(&Token::LBracket) {
                let index = self.expression()?;
                self.expect(Token::RBracket, "']'")?;
                expr = Expr::Index(Box::new(expr), Box::new(index));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        let pos = self.here();
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Literal(number_value(n))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::String(s))),
            Some(Token::Ident(name)) => match name.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                "null" => Ok(Expr::Literal(Value::Null)),
                "step" => Ok(Expr::Root(ContextRoot::Step)),
                "inputs" => Ok(Expr::Root(ContextRoot::Inputs)),
                "previous" => Ok(Expr::Root(ContextRoot::Previous)),
                other => Err(ExprError::Parse {
                    pos,
                    msg: format!(
                        "unknown identifier '{}'; only step, inputs, and previous are in scope",
                        other
                    ),
                }),
            },
            Some(Token::LParen) => {
                let expr = self.expression()?;
                self.expect(Token::RParen, "')'")?;
                Ok(expr)
            }
            Some(Token::LBracket) => {
                let mut items = Vec::new();
                if !self.eat(&Token::RBracket) {
                    loop {
                        items.push(self.expression()?);
                        if self.eat(&Token::RBracket) {
                            break;
                        }
                        self.expect(Token::Comma, "',' or ']'")?;
                    }
                }
                Ok(Expr::Array(items))
            }
            Some(Token::LBrace) => {
                let mut members = Vec::new();
                if !self.eat(&Token::RBrace) {
                    loop {
                        let key_pos = self.here();
                        let key = match self.advance() {
                            Some(Token::Str(s)) => s,
                            Some(Token::Ident(s)) => s,
                            _ => {
                                return Err(ExprError::Parse {
                                    pos: key_pos,
                                    msg: "expected object key".to_string(),
                                });
                            }
                        };
                        self.expect(Token::Colon, "':' after object key")?;
                        members.push((key, self.expression()?));
                        if self.eat(&Token::RBrace) {
                            break;
                        }
                        self.expect(Token::Comma, "',' or '}'")?;
                    }
                }
                Ok(Expr::Object(members))
            }
            _ => Err(ExprError::Parse {
                pos,
                msg: "expected expression".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

fn number_value(n: f64) -> Value {
    // Prefer integer representation when exact, like JSON itself would.
    if n.fract() == 0.0 && n.abs() < 9e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn as_number(value: &Value, op: &str) -> Result<f64, ExprError> {
    value
        .as_f64()
        .ok_or_else(|| ExprError::Type(format!("'{}' requires numbers, got {}", op, value)))
}

fn as_bool(value: &Value, what: &str) -> Result<bool, ExprError> {
    value
        .as_bool()
        .ok_or_else(|| ExprError::Type(format!("{} requires a boolean, got {}", what, value)))
}

fn eval(expr: &Expr, ctx: &StepContext<'_>) -> Result<Value, ExprError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Root(root) => Ok(match root {
            ContextRoot::Step => ctx.step.clone(),
            ContextRoot::Inputs => ctx.inputs.clone(),
            ContextRoot::Previous => ctx.previous.clone(),
        }),
        Expr::Member(target, name) => {
            let target = eval(target, ctx)?;
            Ok(target.get(name).cloned().unwrap_or(Value::Null))
        }
        Expr::Index(target, index) => {
            let target = eval(target, ctx)?;
            let index = eval(index, ctx)?;
            Ok(match &index {
                Value::String(key) => target.get(key.as_str()).cloned().unwrap_or(Value::Null),
                Value::Number(n) => match n.as_u64() {
                    Some(i) => target.get(i as usize).cloned().unwrap_or(Value::Null),
                    None => Value::Null,
                },
                _ => Value::Null,
            })
        }
        Expr::Neg(inner) => {
            let value = eval(inner, ctx)?;
            Ok(number_value(-as_number(&value, "-")?))
        }
        Expr::Not(inner) => {
            let value = eval(inner, ctx)?;
            Ok(Value::Bool(!as_bool(&value, "'!'")?))
        }
        Expr::Binary(op, left, right) => eval_binary(*op, left, right, ctx),
        Expr::Ternary(cond, then, other) => {
            let cond = eval(cond, ctx)?;
            if as_bool(&cond, "conditional")? {
                eval(then, ctx)
            } else {
                eval(other, ctx)
            }
        }
        Expr::Array(items) => {
            let values = items
                .iter()
                .map(|item| eval(item, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(values))
        }
        Expr::Object(members) => {
            let mut map = Map::new();
            for (key, value) in members {
                map.insert(key.clone(), eval(value, ctx)?);
            }
            Ok(Value::Object(map))
        }
    }
}

fn eval_binary(
    op: BinOp,
    left: &Expr,
    right: &Expr,
    ctx: &StepContext<'_>,
) -> Result<Value, ExprError> {
    // Logical operators short-circuit; everything else evaluates both sides.
    match op {
        BinOp::And => {
            let left = eval(left, ctx)?;
            if !as_bool(&left, "'&&'")? {
                return Ok(Value::Bool(false));
            }
            let right = eval(right, ctx)?;
            return Ok(Value::Bool(as_bool(&right, "'&&'")?));
        }
        BinOp::Or => {
            let left = eval(left, ctx)?;
            if as_bool(&left, "'||'")? {
                return Ok(Value::Bool(true));
            }
            let right = eval(right, ctx)?;
            return Ok(Value::Bool(as_bool(&right, "'||'")?));
        }
        _ => {}
    }

    let left = eval(left, ctx)?;
    let right = eval(right, ctx)?;

    Ok(match op {
        BinOp::Add => match (&left, &right) {
            (Value::String(a), Value::String(b)) => Value::String(format!("{}{}", a, b)),
            _ => number_value(as_number(&left, "+")? + as_number(&right, "+")?),
        },
        BinOp::Sub => number_value(as_number(&left, "-")? - as_number(&right, "-")?),
        BinOp::Mul => number_value(as_number(&left, "*")? * as_number(&right, "*")?),
        BinOp::Div => {
            let divisor = as_number(&right, "/")?;
            if divisor == 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            number_value(as_number(&left, "/")? / divisor)
        }
        BinOp::Eq => Value::Bool(left == right),
        BinOp::Ne => Value::Bool(left != right),
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            let ordering = match (&left, &right) {
                (Value::String(a), Value::String(b)) => a.cmp(b),
                _ => {
                    let (a, b) = (as_number(&left, "comparison")?, as_number(&right, "comparison")?);
                    a.partial_cmp(&b).ok_or_else(|| {
                        ExprError::Type("comparison of incomparable numbers".to_string())
                    })?
                }
            };
            Value::Bool(match op {
                BinOp::Lt => ordering.is_lt(),
                BinOp::Le => ordering.is_le(),
                BinOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            })
        }
        BinOp::And | BinOp::Or => unreachable!("handled above"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx_values() -> (Value, Value, Value) {
        (
            json!({ "name": "migrate users", "type": "custom" }),
            json!([{ "factor": 3 }, "env-a"]),
            json!({ "users": { "a": { "count": 2 } }, "ids": [10, 20, 30] }),
        )
    }

    fn run(source: &str) -> Result<Value, ExprError> {
        let (step, inputs, previous) = ctx_values();
        evaluate(
            source,
            &StepContext {
                step: &step,
                inputs: &inputs,
                previous: &previous,
            },
        )
    }

    #[test]
    fn literals_and_arithmetic() {
        assert_eq!(run("1 + 2 * 3").unwrap(), json!(7));
        assert_eq!(run("(1 + 2) * 3").unwrap(), json!(9));
        assert_eq!(run("10 / 4").unwrap(), json!(2.5));
        assert_eq!(run("-2 + 1").unwrap(), json!(-1));
        assert_eq!(run("'a' + 'b'").unwrap(), json!("ab"));
    }

    #[test]
    fn context_paths() {
        assert_eq!(run("step.name").unwrap(), json!("migrate users"));
        assert_eq!(run("inputs[0].factor").unwrap(), json!(3));
        assert_eq!(run("previous.users['a'].count").unwrap(), json!(2));
        assert_eq!(run("previous.ids[2]").unwrap(), json!(30));
    }

    #[test]
    fn missing_paths_are_null() {
        assert_eq!(run("previous.nothing.at.all").unwrap(), Value::Null);
        assert_eq!(run("inputs[9]").unwrap(), Value::Null);
        assert_eq!(run("previous.ids[99]").unwrap(), Value::Null);
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(run("1 < 2 && 2 <= 2").unwrap(), json!(true));
        assert_eq!(run("'a' < 'b'").unwrap(), json!(true));
        assert_eq!(run("previous.users.a.count == 2").unwrap(), json!(true));
        assert_eq!(run("false || !false").unwrap(), json!(true));
        assert_eq!(run("previous.nothing == null").unwrap(), json!(true));
    }

    #[test]
    fn short_circuit_skips_right_side() {
        // The right side would be a type error if evaluated.
        assert_eq!(run("false && (1 + 'x' == null)").unwrap(), json!(false));
        assert_eq!(run("true || (1 + 'x' == null)").unwrap(), json!(true));
    }

    #[test]
    fn conditional_selects_branch() {
        assert_eq!(
            run("inputs[0].factor > 2 ? 'big' : 'small'").unwrap(),
            json!("big")
        );
    }

    #[test]
    fn constructors_build_json() {
        assert_eq!(
            run("{ total: previous.ids[0] + previous.ids[1], tags: ['a', 'b'] }").unwrap(),
            json!({ "total": 30, "tags": ["a", "b"] })
        );
    }

    #[test]
    fn unknown_identifiers_are_rejected_at_parse_time() {
        let err = run("process.env").unwrap_err();
        assert!(matches!(err, ExprError::Parse { .. }));
        assert!(err.to_string().contains("unknown identifier"));
    }

    #[test]
    fn type_mismatches_are_eval_errors() {
        assert!(matches!(run("1 + 'a'").unwrap_err(), ExprError::Type(_)));
        assert!(matches!(run("1 ? 2 : 3").unwrap_err(), ExprError::Type(_)));
        assert_eq!(run("1 / 0").unwrap_err(), ExprError::DivisionByZero);
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        assert!(matches!(run("1 +").unwrap_err(), ExprError::Parse { .. }));
        assert!(matches!(run("(1").unwrap_err(), ExprError::Parse { .. }));
        assert!(matches!(run("1 2").unwrap_err(), ExprError::Parse { .. }));
        assert!(matches!(run("'open").unwrap_err(), ExprError::Parse { .. }));
    }
}
