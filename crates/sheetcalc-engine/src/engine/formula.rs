//! Formula tokenizing and rewriting.
//!
//! A formula body (the text after `=`) is uppercased and split into numeric
//! literals, cell references, the four arithmetic operators and parentheses.
//! Anything else, or unbalanced parentheses, makes the formula malformed.
//!
//! The token stream is then lowered into a Rhai script of `let` statements,
//! one per operation, ordered by the usual precedence. Numeric literals become
//! float literals (so `7/2` is `3.5`, never integer division) and references
//! stay as bare names bound in the evaluation scope. Each statement is a
//! single operation, so long chains like `A0+A1+...+A99` never nest.

use super::cell_ref::CellRef;

/// Maximum parenthesis nesting accepted in one formula.
const MAX_NESTING: usize = 64;

/// A lexical token of a formula body.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(String),
    Ref(String),
    Op(char),
    LParen,
    RParen,
}

/// A reference token together with its resolved coordinate.
/// `cell` is None when the name is not a valid single-letter coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct Reference {
    pub name: String,
    pub cell: Option<CellRef>,
}

/// A tokenized formula body.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    /// None when the body is not a well-formed arithmetic expression.
    script: Option<String>,
    references: Vec<Reference>,
}

impl Formula {
    /// Tokenize a formula body (without the leading `=`).
    pub fn parse(body: &str) -> Formula {
        let tokens = tokenize(&body.to_ascii_uppercase());

        let mut references: Vec<Reference> = Vec::new();
        for token in tokens.iter().flatten() {
            if let Token::Ref(name) = token {
                if references.iter().all(|r| &r.name != name) {
                    references.push(Reference {
                        name: name.clone(),
                        cell: CellRef::from_str(name),
                    });
                }
            }
        }

        let script = tokens.as_deref().and_then(lower);
        Formula { script, references }
    }

    pub fn is_valid(&self) -> bool {
        self.script.is_some()
    }

    /// Distinct references in order of first appearance.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// The lowered Rhai script, or None if the formula is malformed.
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }
}

/// Split an uppercased formula body into tokens.
fn tokenize(body: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = body.chars().collect();
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '+' | '-' | '*' | '/' => {
                tokens.push(Token::Op(c));
                i += 1;
            }
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return None;
                }
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                depth = depth.checked_sub(1)?;
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                let mut seen_dot = false;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    if chars[i] == '.' {
                        if seen_dot {
                            break;
                        }
                        seen_dot = true;
                    }
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                if literal == "." {
                    return None;
                }
                tokens.push(Token::Number(literal));
            }
            'A'..='Z' => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_uppercase() {
                    i += 1;
                }
                let digits_start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i == digits_start {
                    return None;
                }
                tokens.push(Token::Ref(chars[start..i].iter().collect()));
            }
            _ => return None,
        }
    }

    if depth != 0 || tokens.is_empty() {
        return None;
    }
    Some(tokens)
}

/// An operator waiting on the lowering stack.
#[derive(Clone, Copy, Debug)]
enum Pending {
    Binary(char),
    Negate,
    Open,
}

fn precedence(op: char) -> u8 {
    match op {
        '*' | '/' => 2,
        _ => 1,
    }
}

/// Lower tokens into Rhai statements with the shunting-yard algorithm.
/// Returns None when the tokens do not form an arithmetic expression.
fn lower(tokens: &[Token]) -> Option<String> {
    let mut pending: Vec<Pending> = Vec::new();
    let mut operands: Vec<String> = Vec::new();
    let mut statements: Vec<String> = Vec::new();
    let mut expect_operand = true;

    for token in tokens {
        match token {
            Token::Number(literal) => {
                if !expect_operand {
                    return None;
                }
                operands.push(float_literal(literal));
                expect_operand = false;
            }
            Token::Ref(name) => {
                if !expect_operand {
                    return None;
                }
                operands.push(name.clone());
                expect_operand = false;
            }
            Token::Op(op) if expect_operand => match *op {
                '-' => pending.push(Pending::Negate),
                '+' => {}
                _ => return None,
            },
            Token::Op(op) => {
                while let Some(&top) = pending.last() {
                    match top {
                        Pending::Negate => {}
                        Pending::Binary(prev) if precedence(prev) >= precedence(*op) => {}
                        _ => break,
                    }
                    pending.pop();
                    apply(top, &mut operands, &mut statements)?;
                }
                pending.push(Pending::Binary(*op));
                expect_operand = true;
            }
            Token::LParen => {
                if !expect_operand {
                    return None;
                }
                pending.push(Pending::Open);
            }
            Token::RParen => {
                if expect_operand {
                    return None;
                }
                loop {
                    match pending.pop()? {
                        Pending::Open => break,
                        top => apply(top, &mut operands, &mut statements)?,
                    }
                }
            }
        }
    }

    if expect_operand {
        return None;
    }
    while let Some(top) = pending.pop() {
        apply(top, &mut operands, &mut statements)?;
    }

    let result = operands.pop()?;
    if !operands.is_empty() {
        return None;
    }
    statements.push(result);
    Some(statements.join(" "))
}

/// Emit one statement for `op`, leaving its temporary on the operand stack.
fn apply(op: Pending, operands: &mut Vec<String>, statements: &mut Vec<String>) -> Option<()> {
    let target = format!("t{}", statements.len());
    let statement = match op {
        Pending::Negate => {
            let value = operands.pop()?;
            format!("let {} = -{};", target, value)
        }
        Pending::Binary(op) => {
            let rhs = operands.pop()?;
            let lhs = operands.pop()?;
            format!("let {} = {} {} {};", target, lhs, op, rhs)
        }
        Pending::Open => return None,
    };
    statements.push(statement);
    operands.push(target);
    Some(())
}

/// Normalize a numeric literal so Rhai reads it as a float.
fn float_literal(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len() + 2);
    if literal.starts_with('.') {
        out.push('0');
    }
    out.push_str(literal);
    if !literal.contains('.') {
        out.push_str(".0");
    } else if literal.ends_with('.') {
        out.push('0');
    }
    out
}
