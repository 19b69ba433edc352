//! Formula lexer, parser and expression tree.
//!
//! Supports numbers (`12`, `1.5`, `.5`, `1e3`), cell references (`A1`,
//! `AB12`), binary `+ - * /`, unary `+ -` and parentheses.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use super::position::{Position, letters_to_col};
use super::value::FormulaError;

/// Formula text failed to lex or parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Formula parse error: {0}")]
pub struct ParseError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn symbol(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Cell(Position),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Limit on parenthesis and unary nesting, and on the height of the parsed tree.
const MAX_DEPTH: usize = 256;

const UNARY_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 4;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(_) | Expr::Cell(_) => ATOM_PRECEDENCE,
            Expr::Unary { .. } => UNARY_PRECEDENCE,
            Expr::Binary { op, .. } => op.precedence(),
        }
    }

    /// Evaluate the tree, resolving cell references through `lookup`.
    pub fn evaluate(
        &self,
        lookup: &mut dyn FnMut(Position) -> Result<f64, FormulaError>,
    ) -> Result<f64, FormulaError> {
        let result = match self {
            Expr::Number(n) => *n,
            Expr::Cell(pos) => lookup(*pos)?,
            Expr::Unary { op, operand } => {
                let v = operand.evaluate(lookup)?;
                match op {
                    UnaryOp::Plus => v,
                    UnaryOp::Minus => -v,
                }
            }
            Expr::Binary { op, left, right } => {
                let l = left.evaluate(lookup)?;
                let r = right.evaluate(lookup)?;
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                }
            }
        };

        if result.is_finite() {
            Ok(result)
        } else {
            Err(FormulaError::Arithmetic)
        }
    }

    /// Collect every cell this expression references.
    pub fn collect_cells(&self, out: &mut BTreeSet<Position>) {
        match self {
            Expr::Number(_) => {}
            Expr::Cell(pos) => {
                out.insert(*pos);
            }
            Expr::Unary { operand, .. } => operand.collect_cells(out),
            Expr::Binary { left, right, .. } => {
                left.collect_cells(out);
                right.collect_cells(out);
            }
        }
    }
}

/// Canonical form: no whitespace, only the parentheses the tree needs.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Cell(pos) => write!(f, "{}", pos),
            Expr::Unary { op, operand } => {
                let sign = match op {
                    UnaryOp::Plus => '+',
                    UnaryOp::Minus => '-',
                };
                write!(f, "{}", sign)?;
                write_operand(f, operand, operand.precedence() < UNARY_PRECEDENCE)
            }
            Expr::Binary { op, left, right } => {
                let prec = op.precedence();
                write_operand(f, left, left.precedence() < prec)?;
                write!(f, "{}", op.symbol())?;
                let right_prec = right.precedence();
                let non_associative = matches!(op, BinaryOp::Sub | BinaryOp::Div);
                write_operand(
                    f,
                    right,
                    right_prec < prec || (right_prec == prec && non_associative),
                )
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

/// Parse formula text (without the leading `=`) into an expression tree.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError("Empty formula".to_string()));
    }

    let (node, pos) = parse_add_sub(&tokens, 0, 0)?;
    if pos < tokens.len() {
        return Err(ParseError(format!("Unexpected token: {:?}", tokens[pos])));
    }
    Ok(node.expr)
}

/// A parsed subtree and its height.
struct Node {
    expr: Expr,
    height: usize,
}

impl Node {
    fn leaf(expr: Expr) -> Node {
        Node { expr, height: 1 }
    }

    fn unary(op: UnaryOp, operand: Node) -> Result<Node, ParseError> {
        let height = operand.height + 1;
        Node::checked(
            Expr::Unary {
                op,
                operand: Box::new(operand.expr),
            },
            height,
        )
    }

    fn binary(op: BinaryOp, left: Node, right: Node) -> Result<Node, ParseError> {
        let height = left.height.max(right.height) + 1;
        Node::checked(
            Expr::Binary {
                op,
                left: Box::new(left.expr),
                right: Box::new(right.expr),
            },
            height,
        )
    }

    fn checked(expr: Expr, height: usize) -> Result<Node, ParseError> {
        if height > MAX_DEPTH {
            return Err(too_deep());
        }
        Ok(Node { expr, height })
    }
}

fn too_deep() -> ParseError {
    ParseError("Formula nested too deeply".to_string())
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Cell(Position),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            'A'..='Z' => {
                let mut letters = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_uppercase() {
                        letters.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let mut digits = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_digit() {
                        digits.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Cell(cell_reference(&letters, &digits)?));
            }
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                let mut seen_dot = false;
                let mut seen_digit = false;
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        seen_digit = true;
                    } else if d == '.' && !seen_dot {
                        seen_dot = true;
                    } else {
                        break;
                    }
                    num_str.push(d);
                    chars.next();
                }
                if !seen_digit {
                    return Err(ParseError(format!("Invalid number: {}", num_str)));
                }

                if let Some(&e) = chars.peek() {
                    if e == 'e' || e == 'E' {
                        num_str.push(e);
                        chars.next();
                        if let Some(&sign) = chars.peek() {
                            if sign == '+' || sign == '-' {
                                num_str.push(sign);
                                chars.next();
                            }
                        }
                        let mut exp_digits = 0;
                        while let Some(&d) = chars.peek() {
                            if !d.is_ascii_digit() {
                                break;
                            }
                            num_str.push(d);
                            chars.next();
                            exp_digits += 1;
                        }
                        if exp_digits == 0 {
                            return Err(ParseError(format!("Invalid number: {}", num_str)));
                        }
                    }
                }

                let num: f64 = num_str
                    .parse()
                    .ok()
                    .filter(|n: &f64| n.is_finite())
                    .ok_or_else(|| ParseError(format!("Invalid number: {}", num_str)))?;
                tokens.push(Token::Number(num));
            }
            _ => return Err(ParseError(format!("Unexpected character: {}", c))),
        }
    }

    Ok(tokens)
}

fn cell_reference(letters: &str, digits: &str) -> Result<Position, ParseError> {
    let invalid = || ParseError(format!("Invalid cell reference: {}{}", letters, digits));

    if digits.is_empty() || digits.starts_with('0') {
        return Err(invalid());
    }
    let col = letters_to_col(letters).ok_or_else(invalid)?;
    let row = digits
        .parse::<usize>()
        .ok()
        .and_then(|r| r.checked_sub(1))
        .ok_or_else(invalid)?;

    let pos = Position::new(row, col);
    if pos.is_valid() { Ok(pos) } else { Err(invalid()) }
}

fn parse_add_sub(
    tokens: &[Token],
    pos: usize,
    depth: usize,
) -> Result<(Node, usize), ParseError> {
    let (mut left, mut pos) = parse_mul_div(tokens, pos, depth)?;

    while pos < tokens.len() {
        let op = match &tokens[pos] {
            Token::Plus => BinaryOp::Add,
            Token::Minus => BinaryOp::Sub,
            _ => break,
        };
        let (right, new_pos) = parse_mul_div(tokens, pos + 1, depth)?;
        left = Node::binary(op, left, right)?;
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_mul_div(
    tokens: &[Token],
    pos: usize,
    depth: usize,
) -> Result<(Node, usize), ParseError> {
    let (mut left, mut pos) = parse_unary(tokens, pos, depth)?;

    while pos < tokens.len() {
        let op = match &tokens[pos] {
            Token::Star => BinaryOp::Mul,
            Token::Slash => BinaryOp::Div,
            _ => break,
        };
        let (right, new_pos) = parse_unary(tokens, pos + 1, depth)?;
        left = Node::binary(op, left, right)?;
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_unary(
    tokens: &[Token],
    pos: usize,
    depth: usize,
) -> Result<(Node, usize), ParseError> {
    if depth > MAX_DEPTH {
        return Err(too_deep());
    }
    let op = match tokens.get(pos) {
        Some(Token::Plus) => UnaryOp::Plus,
        Some(Token::Minus) => UnaryOp::Minus,
        _ => return parse_primary(tokens, pos, depth),
    };
    let (operand, pos) = parse_unary(tokens, pos + 1, depth + 1)?;
    Ok((Node::unary(op, operand)?, pos))
}

fn parse_primary(
    tokens: &[Token],
    pos: usize,
    depth: usize,
) -> Result<(Node, usize), ParseError> {
    match tokens.get(pos) {
        Some(Token::Number(n)) => Ok((Node::leaf(Expr::Number(*n)), pos + 1)),
        Some(Token::Cell(cell)) => Ok((Node::leaf(Expr::Cell(*cell)), pos + 1)),
        Some(Token::LParen) => {
            let (node, pos) = parse_add_sub(tokens, pos + 1, depth + 1)?;
            match tokens.get(pos) {
                Some(Token::RParen) => Ok((node, pos + 1)),
                _ => Err(ParseError("Expected closing parenthesis".to_string())),
            }
        }
        Some(token) => Err(ParseError(format!("Unexpected token: {:?}", token))),
        None => Err(ParseError("Unexpected end of formula".to_string())),
    }
}
