// SPDX-License-Identifier: Apache-2.0

//! Loosely typed caller input for the validated lookup interface.
//!
//! [`Value`] can express inputs that are not valid truth tables or operator
//! sets (lists where tuples are expected, strings, out-of-range integers) so
//! that [`crate::CircuitDb::lookup`] can report precisely which constraint a
//! query violated.
//!
//! Values parse from a small literal syntax:
//!
//! ```text
//! (0, 1, 1, 0)             tuple of integers
//! ((1, 0), (0, 1))         tuple of tuples
//! (True,)                  one-element tuple
//! [0, 1]                   list
//! {id, not, and, or}       set; operator names stand for their output columns
//! {(0, 1), (1, 0)}         set of operators given by output column
//! every                    the set of all operators
//! 'abc'                    string
//! ```

use std::fmt;
use std::str::FromStr;

use crate::operator::{Operator, OperatorSet};
use crate::truth_table::TruthTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Set(Vec<Value>),
}

impl Value {
    /// A tuple of integers.
    pub fn bits(bits: &[u8]) -> Value {
        Value::Tuple(bits.iter().map(|&b| Value::Int(b as i64)).collect())
    }

    /// A tuple of integer tuples.
    pub fn bit_rows(rows: &[&[u8]]) -> Value {
        Value::Tuple(rows.iter().map(|r| Value::bits(r)).collect())
    }

    /// Returns the bit this value denotes, if it is a boolean or `0`/`1`.
    pub fn as_bit(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Returns the operator whose output column this value spells out.
    pub fn as_operator(&self) -> Option<Operator> {
        let Value::Tuple(items) = self else {
            return None;
        };
        let column: Option<Vec<bool>> = items.iter().map(Value::as_bit).collect();
        Operator::from_column(&column?)
    }
}

impl From<Operator> for Value {
    fn from(op: Operator) -> Self {
        Value::Tuple(op.column().iter().map(|&b| Value::Int(b as i64)).collect())
    }
}

impl From<OperatorSet> for Value {
    fn from(ops: OperatorSet) -> Self {
        Value::Set(ops.iter().map(Value::from).collect())
    }
}

impl From<&TruthTable> for Value {
    fn from(tt: &TruthTable) -> Self {
        let bit = |b: &bool| Value::Int(*b as i64);
        match tt {
            TruthTable::Scalar(bits) => Value::Tuple(bits.iter().map(bit).collect()),
            TruthTable::Vector(rows) => Value::Tuple(
                rows.iter()
                    .map(|r| Value::Tuple(r.iter().map(bit).collect()))
                    .collect(),
            ),
        }
    }
}

fn fmt_items(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: &[Value],
    close: &str,
    singleton_comma: bool,
) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    if singleton_comma && items.len() == 1 {
        write!(f, ",")?;
    }
    write!(f, "{}", close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Tuple(items) => fmt_items(f, "(", items, ")", true),
            Value::List(items) => fmt_items(f, "[", items, "]", false),
            Value::Set(items) => fmt_items(f, "{", items, "}", false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    msg: String,
}

impl ParseError {
    fn new(msg: String) -> Self {
        Self { msg }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParseError: {}", self.msg)
    }
}

impl std::error::Error for ParseError {}

/// Deepest bracket nesting a literal may use.
pub const MAX_NESTING: usize = 64;

struct Parser {
    chars: Vec<char>,
    offset: usize,
    depth: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            offset: 0,
            depth: 0,
        }
    }

    /// Consumes an opening bracket and parses items up to `close`, tracking
    /// the nesting depth.
    fn parse_nested(&mut self, close: char) -> Result<(Vec<Value>, bool), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new(format!(
                "nesting too deep at offset {}; at most {} levels are allowed",
                self.offset, MAX_NESTING
            )));
        }
        self.offset += 1;
        self.depth += 1;
        let result = self.parse_items(close);
        self.depth -= 1;
        result
    }

    fn rest(&self) -> String {
        self.chars[self.offset.min(self.chars.len())..]
            .iter()
            .collect()
    }

    fn drop_whitespace(&mut self) {
        while let Some(c) = self.peekc() {
            if c.is_whitespace() {
                self.offset += 1;
            } else {
                break;
            }
        }
    }

    fn peekc(&self) -> Option<char> {
        self.chars.get(self.offset).copied()
    }

    fn try_drop(&mut self, c: char) -> bool {
        self.drop_whitespace();
        if self.peekc() == Some(c) {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    fn at_end(&mut self) -> bool {
        self.drop_whitespace();
        self.offset >= self.chars.len()
    }

    /// Parses comma-separated values up to `close`. Returns the items and
    /// whether a trailing comma was present.
    fn parse_items(&mut self, close: char) -> Result<(Vec<Value>, bool), ParseError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            if self.try_drop(close) {
                return Ok((items, trailing_comma));
            }
            items.push(self.parse_value()?);
            trailing_comma = self.try_drop(',');
            if !trailing_comma {
                if self.try_drop(close) {
                    return Ok((items, false));
                }
                return Err(ParseError::new(format!(
                    "expected ',' or {:?}; rest: {:?}",
                    close,
                    self.rest()
                )));
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<Value, ParseError> {
        let mut s = String::new();
        loop {
            match self.peekc() {
                Some(c) if c == quote => {
                    self.offset += 1;
                    return Ok(Value::Str(s));
                }
                Some(c) => {
                    s.push(c);
                    self.offset += 1;
                }
                None => {
                    return Err(ParseError::new(format!(
                        "unterminated string literal {:?}",
                        s
                    )))
                }
            }
        }
    }

    fn parse_int(&mut self) -> Result<Value, ParseError> {
        let start = self.offset;
        if self.peekc() == Some('-') {
            self.offset += 1;
        }
        while let Some(c) = self.peekc() {
            if c.is_ascii_digit() {
                self.offset += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.offset].iter().collect();
        text.parse::<i64>()
            .map(Value::Int)
            .map_err(|e| ParseError::new(format!("invalid integer {:?}: {}", text, e)))
    }

    fn parse_identifier(&mut self) -> Result<Value, ParseError> {
        let start = self.offset;
        while let Some(c) = self.peekc() {
            if c.is_alphanumeric() || c == '_' {
                self.offset += 1;
            } else {
                break;
            }
        }
        let ident: String = self.chars[start..self.offset].iter().collect();
        match ident.as_str() {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "every" => Ok(Value::from(OperatorSet::every())),
            _ => {
                // Accept library-style spellings such as `and_`.
                let name = ident.strip_suffix('_').unwrap_or(&ident);
                match Operator::from_name(name) {
                    Some(op) => Ok(Value::from(op)),
                    None => Err(ParseError::new(format!("unknown identifier {:?}", ident))),
                }
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        self.drop_whitespace();
        match self.peekc() {
            Some('(') => {
                let (mut items, trailing_comma) = self.parse_nested(')')?;
                if items.len() == 1 && !trailing_comma {
                    // Parenthesized expression, not a tuple.
                    return Ok(items.remove(0));
                }
                Ok(Value::Tuple(items))
            }
            Some('[') => Ok(Value::List(self.parse_nested(']')?.0)),
            Some('{') => Ok(Value::Set(self.parse_nested('}')?.0)),
            Some(q @ ('\'' | '"')) => {
                self.offset += 1;
                self.parse_string(q)
            }
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_int(),
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_identifier(),
            Some(c) => Err(ParseError::new(format!(
                "unexpected character {:?}; rest: {:?}",
                c,
                self.rest()
            ))),
            None => Err(ParseError::new("unexpected end of input".to_string())),
        }
    }
}

impl FromStr for Value {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let value = parser.parse_value()?;
        if !parser.at_end() {
            return Err(ParseError::new(format!(
                "trailing input after value: {:?}",
                parser.rest()
            )));
        }
        Ok(value)
    }
}
