use crate::lexer::{is_special_char, is_whitespace};
use crate::token::{Comparator, Gate};
use serde::Serialize;

/// Root of a parsed query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Expression(Expression),
    Operation(Operation),
}

/// A single comparison such as `age>=10`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expression {
    pub field: String,
    pub comparator: Comparator,
    pub value: String,
}

/// Two nodes joined by a gate, or a single parenthesized node when `gate` is
/// `None`. A gate-less operation never has a right child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub left: Box<Node>,
    pub gate: Option<Gate>,
    pub right: Option<Box<Node>>,
}

impl Expression {
    pub fn new(field: impl Into<String>, comparator: Comparator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            comparator,
            value: value.into(),
        }
    }
}

impl Operation {
    pub fn new(left: Node, gate: Gate, right: Node) -> Self {
        Self {
            left: Box::new(left),
            gate: Some(gate),
            right: Some(Box::new(right)),
        }
    }

    pub fn group(inner: Node) -> Self {
        Self {
            left: Box::new(inner),
            gate: None,
            right: None,
        }
    }
}

impl Node {
    pub fn is_expression(&self) -> bool {
        matches!(self, Node::Expression(_))
    }

    /// Number of comparisons in the tree.
    pub fn expression_count(&self) -> usize {
        match self {
            Node::Expression(_) => 1,
            Node::Operation(op) => {
                op.left.expression_count()
                    + op.right.as_ref().map_or(0, |right| right.expression_count())
            }
        }
    }
}

impl From<Expression> for Node {
    fn from(expression: Expression) -> Self {
        Node::Expression(expression)
    }
}

impl From<Operation> for Node {
    fn from(operation: Operation) -> Self {
        Node::Operation(operation)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Expression(expression) => write!(f, "{expression}"),
            Node::Operation(operation) => write!(f, "{operation}"),
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            display_literal(&self.field),
            self.comparator,
            display_literal(&self.value)
        )
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.gate, &self.right) {
            (Some(gate), Some(right)) => write!(f, "({} {} {})", self.left, gate, right),
            (Some(gate), None) => write!(f, "({} {})", self.left, gate),
            (None, _) => write!(f, "({})", self.left),
        }
    }
}

/// Quotes a literal when writing it bare would lex differently.
fn display_literal(literal: &str) -> std::borrow::Cow<'_, str> {
    let needs_quotes = literal.is_empty()
        || literal.eq_ignore_ascii_case("and")
        || literal.eq_ignore_ascii_case("or")
        || literal.starts_with('"')
        || literal
            .chars()
            .any(|ch| is_whitespace(ch) || is_special_char(ch));
    if needs_quotes {
        format!("\"{literal}\"").into()
    } else {
        literal.into()
    }
}
