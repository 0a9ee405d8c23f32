use crate::errors::SyntaxError;
use crate::lexer::Lexer;
use crate::nodes::{Expression, Node, Operation};
use crate::token::{Comparator, Gate, Token, TokenKind};
use log::{debug, trace};

/// Deepest bracket nesting accepted before the query is rejected.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Most comparisons a single query may hold. Chains nest one level per
/// operand, and every tree walk recurses once per level.
pub const MAX_EXPRESSIONS: usize = 1024;

/// Recursive-descent parser producing the smallest equivalent [`Node`] tree.
pub struct Parser {
    lexer: Lexer,
    buf: Vec<Token>,
    depth: usize,
    expressions: usize,
}

/// The operation being built by one `parse_operation` frame.
///
/// Once a gate and a right operand arrive, the full `left GATE right` triple
/// becomes the new left operand, so `a AND b OR c` chains to the left as
/// `((a AND b) OR c)` without ever rebalancing.
#[derive(Default)]
struct Chain {
    left: Option<Node>,
    gate: Option<Gate>,
}

impl Chain {
    fn expect_operand(&self) -> Result<(), SyntaxError> {
        if self.left.is_some() && self.gate.is_none() {
            return Err(SyntaxError::new(
                "expected AND or OR between two expressions",
            ));
        }
        Ok(())
    }

    fn push_operand(&mut self, operand: Node) -> Result<(), SyntaxError> {
        self.expect_operand()?;
        self.left = Some(match (self.left.take(), self.gate.take()) {
            (Some(left), Some(gate)) => Operation::new(left, gate, operand).into(),
            _ => operand,
        });
        Ok(())
    }

    fn set_gate(&mut self, gate: Gate) -> Result<(), SyntaxError> {
        if self.left.is_none() {
            return Err(SyntaxError::new(format!(
                "found {gate} with nothing on its left"
            )));
        }
        if let Some(existing) = self.gate {
            return Err(SyntaxError::new(format!(
                "already found a gate ({existing}) when {gate} appeared"
            )));
        }
        self.gate = Some(gate);
        Ok(())
    }

    fn finish(self, empty_message: &str) -> Result<Node, SyntaxError> {
        match (self.left, self.gate) {
            (None, _) => Err(SyntaxError::new(empty_message)),
            (Some(left), Some(gate)) => Err(SyntaxError::new(format!(
                "found open gate: {gate} after '{left}' has no right operand"
            ))),
            (Some(left), None) => Ok(left),
        }
    }
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Self {
            lexer: Lexer::new(input),
            buf: Vec::new(),
            depth: 0,
            expressions: 0,
        }
    }

    /// Parses the whole input into the root node.
    ///
    /// A single comparison comes back as a bare [`Node::Expression`], anything
    /// else as the shallowest gated [`Node::Operation`].
    pub fn parse(&mut self) -> Result<Node, SyntaxError> {
        let node = self.parse_operation()?;
        debug!(
            "parsed query with {} comparison(s)",
            node.expression_count()
        );
        trace!("parsed tree: {node}");
        Ok(node)
    }

    pub(crate) fn parse_operation(&mut self) -> Result<Node, SyntaxError> {
        let mut chain = Chain::default();
        loop {
            let token = self.scan_ignore_whitespace();
            match token.kind {
                TokenKind::Eof => {
                    if self.depth > 0 {
                        return Err(SyntaxError::new("unclosed bracket at end of query"));
                    }
                    return chain.finish("empty query");
                }
                TokenKind::OpenBracket => {
                    chain.expect_operand()?;
                    let group = self.parse_group()?;
                    chain.push_operand(group)?;
                }
                TokenKind::Text => {
                    chain.expect_operand()?;
                    self.unscan(token);
                    let expression = self.parse_expression()?;
                    chain.push_operand(expression)?;
                }
                TokenKind::ClosedBracket => {
                    if self.depth == 0 {
                        return Err(SyntaxError::new("found ')' without a matching '('"));
                    }
                    return chain
                        .finish("can't close a bracket when nothing was parsed inside it");
                }
                TokenKind::And | TokenKind::Or => {
                    if let Some(gate) = token.kind.as_gate() {
                        chain.set_gate(gate)?;
                    }
                }
                kind => {
                    return Err(SyntaxError::new(format!(
                        "unexpected token {kind} '{}'",
                        token.literal
                    )))
                }
            }
        }
    }

    /// Reads `field comparator value`, in that order.
    pub(crate) fn parse_expression(&mut self) -> Result<Node, SyntaxError> {
        let mut field: Option<String> = None;
        let mut comparator: Option<Comparator> = None;
        // `Some("")` is an explicit `""`, not a missing value
        let mut value: Option<String> = None;

        loop {
            let token = self.scan();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Whitespace => {
                    if value.is_some() {
                        break;
                    }
                }
                TokenKind::OpenBracket if field.is_none() => return self.parse_group(),
                kind if field.is_none() => {
                    if kind != TokenKind::Text {
                        return Err(SyntaxError::new(format!("expected field, got {kind}")));
                    }
                    if token.literal.is_empty() {
                        return Err(SyntaxError::new("field name can't be empty"));
                    }
                    field = Some(token.literal);
                }
                kind if comparator.is_none() => match kind.as_comparator() {
                    Some(found) => comparator = Some(found),
                    None => {
                        return Err(SyntaxError::new(format!(
                            "expected comparator after '{}', got {kind}",
                            field.unwrap_or_default()
                        )))
                    }
                },
                kind if value.is_none() => {
                    if kind != TokenKind::Text {
                        return Err(SyntaxError::new(format!("expected value, got {kind}")));
                    }
                    value = Some(token.literal);
                }
                _ => {
                    // The expression is complete, whatever follows belongs to the operation.
                    self.unscan(token);
                    break;
                }
            }
        }

        match (field, comparator, value) {
            (Some(field), Some(comparator), Some(value)) => {
                self.expressions += 1;
                if self.expressions > MAX_EXPRESSIONS {
                    return Err(SyntaxError::new(format!(
                        "query has more than {MAX_EXPRESSIONS} comparisons"
                    )));
                }
                Ok(Expression::new(field, comparator, value).into())
            }
            (Some(field), None, _) => Err(SyntaxError::new(format!(
                "found no comparator when expected after '{field}'"
            ))),
            (Some(field), Some(comparator), None) => Err(SyntaxError::new(format!(
                "found no value when expected after '{field}{comparator}'"
            ))),
            (None, _, _) => Err(SyntaxError::new("expected field, got end of query")),
        }
    }

    fn parse_group(&mut self) -> Result<Node, SyntaxError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SyntaxError::new(format!(
                "brackets nested deeper than {MAX_NESTING_DEPTH} levels"
            )));
        }
        self.depth += 1;
        let group = self.parse_operation();
        self.depth -= 1;
        group
    }

    /// Returns the next token, preferring anything pushed back by `unscan`.
    fn scan(&mut self) -> Token {
        if let Some(token) = self.buf.pop() {
            return token;
        }
        let token = self.lexer.next_token();
        trace!("scanned {} '{}'", token.kind, token.literal);
        token
    }

    fn scan_ignore_whitespace(&mut self) -> Token {
        loop {
            let token = self.scan();
            if token.kind != TokenKind::Whitespace {
                return token;
            }
        }
    }

    fn unscan(&mut self, token: Token) {
        self.buf.push(token);
    }
}

/// Parses `input` into the root node of its syntax tree.
pub fn parse(input: &str) -> Result<Node, SyntaxError> {
    Parser::new(input).parse()
}
