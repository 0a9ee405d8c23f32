//! Lexer and parser for the sieve filter query language.
//!
//! ```text
//! query      := operation
//! operation  := term (GATE term)*
//! term       := '(' operation ')' | expression
//! expression := FIELD COMPARATOR VALUE
//! ```
//!
//! `AND` and `OR` bind equally and associate left to right; brackets are the
//! only way to change evaluation order.

mod errors;
mod lexer;
mod nodes;
mod parser;
mod token;

pub use errors::SyntaxError;
pub use lexer::{tokenize, Lexer};
pub use nodes::{Expression, Node, Operation};
pub use parser::{parse, Parser, MAX_EXPRESSIONS, MAX_NESTING_DEPTH};
pub use token::{Comparator, Gate, Token, TokenKind};
