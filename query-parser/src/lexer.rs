use crate::token::{Token, TokenKind};

/// Hand-rolled scanner over a query string.
///
/// `next_token` yields one token per call and keeps returning [`TokenKind::Eof`]
/// once the input is exhausted. Only a single character can be pushed back,
/// token-level pushback is the parser's job.
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    can_unread: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            can_unread: false,
        }
    }

    /// Returns the next token.
    pub fn next_token(&mut self) -> Token {
        let ch = match self.read() {
            Some(c) => c,
            None => return Token::eof(),
        };

        match ch {
            '>' => self.scan_two_char(ch, TokenKind::GreaterThan, TokenKind::GreaterThanOrEqual),
            '<' => self.scan_two_char(ch, TokenKind::LessThan, TokenKind::LessThanOrEqual),
            '!' => {
                if self.read() == Some('=') {
                    return Token::new(TokenKind::NotEqual, "!=");
                }
                self.unread();
                // `!` only exists as the first half of `!=`
                Token::new(TokenKind::Other, "!")
            }
            '=' => Token::new(TokenKind::Equal, "="),
            '(' => Token::new(TokenKind::OpenBracket, "("),
            ')' => Token::new(TokenKind::ClosedBracket, ")"),
            '%' => Token::new(TokenKind::Percent, "%"),
            _ if is_whitespace(ch) => {
                self.unread();
                self.scan_whitespace()
            }
            _ => {
                self.unread();
                self.scan_literal()
            }
        }
    }

    fn scan_two_char(&mut self, first: char, single: TokenKind, double: TokenKind) -> Token {
        if self.read() == Some('=') {
            return Token::new(double, format!("{first}="));
        }
        self.unread();
        Token::new(single, first.to_string())
    }

    /// Consumes the current character and every contiguous whitespace after it.
    fn scan_whitespace(&mut self) -> Token {
        self.read();
        while let Some(ch) = self.read() {
            if !is_whitespace(ch) {
                self.unread();
                break;
            }
        }
        Token::whitespace()
    }

    /// Consumes a bare word or a quoted literal.
    fn scan_literal(&mut self) -> Token {
        let mut buf = String::new();
        let quoted = self.read() == Some('"');
        if !quoted {
            self.unread();
        }

        while let Some(ch) = self.read() {
            if quoted {
                if ch == '"' {
                    break;
                }
            } else if is_whitespace(ch) || is_special_char(ch) {
                self.unread();
                break;
            }
            buf.push(ch);
        }

        if !quoted {
            if buf.eq_ignore_ascii_case("and") {
                return Token::new(TokenKind::And, "AND");
            }
            if buf.eq_ignore_ascii_case("or") {
                return Token::new(TokenKind::Or, "OR");
            }
        }
        Token::text(buf, quoted)
    }

    fn read(&mut self) -> Option<char> {
        match self.input.get(self.pos).copied() {
            Some(ch) => {
                self.pos += 1;
                self.can_unread = true;
                Some(ch)
            }
            None => {
                self.can_unread = false;
                None
            }
        }
    }

    /// Steps back over the last character read. A second call in a row, or a
    /// call after reading past the end, does nothing.
    fn unread(&mut self) {
        if self.can_unread {
            self.pos -= 1;
            self.can_unread = false;
        }
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Scans the whole input, including the trailing end-of-input token.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

pub(crate) fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

pub(crate) fn is_special_char(ch: char) -> bool {
    matches!(ch, '=' | '>' | '!' | '<' | '(' | ')' | '%')
}
