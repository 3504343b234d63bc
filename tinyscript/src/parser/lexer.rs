use std::fmt;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Специальные
    Illegal,
    Eof,
    // Идентификаторы и литералы
    Ident,
    Int,
    Float,
    // Операторы
    Assign,       // =
    Plus,         // +
    Minus,        // -
    Asterisk,     // *
    Slash,        // /
    Greater,      // >
    Less,         // <
    GreaterEqual, // >=
    LessEqual,    // <=
    Bang,         // !
    Equal,        // ==
    NotEqual,     // !=
    // Разделители
    Comma,     // ,
    Semicolon, // ;
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    // Ключевые слова
    Function,
    Let,
    True,
    False,
    If,
    For,
    While,
    Else,
    Return,
}

impl TokenKind {
    /// Ключевое слово или `Ident` для любого другого слова
    pub fn lookup_ident(literal: &str) -> TokenKind {
        match literal {
            "fn" => TokenKind::Function,
            "let" => TokenKind::Let,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "while" => TokenKind::While,
            "return" => TokenKind::Return,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => TokenKind::Ident,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::Float => "FLOAT",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Greater => ">",
            TokenKind::Less => "<",
            TokenKind::GreaterEqual => ">=",
            TokenKind::LessEqual => "<=",
            TokenKind::Bang => "!",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Function => "FUNCTION",
            TokenKind::Let => "LET",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::If => "IF",
            TokenKind::For => "FOR",
            TokenKind::While => "WHILE",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
        }
    }
}

/// Лексер по байтам исходника; токены выдаются по запросу.
///
/// Когда вход кончился, каждый вызов [`Tokenizer::next_token`] возвращает
/// `Eof`. Как [`Iterator`] он отдаёт первый `Eof` и останавливается.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a [u8],
    position: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            input: source.as_bytes(),
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let line = self.line;
        let column = self.column;

        let Some(ch) = self.current_char() else {
            return Token::new(TokenKind::Eof, "", Span { line, column, start, end: start });
        };

        let kind = match ch {
            b'=' => self.one_or_two(TokenKind::Assign, TokenKind::Equal),
            b'!' => self.one_or_two(TokenKind::Bang, TokenKind::NotEqual),
            b'<' => self.one_or_two(TokenKind::Less, TokenKind::LessEqual),
            b'>' => self.one_or_two(TokenKind::Greater, TokenKind::GreaterEqual),
            ch if is_letter(ch) => {
                self.read_while(is_letter);
                TokenKind::lookup_ident(&String::from_utf8_lossy(&self.input[start..self.position]))
            }
            ch if ch.is_ascii_digit() => self.read_number(),
            ch => {
                self.advance();
                single_char_kind(ch).unwrap_or(TokenKind::Illegal)
            }
        };

        let literal = if kind == TokenKind::Illegal {
            // один байт, даже если это часть многобайтового символа
            char::from(ch).to_string()
        } else {
            String::from_utf8_lossy(&self.input[start..self.position]).into_owned()
        };

        Token::new(kind, literal, Span { line, column, start, end: self.position })
    }

    /// Забирает текущий байт и следующий за ним `=`, если он есть
    fn one_or_two(&mut self, single: TokenKind, with_equals: TokenKind) -> TokenKind {
        self.advance();
        if self.current_char() == Some(b'=') {
            self.advance();
            with_equals
        } else {
            single
        }
    }

    fn read_number(&mut self) -> TokenKind {
        self.read_while(|ch| ch.is_ascii_digit());

        // `1.` без цифры после точки остаётся целым
        if self.current_char() == Some(b'.') && self.peek_char().is_some_and(|ch| ch.is_ascii_digit()) {
            self.advance();
            self.read_while(|ch| ch.is_ascii_digit());
            TokenKind::Float
        } else {
            TokenKind::Int
        }
    }

    fn read_while(&mut self, accept: impl Fn(u8) -> bool) {
        while let Some(ch) = self.current_char() {
            if !accept(ch) {
                break;
            }
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        self.read_while(|ch| matches!(ch, b' ' | b'\t' | b'\r' | b'\n'));
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            if ch == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn current_char(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self) -> Option<u8> {
        self.input.get(self.position + 1).copied()
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

/// Весь исходник разом; в конце ровно один `Eof`.
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).collect()
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn single_char_kind(ch: u8) -> Option<TokenKind> {
    let kind = match ch {
        b'+' => TokenKind::Plus,
        b'-' => TokenKind::Minus,
        b'*' => TokenKind::Asterisk,
        b'/' => TokenKind::Slash,
        b',' => TokenKind::Comma,
        b';' => TokenKind::Semicolon,
        b'(' => TokenKind::LParen,
        b')' => TokenKind::RParen,
        b'{' => TokenKind::LBrace,
        b'}' => TokenKind::RBrace,
        _ => return None,
    };
    Some(kind)
}
