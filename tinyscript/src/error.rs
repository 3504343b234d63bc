use thiserror::Error;

use crate::parser::lexer::TokenKind;
use crate::span::Span;

/// Одна диагностика разбора. Сам разбор после неё продолжается.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected token {expected}, got token {found}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        span: Span,
    },

    #[error("no expression can start with token {found}")]
    NoPrefixRule { found: TokenKind, span: Span },

    /// Целое вне диапазона i64. Для FLOAT лексер пропускает только
    /// `цифры.цифры`, а такой текст f64 разбирает всегда.
    #[error("could not parse {literal:?} as a number")]
    InvalidNumber { literal: String, span: Span },

    #[error("expression nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize, span: Span },
}

impl ParseError {
    /// Где начинается проблемный токен
    pub fn span(&self) -> &Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::NoPrefixRule { span, .. }
            | ParseError::InvalidNumber { span, .. }
            | ParseError::NestingTooDeep { span, .. } => span,
        }
    }
}

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("{count} syntax error(s) in {input}")]
    SyntaxErrors { input: String, count: usize },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}
