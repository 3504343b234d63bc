pub mod lexer;
pub mod parser;

pub use lexer::{tokenize, Token, TokenKind, Tokenizer};
pub use parser::Parser;

use crate::error::ParseError;
use crate::ir::ast;

/// Главная функция парсера - из текста в AST плюс все диагностики
pub fn parse(source: &str) -> (ast::Program, Vec<ParseError>) {
    let mut parser = Parser::new(Tokenizer::new(source));
    let program = parser.parse_program();
    (program, parser.into_errors())
}
