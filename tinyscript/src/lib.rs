//! Фронтенд маленького скриптового языка: на входе текст, на выходе дерево.
//!
//! ```text
//! Source → Tokenizer → Parser → Program (+ diagnostics)
//! ```
//!
//! 1. [`parser::lexer`] по запросу режет байты на [`parser::Token`].
//! 2. [`parser::Parser`] строит [`ir::ast::Program`], заглядывая на два
//!    токена вперёд, и собирает [`error::ParseError`], не останавливаясь
//!    на первой ошибке.
//! 3. [`ir::ast`] - типы узлов и их каноническая запись через `Display`.
//!
//! ```
//! use tinyscript::parser;
//!
//! let (program, errors) = parser::parse("let x = 1 + 2 * 3;");
//! assert!(errors.is_empty());
//! assert_eq!(program.to_string(), "let x = (1 + (2 * 3));");
//! ```

pub mod error;
pub mod ir;
pub mod parser;
pub mod span;
