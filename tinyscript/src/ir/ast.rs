//! Синтаксическое дерево, которое строит парсер.
//!
//! Каждый узел реализует [`Node`]: `token_literal` - текст токена, с которого
//! узел начался, а `Display` - каноническая запись, по которой деревья
//! сравниваются в тестах. Исходные скобки в ней теряются, поэтому повторный
//! разбор этой записи может дать другое дерево.

use std::fmt;

use crate::parser::lexer::Token;

pub trait Node: fmt::Display {
    fn token_literal(&self) -> &str;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// let x = 5;
    Let(LetStatement),
    /// return x;
    Return(ReturnStatement),
    /// if (x) { ... } else { ... }
    If(IfStatement),
    /// x + 1;
    Expression(ExpressionStatement),
    /// { ... }
    Block(BlockStatement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub token: Token,
    pub name: Identifier,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub token: Token,
    pub condition: Expression,
    pub consequence: BlockStatement,
    /// Только если было `else`
    pub alternative: Option<BlockStatement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    /// Первый токен выражения
    pub token: Token,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    /// Открывающая `{`
    pub token: Token,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// x, my_var
    Identifier(Identifier),
    /// 10
    Integer(IntegerLiteral),
    /// 2.5
    Float(FloatLiteral),
    /// true, false
    Boolean(BooleanLiteral),
    /// !x, -5
    Prefix(PrefixExpression),
    /// a + b
    Infix(InfixExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatLiteral {
    pub token: Token,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub token: Token,
    pub operator: PrefixOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    /// Токен оператора
    pub token: Token,
    pub left: Box<Expression>,
    pub operator: InfixOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Bang,  // !
    Minus, // -
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    Add,          // +
    Subtract,     // -
    Multiply,     // *
    Divide,       // /
    Less,         // <
    Greater,      // >
    LessEqual,    // <=
    GreaterEqual, // >=
    Equal,        // ==
    NotEqual,     // !=
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrefixOperator::Bang => "!",
            PrefixOperator::Minus => "-",
        })
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InfixOperator::Add => "+",
            InfixOperator::Subtract => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Less => "<",
            InfixOperator::Greater => ">",
            InfixOperator::LessEqual => "<=",
            InfixOperator::GreaterEqual => ">=",
            InfixOperator::Equal => "==",
            InfixOperator::NotEqual => "!=",
        })
    }
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map_or("", |statement| statement.token_literal())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.statements.iter().try_for_each(|statement| write!(f, "{}", statement))
    }
}

impl Node for Statement {
    fn token_literal(&self) -> &str {
        match self {
            Statement::Let(statement) => statement.token_literal(),
            Statement::Return(statement) => statement.token_literal(),
            Statement::If(statement) => statement.token_literal(),
            Statement::Expression(statement) => statement.token_literal(),
            Statement::Block(statement) => statement.token_literal(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(statement) => write!(f, "{}", statement),
            Statement::Return(statement) => write!(f, "{}", statement),
            Statement::If(statement) => write!(f, "{}", statement),
            Statement::Expression(statement) => write!(f, "{}", statement),
            Statement::Block(statement) => write!(f, "{}", statement),
        }
    }
}

impl Node for LetStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for LetStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} = {};", self.token_literal(), self.name, self.value)
    }
}

impl Node for ReturnStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ReturnStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {};", self.token_literal(), value),
            None => write!(f, "{};", self.token_literal()),
        }
    }
}

impl Node for IfStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for IfStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {{{}}}", self.token_literal(), self.condition, self.consequence)?;
        if let Some(alternative) = &self.alternative {
            write!(f, " else {{{}}}", alternative)?;
        }
        Ok(())
    }
}

impl Node for ExpressionStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ExpressionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

impl Node for BlockStatement {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.statements.iter().try_for_each(|statement| write!(f, "{}", statement))
    }
}

impl Node for Expression {
    fn token_literal(&self) -> &str {
        match self {
            Expression::Identifier(expression) => expression.token_literal(),
            Expression::Integer(expression) => &expression.token.literal,
            Expression::Float(expression) => &expression.token.literal,
            Expression::Boolean(expression) => &expression.token.literal,
            Expression::Prefix(expression) => &expression.token.literal,
            Expression::Infix(expression) => &expression.token.literal,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(identifier) => write!(f, "{}", identifier),
            // литералы печатаются как в исходнике
            Expression::Integer(literal) => f.write_str(&literal.token.literal),
            Expression::Float(literal) => f.write_str(&literal.token.literal),
            Expression::Boolean(literal) => f.write_str(&literal.token.literal),
            Expression::Prefix(prefix) => write!(f, "({}{})", prefix.operator, prefix.right),
            Expression::Infix(infix) => {
                write!(f, "({} {} {})", infix.left, infix.operator, infix.right)
            }
        }
    }
}

impl Node for Identifier {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::TokenKind;
    use crate::span::Span;

    fn token(kind: TokenKind, literal: &str) -> Token {
        Token::new(kind, literal, Span::default())
    }

    fn ident(name: &str) -> Identifier {
        Identifier {
            token: token(TokenKind::Ident, name),
            value: name.to_string(),
        }
    }

    fn ident_expr(name: &str) -> Expression {
        Expression::Identifier(ident(name))
    }

    fn let_statement(name: &str, value: Expression) -> Statement {
        Statement::Let(LetStatement {
            token: token(TokenKind::Let, "let"),
            name: ident(name),
            value,
        })
    }

    fn return_statement(value: Option<Expression>) -> Statement {
        Statement::Return(ReturnStatement {
            token: token(TokenKind::Return, "return"),
            value,
        })
    }

    fn block(statements: Vec<Statement>) -> BlockStatement {
        BlockStatement {
            token: token(TokenKind::LBrace, "{"),
            statements,
        }
    }

    #[test]
    fn test_string() {
        let program = Program {
            statements: vec![
                let_statement("myVar", ident_expr("anotherVar")),
                return_statement(Some(ident_expr("x"))),
                Statement::If(IfStatement {
                    token: token(TokenKind::If, "if"),
                    condition: ident_expr("z"),
                    consequence: block(vec![return_statement(Some(ident_expr("y")))]),
                    alternative: Some(block(vec![let_statement("y", ident_expr("y"))])),
                }),
            ],
        };

        assert_eq!(
            program.to_string(),
            "let myVar = anotherVar;return x;if z {return y;} else {let y = y;}"
        );
        assert_eq!(program.token_literal(), "let");
    }

    #[test]
    fn test_if_without_else() {
        let statement = Statement::If(IfStatement {
            token: token(TokenKind::If, "if"),
            condition: ident_expr("ok"),
            consequence: block(vec![]),
            alternative: None,
        });
        assert_eq!(statement.to_string(), "if ok {}");
    }

    #[test]
    fn test_return_without_value() {
        assert_eq!(return_statement(None).to_string(), "return;");
    }

    #[test]
    fn test_operator_expressions() {
        let expression = Expression::Infix(InfixExpression {
            token: token(TokenKind::Asterisk, "*"),
            left: Box::new(Expression::Prefix(PrefixExpression {
                token: token(TokenKind::Minus, "-"),
                operator: PrefixOperator::Minus,
                right: Box::new(Expression::Integer(IntegerLiteral {
                    token: token(TokenKind::Int, "5"),
                    value: 5,
                })),
            })),
            operator: InfixOperator::Multiply,
            right: Box::new(Expression::Float(FloatLiteral {
                token: token(TokenKind::Float, "2.50"),
                value: 2.5,
            })),
        });

        assert_eq!(expression.to_string(), "((-5) * 2.50)");
        assert_eq!(expression.token_literal(), "*");
    }

    #[test]
    fn test_empty_program() {
        let program = Program::default();
        assert_eq!(program.to_string(), "");
        assert_eq!(program.token_literal(), "");
    }
}
