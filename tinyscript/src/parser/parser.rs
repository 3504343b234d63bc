use crate::error::ParseError;
use crate::ir::ast::{
    BlockStatement, BooleanLiteral, Expression, ExpressionStatement, FloatLiteral, Identifier,
    IfStatement, InfixExpression, InfixOperator, IntegerLiteral, LetStatement, PrefixExpression,
    PrefixOperator, Program, ReturnStatement, Statement,
};
use crate::span::Span;
use super::lexer::{Token, TokenKind, Tokenizer};

type Result<T> = std::result::Result<T, ParseError>;

/// Предел вложенности: скобки, префиксы, блоки и цепочки бинарных операторов.
/// Глубже дерево не строится, поэтому рекурсивные обходы (в том числе `Drop`)
/// не переполняют стек.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Сила связывания операторов, от слабой к сильной
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    /// == !=
    Equals,
    /// < > <= >=
    LessGreater,
    /// + -
    Sum,
    /// * /
    Product,
    /// -x !x
    Prefix,
}

impl Precedence {
    fn of(operator: InfixOperator) -> Precedence {
        match operator {
            InfixOperator::Equal | InfixOperator::NotEqual => Precedence::Equals,
            InfixOperator::Less
            | InfixOperator::Greater
            | InfixOperator::LessEqual
            | InfixOperator::GreaterEqual => Precedence::LessGreater,
            InfixOperator::Add | InfixOperator::Subtract => Precedence::Sum,
            InfixOperator::Multiply | InfixOperator::Divide => Precedence::Product,
        }
    }
}

fn infix_operator(kind: TokenKind) -> Option<InfixOperator> {
    let operator = match kind {
        TokenKind::Plus => InfixOperator::Add,
        TokenKind::Minus => InfixOperator::Subtract,
        TokenKind::Asterisk => InfixOperator::Multiply,
        TokenKind::Slash => InfixOperator::Divide,
        TokenKind::Less => InfixOperator::Less,
        TokenKind::Greater => InfixOperator::Greater,
        TokenKind::LessEqual => InfixOperator::LessEqual,
        TokenKind::GreaterEqual => InfixOperator::GreaterEqual,
        TokenKind::Equal => InfixOperator::Equal,
        TokenKind::NotEqual => InfixOperator::NotEqual,
        _ => return None,
    };
    Some(operator)
}

/// Парсер рекурсивного спуска с двумя токенами просмотра вперёд.
///
/// Ошибка в инструкции не останавливает разбор: диагностика записывается,
/// токены пропускаются до ближайшей `;` включительно, и разбор продолжается.
/// После [`Parser::parse_program`] смотрите [`Parser::errors`].
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    current: Token,
    peek: Token,
    errors: Vec<ParseError>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokenizer: Tokenizer<'a>) -> Self {
        let current = tokenizer.next_token();
        let peek = tokenizer.next_token();
        Self {
            tokenizer,
            current,
            peek,
            errors: Vec::new(),
            depth: 0,
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.current_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement_or_recover() {
                statements.push(statement);
            }
            self.next_token();
        }

        Program { statements }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Разбирает одну инструкцию; `current` остаётся на её последнем токене.
    /// При ошибке диагностика сохраняется, а `current` встаёт на `;`,
    /// которой заканчивается сломанная инструкция (или на `Eof`).
    fn parse_statement_or_recover(&mut self) -> Option<Statement> {
        // пустая инструкция
        if self.current_is(TokenKind::Semicolon) {
            return None;
        }

        match self.parse_statement() {
            Ok(statement) => Some(statement),
            Err(error) => {
                self.errors.push(error);
                self.skip_to_semicolon();
                None
            }
        }
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.current.kind {
            TokenKind::Let => self.parse_let_statement().map(Statement::Let),
            TokenKind::Return => self.parse_return_statement().map(Statement::Return),
            TokenKind::If => self.parse_if_statement().map(Statement::If),
            TokenKind::LBrace => self.parse_block_statement().map(Statement::Block),
            _ => self.parse_expression_statement().map(Statement::Expression),
        }
    }

    fn parse_let_statement(&mut self) -> Result<LetStatement> {
        let token = self.current.clone();

        self.expect_peek(TokenKind::Ident)?;
        let name = Identifier {
            token: self.current.clone(),
            value: self.current.literal.clone(),
        };

        self.expect_peek(TokenKind::Assign)?;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::Semicolon)?;

        Ok(LetStatement { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Result<ReturnStatement> {
        let token = self.current.clone();

        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
            return Ok(ReturnStatement { token, value: None });
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::Semicolon)?;

        Ok(ReturnStatement {
            token,
            value: Some(value),
        })
    }

    fn parse_if_statement(&mut self) -> Result<IfStatement> {
        let token = self.current.clone();

        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;

        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Ok(IfStatement {
            token,
            condition,
            consequence,
            alternative,
        })
    }

    /// `current` должен быть `{`; на выходе `current` - парная `}`.
    fn parse_block_statement(&mut self) -> Result<BlockStatement> {
        let entered = self.depth;
        let block = self.descend().and_then(|()| self.parse_block_body());
        self.depth = entered;
        block
    }

    fn parse_block_body(&mut self) -> Result<BlockStatement> {
        let token = self.current.clone();
        let mut statements = Vec::new();

        self.next_token();
        while !self.current_is(TokenKind::RBrace) && !self.current_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement_or_recover() {
                statements.push(statement);
            }
            self.next_token();
        }

        if self.current_is(TokenKind::Eof) {
            return Err(self.unexpected(TokenKind::RBrace, &self.current));
        }

        Ok(BlockStatement { token, statements })
    }

    fn parse_expression_statement(&mut self) -> Result<ExpressionStatement> {
        let token = self.current.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        // `;` в конце необязательна
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Ok(ExpressionStatement { token, expression })
    }

    /// Подъём по приоритетам: первичное выражение, затем все следующие
    /// бинарные операторы, которые связывают сильнее `precedence`. Правая
    /// часть разбирается на уровне самого оператора, поэтому все бинарные
    /// операторы левоассоциативны.
    fn parse_expression(&mut self, precedence: Precedence) -> Result<Expression> {
        let entered = self.depth;
        let expression = self.parse_operators(precedence);
        self.depth = entered;
        expression
    }

    fn parse_operators(&mut self, precedence: Precedence) -> Result<Expression> {
        let mut left = self.parse_primary()?;

        while let Some(operator) = infix_operator(self.peek.kind) {
            let operator_precedence = Precedence::of(operator);
            if operator_precedence <= precedence {
                break;
            }

            self.next_token();
            // каждый шаг удлиняет левую ветвь
            self.descend()?;
            let token = self.current.clone();
            self.next_token();
            let right = self.parse_expression(operator_precedence)?;

            left = Expression::Infix(InfixExpression {
                token,
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        let token = self.current.clone();

        match token.kind {
            TokenKind::Ident => Ok(Expression::Identifier(Identifier {
                value: token.literal.clone(),
                token,
            })),
            TokenKind::Int => match token.literal.parse::<i64>() {
                Ok(value) => Ok(Expression::Integer(IntegerLiteral { token, value })),
                Err(_) => Err(ParseError::InvalidNumber {
                    literal: token.literal,
                    span: token.span,
                }),
            },
            TokenKind::Float => match token.literal.parse::<f64>() {
                Ok(value) => Ok(Expression::Float(FloatLiteral { token, value })),
                Err(_) => Err(ParseError::InvalidNumber {
                    literal: token.literal,
                    span: token.span,
                }),
            },
            TokenKind::True | TokenKind::False => Ok(Expression::Boolean(BooleanLiteral {
                value: token.kind == TokenKind::True,
                token,
            })),
            TokenKind::Bang | TokenKind::Minus => {
                let operator = if token.kind == TokenKind::Bang {
                    PrefixOperator::Bang
                } else {
                    PrefixOperator::Minus
                };
                self.descend()?;
                self.next_token();

                if operator == PrefixOperator::Minus {
                    if let Some(literal) = self.negated_min_integer(&token) {
                        return Ok(Expression::Integer(literal));
                    }
                }

                let right = self.parse_expression(Precedence::Prefix)?;

                Ok(Expression::Prefix(PrefixExpression {
                    token,
                    operator,
                    right: Box::new(right),
                }))
            }
            TokenKind::LParen => {
                self.descend()?;
                self.next_token();
                let expression = self.parse_expression(Precedence::Lowest)?;
                self.expect_peek(TokenKind::RParen)?;
                Ok(expression)
            }
            found => Err(ParseError::NoPrefixRule {
                found,
                span: token.span,
            }),
        }
    }

    /// `-9223372036854775808`: модуль i64::MIN сам в i64 не помещается,
    /// поэтому минус и литерал склеиваются в один целый литерал.
    fn negated_min_integer(&self, minus: &Token) -> Option<IntegerLiteral> {
        let is_min = self.current_is(TokenKind::Int)
            && self
                .current
                .literal
                .parse::<u64>()
                .is_ok_and(|magnitude| magnitude == i64::MIN.unsigned_abs());
        if !is_min {
            return None;
        }

        let span = Span {
            end: self.current.span.end,
            ..minus.span.clone()
        };
        Some(IntegerLiteral {
            token: Token::new(TokenKind::Int, format!("-{}", self.current.literal), span),
            value: i64::MIN,
        })
    }

    // Вспомогательные методы

    fn next_token(&mut self) {
        let next = self.tokenizer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    fn current_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Сдвигается, только если `peek` нужного вида
    fn expect_peek(&mut self, expected: TokenKind) -> Result<()> {
        if self.peek_is(expected) {
            self.next_token();
            Ok(())
        } else {
            Err(self.unexpected(expected, &self.peek))
        }
    }

    fn unexpected(&self, expected: TokenKind, found: &Token) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: found.kind,
            span: found.span.clone(),
        }
    }

    /// Один уровень вложенности глубже. Уровень снимают `parse_expression`
    /// и `parse_block_statement`, восстанавливая глубину на выходе.
    fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                span: self.current.span.clone(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn skip_to_semicolon(&mut self) {
        while !self.current_is(TokenKind::Semicolon) && !self.current_is(TokenKind::Eof) {
            self.next_token();
        }
    }
}
