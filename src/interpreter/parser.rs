use crate::ast::{BinaryOp, Expr, ExprKind, LogicalOp, Stmt, UnaryOp};
use crate::diagnostic::{Diagnostic, Label, Span};
use crate::lexer::Token;
use crate::value::Value;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub found: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            found: None,
        }
    }

    pub fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match &self.found {
            Some(found) => format!("at '{}'", found),
            None => "at end".to_string(),
        };
        Diagnostic::error(self.message.clone())
            .with_code("E0101")
            .with_label(Label::new(self.span, label))
    }
}

pub struct ParseResult {
    pub statements: Vec<Stmt>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Recursive-descent parser over the lexer's token stream.
///
/// Errors never escape `parse_with_errors`: a malformed statement is
/// recorded and the parser synchronizes to the next statement boundary, so
/// one bad statement does not hide diagnostics for the rest of the file.
pub struct TokenParser {
    tokens: Vec<SpannedToken>,
    current: usize,
    errors: Vec<ParseError>,
    source_len: usize,
}

/// Hard cap on parser error accumulation for one file.
const MAX_ERRORS: usize = 10;

/// Call arguments and function parameters are both capped here.
const MAX_ARITY: usize = 255;

impl TokenParser {
    pub fn new(tokens: Vec<SpannedToken>, source_len: usize) -> Self {
        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
            source_len,
        }
    }

    pub fn from_lexer_output(
        tokens: Vec<(Token, chumsky::span::SimpleSpan)>,
        source_len: usize,
    ) -> Self {
        let spanned_tokens: Vec<SpannedToken> = tokens
            .into_iter()
            .map(|(token, span)| SpannedToken {
                token,
                span: Span::new(span.start, span.end),
            })
            .collect();
        Self::new(spanned_tokens, source_len)
    }

    fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|st| &st.token)
    }

    fn next_token(&self) -> Option<&Token> {
        self.tokens.get(self.current + 1).map(|st| &st.token)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.current)
            .map(|st| st.span)
            .unwrap_or_else(|| Span::new(self.source_len, self.source_len))
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        if self.current < self.tokens.len() {
            let st = self.tokens[self.current].clone();
            self.current += 1;
            Some(st)
        } else {
            None
        }
    }

    fn check(&self, expected: &Token) -> bool {
        match self.current_token() {
            Some(token) => std::mem::discriminant(token) == std::mem::discriminant(expected),
            None => false,
        }
    }

    fn match_token(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token, message: &str) -> Result<Span, ParseError> {
        match self.current_token() {
            Some(token) if std::mem::discriminant(token) == std::mem::discriminant(&expected) => {
                let span = self.current_span();
                self.advance();
                Ok(span)
            }
            Some(token) => Err(ParseError::new(message, self.current_span())
                .with_found(token.to_string())),
            None => Err(ParseError::new(message, self.current_span())),
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Result<(Rc<str>, Span), ParseError> {
        match self.current_token() {
            Some(Token::Ident(_)) => {
                let st = self.advance().unwrap();
                match st.token {
                    Token::Ident(name) => Ok((Rc::from(name.as_str()), st.span)),
                    _ => unreachable!(),
                }
            }
            Some(token) => Err(ParseError::new(message, self.current_span())
                .with_found(token.to_string())),
            None => Err(ParseError::new(message, self.current_span())),
        }
    }

    fn add_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Discard tokens until a statement boundary: just past a semicolon,
    /// or at a token that can begin a new declaration or statement.
    fn synchronize(&mut self) {
        while let Some(token) = self.current_token() {
            match token {
                Token::Semicolon => {
                    self.advance();
                    return;
                }
                Token::Class
                | Token::Fun
                | Token::Var
                | Token::For
                | Token::If
                | Token::While
                | Token::Print
                | Token::Return => {
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Parse the whole token stream, reporting only the first error.
    /// Convenience wrapper for callers that don't render diagnostics.
    pub fn parse(&mut self) -> Result<Vec<Stmt>, String> {
        let result = self.parse_with_errors();
        match result.errors.first() {
            None => Ok(result.statements),
            Some(first) => Err(first.message.clone()),
        }
    }

    pub fn parse_with_errors(&mut self) -> ParseResult {
        let mut statements = Vec::new();
        while self.current_token().is_some() {
            match self.parse_declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.add_error(err);
                    let before = self.current;
                    self.synchronize();
                    if self.current == before {
                        // The offending token is itself a statement
                        // boundary (e.g. the reserved `class`); skip it so
                        // recovery always makes progress.
                        self.advance();
                    }
                    if self.errors.len() >= MAX_ERRORS {
                        break;
                    }
                }
            }
        }
        ParseResult {
            statements,
            errors: std::mem::take(&mut self.errors),
        }
    }

    fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        match self.current_token() {
            Some(Token::Fun) => self.parse_function_declaration(),
            Some(Token::Var) => self.parse_var_declaration(),
            // One token of lookahead separates `x = 1;` (reassignment
            // statement) from `x == 1;` or a bare expression statement.
            Some(Token::Ident(_)) if matches!(self.next_token(), Some(Token::Assign)) => {
                self.parse_reassign_statement()
            }
            _ => self.parse_statement(),
        }
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.current_token() {
            Some(Token::If) => self.parse_if_statement(),
            Some(Token::For) => self.parse_for_statement(),
            Some(Token::While) => self.parse_while_statement(),
            Some(Token::Print) => self.parse_print_statement(),
            Some(Token::Return) => self.parse_return_statement(),
            Some(Token::LBrace) => Ok(Stmt::Block(self.parse_block()?)),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_function_declaration(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::Fun, "Expect 'fun'.")?;
        let (name, name_span) = self.expect_identifier("Expect function name.")?;
        self.expect(Token::LParen, "Expect '(' after function name.")?;

        let mut params = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                if params.len() == MAX_ARITY {
                    self.add_error(ParseError::new(
                        "Can't have more than 255 parameters.",
                        self.current_span(),
                    ));
                }
                let (param, _) = self.expect_identifier("Expect parameter name.")?;
                params.push(param);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::RParen, "Expect ')' after parameters.")?;
        let body = self.parse_block()?;

        Ok(Stmt::Function {
            name,
            name_span,
            params,
            body,
        })
    }

    fn parse_var_declaration(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::Var, "Expect 'var'.")?;
        let (name, name_span) = self.expect_identifier("Expect variable name.")?;
        let initializer = if self.match_token(&Token::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(Token::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::VarDecl {
            name,
            name_span,
            initializer,
        })
    }

    fn parse_reassign_statement(&mut self) -> Result<Stmt, ParseError> {
        let (name, name_span) = self.expect_identifier("Expect variable name.")?;
        let value = if self.match_token(&Token::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(Token::Semicolon, "Expect ';' after reassignment.")?;
        Ok(Stmt::Reassign {
            name,
            name_span,
            value,
        })
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::If, "Expect 'if'.")?;
        self.expect(Token::LParen, "Expect '(' after 'if'.")?;
        let condition = self.parse_expression()?;
        self.expect(Token::RParen, "Expect ')' after if condition.")?;
        // Branches must be brace-delimited blocks; this removes the
        // dangling-else ambiguity outright.
        let then_branch = self.parse_block()?;
        let else_branch = if self.match_token(&Token::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::While, "Expect 'while'.")?;
        self.expect(Token::LParen, "Expect '(' after 'while'.")?;
        let condition = self.parse_expression()?;
        self.expect(Token::RParen, "Expect ')' after while condition.")?;
        let body = self.parse_block()?;
        Ok(Stmt::While {
            initializer: None,
            condition,
            body,
        })
    }

    /// `for` desugars here: the clauses become a `While` whose initializer
    /// runs once in the loop scope, whose condition defaults to `true`,
    /// and whose body ends with the increment so it runs after each
    /// iteration.
    fn parse_for_statement(&mut self) -> Result<Stmt, ParseError> {
        let for_span = self.expect(Token::For, "Expect 'for'.")?;
        self.expect(Token::LParen, "Expect '(' after 'for'.")?;

        let initializer = if self.match_token(&Token::Semicolon) {
            None
        } else if self.check(&Token::Var) {
            Some(Box::new(self.parse_var_declaration()?))
        } else {
            Some(Box::new(self.parse_expression_statement()?))
        };

        let condition = if !self.check(&Token::Semicolon) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(Token::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(&Token::RParen) {
            let (name, name_span) = self.expect_identifier("Expect variable name in loop increment.")?;
            self.expect(Token::Assign, "Expect '=' in loop increment.")?;
            let value = self.parse_expression()?;
            Some(Stmt::Reassign {
                name,
                name_span,
                value: Some(value),
            })
        } else {
            None
        };
        self.expect(Token::RParen, "Expect ')' after for clauses.")?;

        let mut body = self.parse_block()?;
        if let Some(increment) = increment {
            body.push(increment);
        }
        let condition = condition.unwrap_or(Expr {
            kind: ExprKind::Literal(Value::Bool(true)),
            span: for_span,
        });

        Ok(Stmt::While {
            initializer,
            condition,
            body,
        })
    }

    fn parse_print_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::Print, "Expect 'print'.")?;
        let value = self.parse_expression()?;
        self.expect(Token::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(value))
    }

    fn parse_return_statement(&mut self) -> Result<Stmt, ParseError> {
        let span = self.expect(Token::Return, "Expect 'return'.")?;
        let value = if !self.check(&Token::Semicolon) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(Token::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return { value, span })
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(Token::LBrace, "Expect '{' before block.")?;
        let mut statements = Vec::new();
        while !self.check(&Token::RBrace) && self.current_token().is_some() {
            statements.push(self.parse_declaration()?);
        }
        self.expect(Token::RBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(Token::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expr(expr))
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_or()?;

        if self.check(&Token::Assign) {
            let equals_span = self.current_span();
            self.advance();
            // Right-associative: `a = b = c` parses as `a = (b = c)`.
            let value = self.parse_assignment()?;

            if let ExprKind::Variable(name) = &expr.kind {
                let span = expr.span.merge(value.span);
                return Ok(Expr {
                    kind: ExprKind::Assign {
                        name: name.clone(),
                        name_span: expr.span,
                        value: Box::new(value),
                    },
                    span,
                });
            }
            // Non-fatal: report and carry on with the left expression.
            self.add_error(ParseError::new("Invalid assignment target.", equals_span)
                .with_found("="));
            return Ok(expr);
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_and()?;
        while self.match_token(&Token::Or) {
            let right = self.parse_and()?;
            let span = expr.span.merge(right.span);
            expr = Expr {
                kind: ExprKind::Logical {
                    left: Box::new(expr),
                    op: LogicalOp::Or,
                    right: Box::new(right),
                },
                span,
            };
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_equality()?;
        while self.match_token(&Token::And) {
            let right = self.parse_equality()?;
            let span = expr.span.merge(right.span);
            expr = Expr {
                kind: ExprKind::Logical {
                    left: Box::new(expr),
                    op: LogicalOp::And,
                    right: Box::new(right),
                },
                span,
            };
        }
        Ok(expr)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_comparison()?;
        loop {
            let op = match self.current_token() {
                Some(Token::Eq) => BinaryOp::Eq,
                Some(Token::NotEq) => BinaryOp::NotEq,
                _ => break,
            };
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_comparison()?;
            expr = Self::binary(expr, op, op_span, right);
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_term()?;
        loop {
            let op = match self.current_token() {
                Some(Token::Greater) => BinaryOp::Greater,
                Some(Token::GreaterEq) => BinaryOp::GreaterEq,
                Some(Token::Less) => BinaryOp::Less,
                Some(Token::LessEq) => BinaryOp::LessEq,
                _ => break,
            };
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_term()?;
            expr = Self::binary(expr, op, op_span, right);
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_factor()?;
        loop {
            let op = match self.current_token() {
                Some(Token::Minus) => BinaryOp::Sub,
                Some(Token::Plus) => BinaryOp::Add,
                _ => break,
            };
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_factor()?;
            expr = Self::binary(expr, op, op_span, right);
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.current_token() {
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Star) => BinaryOp::Mul,
                _ => break,
            };
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_unary()?;
            expr = Self::binary(expr, op, op_span, right);
        }
        Ok(expr)
    }

    fn binary(left: Expr, op: BinaryOp, op_span: Span, right: Expr) -> Expr {
        let span = left.span.merge(right.span);
        Expr {
            kind: ExprKind::Binary {
                left: Box::new(left),
                op,
                op_span,
                right: Box::new(right),
            },
            span,
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.current_token() {
            Some(Token::Bang) => Some(UnaryOp::Not),
            Some(Token::Minus) => Some(UnaryOp::Neg),
            _ => None,
        };
        if let Some(op) = op {
            let op_span = self.current_span();
            self.advance();
            let operand = self.parse_unary()?;
            let span = op_span.merge(operand.span);
            return Ok(Expr {
                kind: ExprKind::Unary {
                    op,
                    op_span,
                    operand: Box::new(operand),
                },
                span,
            });
        }
        self.parse_call()
    }

    fn parse_call(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        while self.match_token(&Token::LParen) {
            expr = self.finish_call(expr)?;
        }
        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        let mut args = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                if args.len() == MAX_ARITY {
                    self.add_error(ParseError::new(
                        "Can't have more than 255 arguments.",
                        self.current_span(),
                    ));
                }
                args.push(self.parse_expression()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        let paren_span = self.expect(Token::RParen, "Expect ')' after arguments.")?;
        let span = callee.span.merge(paren_span);
        Ok(Expr {
            kind: ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            span,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        match self.current_token() {
            Some(Token::False) => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Literal(Value::Bool(false)),
                    span,
                })
            }
            Some(Token::True) => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Literal(Value::Bool(true)),
                    span,
                })
            }
            Some(Token::Nil) => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Literal(Value::Nil),
                    span,
                })
            }
            Some(Token::Number(n)) => {
                let n = *n;
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Literal(Value::Number(n)),
                    span,
                })
            }
            Some(Token::Str(s)) => {
                let s = Rc::from(s.as_str());
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Literal(Value::String(s)),
                    span,
                })
            }
            Some(Token::Ident(name)) => {
                let name = Rc::from(name.as_str());
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Variable(name),
                    span,
                })
            }
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_expression()?;
                let close = self.expect(Token::RParen, "Expect ')' after expression.")?;
                Ok(Expr {
                    kind: ExprKind::Grouping(Box::new(inner)),
                    span: span.merge(close),
                })
            }
            Some(token) => Err(ParseError::new("Expect expression.", span)
                .with_found(token.to_string())),
            None => Err(ParseError::new("Expect expression.", span)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chumsky::Parser as _;

    fn parse_source(source: &str) -> ParseResult {
        let tokens = crate::lexer::lexer()
            .parse(source)
            .into_output()
            .expect("Lexer failed");
        let mut parser = TokenParser::from_lexer_output(tokens, source.len());
        parser.parse_with_errors()
    }

    fn parse_expr(source: &str) -> Expr {
        let result = parse_source(&format!("{};", source));
        assert!(result.is_ok(), "unexpected errors: {:?}", result.errors);
        match result.statements.into_iter().next() {
            Some(Stmt::Expr(expr)) => expr,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence_mul_binds_tighter() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let expr = parse_expr("1 + 2 * 3");
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::Add, right, .. } => match right.kind {
                ExprKind::Binary { op: BinaryOp::Mul, .. } => {}
                other => panic!("expected Mul on the right, got {:?}", other),
            },
            other => panic!("expected Add at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_factor_left_associative() {
        // 8 / 4 / 2 parses as (8 / 4) / 2
        let expr = parse_expr("8 / 4 / 2");
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::Div, left, right, .. } => {
                assert!(matches!(left.kind, ExprKind::Binary { op: BinaryOp::Div, .. }));
                assert!(matches!(right.kind, ExprKind::Literal(Value::Number(n)) if n == 2.0));
            }
            other => panic!("expected Div at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_right_associative() {
        let result = parse_source("a = b = 1;");
        assert!(result.is_ok());
        match &result.statements[0] {
            Stmt::Reassign { name, value: Some(value), .. } => {
                assert_eq!(name.as_ref(), "a");
                assert!(matches!(value.kind, ExprKind::Assign { .. }));
            }
            other => panic!("expected reassignment, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_assignment_target_is_nonfatal() {
        let result = parse_source("1 + 2 = 3;");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Invalid assignment target.");
        // The statement itself still parsed
        assert_eq!(result.statements.len(), 1);
    }

    #[test]
    fn test_for_desugars_to_while() {
        let result = parse_source("for (var i = 0; i < 3; i = i + 1) { print i; }");
        assert!(result.is_ok(), "unexpected errors: {:?}", result.errors);
        match &result.statements[0] {
            Stmt::While { initializer, condition, body } => {
                assert!(matches!(initializer.as_deref(), Some(Stmt::VarDecl { .. })));
                assert!(matches!(condition.kind, ExprKind::Binary { op: BinaryOp::Less, .. }));
                // Increment appended after the body statements
                assert_eq!(body.len(), 2);
                assert!(matches!(body[0], Stmt::Print(_)));
                assert!(matches!(body[1], Stmt::Reassign { .. }));
            }
            other => panic!("expected desugared while, got {:?}", other),
        }
    }

    #[test]
    fn test_for_omitted_condition_defaults_true() {
        let result = parse_source("for (;;) { x = 1; }");
        assert!(result.is_ok(), "unexpected errors: {:?}", result.errors);
        match &result.statements[0] {
            Stmt::While { initializer, condition, .. } => {
                assert!(initializer.is_none());
                assert!(matches!(condition.kind, ExprKind::Literal(Value::Bool(true))));
            }
            other => panic!("expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_reassignment_vs_equality_lookahead() {
        let result = parse_source("x == 1;");
        assert!(result.is_ok());
        assert!(matches!(result.statements[0], Stmt::Expr(_)));

        let result = parse_source("x = 1;");
        assert!(result.is_ok());
        assert!(matches!(result.statements[0], Stmt::Reassign { .. }));
    }

    #[test]
    fn test_error_recovery_reports_both_errors() {
        let result = parse_source("var = 1;\nprint 2;\nvar y 3;");
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].message, "Expect variable name.");
        // The well-formed statement in between still parsed
        assert!(result
            .statements
            .iter()
            .any(|stmt| matches!(stmt, Stmt::Print(_))));
    }

    #[test]
    fn test_recovery_past_reserved_keyword_makes_progress() {
        // `class` is reserved with no production; recovery must step over
        // it instead of re-reading it until the error cap.
        let result = parse_source("class Foo {}\nvar x = 1;");
        assert!(
            result.errors.len() <= 2,
            "expected bounded errors, got {:?}",
            result.errors
        );
        assert_eq!(result.errors[0].message, "Expect expression.");
        assert!(result
            .statements
            .iter()
            .any(|stmt| matches!(stmt, Stmt::VarDecl { .. })));
    }

    #[test]
    fn test_missing_expression_reports_at_end() {
        let result = parse_source("print ;");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Expect expression.");
        assert_eq!(result.errors[0].found.as_deref(), Some(";"));
    }

    #[test]
    fn test_if_requires_block() {
        let result = parse_source("if (true) print 1;");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Expect '{' before block.");
    }

    #[test]
    fn test_call_parses_arguments() {
        let expr = parse_expr("add(1, 2)(3)");
        match expr.kind {
            ExprKind::Call { callee, args } => {
                assert_eq!(args.len(), 1);
                assert!(matches!(callee.kind, ExprKind::Call { .. }));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_argument_cap_is_nonfatal() {
        let args: Vec<String> = (0..=255).map(|i| i.to_string()).collect();
        let source = format!("f({});", args.join(", "));
        let result = parse_source(&source);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Can't have more than 255 arguments.");
        assert_eq!(result.statements.len(), 1);
    }

    #[test]
    fn test_logical_operators_chain() {
        let expr = parse_expr("a or b and c");
        match expr.kind {
            ExprKind::Logical { op: LogicalOp::Or, right, .. } => {
                assert!(matches!(right.kind, ExprKind::Logical { op: LogicalOp::And, .. }));
            }
            other => panic!("expected or at the root, got {:?}", other),
        }
    }
}
