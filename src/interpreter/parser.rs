use std::fmt;
use std::rc::Rc;

use crate::ast::{Expr, ExprKind, MemberKind};
use crate::diagnostic::{Diagnostic, Label, Span};
use crate::lexer;
use crate::token::{InfixOp, SpannedToken, Token};

/// A structural mismatch in the token stream: what was required, what was
/// found, and where. Parsing stops at the first one; there is no recovery or
/// multi-error reporting.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub expected: Vec<String>,
    pub found: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: Vec::new(),
            found: None,
        }
    }

    pub fn with_expected(mut self, expected: Vec<String>) -> Self {
        self.expected = expected;
        self
    }

    pub fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut message = self.message.clone();
        if !self.expected.is_empty() {
            message = format!("expected {}", self.expected.join(" or "));
            if let Some(found) = &self.found {
                message.push_str(&format!(", found {}", found));
            }
        }

        let mut diagnostic = Diagnostic::error(message)
            .with_code("E0101")
            .with_label(Label::primary(self.span, ""));

        if self.expected.len() == 1 {
            diagnostic = diagnostic.with_help(format!("expected {} here", self.expected[0]));
        }

        diagnostic
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.expected.is_empty() {
            write!(f, " (expected {}", self.expected.join(" or "))?;
            if let Some(found) = &self.found {
                write!(f, ", found {}", found)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Recursive-descent parser over a lexed token stream. The stream is always
/// `Eof`-terminated, so peeking never runs off the end.
pub struct TokenParser {
    tokens: Vec<SpannedToken>,
    current: usize,
}

impl TokenParser {
    pub fn new(mut tokens: Vec<SpannedToken>) -> Self {
        // The lexer always appends Eof; enforce it for hand-built streams so
        // the cursor helpers below can index unconditionally.
        if !matches!(tokens.last(), Some(st) if st.token == Token::Eof) {
            let sentinel = tokens.last().map(|st| st.span.end).unwrap_or(0);
            tokens.push(SpannedToken::new(Token::Eof, Span::new(sentinel, sentinel)));
        }
        Self { tokens, current: 0 }
    }

    fn cursor(&self) -> usize {
        self.current.min(self.tokens.len() - 1)
    }

    fn current_token(&self) -> &Token {
        &self.tokens[self.cursor()].token
    }

    fn current_span(&self) -> Span {
        self.tokens[self.cursor()].span
    }

    fn is_eof(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    /// Consumes and returns the current token. At the trailing `Eof` this
    /// keeps returning it without moving, so loops terminate via `is_eof`.
    fn advance(&mut self) -> SpannedToken {
        let spanned = self.tokens[self.cursor()].clone();
        if self.current < self.tokens.len() {
            self.current += 1;
        }
        spanned
    }

    /// Consumes a token of the expected kind (payloads ignored) or fails.
    fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        if std::mem::discriminant(self.current_token()) == std::mem::discriminant(&expected) {
            let span = self.current_span();
            self.advance();
            return Ok(span);
        }

        if self.is_eof() {
            Err(ParseError::new("unexpected end of input", self.current_span())
                .with_expected(vec![expected.to_string()]))
        } else {
            Err(ParseError::new("unexpected token", self.current_span())
                .with_expected(vec![expected.to_string()])
                .with_found(self.current_token().to_string()))
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Result<(Rc<str>, Span), ParseError> {
        let spanned = self.advance();
        match spanned.token {
            Token::Identifier(name) => Ok((Rc::from(name.as_str()), spanned.span)),
            other => Err(ParseError::new(message, spanned.span)
                .with_expected(vec!["identifier".to_string()])
                .with_found(other.to_string())),
        }
    }

    /// Consumes the operator if it is one of `operators`.
    fn match_operator(&mut self, operators: &[InfixOp]) -> Option<InfixOp> {
        if let Token::InfixOperator(op) = self.current_token() {
            if operators.contains(op) {
                let op = *op;
                self.advance();
                return Some(op);
            }
        }
        None
    }

    /// Parses statements until `Eof`, producing the `Program` node.
    pub fn parse_program(&mut self) -> Result<Expr, ParseError> {
        let mut body = Vec::new();
        while !self.is_eof() {
            body.push(self.parse_statement()?);
        }

        let span = body
            .iter()
            .map(|statement| statement.span)
            .reduce(Span::merge)
            .unwrap_or_else(Span::dummy);
        Ok(Expr::new(ExprKind::Program { body }, span))
    }

    fn parse_statement(&mut self) -> Result<Expr, ParseError> {
        match self.current_token() {
            Token::Let => self.parse_let_declaration(),
            Token::Fun => self.parse_fun_declaration(),
            _ => self.parse_expression(),
        }
    }

    /// `let Identifier = Expr`
    fn parse_let_declaration(&mut self) -> Result<Expr, ParseError> {
        let let_span = self.current_span();
        self.advance();

        let (identifier, _) = self.expect_identifier("expected identifier after `let`")?;
        self.expect(Token::Equals)?;
        let value = self.parse_expression()?;

        let span = let_span.merge(value.span);
        Ok(Expr::new(
            ExprKind::LetDeclaration {
                identifier,
                value: Box::new(value),
            },
            span,
        ))
    }

    /// `fun Identifier ( params ) { body* }` — the parameter list is parsed
    /// as call-style arguments (commas optional) and each one must turn out
    /// to be a bare identifier.
    fn parse_fun_declaration(&mut self) -> Result<Expr, ParseError> {
        let fun_span = self.current_span();
        self.advance();

        let (name, _) = self.expect_identifier("expected function name after `fun`")?;
        self.expect(Token::OpenParen)?;
        let (args, _) = self.parse_argument_list()?;

        let mut parameters = Vec::with_capacity(args.len());
        for arg in args {
            match arg.kind {
                ExprKind::Identifier(symbol) => parameters.push(symbol),
                other => {
                    return Err(ParseError::new(
                        "function parameters must be identifiers",
                        arg.span,
                    )
                    .with_expected(vec!["identifier".to_string()])
                    .with_found(other.name().to_string()));
                }
            }
        }

        self.expect(Token::OpenBrace)?;
        let mut body = Vec::new();
        while !matches!(self.current_token(), Token::CloseBrace | Token::Eof) {
            body.push(self.parse_statement()?);
        }
        let close = self.expect(Token::CloseBrace)?;

        let span = fun_span.merge(close);
        Ok(Expr::new(
            ExprKind::FunDeclaration {
                name,
                parameters,
                body,
            },
            span,
        ))
    }

    /// The expression entry point: an object literal when the next token is
    /// `{`, otherwise an additive expression.
    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        if matches!(self.current_token(), Token::OpenBrace) {
            self.parse_object_literal()
        } else {
            self.parse_additive_expr()
        }
    }

    /// `{ key: Expr, shorthand, ... }` — a bare identifier is the shorthand
    /// form, resolved from scope at evaluation time.
    fn parse_object_literal(&mut self) -> Result<Expr, ParseError> {
        let open = self.expect(Token::OpenBrace)?;

        let mut properties = Vec::new();
        if !matches!(self.current_token(), Token::CloseBrace) {
            loop {
                let (key, key_span) =
                    self.expect_identifier("expected property name in object literal")?;

                let property = if matches!(self.current_token(), Token::Colon) {
                    self.advance();
                    let value = self.parse_expression()?;
                    let span = key_span.merge(value.span);
                    Expr::new(
                        ExprKind::Property {
                            key,
                            value: Some(Box::new(value)),
                        },
                        span,
                    )
                } else {
                    Expr::new(ExprKind::Property { key, value: None }, key_span)
                };
                properties.push(property);

                if matches!(self.current_token(), Token::Comma) {
                    self.advance();
                    if matches!(self.current_token(), Token::CloseBrace) {
                        break;
                    }
                } else {
                    break;
                }
            }
        }
        let close = self.expect(Token::CloseBrace)?;

        let span = properties
            .iter()
            .fold(open, |acc, property| acc.merge(property.span))
            .merge(close);
        Ok(Expr::new(ExprKind::ObjectLiteral { properties }, span))
    }

    fn parse_additive_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative_expr()?;
        while let Some(operator) = self.match_operator(&[InfixOp::Add, InfixOp::Sub]) {
            let right = self.parse_multiplicative_expr()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Infix {
                    left: Box::new(left),
                    right: Box::new(right),
                    operator,
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_multiplicative_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_exponential_expr()?;
        while let Some(operator) =
            self.match_operator(&[InfixOp::Mul, InfixOp::Div, InfixOp::Rem])
        {
            let right = self.parse_exponential_expr()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Infix {
                    left: Box::new(left),
                    right: Box::new(right),
                    operator,
                },
                span,
            );
        }
        Ok(left)
    }

    /// `^` binds tighter than the multiplicative level and is
    /// left-associative like everything else here.
    fn parse_exponential_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_member_call_expr()?;
        while let Some(operator) = self.match_operator(&[InfixOp::Caret]) {
            let right = self.parse_member_call_expr()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Infix {
                    left: Box::new(left),
                    right: Box::new(right),
                    operator,
                },
                span,
            );
        }
        Ok(left)
    }

    /// A primary followed by any run of `.ident`, `[expr]`, or `(args)`;
    /// each suffix rebinds the running expression, so `f(x)(y).z` nests
    /// left-to-right.
    fn parse_member_call_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary_expr()?;

        loop {
            match self.current_token() {
                Token::Dot => {
                    self.advance();
                    let (key, key_span) =
                        self.expect_identifier("expected property name after `.`")?;
                    let property = Expr::new(ExprKind::Identifier(key), key_span);
                    let span = expr.span.merge(key_span);
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property: Box::new(property),
                            kind: MemberKind::Literal,
                        },
                        span,
                    );
                }
                Token::OpenBracket => {
                    self.advance();
                    let property = self.parse_expression()?;
                    let close = self.expect(Token::CloseBracket)?;
                    let span = expr.span.merge(close);
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property: Box::new(property),
                            kind: MemberKind::Computed,
                        },
                        span,
                    );
                }
                Token::OpenParen => {
                    self.advance();
                    let (args, close) = self.parse_argument_list()?;
                    let span = expr.span.merge(close);
                    expr = Expr::new(
                        ExprKind::Call {
                            caller: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Expressions up to the closing `)`, which is consumed. Commas between
    /// arguments are accepted but not required.
    fn parse_argument_list(&mut self) -> Result<(Vec<Expr>, Span), ParseError> {
        let mut args = Vec::new();
        while !matches!(self.current_token(), Token::CloseParen | Token::Eof) {
            args.push(self.parse_expression()?);
            if matches!(self.current_token(), Token::Comma) {
                self.advance();
            }
        }
        let close = self.expect(Token::CloseParen)?;
        Ok((args, close))
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, ParseError> {
        let spanned = self.advance();
        match spanned.token {
            Token::Identifier(name) => Ok(Expr::new(
                ExprKind::Identifier(Rc::from(name.as_str())),
                spanned.span,
            )),
            Token::Number(value) => Ok(Expr::new(ExprKind::NumericLiteral(value), spanned.span)),
            Token::String(value) => Ok(Expr::new(
                ExprKind::StringLiteral(Rc::from(value.as_str())),
                spanned.span,
            )),
            Token::OpenParen => {
                let expr = self.parse_expression()?;
                self.expect(Token::CloseParen)?;
                // TODO widen the span to cover the parentheses
                Ok(expr)
            }
            Token::Eof => Err(ParseError::new("unexpected end of input", spanned.span)
                .with_expected(vec!["expression".to_string()])),
            other => Err(ParseError::new("unexpected token", spanned.span)
                .with_expected(vec!["expression".to_string()])
                .with_found(other.to_string())),
        }
    }
}

/// Parse one source text into a `Program` node.
///
/// The lexer's partial-result tolerance applies: if it stopped at an
/// unrecognised character the parser consumes whatever prefix was produced
/// (usually failing at the gap). Use the diagnostics pipeline in `evaluator`
/// to surface the lexing report itself.
pub fn parse_source(source: &str) -> Result<Expr, ParseError> {
    let lexed = lexer::tokenize(source);
    TokenParser::new(lexed.tokens).parse_program()
}

/// Parse a sequence of lines as one program. The lines are joined and lexed
/// as a single text, so the token stream carries exactly one trailing `Eof`
/// and spans index into the joined source.
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<Expr, ParseError> {
    let source = lines
        .iter()
        .map(|line| line.as_ref())
        .collect::<Vec<&str>>()
        .join("\n");
    parse_source(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Expr {
        parse_source(source).expect("parse failed")
    }

    fn parse_err(source: &str) -> ParseError {
        parse_source(source).expect_err("parse unexpectedly succeeded")
    }

    fn single_statement(source: &str) -> Expr {
        let program = parse(source);
        match program.kind {
            ExprKind::Program { mut body } => {
                assert_eq!(body.len(), 1, "expected a single statement");
                body.remove(0)
            }
            other => panic!("expected program, got {}", other.name()),
        }
    }

    fn infix_parts(expr: Expr) -> (Expr, InfixOp, Expr) {
        match expr.kind {
            ExprKind::Infix {
                left,
                right,
                operator,
            } => (*left, operator, *right),
            other => panic!("expected infix expression, got {}", other.name()),
        }
    }

    #[test]
    fn test_empty_program() {
        let program = parse("");
        assert!(matches!(program.kind, ExprKind::Program { ref body } if body.is_empty()));
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let (left, op, right) = infix_parts(single_statement("2 + 3 * 4"));
        assert_eq!(op, InfixOp::Add);
        assert!(matches!(left.kind, ExprKind::NumericLiteral(n) if n == 2.0));
        let (mul_left, mul_op, mul_right) = infix_parts(right);
        assert_eq!(mul_op, InfixOp::Mul);
        assert!(matches!(mul_left.kind, ExprKind::NumericLiteral(n) if n == 3.0));
        assert!(matches!(mul_right.kind, ExprKind::NumericLiteral(n) if n == 4.0));
    }

    #[test]
    fn test_left_associativity() {
        // 10 - 4 - 3 is (10 - 4) - 3
        let (left, op, right) = infix_parts(single_statement("10 - 4 - 3"));
        assert_eq!(op, InfixOp::Sub);
        assert!(matches!(right.kind, ExprKind::NumericLiteral(n) if n == 3.0));
        let (_, inner_op, _) = infix_parts(left);
        assert_eq!(inner_op, InfixOp::Sub);
    }

    #[test]
    fn test_caret_binds_tighter_than_multiplication() {
        // 2 * 3 ^ 4 is 2 * (3 ^ 4)
        let (_, op, right) = infix_parts(single_statement("2 * 3 ^ 4"));
        assert_eq!(op, InfixOp::Mul);
        let (_, inner_op, _) = infix_parts(right);
        assert_eq!(inner_op, InfixOp::Caret);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let (left, op, right) = infix_parts(single_statement("(2 + 3) * 4"));
        assert_eq!(op, InfixOp::Mul);
        let (_, inner_op, _) = infix_parts(left);
        assert_eq!(inner_op, InfixOp::Add);
        assert!(matches!(right.kind, ExprKind::NumericLiteral(n) if n == 4.0));
    }

    #[test]
    fn test_infix_span_covers_both_operands() {
        let expr = single_statement("12 + 345");
        assert_eq!(expr.span, Span::new(0, 8));
    }

    #[test]
    fn test_unclosed_paren_is_an_error() {
        let err = parse_err("(1 + 2");
        assert_eq!(err.expected, vec!["`)`".to_string()]);
    }

    #[test]
    fn test_let_declaration() {
        let expr = single_statement("let x = 5");
        match expr.kind {
            ExprKind::LetDeclaration { identifier, value } => {
                assert_eq!(identifier.as_ref(), "x");
                assert!(matches!(value.kind, ExprKind::NumericLiteral(n) if n == 5.0));
            }
            other => panic!("expected let declaration, got {}", other.name()),
        }
        assert_eq!(expr.span.start, 0);
    }

    #[test]
    fn test_let_requires_identifier() {
        let err = parse_err("let 5 = 5");
        assert_eq!(err.expected, vec!["identifier".to_string()]);
    }

    #[test]
    fn test_let_requires_equals() {
        let err = parse_err("let x 5");
        assert_eq!(err.expected, vec!["`=`".to_string()]);
        assert_eq!(err.found.as_deref(), Some("number"));
    }

    #[test]
    fn test_fun_declaration() {
        let expr = single_statement("fun add (a, b) { a + b }");
        match expr.kind {
            ExprKind::FunDeclaration {
                name,
                parameters,
                body,
            } => {
                assert_eq!(name.as_ref(), "add");
                let names: Vec<&str> = parameters.iter().map(|p| p.as_ref()).collect();
                assert_eq!(names, vec!["a", "b"]);
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected fun declaration, got {}", other.name()),
        }
    }

    #[test]
    fn test_fun_parameters_without_commas() {
        let expr = single_statement("fun add (a b) { a + b }");
        match expr.kind {
            ExprKind::FunDeclaration { parameters, .. } => {
                assert_eq!(parameters.len(), 2);
            }
            other => panic!("expected fun declaration, got {}", other.name()),
        }
    }

    #[test]
    fn test_fun_parameters_must_be_identifiers() {
        let err = parse_err("fun bad (a + 1) { a }");
        assert_eq!(err.message, "function parameters must be identifiers");
        assert_eq!(err.found.as_deref(), Some("InfixExpr"));
    }

    #[test]
    fn test_fun_body_is_a_statement_sequence() {
        let expr = single_statement("fun f () { let x = 1 x + 1 }");
        match expr.kind {
            ExprKind::FunDeclaration { body, .. } => {
                assert_eq!(body.len(), 2);
                assert!(matches!(body[0].kind, ExprKind::LetDeclaration { .. }));
            }
            other => panic!("expected fun declaration, got {}", other.name()),
        }
    }

    #[test]
    fn test_fun_requires_closing_brace() {
        let err = parse_err("fun f () { 1 + 1");
        assert_eq!(err.message, "unexpected end of input");
    }

    #[test]
    fn test_call_expression() {
        let expr = single_statement("add(1, 2)");
        match expr.kind {
            ExprKind::Call { caller, args } => {
                assert!(matches!(caller.kind, ExprKind::Identifier(ref s) if s.as_ref() == "add"));
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected call, got {}", other.name()),
        }
    }

    #[test]
    fn test_call_member_chain_nests_left_to_right() {
        // f(x)(y).z is Member(Call(Call(f, x), y), z)
        let expr = single_statement("f(x)(y).z");
        let (object, kind) = match expr.kind {
            ExprKind::Member { object, kind, .. } => (*object, kind),
            other => panic!("expected member, got {}", other.name()),
        };
        assert_eq!(kind, MemberKind::Literal);
        let inner_caller = match object.kind {
            ExprKind::Call { caller, .. } => *caller,
            other => panic!("expected call, got {}", other.name()),
        };
        assert!(matches!(inner_caller.kind, ExprKind::Call { .. }));
    }

    #[test]
    fn test_computed_member() {
        let expr = single_statement(r#"obj["key"]"#);
        match expr.kind {
            ExprKind::Member { kind, property, .. } => {
                assert_eq!(kind, MemberKind::Computed);
                assert!(matches!(property.kind, ExprKind::StringLiteral(_)));
            }
            other => panic!("expected member, got {}", other.name()),
        }
    }

    #[test]
    fn test_member_requires_property_name() {
        let err = parse_err("obj.");
        assert_eq!(err.message, "expected property name after `.`");
    }

    #[test]
    fn test_calls_bind_tighter_than_caret() {
        // f(1) ^ 2 applies the call before the operator
        let (left, op, _) = infix_parts(single_statement("f(1) ^ 2"));
        assert_eq!(op, InfixOp::Caret);
        assert!(matches!(left.kind, ExprKind::Call { .. }));
    }

    #[test]
    fn test_object_literal_forms() {
        let expr = single_statement("{ a: 1 + 1, b }");
        let properties = match expr.kind {
            ExprKind::ObjectLiteral { properties } => properties,
            other => panic!("expected object literal, got {}", other.name()),
        };
        assert_eq!(properties.len(), 2);
        match &properties[0].kind {
            ExprKind::Property { key, value } => {
                assert_eq!(key.as_ref(), "a");
                assert!(value.is_some());
            }
            other => panic!("expected property, got {}", other.name()),
        }
        match &properties[1].kind {
            ExprKind::Property { key, value } => {
                assert_eq!(key.as_ref(), "b");
                assert!(value.is_none());
            }
            other => panic!("expected property, got {}", other.name()),
        }
    }

    #[test]
    fn test_empty_object_literal() {
        let expr = single_statement("{}");
        assert!(matches!(
            expr.kind,
            ExprKind::ObjectLiteral { ref properties } if properties.is_empty()
        ));
    }

    #[test]
    fn test_object_literal_trailing_comma() {
        let expr = single_statement("{ a: 1, }");
        assert!(matches!(
            expr.kind,
            ExprKind::ObjectLiteral { ref properties } if properties.len() == 1
        ));
    }

    #[test]
    fn test_object_literal_span_covers_braces() {
        let expr = single_statement("{ a: 1 }");
        assert_eq!(expr.span, Span::new(0, 8));
    }

    #[test]
    fn test_object_literal_key_needs_value_after_colon() {
        let err = parse_err("{ a: }");
        assert_eq!(err.message, "unexpected token");
        assert_eq!(err.found.as_deref(), Some("`}`"));
    }

    #[test]
    fn test_object_literal_rejects_non_identifier_keys() {
        let err = parse_err("{ 1: 2 }");
        assert_eq!(err.message, "expected property name in object literal");
    }

    #[test]
    fn test_object_as_let_value() {
        let expr = single_statement("let point = { x: 1, y: 2 }");
        match expr.kind {
            ExprKind::LetDeclaration { value, .. } => {
                assert!(matches!(value.kind, ExprKind::ObjectLiteral { .. }));
            }
            other => panic!("expected let declaration, got {}", other.name()),
        }
    }

    #[test]
    fn test_program_is_a_statement_sequence() {
        let program = parse("let x = 1\nlet y = 2\nx + y");
        match program.kind {
            ExprKind::Program { body } => assert_eq!(body.len(), 3),
            other => panic!("expected program, got {}", other.name()),
        }
    }

    #[test]
    fn test_parse_lines_joins_into_one_stream() {
        let lines = ["let x = 5", "x + 1"];
        let program = parse_lines(&lines).unwrap();
        match program.kind {
            ExprKind::Program { body } => assert_eq!(body.len(), 2),
            other => panic!("expected program, got {}", other.name()),
        }
    }

    #[test]
    fn test_trailing_operator_is_an_error() {
        let err = parse_err("1 +");
        assert_eq!(err.message, "unexpected end of input");
        assert_eq!(err.expected, vec!["expression".to_string()]);
    }

    #[test]
    fn test_stray_semicolon_is_an_error() {
        // `;` is lexed but no production consumes it
        let err = parse_err("let x = 5;");
        assert_eq!(err.found.as_deref(), Some("`;`"));
    }
}
