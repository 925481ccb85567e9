use tracing::debug;

use crate::{
    error::ParseError,
    lexer::{Token, TokenKind},
};

use super::{
    ArrayIndex, Assign, BinOpKind, Block, Declaration, Declarations, Expr, ExprKind,
    FunctionDeclaration, LValue, Program, RelOpKind, Stmt, TypeSpecifier, VarDef, Variable,
    VariableDeclarations,
};

type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn parse(&mut self) -> ParseResult<Program> {
        let program = self.parse_program()?;
        if let Some(t) = self.peek_token() {
            return Err(ParseError::UnexpectedToken {
                found: t.text.clone(),
                expected: "end of input".to_string(),
                line: t.line,
            });
        }
        debug!(tokens = self.tokens.len(), "parsing finished");
        Ok(program)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn peek(&self) -> Option<TokenKind> {
        self.peek_token().map(|t| t.kind)
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek() != Some(kind) {
            return false;
        }
        self.index += 1;
        true
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        let expected = expected.into();
        match self.peek_token() {
            Some(t) => ParseError::UnexpectedToken {
                found: t.text.clone(),
                expected,
                line: t.line,
            },
            None => ParseError::UnexpectedEof { expected },
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<&Token> {
        if self.peek() != Some(kind) {
            return Err(self.unexpected(kind.to_string()));
        }
        self.index += 1;
        Ok(&self.tokens[self.index - 1])
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        self.expect(TokenKind::Ident).map(|t| t.text.clone())
    }

    fn expect_num(&mut self) -> ParseResult<i32> {
        let t = self.expect(TokenKind::Num)?;
        t.text
            .parse()
            .map_err(|_| ParseError::IntegerOutOfRange {
                literal: t.text.clone(),
                line: t.line,
            })
    }

    /// program = block
    ///         | declarations block
    fn parse_program(&mut self) -> ParseResult<Program> {
        let declarations = if self.peek() == Some(TokenKind::OpenCurlyBrace) {
            None
        } else {
            Some(self.parse_declarations()?)
        };
        let body = self.parse_block()?;

        Ok(Program { declarations, body })
    }

    /// declarations = (variabledecl | functiondecl)+
    fn parse_declarations(&mut self) -> ParseResult<Declarations> {
        let mut declarations = vec![];
        loop {
            match self.peek() {
                Some(TokenKind::Int) => {
                    declarations.push(Declaration::Variables(self.parse_variable_declarations()?))
                }
                Some(TokenKind::Ident) => {
                    declarations.push(Declaration::Function(self.parse_function_declaration()?))
                }
                _ if declarations.is_empty() => {
                    return Err(self.unexpected("declaration or '{'"));
                }
                _ => break,
            }
        }

        Ok(Declarations(declarations))
    }

    /// variabledecl = "int" vardef ("," vardef)* ";"
    fn parse_variable_declarations(&mut self) -> ParseResult<VariableDeclarations> {
        self.expect(TokenKind::Int)?;
        let mut variables = vec![self.parse_vardef()?];
        while self.consume(TokenKind::Comma) {
            variables.push(self.parse_vardef()?);
        }
        self.expect(TokenKind::SemiColon)?;

        Ok(VariableDeclarations {
            specifier: TypeSpecifier::Int,
            variables,
        })
    }

    /// vardef = ident
    ///        | ident "[" num "]"
    fn parse_vardef(&mut self) -> ParseResult<VarDef> {
        let name = self.expect_ident()?;
        if !self.consume(TokenKind::OpenSquareBrace) {
            return Ok(VarDef::Variable(name));
        }
        let size = self.expect_num()?;
        self.expect(TokenKind::CloseSquareBrace)?;

        Ok(VarDef::Array(name, size as usize))
    }

    /// functiondecl = ident "(" arglist? ")" ";" variabledecl? block
    fn parse_function_declaration(&mut self) -> ParseResult<FunctionDeclaration> {
        let name = self.expect_ident()?;
        self.expect(TokenKind::OpenParen)?;
        let params = if self.consume(TokenKind::CloseParen) {
            None
        } else {
            let mut params = vec![self.expect_ident()?];
            while self.consume(TokenKind::Comma) {
                params.push(self.expect_ident()?);
            }
            self.expect(TokenKind::CloseParen)?;
            Some(params)
        };
        self.expect(TokenKind::SemiColon)?;

        let locals = if self.peek() == Some(TokenKind::Int) {
            Some(self.parse_variable_declarations()?)
        } else {
            None
        };
        let body = self.parse_block()?;

        Ok(FunctionDeclaration {
            name,
            params,
            locals,
            body,
        })
    }

    /// block = "{" stmt (";" stmt)* "}"
    ///
    /// Empty statements are dropped.
    fn parse_block(&mut self) -> ParseResult<Block> {
        self.expect(TokenKind::OpenCurlyBrace)?;
        let mut stmts = vec![];
        loop {
            if let Some(stmt) = self.parse_stmt()? {
                stmts.push(stmt);
            }
            if !self.consume(TokenKind::SemiColon) {
                break;
            }
        }
        self.expect(TokenKind::CloseCurlyBrace)?;

        Ok(Block(stmts))
    }

    /// stmt = assignment
    ///      | "if" "(" relexpr ")" block ("else" block)?
    ///      | "while" "(" relexpr ")" block
    ///      | block
    ///      | "print" "(" expr ")"
    ///      | "read" "(" ident ")"
    ///      | "return" expr
    ///      | ε
    fn parse_stmt(&mut self) -> ParseResult<Option<Stmt>> {
        let stmt = match self.peek() {
            Some(TokenKind::SemiColon) | Some(TokenKind::CloseCurlyBrace) => return Ok(None),
            Some(TokenKind::Ident) => Stmt::Assign(self.parse_assignment()?),
            Some(TokenKind::If) => {
                self.index += 1;
                let cond = self.parse_paren_relexpr()?;
                let block = self.parse_block()?;
                let else_block = if self.consume(TokenKind::Else) {
                    Some(self.parse_block()?)
                } else {
                    None
                };
                Stmt::If(cond, block, else_block)
            }
            Some(TokenKind::While) => {
                self.index += 1;
                let cond = self.parse_paren_relexpr()?;
                Stmt::While(cond, self.parse_block()?)
            }
            Some(TokenKind::OpenCurlyBrace) => Stmt::Block(self.parse_block()?),
            Some(TokenKind::Print) => {
                self.index += 1;
                self.expect(TokenKind::OpenParen)?;
                let expr = self.parse_expr()?;
                self.expect(TokenKind::CloseParen)?;
                Stmt::Print(expr)
            }
            Some(TokenKind::Read) => {
                self.index += 1;
                self.expect(TokenKind::OpenParen)?;
                let name = self.expect_ident()?;
                self.expect(TokenKind::CloseParen)?;
                Stmt::Read(Variable::new(&name))
            }
            Some(TokenKind::Return) => {
                self.index += 1;
                Stmt::Return(self.parse_expr()?)
            }
            _ => return Err(self.unexpected("statement")),
        };

        Ok(Some(stmt))
    }

    /// assignment = ident "=" expr
    ///            | ident "[" expr "]" "=" expr
    fn parse_assignment(&mut self) -> ParseResult<Assign> {
        let name = self.expect_ident()?;
        let target = if self.consume(TokenKind::OpenSquareBrace) {
            let index = self.parse_expr()?;
            self.expect(TokenKind::CloseSquareBrace)?;
            LValue::ArrayIndex(ArrayIndex::new(&name, index))
        } else {
            LValue::Variable(Variable::new(&name))
        };
        self.expect(TokenKind::Equal)?;

        Ok(Assign::new(target, self.parse_expr()?))
    }

    fn parse_paren_relexpr(&mut self) -> ParseResult<Expr> {
        self.expect(TokenKind::OpenParen)?;
        let expr = self.parse_relexpr()?;
        self.expect(TokenKind::CloseParen)?;
        Ok(expr)
    }

    /// relexpr = expr ("==" | "!=" | "<" | "<=" | ">" | ">=") expr
    fn parse_relexpr(&mut self) -> ParseResult<Expr> {
        let left = self.parse_expr()?;
        let kind = match self.peek() {
            Some(TokenKind::DoubleEqual) => RelOpKind::Equal,
            Some(TokenKind::NotEqual) => RelOpKind::NotEqual,
            Some(TokenKind::LessThan) => RelOpKind::LessThan,
            Some(TokenKind::LessEqual) => RelOpKind::LessEqual,
            Some(TokenKind::GreaterThan) => RelOpKind::GreaterThan,
            Some(TokenKind::GreaterEqual) => RelOpKind::GreaterEqual,
            _ => return Err(self.unexpected("relational operator")),
        };
        self.index += 1;
        let right = self.parse_expr()?;

        Ok(Expr::new(ExprKind::RelOp(
            kind,
            Box::new(left),
            Box::new(right),
        )))
    }

    /// expr = mul ("+" mul | "-" mul)*
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        let mut node = self.parse_mul()?;

        loop {
            let kind = match self.peek() {
                Some(TokenKind::Plus) => BinOpKind::Add,
                Some(TokenKind::Minus) => BinOpKind::Sub,
                _ => return Ok(node),
            };
            self.index += 1;
            let right = self.parse_mul()?;
            node = Expr::new(ExprKind::BinOp(kind, Box::new(node), Box::new(right)));
        }
    }

    /// mul = primary ("*" primary | "/" primary)*
    fn parse_mul(&mut self) -> ParseResult<Expr> {
        let mut node = self.parse_primary()?;

        loop {
            let kind = match self.peek() {
                Some(TokenKind::Star) => BinOpKind::Mul,
                Some(TokenKind::Slash) => BinOpKind::Div,
                _ => return Ok(node),
            };
            self.index += 1;
            let right = self.parse_primary()?;
            node = Expr::new(ExprKind::BinOp(kind, Box::new(node), Box::new(right)));
        }
    }

    /// primary = num
    ///         | ident
    ///         | ident "[" expr "]"
    ///         | ident "(" (expr ("," expr)*)? ")"
    ///         | "(" expr ")"
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            Some(TokenKind::OpenParen) => {
                self.index += 1;
                let expr = self.parse_expr()?;
                self.expect(TokenKind::CloseParen)?;
                Ok(expr)
            }
            Some(TokenKind::Num) => Ok(Expr::integer(self.expect_num()?)),
            Some(TokenKind::Ident) => {
                let name = self.expect_ident()?;
                self.parse_ident(name)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_ident(&mut self, name: String) -> ParseResult<Expr> {
        if self.consume(TokenKind::OpenSquareBrace) {
            let index = self.parse_expr()?;
            self.expect(TokenKind::CloseSquareBrace)?;
            return Ok(Expr::new(ExprKind::ArrayIndex(ArrayIndex::new(&name, index))));
        }
        if !self.consume(TokenKind::OpenParen) {
            return Ok(Expr::new(ExprKind::Variable(Variable::new(&name))));
        }

        if self.consume(TokenKind::CloseParen) {
            return Ok(Expr::new(ExprKind::FunctionCall(name, None)));
        }
        let mut args = vec![self.parse_expr()?];
        while self.consume(TokenKind::Comma) {
            args.push(self.parse_expr()?);
        }
        self.expect(TokenKind::CloseParen)?;

        Ok(Expr::new(ExprKind::FunctionCall(name, Some(args))))
    }
}
