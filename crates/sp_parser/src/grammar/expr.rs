use sp_ast::{Node, NodeKind};
use sp_lexer::TokenKind;

use super::{PResult, ParseError, Parser};

/// Binding power of a binary operator, or `None` if `kind` is not one.
fn precedence(kind: TokenKind) -> Option<u8> {
    let prec = match kind {
        TokenKind::OrOr => 1,
        TokenKind::AndAnd => 2,
        TokenKind::Pipe => 3,
        TokenKind::Caret => 4,
        TokenKind::Amp => 5,
        TokenKind::EqEq | TokenKind::NotEq => 6,
        TokenKind::Lt
        | TokenKind::Gt
        | TokenKind::LtEq
        | TokenKind::GtEq
        | TokenKind::Instanceof => 7,
        TokenKind::Shl | TokenKind::Shr | TokenKind::Ushr => 8,
        TokenKind::Plus | TokenKind::Minus => 9,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 10,
        _ => return None,
    };
    Some(prec)
}

/// Tokens that may open the operand of a reference-type cast. Excludes `+`
/// and `-`, so `(a) - b` stays a subtraction.
fn starts_cast_operand(kind: TokenKind) -> bool {
    kind.is_literal()
        || kind.is_primitive()
        || matches!(
            kind,
            TokenKind::Ident
                | TokenKind::LParen
                | TokenKind::Bang
                | TokenKind::Tilde
                | TokenKind::This
                | TokenKind::Super
                | TokenKind::New
                | TokenKind::ColorLit
        )
}

impl Parser<'_> {
    /// Assignment is right-associative and sits below the conditional.
    pub(super) fn expression(&mut self) -> PResult<Node> {
        let lhs = self.conditional()?;
        if !self.peek().is_assign_op() {
            return Ok(lhs);
        }
        let mut node = self.wrap(NodeKind::Assign, lhs);
        self.bump_into(&mut node);
        let rhs = if self.at(TokenKind::LBrace) {
            self.array_init()?
        } else {
            self.expression()?
        };
        node.push_node(rhs);
        Ok(self.finish(node))
    }

    pub(super) fn conditional(&mut self) -> PResult<Node> {
        let cond = self.binary(1)?;
        if !self.at(TokenKind::Question) {
            return Ok(cond);
        }
        let mut node = self.wrap(NodeKind::Conditional, cond);
        self.bump_into(&mut node);
        node.push_node(self.expression()?);
        self.expect_into(&mut node, TokenKind::Colon)?;
        node.push_node(self.conditional()?);
        Ok(self.finish(node))
    }

    /// Precedence climbing over the binary operators, `instanceof` included.
    fn binary(&mut self, min_prec: u8) -> PResult<Node> {
        let mut lhs = self.unary()?;
        while let Some(prec) = precedence(self.peek()) {
            if prec < min_prec {
                break;
            }
            if self.peek() == TokenKind::Instanceof {
                let mut node = self.wrap(NodeKind::InstanceOf, lhs);
                self.bump_into(&mut node);
                node.push_node(self.type_()?);
                lhs = self.finish(node);
                continue;
            }
            let mut node = self.wrap(NodeKind::Binary, lhs);
            self.bump_into(&mut node);
            node.push_node(self.binary(prec + 1)?);
            lhs = self.finish(node);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> PResult<Node> {
        match self.peek() {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Bang
            | TokenKind::Tilde
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus => {
                let mut node = self.start(NodeKind::Prefix);
                self.bump_into(&mut node);
                node.push_node(self.unary()?);
                Ok(self.finish(node))
            }
            TokenKind::LParen => match self.attempt(|p| p.cast()) {
                Some(node) => Ok(node),
                None => self.postfix(),
            },
            _ => self.postfix(),
        }
    }

    /// `(int) x`, `(float[]) o` or `(String) o`.
    fn cast(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::Cast);
        self.expect_into(&mut node, TokenKind::LParen)?;
        let primitive = self.peek().is_primitive();
        node.push_node(self.type_()?);
        self.expect_into(&mut node, TokenKind::RParen)?;
        if !primitive && !starts_cast_operand(self.peek()) {
            return Err(self.expected("cast operand"));
        }
        node.push_node(self.unary()?);
        Ok(self.finish(node))
    }

    /// Primary followed by selectors, indexing and `++`/`--`.
    fn postfix(&mut self) -> PResult<Node> {
        let mut expr = self.primary()?;
        loop {
            match self.peek() {
                TokenKind::Dot => expr = self.selector(expr)?,
                TokenKind::LBracket if self.nth(1) == TokenKind::RBracket => {
                    let mut node = self.wrap(NodeKind::ClassLiteral, expr);
                    self.dims_into(&mut node);
                    self.expect_into(&mut node, TokenKind::Dot)?;
                    self.expect_into(&mut node, TokenKind::Class)?;
                    expr = self.finish(node);
                }
                TokenKind::LBracket => {
                    let mut node = self.wrap(NodeKind::Index, expr);
                    self.bump_into(&mut node);
                    node.push_node(self.expression()?);
                    self.expect_into(&mut node, TokenKind::RBracket)?;
                    expr = self.finish(node);
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let mut node = self.wrap(NodeKind::Postfix, expr);
                    self.bump_into(&mut node);
                    expr = self.finish(node);
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Everything that can follow a `.` after an expression.
    fn selector(&mut self, target: Node) -> PResult<Node> {
        let mut node = self.wrap(NodeKind::FieldAccess, target);
        self.expect_into(&mut node, TokenKind::Dot)?;
        match self.peek() {
            TokenKind::Class => {
                node.kind = NodeKind::ClassLiteral;
                self.bump_into(&mut node);
            }
            TokenKind::This => {
                self.bump_into(&mut node);
            }
            TokenKind::New => {
                node.kind = NodeKind::New;
                self.bump_into(&mut node);
                self.creator_into(&mut node)?;
            }
            TokenKind::Super => {
                self.bump_into(&mut node);
                if self.at(TokenKind::LParen) {
                    node.kind = NodeKind::MethodCall;
                    node.push_node(self.args()?);
                }
            }
            TokenKind::Lt => {
                node.kind = NodeKind::MethodCall;
                node.push_node(self.type_args()?);
                self.expect_into(&mut node, TokenKind::Ident)?;
                node.push_node(self.args()?);
            }
            _ => {
                self.expect_into(&mut node, TokenKind::Ident)?;
                if self.at(TokenKind::LParen) {
                    node.kind = NodeKind::MethodCall;
                    node.push_node(self.args()?);
                }
            }
        }
        Ok(self.finish(node))
    }

    fn primary(&mut self) -> PResult<Node> {
        let kind = self.peek();
        match kind {
            k if k.is_literal() => {
                let mut node = self.start(NodeKind::Literal);
                self.bump_into(&mut node);
                Ok(self.finish(node))
            }
            TokenKind::ColorLit => {
                if !self.options.web_colors {
                    return Err(self.error("web color literals are disabled"));
                }
                let mut node = self.start(NodeKind::ColorLiteral);
                self.bump_into(&mut node);
                Ok(self.finish(node))
            }
            TokenKind::This | TokenKind::Super => {
                let kind = if kind == TokenKind::This {
                    NodeKind::This
                } else {
                    NodeKind::Super
                };
                let mut node = self.start(kind);
                self.bump_into(&mut node);
                if self.at(TokenKind::LParen) {
                    node.push_node(self.args()?);
                }
                Ok(self.finish(node))
            }
            TokenKind::LParen => {
                let mut node = self.start(NodeKind::Paren);
                self.bump_into(&mut node);
                node.push_node(self.expression()?);
                self.expect_into(&mut node, TokenKind::RParen)?;
                Ok(self.finish(node))
            }
            TokenKind::New => {
                let mut node = self.start(NodeKind::New);
                self.bump_into(&mut node);
                self.creator_into(&mut node)?;
                Ok(self.finish(node))
            }
            k if k.is_primitive() => {
                if self.nth(1) == TokenKind::LParen {
                    return self.cast_call();
                }
                self.class_literal()
            }
            TokenKind::Void => self.class_literal(),
            TokenKind::Ident => {
                if self.at_color_cast() {
                    return self.cast_call();
                }
                let mut node = self.start(NodeKind::Name);
                self.bump_into(&mut node);
                if self.at(TokenKind::LParen) {
                    node.kind = NodeKind::MethodCall;
                    node.push_node(self.args()?);
                }
                Ok(self.finish(node))
            }
            _ => Err(self.expected("expression")),
        }
    }

    /// `int.class`, `float[].class`, `void.class`
    fn class_literal(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::ClassLiteral);
        if self.at(TokenKind::Void) {
            self.bump_into(&mut node);
        } else {
            node.push_node(self.type_()?);
        }
        self.expect_into(&mut node, TokenKind::Dot)?;
        self.expect_into(&mut node, TokenKind::Class)?;
        Ok(self.finish(node))
    }

    /// `color(x)` with exactly one argument is the alias cast-call; with any
    /// other arity it is the ordinary `color(r, g, b)` function. The
    /// one-argument gray form `color(255)` is therefore a plain `int` cast,
    /// not a gray level.
    fn at_color_cast(&mut self) -> bool {
        if !self.options.enhanced_casting
            || self.text() != "color"
            || self.nth(1) != TokenKind::LParen
        {
            return false;
        }
        self.lookahead(|p| {
            p.bump();
            matches!(p.args(), Ok(args) if args.nodes().count() == 1)
        })
    }

    /// `int(x)`: a primitive or `color` applied like a function.
    fn cast_call(&mut self) -> PResult<Node> {
        if !self.options.enhanced_casting {
            return Err(self.error(format!(
                "`{}(...)` casts require enhanced casting",
                self.text()
            )));
        }
        let mut node = self.start(NodeKind::CastCall);
        self.bump_into(&mut node);
        let args = self.args()?;
        if args.nodes().count() != 1 {
            return Err(ParseError {
                token: args.tokens.start,
                message: "a cast takes exactly one argument".to_string(),
            });
        }
        node.push_node(args);
        Ok(self.finish(node))
    }

    /// `( expr, expr )`
    pub(super) fn args(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::Args);
        self.expect_into(&mut node, TokenKind::LParen)?;
        if !self.at(TokenKind::RParen) {
            loop {
                node.push_node(self.expression()?);
                if !self.eat_into(&mut node, TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect_into(&mut node, TokenKind::RParen)?;
        Ok(self.finish(node))
    }

    /// After `new`: array creation, or a class instantiation with an
    /// optional anonymous body.
    fn creator_into(&mut self, node: &mut Node) -> PResult<()> {
        let mut ty = self.start(NodeKind::Type);
        if self.peek().is_primitive() {
            self.bump_into(&mut ty);
        } else {
            self.class_type_into(&mut ty)?;
        }
        node.push_node(self.finish(ty));

        if self.at(TokenKind::LBracket) {
            node.kind = NodeKind::ArrayCreation;
            while self.at(TokenKind::LBracket) && self.nth(1) != TokenKind::RBracket {
                self.bump_into(node);
                node.push_node(self.expression()?);
                self.expect_into(node, TokenKind::RBracket)?;
            }
            self.dims_into(node);
            if self.at(TokenKind::LBrace) {
                node.push_node(self.array_init()?);
            }
            return Ok(());
        }

        node.push_node(self.args()?);
        if self.at(TokenKind::LBrace) {
            node.push_node(self.class_body()?);
        }
        Ok(())
    }
}
