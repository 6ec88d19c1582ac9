use sp_ast::{Node, NodeKind};
use sp_lexer::TokenKind;

use super::{PResult, Parser};

impl Parser<'_> {
    /// `Type`: primitive or class type, followed by `[]` dimensions.
    pub(super) fn type_(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::Type);
        if self.peek().is_primitive() {
            self.bump_into(&mut node);
        } else {
            self.class_type_into(&mut node)?;
        }
        self.dims_into(&mut node);
        Ok(self.finish(node))
    }

    /// `Ident [TypeArgs] (. Ident [TypeArgs])*`
    pub(super) fn class_type_into(&mut self, node: &mut Node) -> PResult<()> {
        self.expect_into(node, TokenKind::Ident)?;
        if self.at(TokenKind::Lt) {
            node.push_node(self.type_args()?);
        }
        while self.at(TokenKind::Dot) && self.nth(1) == TokenKind::Ident {
            self.bump_into(node);
            self.bump_into(node);
            if self.at(TokenKind::Lt) {
                node.push_node(self.type_args()?);
            }
        }
        Ok(())
    }

    /// Empty `[]` pairs, attached to `node` as a `Dims` child.
    pub(super) fn dims_into(&mut self, node: &mut Node) {
        if !(self.at(TokenKind::LBracket) && self.nth(1) == TokenKind::RBracket) {
            return;
        }
        let mut dims = self.start(NodeKind::Dims);
        while self.at(TokenKind::LBracket) && self.nth(1) == TokenKind::RBracket {
            self.bump_into(&mut dims);
            self.bump_into(&mut dims);
        }
        node.push_node(self.finish(dims));
    }

    pub(super) fn type_args(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::TypeArgs);
        self.expect_into(&mut node, TokenKind::Lt)?;
        self.angle_depth += 1;
        if !self.at_close_angle() {
            loop {
                node.push_node(self.type_arg()?);
                if self.pending_gt > 0 || !self.eat_into(&mut node, TokenKind::Comma) {
                    break;
                }
            }
        }
        self.close_angle()?;
        Ok(self.finish(node))
    }

    fn type_arg(&mut self) -> PResult<Node> {
        if !self.at(TokenKind::Question) {
            return self.type_();
        }
        let mut node = self.start(NodeKind::Wildcard);
        self.bump_into(&mut node);
        if matches!(self.peek(), TokenKind::Extends | TokenKind::Super) {
            self.bump_into(&mut node);
            node.push_node(self.type_()?);
        }
        Ok(self.finish(node))
    }

    fn at_close_angle(&self) -> bool {
        self.pending_gt > 0
            || matches!(
                self.peek(),
                TokenKind::Gt | TokenKind::Shr | TokenKind::Ushr
            )
    }

    /// Close one type argument list. `>>` and `>>>` close several at once;
    /// the surplus is owed to the enclosing lists.
    fn close_angle(&mut self) -> PResult<()> {
        if self.pending_gt > 0 {
            self.pending_gt -= 1;
        } else {
            self.close_angle_token()?;
        }
        self.angle_depth = self.angle_depth.saturating_sub(1);
        if self.angle_depth == 0 && self.pending_gt > 0 {
            return Err(self.error("unbalanced `>` in type arguments"));
        }
        Ok(())
    }

    fn close_angle_token(&mut self) -> PResult<()> {
        match self.peek() {
            TokenKind::Gt => {
                self.bump();
            }
            TokenKind::Shr => {
                self.bump();
                self.pending_gt = 1;
            }
            TokenKind::Ushr => {
                self.bump();
                self.pending_gt = 2;
            }
            _ => return Err(self.expected("`>`")),
        }
        Ok(())
    }

    /// `<T, U extends Bound & Other>`
    pub(super) fn type_params(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::TypeParams);
        self.expect_into(&mut node, TokenKind::Lt)?;
        self.angle_depth += 1;
        loop {
            let mut param = self.start(NodeKind::TypeParam);
            while self.at(TokenKind::At) {
                param.push_node(self.annotation()?);
            }
            self.expect_into(&mut param, TokenKind::Ident)?;
            if self.eat_into(&mut param, TokenKind::Extends) {
                param.push_node(self.type_()?);
                while self.eat_into(&mut param, TokenKind::Amp) {
                    param.push_node(self.type_()?);
                }
            }
            node.push_node(self.finish(param));
            if self.pending_gt > 0 || !self.eat_into(&mut node, TokenKind::Comma) {
                break;
            }
        }
        self.close_angle()?;
        Ok(self.finish(node))
    }

    /// Comma-separated types, as in `implements A, B`.
    pub(super) fn type_list_into(&mut self, node: &mut Node) -> PResult<()> {
        loop {
            node.push_node(self.type_()?);
            if !self.eat_into(node, TokenKind::Comma) {
                return Ok(());
            }
        }
    }
}
