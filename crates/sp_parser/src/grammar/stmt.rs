use sp_ast::{Node, NodeKind};
use sp_lexer::TokenKind;

use super::{PResult, Parser};

impl Parser<'_> {
    /// `{ blockStatement* }`
    pub(super) fn block(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::Block);
        self.expect_into(&mut node, TokenKind::LBrace)?;
        while !self.at(TokenKind::RBrace) {
            if self.at(TokenKind::Eof) {
                return Err(self.expected("`}`"));
            }
            node.push_node(self.block_statement()?);
        }
        self.expect_into(&mut node, TokenKind::RBrace)?;
        Ok(self.finish(node))
    }

    /// Local class, local variable declaration or statement. Also the unit
    /// of the static-program production.
    pub(super) fn block_statement(&mut self) -> PResult<Node> {
        if self.lookahead(|p| p.modifiers().is_ok() && p.at_type_decl()) {
            let mods = self.modifiers()?;
            let decl = self.type_decl(mods)?;
            let node = self.wrap(NodeKind::LocalClassDecl, decl);
            return Ok(self.finish(node));
        }
        if self.at_local_var_decl() {
            let mut node = self.local_var_decl()?;
            self.expect_into(&mut node, TokenKind::Semi)?;
            return Ok(self.finish(node));
        }
        self.statement()
    }

    /// `[final] Type name` followed by something only a declaration allows.
    fn at_local_var_decl(&mut self) -> bool {
        self.lookahead(|p| {
            p.modifiers().is_ok()
                && p.type_().is_ok()
                && p.at(TokenKind::Ident)
                && matches!(
                    p.nth(1),
                    TokenKind::Assign
                        | TokenKind::Semi
                        | TokenKind::Comma
                        | TokenKind::LBracket
                        | TokenKind::Colon
                )
        })
    }

    fn local_var_decl(&mut self) -> PResult<Node> {
        let mods = self.modifiers()?;
        let mut node = self.wrap(NodeKind::LocalVarDecl, mods);
        node.push_node(self.type_()?);
        self.var_declarators_into(&mut node)?;
        Ok(self.finish(node))
    }

    pub(super) fn statement(&mut self) -> PResult<Node> {
        match self.peek() {
            TokenKind::LBrace => self.block(),
            TokenKind::Semi => self.empty(),
            TokenKind::If => self.if_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::While => {
                let mut node = self.start(NodeKind::While);
                self.bump_into(&mut node);
                node.push_node(self.paren_condition()?);
                node.push_node(self.statement()?);
                Ok(self.finish(node))
            }
            TokenKind::Do => {
                let mut node = self.start(NodeKind::Do);
                self.bump_into(&mut node);
                node.push_node(self.statement()?);
                self.expect_into(&mut node, TokenKind::While)?;
                node.push_node(self.paren_condition()?);
                self.expect_into(&mut node, TokenKind::Semi)?;
                Ok(self.finish(node))
            }
            TokenKind::Try => self.try_statement(),
            TokenKind::Switch => self.switch_statement(),
            TokenKind::Return => {
                let mut node = self.start(NodeKind::Return);
                self.bump_into(&mut node);
                if !self.at(TokenKind::Semi) {
                    node.push_node(self.expression()?);
                }
                self.expect_into(&mut node, TokenKind::Semi)?;
                Ok(self.finish(node))
            }
            kind @ (TokenKind::Break | TokenKind::Continue) => {
                let kind = if kind == TokenKind::Break {
                    NodeKind::Break
                } else {
                    NodeKind::Continue
                };
                let mut node = self.start(kind);
                self.bump_into(&mut node);
                self.eat_into(&mut node, TokenKind::Ident);
                self.expect_into(&mut node, TokenKind::Semi)?;
                Ok(self.finish(node))
            }
            TokenKind::Throw => {
                let mut node = self.start(NodeKind::Throw);
                self.bump_into(&mut node);
                node.push_node(self.expression()?);
                self.expect_into(&mut node, TokenKind::Semi)?;
                Ok(self.finish(node))
            }
            TokenKind::Synchronized => {
                let mut node = self.start(NodeKind::Synchronized);
                self.bump_into(&mut node);
                node.push_node(self.paren_condition()?);
                node.push_node(self.block()?);
                Ok(self.finish(node))
            }
            TokenKind::Assert => {
                let mut node = self.start(NodeKind::Assert);
                self.bump_into(&mut node);
                node.push_node(self.expression()?);
                if self.eat_into(&mut node, TokenKind::Colon) {
                    node.push_node(self.expression()?);
                }
                self.expect_into(&mut node, TokenKind::Semi)?;
                Ok(self.finish(node))
            }
            TokenKind::Ident if self.nth(1) == TokenKind::Colon => {
                let mut node = self.start(NodeKind::Labeled);
                self.bump_into(&mut node);
                self.bump_into(&mut node);
                node.push_node(self.statement()?);
                Ok(self.finish(node))
            }
            _ => {
                let mut node = self.start(NodeKind::ExprStmt);
                node.push_node(self.expression()?);
                self.expect_into(&mut node, TokenKind::Semi)?;
                Ok(self.finish(node))
            }
        }
    }

    /// `( expression )` as used by `if`, `while`, `switch` and friends.
    fn paren_condition(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::Paren);
        self.expect_into(&mut node, TokenKind::LParen)?;
        node.push_node(self.expression()?);
        self.expect_into(&mut node, TokenKind::RParen)?;
        Ok(self.finish(node))
    }

    fn if_statement(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::If);
        self.expect_into(&mut node, TokenKind::If)?;
        node.push_node(self.paren_condition()?);
        node.push_node(self.statement()?);
        if self.eat_into(&mut node, TokenKind::Else) {
            node.push_node(self.statement()?);
        }
        Ok(self.finish(node))
    }

    fn for_statement(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::For);
        self.expect_into(&mut node, TokenKind::For)?;
        self.expect_into(&mut node, TokenKind::LParen)?;

        let foreach = self.lookahead(|p| {
            p.modifiers().is_ok()
                && p.type_().is_ok()
                && p.at(TokenKind::Ident)
                && p.nth(1) == TokenKind::Colon
        });

        if foreach {
            node.kind = NodeKind::ForEach;
            let mods = self.modifiers()?;
            node.push_node(mods);
            node.push_node(self.type_()?);
            self.expect_into(&mut node, TokenKind::Ident)?;
            self.expect_into(&mut node, TokenKind::Colon)?;
            node.push_node(self.expression()?);
        } else {
            let mut init = self.start(NodeKind::ForInit);
            if !self.at(TokenKind::Semi) {
                if self.at_local_var_decl() {
                    init.push_node(self.local_var_decl()?);
                } else {
                    self.expression_list_into(&mut init)?;
                }
            }
            node.push_node(self.finish(init));
            self.expect_into(&mut node, TokenKind::Semi)?;

            if !self.at(TokenKind::Semi) {
                node.push_node(self.expression()?);
            }
            self.expect_into(&mut node, TokenKind::Semi)?;

            let mut update = self.start(NodeKind::ForUpdate);
            if !self.at(TokenKind::RParen) {
                self.expression_list_into(&mut update)?;
            }
            node.push_node(self.finish(update));
        }

        self.expect_into(&mut node, TokenKind::RParen)?;
        node.push_node(self.statement()?);
        Ok(self.finish(node))
    }

    fn expression_list_into(&mut self, node: &mut Node) -> PResult<()> {
        loop {
            node.push_node(self.expression()?);
            if !self.eat_into(node, TokenKind::Comma) {
                return Ok(());
            }
        }
    }

    fn try_statement(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::Try);
        self.expect_into(&mut node, TokenKind::Try)?;
        node.push_node(self.block()?);

        let mut handlers = 0;
        while self.at(TokenKind::Catch) {
            let mut catch = self.start(NodeKind::Catch);
            self.bump_into(&mut catch);
            self.expect_into(&mut catch, TokenKind::LParen)?;
            catch.push_node(self.modifiers()?);
            catch.push_node(self.type_()?);
            while self.eat_into(&mut catch, TokenKind::Pipe) {
                catch.push_node(self.type_()?);
            }
            self.expect_into(&mut catch, TokenKind::Ident)?;
            self.expect_into(&mut catch, TokenKind::RParen)?;
            catch.push_node(self.block()?);
            node.push_node(self.finish(catch));
            handlers += 1;
        }
        if self.at(TokenKind::Finally) {
            let mut finally = self.start(NodeKind::Finally);
            self.bump_into(&mut finally);
            finally.push_node(self.block()?);
            node.push_node(self.finish(finally));
            handlers += 1;
        }
        if handlers == 0 {
            return Err(self.expected("`catch` or `finally`"));
        }

        Ok(self.finish(node))
    }

    fn switch_statement(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::Switch);
        self.expect_into(&mut node, TokenKind::Switch)?;
        node.push_node(self.paren_condition()?);
        self.expect_into(&mut node, TokenKind::LBrace)?;
        while !self.at(TokenKind::RBrace) {
            node.push_node(self.switch_case()?);
        }
        self.expect_into(&mut node, TokenKind::RBrace)?;
        Ok(self.finish(node))
    }

    /// One or more `case x:`/`default:` labels and the statements after them.
    fn switch_case(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::SwitchCase);
        let mut labels = 0;
        loop {
            if self.eat_into(&mut node, TokenKind::Case) {
                node.push_node(self.conditional()?);
            } else if !self.eat_into(&mut node, TokenKind::Default) {
                break;
            }
            self.expect_into(&mut node, TokenKind::Colon)?;
            labels += 1;
        }
        if labels == 0 {
            return Err(self.expected("`case` or `default`"));
        }
        while !matches!(
            self.peek(),
            TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
        ) {
            node.push_node(self.block_statement()?);
        }
        Ok(self.finish(node))
    }
}
