use sp_ast::{Node, NodeKind};
use sp_lexer::TokenKind;

use super::{PResult, Parser};

impl Parser<'_> {
    /// `[package a.b;] (TypeDecl | ;)*`
    pub(super) fn compilation_unit(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::CompilationUnit);

        if self.at(TokenKind::Package) {
            let mut package = self.start(NodeKind::PackageDecl);
            self.bump_into(&mut package);
            self.qualified_name_into(&mut package)?;
            self.expect_into(&mut package, TokenKind::Semi)?;
            node.push_node(self.finish(package));
        }

        while !self.at(TokenKind::Eof) {
            if self.at(TokenKind::Semi) {
                node.push_node(self.empty()?);
                continue;
            }
            let mods = self.modifiers()?;
            if !self.at_type_decl() {
                return Err(self.expected("class, interface or enum declaration"));
            }
            node.push_node(self.type_decl(mods)?);
        }

        Ok(self.finish(node))
    }

    fn qualified_name_into(&mut self, node: &mut Node) -> PResult<()> {
        self.expect_into(node, TokenKind::Ident)?;
        while self.at(TokenKind::Dot) && self.nth(1) == TokenKind::Ident {
            self.bump_into(node);
            self.bump_into(node);
        }
        Ok(())
    }

    pub(super) fn empty(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::Empty);
        self.expect_into(&mut node, TokenKind::Semi)?;
        Ok(self.finish(node))
    }

    /// Annotations and modifier keywords, possibly none.
    pub(super) fn modifiers(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::Modifiers);
        loop {
            match self.peek() {
                TokenKind::At if self.nth(1) != TokenKind::Interface => {
                    node.push_node(self.annotation()?);
                }
                kind if kind.is_modifier() => {
                    self.bump_into(&mut node);
                }
                _ => break,
            }
        }
        Ok(self.finish(node))
    }

    /// `@Name`, `@Name(value)` or `@Name(key = value, ...)`
    pub(super) fn annotation(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::Annotation);
        self.expect_into(&mut node, TokenKind::At)?;
        self.qualified_name_into(&mut node)?;

        if self.eat_into(&mut node, TokenKind::LParen) {
            if self.at(TokenKind::Ident) && self.nth(1) == TokenKind::Assign {
                loop {
                    self.expect_into(&mut node, TokenKind::Ident)?;
                    self.expect_into(&mut node, TokenKind::Assign)?;
                    node.push_node(self.element_value()?);
                    if !self.eat_into(&mut node, TokenKind::Comma) {
                        break;
                    }
                }
            } else if !self.at(TokenKind::RParen) {
                node.push_node(self.element_value()?);
            }
            self.expect_into(&mut node, TokenKind::RParen)?;
        }

        Ok(self.finish(node))
    }

    fn element_value(&mut self) -> PResult<Node> {
        match self.peek() {
            TokenKind::At => self.annotation(),
            TokenKind::LBrace => {
                let mut node = self.start(NodeKind::ArrayInit);
                self.bump_into(&mut node);
                while !self.at(TokenKind::RBrace) {
                    node.push_node(self.element_value()?);
                    if !self.eat_into(&mut node, TokenKind::Comma) {
                        break;
                    }
                }
                self.expect_into(&mut node, TokenKind::RBrace)?;
                Ok(self.finish(node))
            }
            _ => self.conditional(),
        }
    }

    pub(super) fn at_type_decl(&self) -> bool {
        match self.peek() {
            TokenKind::Class | TokenKind::Interface | TokenKind::Enum => true,
            TokenKind::At => self.nth(1) == TokenKind::Interface,
            _ => false,
        }
    }

    /// Class, interface, enum or annotation type, after its modifiers.
    pub(super) fn type_decl(&mut self, mods: Node) -> PResult<Node> {
        match self.peek() {
            TokenKind::Class => self.class_decl(mods),
            TokenKind::Interface => self.interface_decl(mods),
            TokenKind::Enum => self.enum_decl(mods),
            TokenKind::At => self.annotation_decl(mods),
            _ => Err(self.expected("class, interface or enum declaration")),
        }
    }

    fn class_decl(&mut self, mods: Node) -> PResult<Node> {
        let mut node = self.wrap(NodeKind::ClassDecl, mods);
        self.expect_into(&mut node, TokenKind::Class)?;
        self.expect_into(&mut node, TokenKind::Ident)?;
        if self.at(TokenKind::Lt) {
            node.push_node(self.type_params()?);
        }
        if self.at(TokenKind::Extends) {
            let mut extends = self.start(NodeKind::Extends);
            self.bump_into(&mut extends);
            extends.push_node(self.type_()?);
            node.push_node(self.finish(extends));
        }
        if self.at(TokenKind::Implements) {
            let mut implements = self.start(NodeKind::Implements);
            self.bump_into(&mut implements);
            self.type_list_into(&mut implements)?;
            node.push_node(self.finish(implements));
        }
        node.push_node(self.class_body()?);
        Ok(self.finish(node))
    }

    fn interface_decl(&mut self, mods: Node) -> PResult<Node> {
        let mut node = self.wrap(NodeKind::InterfaceDecl, mods);
        self.expect_into(&mut node, TokenKind::Interface)?;
        self.expect_into(&mut node, TokenKind::Ident)?;
        if self.at(TokenKind::Lt) {
            node.push_node(self.type_params()?);
        }
        if self.at(TokenKind::Extends) {
            let mut extends = self.start(NodeKind::Extends);
            self.bump_into(&mut extends);
            self.type_list_into(&mut extends)?;
            node.push_node(self.finish(extends));
        }
        node.push_node(self.class_body()?);
        Ok(self.finish(node))
    }

    fn enum_decl(&mut self, mods: Node) -> PResult<Node> {
        let mut node = self.wrap(NodeKind::EnumDecl, mods);
        self.expect_into(&mut node, TokenKind::Enum)?;
        self.expect_into(&mut node, TokenKind::Ident)?;
        if self.at(TokenKind::Implements) {
            let mut implements = self.start(NodeKind::Implements);
            self.bump_into(&mut implements);
            self.type_list_into(&mut implements)?;
            node.push_node(self.finish(implements));
        }
        node.push_node(self.enum_body()?);
        Ok(self.finish(node))
    }

    fn annotation_decl(&mut self, mods: Node) -> PResult<Node> {
        let mut node = self.wrap(NodeKind::AnnotationDecl, mods);
        self.expect_into(&mut node, TokenKind::At)?;
        self.expect_into(&mut node, TokenKind::Interface)?;
        self.expect_into(&mut node, TokenKind::Ident)?;
        node.push_node(self.class_body()?);
        Ok(self.finish(node))
    }

    /// `{ member* }`
    pub(super) fn class_body(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::ClassBody);
        self.expect_into(&mut node, TokenKind::LBrace)?;
        self.class_depth += 1;
        while !self.at(TokenKind::RBrace) {
            if self.at(TokenKind::Eof) {
                return Err(self.expected("`}`"));
            }
            node.push_node(self.member()?);
        }
        self.class_depth -= 1;
        self.expect_into(&mut node, TokenKind::RBrace)?;
        Ok(self.finish(node))
    }

    /// `{ CONSTANT, CONSTANT(args) { body } ; member* }`
    fn enum_body(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::ClassBody);
        self.expect_into(&mut node, TokenKind::LBrace)?;
        self.class_depth += 1;

        while !matches!(self.peek(), TokenKind::Semi | TokenKind::RBrace) {
            node.push_node(self.enum_constant()?);
            if !self.eat_into(&mut node, TokenKind::Comma) {
                break;
            }
        }
        if self.eat_into(&mut node, TokenKind::Semi) {
            while !self.at(TokenKind::RBrace) {
                if self.at(TokenKind::Eof) {
                    return Err(self.expected("`}`"));
                }
                node.push_node(self.member()?);
            }
        }

        self.class_depth -= 1;
        self.expect_into(&mut node, TokenKind::RBrace)?;
        Ok(self.finish(node))
    }

    fn enum_constant(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::EnumConstant);
        while self.at(TokenKind::At) {
            node.push_node(self.annotation()?);
        }
        self.expect_into(&mut node, TokenKind::Ident)?;
        if self.at(TokenKind::LParen) {
            node.push_node(self.args()?);
        }
        if self.at(TokenKind::LBrace) {
            node.push_node(self.class_body()?);
        }
        Ok(self.finish(node))
    }

    /// One class body member. Also the unit of the active-program
    /// production, where the sketch's top level is an implicit class body.
    pub(super) fn member(&mut self) -> PResult<Node> {
        if self.at(TokenKind::Semi) {
            return self.empty();
        }
        if self.at(TokenKind::LBrace)
            || (self.at(TokenKind::Static) && self.nth(1) == TokenKind::LBrace)
        {
            let mut node = self.start(NodeKind::Initializer);
            self.eat_into(&mut node, TokenKind::Static);
            node.push_node(self.block()?);
            return Ok(self.finish(node));
        }

        let mods = self.modifiers()?;
        if self.at_type_decl() {
            return self.type_decl(mods);
        }

        let type_params = if self.at(TokenKind::Lt) {
            Some(self.type_params()?)
        } else {
            None
        };

        if self.at(TokenKind::Ident) && self.nth(1) == TokenKind::LParen {
            return self.constructor(mods, type_params);
        }

        let mut node = self.wrap(NodeKind::MethodDecl, mods);
        if let Some(params) = type_params {
            node.push_node(params);
        }
        let is_void = self.eat_into(&mut node, TokenKind::Void);
        if !is_void {
            node.push_node(self.type_()?);
        }

        if self.at(TokenKind::Ident) && self.nth(1) == TokenKind::LParen {
            if self.class_depth == 0 {
                self.saw_method = true;
            }
            return self.method_rest(node);
        }
        if is_void || node.child(NodeKind::TypeParams).is_some() {
            return Err(self.expected("method name"));
        }

        node.kind = NodeKind::FieldDecl;
        self.var_declarators_into(&mut node)?;
        self.expect_into(&mut node, TokenKind::Semi)?;
        Ok(self.finish(node))
    }

    /// Method from its name onward: `name(params) [] throws X (block | ;)`
    fn method_rest(&mut self, mut node: Node) -> PResult<Node> {
        self.expect_into(&mut node, TokenKind::Ident)?;
        node.push_node(self.params()?);
        self.dims_into(&mut node);
        if self.at(TokenKind::Throws) {
            node.push_node(self.throws()?);
        }
        if self.eat_into(&mut node, TokenKind::Default) {
            node.push_node(self.element_value()?);
        }
        if self.at(TokenKind::LBrace) {
            node.push_node(self.block()?);
        } else {
            self.expect_into(&mut node, TokenKind::Semi)?;
        }
        Ok(self.finish(node))
    }

    fn constructor(&mut self, mods: Node, type_params: Option<Node>) -> PResult<Node> {
        let mut node = self.wrap(NodeKind::ConstructorDecl, mods);
        if let Some(params) = type_params {
            node.push_node(params);
        }
        self.expect_into(&mut node, TokenKind::Ident)?;
        node.push_node(self.params()?);
        if self.at(TokenKind::Throws) {
            node.push_node(self.throws()?);
        }
        node.push_node(self.block()?);
        Ok(self.finish(node))
    }

    fn throws(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::Throws);
        self.expect_into(&mut node, TokenKind::Throws)?;
        self.type_list_into(&mut node)?;
        Ok(self.finish(node))
    }

    fn params(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::Params);
        self.expect_into(&mut node, TokenKind::LParen)?;
        if !self.at(TokenKind::RParen) {
            loop {
                node.push_node(self.param()?);
                if !self.eat_into(&mut node, TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect_into(&mut node, TokenKind::RParen)?;
        Ok(self.finish(node))
    }

    fn param(&mut self) -> PResult<Node> {
        let mods = self.modifiers()?;
        let mut node = self.wrap(NodeKind::Param, mods);
        node.push_node(self.type_()?);
        self.eat_into(&mut node, TokenKind::Ellipsis);
        self.expect_into(&mut node, TokenKind::Ident)?;
        self.dims_into(&mut node);
        Ok(self.finish(node))
    }

    pub(super) fn var_declarators_into(&mut self, node: &mut Node) -> PResult<()> {
        loop {
            node.push_node(self.var_declarator()?);
            if !self.eat_into(node, TokenKind::Comma) {
                return Ok(());
            }
        }
    }

    /// `name [] = init`
    fn var_declarator(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::VarDeclarator);
        self.expect_into(&mut node, TokenKind::Ident)?;
        self.dims_into(&mut node);
        if self.eat_into(&mut node, TokenKind::Assign) {
            node.push_node(self.var_init()?);
        }
        Ok(self.finish(node))
    }

    fn var_init(&mut self) -> PResult<Node> {
        if self.at(TokenKind::LBrace) {
            self.array_init()
        } else {
            self.expression()
        }
    }

    /// `{ init, init, }`
    pub(super) fn array_init(&mut self) -> PResult<Node> {
        let mut node = self.start(NodeKind::ArrayInit);
        self.expect_into(&mut node, TokenKind::LBrace)?;
        while !self.at(TokenKind::RBrace) {
            node.push_node(self.var_init()?);
            if !self.eat_into(&mut node, TokenKind::Comma) {
                break;
            }
        }
        self.expect_into(&mut node, TokenKind::RBrace)?;
        Ok(self.finish(node))
    }
}
