//! Parses JavaScript with [`swc_ecma_parser`] and lowers the swc tree
//! into the crate's own [`Node`] representation.
//!
//! The lowering keeps leading comments: documentation comments become
//! [`crate::ast::DocInfo`] attached to the nearest statement or class
//! member, and everything else is carried as plain text for verbatim
//! re-emission. The swc AST does not escape this module.

use swc_common::comments::{Comment, CommentKind, Comments, SingleThreadedComments};
use swc_common::sync::Lrc;
use swc_common::{BytePos, FileName, SourceMap, Spanned};
use swc_ecma_ast as js;
use swc_ecma_parser::lexer::Lexer;
use swc_ecma_parser::{Parser, StringInput, Syntax};

use crate::ast::{Node, Token};
use crate::error::Error;
use crate::jsdoc;

/// Parses one source file into a `Script` node.
///
/// The parser is configured the way the pipeline needs it: comments
/// preserved, no transpilation, module declarations left untouched.
pub fn parse_source(name: &str, text: &str) -> Result<Node, Error> {
    let cm = Lrc::<SourceMap>::default();
    let fm = cm.new_source_file(FileName::Custom(name.to_owned()), text.to_owned());
    let comments = SingleThreadedComments::default();

    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        Default::default(),
        StringInput::from(&*fm),
        Some(&comments),
    );
    let mut parser = Parser::new_from(lexer);

    let module = parser.parse_module().map_err(|e| Error::Parse {
        file: name.to_owned(),
        message: e.kind().msg().to_string(),
    })?;
    if let Some(e) = parser.take_errors().into_iter().next() {
        return Err(Error::Parse {
            file: name.to_owned(),
            message: e.kind().msg().to_string(),
        });
    }

    let mut lowerer = Lowerer {
        file: name,
        comments: &comments,
        externs: false,
    };
    lowerer.lower_module(&module)
}

struct Lowerer<'a> {
    file: &'a str,
    comments: &'a SingleThreadedComments,
    /// Set when any documentation comment in the file carries
    /// `@externs`.
    externs: bool,
}

impl<'a> Lowerer<'a> {
    fn unsupported(&self, construct: &'static str) -> Error {
        Error::UnsupportedSyntax {
            file: self.file.to_owned(),
            construct,
        }
    }

    fn lower_module(&mut self, module: &js::Module) -> Result<Node, Error> {
        let is_module = module
            .body
            .iter()
            .any(|i| matches!(i, js::ModuleItem::ModuleDecl(_)));

        let mut items = Vec::new();
        for item in &module.body {
            let lo = item.span().lo;
            let lowered = match item {
                js::ModuleItem::Stmt(s) => self.lower_stmt(s)?,
                js::ModuleItem::ModuleDecl(d) => Some(self.lower_module_decl(d)?),
            };
            if let Some(mut n) = lowered {
                self.attach_comments(&mut n, lo);
                items.push(n);
            }
        }

        let mut script = Node::new(Token::Script);
        script.source_file = Some(self.file.to_owned());
        if is_module {
            let mut body = Node::new(Token::ModuleBody);
            body.children = items;
            script.children.push(body);
        } else {
            script.children = items;
        }
        script.externs = self.externs;
        Ok(script)
    }

    /// Moves the leading comments at `lo` onto `n`: the last
    /// documentation comment becomes `n.doc`, anything without
    /// recognized tags stays as plain text.
    fn attach_comments(&mut self, n: &mut Node, lo: BytePos) {
        let Some(list) = self.comments.take_leading(lo) else {
            return;
        };
        let mut plain = Vec::new();
        for c in &list {
            if c.kind == CommentKind::Block && jsdoc::is_doc_comment(&c.text) {
                let doc = jsdoc::parse(&c.text);
                if doc.externs {
                    self.externs = true;
                }
                if doc.is_empty() {
                    plain.push(render_comment(c));
                } else {
                    n.doc = Some(doc);
                }
            } else {
                plain.push(render_comment(c));
            }
        }
        if !plain.is_empty() {
            n.comment = Some(plain.join("\n"));
        }
    }

    fn lower_stmt_list(&mut self, stmts: &[js::Stmt]) -> Result<Vec<Node>, Error> {
        let mut out = Vec::new();
        for stmt in stmts {
            let lo = stmt.span().lo;
            if let Some(mut n) = self.lower_stmt(stmt)? {
                self.attach_comments(&mut n, lo);
                out.push(n);
            }
        }
        Ok(out)
    }

    fn lower_block(&mut self, block: &js::BlockStmt) -> Result<Node, Error> {
        let mut n = Node::new(Token::Block);
        n.children = self.lower_stmt_list(&block.stmts)?;
        Ok(n)
    }

    /// Lowers a statement used as a single-statement body, wrapping it
    /// in a block so emission always has braces.
    fn lower_body_stmt(&mut self, stmt: &js::Stmt) -> Result<Node, Error> {
        match stmt {
            js::Stmt::Block(b) => self.lower_block(b),
            other => {
                let mut block = Node::new(Token::Block);
                if let Some(n) = self.lower_stmt(other)? {
                    block.children.push(n);
                }
                Ok(block)
            }
        }
    }

    fn lower_stmt(&mut self, stmt: &js::Stmt) -> Result<Option<Node>, Error> {
        let n = match stmt {
            js::Stmt::Empty(_) => return Ok(None),
            js::Stmt::Block(b) => self.lower_block(b)?,
            js::Stmt::Expr(e) => Node::new(Token::ExprResult).push(self.lower_expr(&e.expr)?),
            js::Stmt::Decl(d) => self.lower_decl(d)?,
            js::Stmt::Return(r) => {
                let mut n = Node::new(Token::Return);
                if let Some(arg) = &r.arg {
                    n.children.push(self.lower_expr(arg)?);
                }
                n
            }
            js::Stmt::If(i) => {
                let mut n = Node::new(Token::If)
                    .push(self.lower_expr(&i.test)?)
                    .push(self.lower_body_stmt(&i.cons)?);
                if let Some(alt) = &i.alt {
                    let lowered = match alt.as_ref() {
                        // `else if` chains stay unwrapped.
                        js::Stmt::If(_) => self
                            .lower_stmt(alt)?
                            .unwrap_or_else(|| Node::new(Token::Block)),
                        other => self.lower_body_stmt(other)?,
                    };
                    n.children.push(lowered);
                }
                n
            }
            js::Stmt::While(w) => Node::new(Token::While)
                .push(self.lower_expr(&w.test)?)
                .push(self.lower_body_stmt(&w.body)?),
            js::Stmt::For(f) => {
                let init = match &f.init {
                    Some(js::VarDeclOrExpr::VarDecl(v)) => self.lower_var_decl(v)?,
                    Some(js::VarDeclOrExpr::Expr(e)) => self.lower_expr(e)?,
                    None => Node::new(Token::Empty),
                };
                let test = match &f.test {
                    Some(e) => self.lower_expr(e)?,
                    None => Node::new(Token::Empty),
                };
                let update = match &f.update {
                    Some(e) => self.lower_expr(e)?,
                    None => Node::new(Token::Empty),
                };
                Node::new(Token::For)
                    .push(init)
                    .push(test)
                    .push(update)
                    .push(self.lower_body_stmt(&f.body)?)
            }
            js::Stmt::Break(b) => {
                if b.label.is_some() {
                    return Err(self.unsupported("labelled break"));
                }
                Node::new(Token::Break)
            }
            js::Stmt::Continue(c) => {
                if c.label.is_some() {
                    return Err(self.unsupported("labelled continue"));
                }
                Node::new(Token::Continue)
            }
            js::Stmt::Throw(t) => Node::new(Token::Throw).push(self.lower_expr(&t.arg)?),
            _ => return Err(self.unsupported("statement form")),
        };
        Ok(Some(n))
    }

    fn lower_decl(&mut self, decl: &js::Decl) -> Result<Node, Error> {
        match decl {
            js::Decl::Var(v) => self.lower_var_decl(v),
            js::Decl::Fn(f) => {
                let name = f.ident.sym.to_string();
                self.lower_function(&f.function, &name)
            }
            js::Decl::Class(c) => {
                let name = c.ident.sym.to_string();
                self.lower_class(&c.class, &name)
            }
            _ => Err(self.unsupported("declaration form")),
        }
    }

    fn lower_var_decl(&mut self, v: &js::VarDecl) -> Result<Node, Error> {
        let token = match v.kind {
            js::VarDeclKind::Var => Token::Var,
            js::VarDeclKind::Let => Token::Let,
            js::VarDeclKind::Const => Token::Const,
        };
        let mut n = Node::new(token);
        for d in &v.decls {
            let js::Pat::Ident(ident) = &d.name else {
                return Err(self.unsupported("destructuring declaration"));
            };
            let mut name = Node::name(ident.id.sym.to_string());
            if let Some(init) = &d.init {
                name.children.push(self.lower_expr(init)?);
            }
            n.children.push(name);
        }
        Ok(n)
    }

    fn lower_function(&mut self, f: &js::Function, name: &str) -> Result<Node, Error> {
        if f.is_async || f.is_generator {
            return Err(self.unsupported("async or generator function"));
        }
        let mut params = Node::new(Token::ParamList);
        for p in &f.params {
            params.children.push(self.lower_param_pat(&p.pat)?);
        }
        let body = match &f.body {
            Some(b) => self.lower_block(b)?,
            None => Node::new(Token::Block),
        };
        Ok(Node::new(Token::Function)
            .push(Node::name(name))
            .push(params)
            .push(body))
    }

    fn lower_param_pat(&mut self, pat: &js::Pat) -> Result<Node, Error> {
        match pat {
            js::Pat::Ident(ident) => Ok(Node::name(ident.id.sym.to_string())),
            js::Pat::Rest(rest) => match rest.arg.as_ref() {
                js::Pat::Ident(ident) => Ok(Node::rest(ident.id.sym.to_string())),
                _ => Err(self.unsupported("rest parameter pattern")),
            },
            _ => Err(self.unsupported("parameter pattern")),
        }
    }

    fn lower_class(&mut self, c: &js::Class, name: &str) -> Result<Node, Error> {
        let superclass = match &c.super_class {
            Some(e) => self.lower_expr(e)?,
            None => Node::new(Token::Empty),
        };

        let mut members = Node::new(Token::ClassMembers);
        for member in &c.body {
            let lo = member.span().lo;
            let mut lowered = match member {
                js::ClassMember::Empty(_) => continue,
                js::ClassMember::Constructor(ctor) => {
                    let mut params = Node::new(Token::ParamList);
                    for p in &ctor.params {
                        match p {
                            js::ParamOrTsParamProp::Param(p) => {
                                params.children.push(self.lower_param_pat(&p.pat)?)
                            }
                            js::ParamOrTsParamProp::TsParamProp(_) => {
                                return Err(self.unsupported("parameter property"))
                            }
                        }
                    }
                    let body = match &ctor.body {
                        Some(b) => self.lower_block(b)?,
                        None => Node::new(Token::Block),
                    };
                    let func = Node::new(Token::Function)
                        .push(Node::name(""))
                        .push(params)
                        .push(body);
                    Node::with_string(Token::MemberFunctionDef, "constructor").push(func)
                }
                js::ClassMember::Method(m) => {
                    if m.kind != js::MethodKind::Method {
                        return Err(self.unsupported("accessor member"));
                    }
                    let name = self.prop_name(&m.key)?;
                    let mut member = Node::with_string(Token::MemberFunctionDef, name)
                        .push(self.lower_function(&m.function, "")?);
                    member.is_static = m.is_static;
                    member
                }
                js::ClassMember::ClassProp(p) => {
                    let name = self.prop_name(&p.key)?;
                    let mut member = Node::with_string(Token::MemberVariableDef, name);
                    member.is_static = p.is_static;
                    if let Some(value) = &p.value {
                        member.children.push(self.lower_expr(value)?);
                    }
                    member
                }
                _ => return Err(self.unsupported("class member form")),
            };
            self.attach_comments(&mut lowered, lo);
            members.children.push(lowered);
        }

        Ok(Node::new(Token::Class)
            .push(Node::name(name))
            .push(superclass)
            .push(members))
    }

    fn prop_name(&self, key: &js::PropName) -> Result<String, Error> {
        match key {
            js::PropName::Ident(id) => Ok(id.sym.to_string()),
            js::PropName::Str(s) => Ok(s.value.to_string()),
            js::PropName::Num(n) => Ok(render_number(n)),
            _ => Err(self.unsupported("computed property name")),
        }
    }

    fn lower_module_decl(&mut self, decl: &js::ModuleDecl) -> Result<Node, Error> {
        match decl {
            js::ModuleDecl::Import(imp) => {
                let mut default = Node::new(Token::Empty);
                let mut specs = Node::new(Token::ImportSpecs);
                for spec in &imp.specifiers {
                    match spec {
                        js::ImportSpecifier::Default(d) => {
                            default = Node::name(d.local.sym.to_string());
                        }
                        js::ImportSpecifier::Named(named) => {
                            let mut one = Node::new(Token::ImportSpec);
                            if let Some(js::ModuleExportName::Ident(imported)) = &named.imported {
                                one.children.push(Node::name(imported.sym.to_string()));
                            }
                            one.children.push(Node::name(named.local.sym.to_string()));
                            specs.children.push(one);
                        }
                        js::ImportSpecifier::Namespace(_) => {
                            return Err(self.unsupported("namespace import"))
                        }
                    }
                }
                Ok(Node::new(Token::Import)
                    .push(default)
                    .push(specs)
                    .push(Node::with_string(Token::String, imp.src.value.to_string())))
            }
            js::ModuleDecl::ExportDecl(ed) => {
                Ok(Node::new(Token::Export).push(self.lower_decl(&ed.decl)?))
            }
            js::ModuleDecl::ExportNamed(ne) if ne.src.is_none() => {
                let mut specs = Node::new(Token::ImportSpecs);
                for spec in &ne.specifiers {
                    let js::ExportSpecifier::Named(named) = spec else {
                        return Err(self.unsupported("export form"));
                    };
                    let js::ModuleExportName::Ident(orig) = &named.orig else {
                        return Err(self.unsupported("string export name"));
                    };
                    let mut one = Node::new(Token::ImportSpec);
                    one.children.push(Node::name(orig.sym.to_string()));
                    if let Some(js::ModuleExportName::Ident(exported)) = &named.exported {
                        one.children.push(Node::name(exported.sym.to_string()));
                    }
                    specs.children.push(one);
                }
                Ok(Node::new(Token::Export).push(specs))
            }
            _ => Err(self.unsupported("module declaration form")),
        }
    }

    fn lower_expr(&mut self, expr: &js::Expr) -> Result<Node, Error> {
        let n = match expr {
            js::Expr::Ident(id) => Node::name(id.sym.to_string()),
            js::Expr::This(_) => Node::new(Token::This),
            js::Expr::Lit(lit) => self.lower_lit(lit)?,
            js::Expr::Member(m) => {
                let obj = self.lower_expr(&m.obj)?;
                match &m.prop {
                    js::MemberProp::Ident(id) => {
                        Node::with_string(Token::GetProp, id.sym.to_string()).push(obj)
                    }
                    js::MemberProp::Computed(c) => Node::new(Token::GetElem)
                        .push(obj)
                        .push(self.lower_expr(&c.expr)?),
                    js::MemberProp::PrivateName(_) => {
                        return Err(self.unsupported("private member access"))
                    }
                }
            }
            js::Expr::Call(call) => {
                let js::Callee::Expr(callee) = &call.callee else {
                    return Err(self.unsupported("call form"));
                };
                let mut n = Node::new(Token::Call).push(self.lower_expr(callee)?);
                for arg in &call.args {
                    if arg.spread.is_some() {
                        return Err(self.unsupported("spread argument"));
                    }
                    n.children.push(self.lower_expr(&arg.expr)?);
                }
                n
            }
            js::Expr::New(new) => {
                let mut n = Node::new(Token::New).push(self.lower_expr(&new.callee)?);
                for arg in new.args.iter().flatten() {
                    if arg.spread.is_some() {
                        return Err(self.unsupported("spread argument"));
                    }
                    n.children.push(self.lower_expr(&arg.expr)?);
                }
                n
            }
            js::Expr::Assign(assign) => {
                let target = match &assign.left {
                    js::PatOrExpr::Expr(e) => self.lower_expr(e)?,
                    js::PatOrExpr::Pat(p) => match p.as_ref() {
                        js::Pat::Ident(ident) => Node::name(ident.id.sym.to_string()),
                        js::Pat::Expr(e) => self.lower_expr(e)?,
                        _ => return Err(self.unsupported("destructuring assignment")),
                    },
                };
                Node::with_string(Token::Assign, assign_op_str(assign.op))
                    .push(target)
                    .push(self.lower_expr(&assign.right)?)
            }
            js::Expr::Bin(bin) => Node::with_string(Token::BinaryOp, binary_op_str(bin.op))
                .push(self.lower_expr(&bin.left)?)
                .push(self.lower_expr(&bin.right)?),
            js::Expr::Unary(unary) => Node::with_string(Token::UnaryOp, unary_op_str(unary.op))
                .push(self.lower_expr(&unary.arg)?),
            js::Expr::Update(update) => {
                let op = match update.op {
                    js::UpdateOp::PlusPlus => "++",
                    js::UpdateOp::MinusMinus => "--",
                };
                let mut n =
                    Node::with_string(Token::Update, op).push(self.lower_expr(&update.arg)?);
                n.prefix = update.prefix;
                n
            }
            js::Expr::Cond(cond) => Node::new(Token::Hook)
                .push(self.lower_expr(&cond.test)?)
                .push(self.lower_expr(&cond.cons)?)
                .push(self.lower_expr(&cond.alt)?),
            js::Expr::Paren(paren) => self.lower_paren(paren)?,
            js::Expr::Fn(f) => {
                let name = f
                    .ident
                    .as_ref()
                    .map(|i| i.sym.to_string())
                    .unwrap_or_default();
                self.lower_function(&f.function, &name)?
            }
            js::Expr::Class(c) => {
                let name = c
                    .ident
                    .as_ref()
                    .map(|i| i.sym.to_string())
                    .unwrap_or_default();
                self.lower_class(&c.class, &name)?
            }
            js::Expr::Array(arr) => {
                let mut n = Node::new(Token::ArrayLit);
                for elem in &arr.elems {
                    let Some(elem) = elem else {
                        return Err(self.unsupported("array hole"));
                    };
                    if elem.spread.is_some() {
                        return Err(self.unsupported("spread element"));
                    }
                    n.children.push(self.lower_expr(&elem.expr)?);
                }
                n
            }
            js::Expr::Object(obj) => {
                let mut n = Node::new(Token::ObjectLit);
                for prop in &obj.props {
                    let js::PropOrSpread::Prop(prop) = prop else {
                        return Err(self.unsupported("object spread"));
                    };
                    let lowered = match prop.as_ref() {
                        js::Prop::KeyValue(kv) => {
                            Node::with_string(Token::StringKey, self.prop_name(&kv.key)?)
                                .push(self.lower_expr(&kv.value)?)
                        }
                        js::Prop::Shorthand(id) => {
                            Node::with_string(Token::StringKey, id.sym.to_string())
                                .push(Node::name(id.sym.to_string()))
                        }
                        _ => return Err(self.unsupported("object member form")),
                    };
                    n.children.push(lowered);
                }
                n
            }
            _ => return Err(self.unsupported("expression form")),
        };
        Ok(n)
    }

    /// A parenthesized expression preceded by a `@type` documentation
    /// comment is a cast; anything else keeps its parentheses.
    fn lower_paren(&mut self, paren: &js::ParenExpr) -> Result<Node, Error> {
        let lo = paren.span.lo;
        let is_cast = self.comments.with_leading(lo, |cs| {
            cs.iter().any(|c| {
                c.kind == CommentKind::Block
                    && jsdoc::is_doc_comment(&c.text)
                    && jsdoc::parse(&c.text).ty.is_some()
            })
        });
        if !is_cast {
            return Ok(Node::new(Token::Paren).push(self.lower_expr(&paren.expr)?));
        }

        let mut cast = Node::new(Token::Cast).push(self.lower_expr(&paren.expr)?);
        self.attach_comments(&mut cast, lo);
        Ok(cast)
    }

    fn lower_lit(&mut self, lit: &js::Lit) -> Result<Node, Error> {
        let n = match lit {
            js::Lit::Str(s) => Node::with_string(Token::String, s.value.to_string()),
            js::Lit::Num(num) => Node::with_string(Token::Number, render_number(num)),
            js::Lit::Bool(b) => Node::new(if b.value { Token::True } else { Token::False }),
            js::Lit::Null(_) => Node::new(Token::Null),
            js::Lit::Regex(r) => {
                Node::with_string(Token::Regex, format!("/{}/{}", r.exp, r.flags))
            }
            _ => return Err(self.unsupported("literal form")),
        };
        Ok(n)
    }
}

fn render_comment(c: &Comment) -> String {
    match c.kind {
        CommentKind::Line => format!("//{}", c.text),
        CommentKind::Block => format!("/*{}*/", c.text),
    }
}

/// Prefers the literal's source text; synthesized numbers fall back to
/// a canonical rendering.
fn render_number(num: &js::Number) -> String {
    if let Some(raw) = &num.raw {
        return raw.to_string();
    }
    if num.value.fract() == 0.0 && num.value.abs() < 1e15 {
        format!("{}", num.value as i64)
    } else {
        format!("{}", num.value)
    }
}

fn assign_op_str(op: js::AssignOp) -> &'static str {
    use js::AssignOp::*;
    match op {
        Assign => "=",
        AddAssign => "+=",
        SubAssign => "-=",
        MulAssign => "*=",
        DivAssign => "/=",
        ModAssign => "%=",
        LShiftAssign => "<<=",
        RShiftAssign => ">>=",
        ZeroFillRShiftAssign => ">>>=",
        BitOrAssign => "|=",
        BitXorAssign => "^=",
        BitAndAssign => "&=",
        ExpAssign => "**=",
        AndAssign => "&&=",
        OrAssign => "||=",
        NullishAssign => "??=",
    }
}

fn binary_op_str(op: js::BinaryOp) -> &'static str {
    use js::BinaryOp::*;
    match op {
        EqEq => "==",
        NotEq => "!=",
        EqEqEq => "===",
        NotEqEq => "!==",
        Lt => "<",
        LtEq => "<=",
        Gt => ">",
        GtEq => ">=",
        LShift => "<<",
        RShift => ">>",
        ZeroFillRShift => ">>>",
        Add => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        Mod => "%",
        BitOr => "|",
        BitXor => "^",
        BitAnd => "&",
        LogicalOr => "||",
        LogicalAnd => "&&",
        In => "in",
        InstanceOf => "instanceof",
        Exp => "**",
        NullishCoalescing => "??",
    }
}

fn unary_op_str(op: js::UnaryOp) -> &'static str {
    use js::UnaryOp::*;
    match op {
        Minus => "-",
        Plus => "+",
        Bang => "!",
        Tilde => "~",
        TypeOf => "typeof",
        Void => "void",
        Delete => "delete",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::parse_helper;

    #[test]
    fn lowers_var_with_doc() {
        let script = parse_helper("t.js", "/** @type {number} */ var x = 4;");
        let stmt = &script.children[0];
        assert_eq!(stmt.token, Token::Var);
        assert!(stmt.doc.as_ref().is_some_and(|d| d.ty.is_some()));
        let name = &stmt.children[0];
        assert_eq!(name.string(), "x");
        assert_eq!(name.children[0].string(), "4");
    }

    #[test]
    fn plain_comments_are_kept() {
        let script = parse_helper("t.js", "// keep me\nvar x = 4;");
        assert_eq!(script.children[0].comment.as_deref(), Some("// keep me"));
    }

    #[test]
    fn untagged_doc_comment_stays_plain() {
        let script = parse_helper("t.js", "/** Widget count. */\nvar x = 4;");
        let stmt = &script.children[0];
        assert!(stmt.doc.is_none());
        assert_eq!(stmt.comment.as_deref(), Some("/** Widget count. */"));
    }

    #[test]
    fn detects_casts() {
        let script = parse_helper("t.js", "var x = /** @type {number} */ (y);");
        let init = &script.children[0].children[0].children[0];
        assert_eq!(init.token, Token::Cast);
        assert!(init.doc.as_ref().is_some_and(|d| d.ty.is_some()));
    }

    #[test]
    fn plain_parens_survive() {
        let script = parse_helper("t.js", "var x = (1 + 2) * 3;");
        let init = &script.children[0].children[0].children[0];
        assert_eq!(init.token, Token::BinaryOp);
        assert_eq!(init.children[0].token, Token::Paren);
    }

    #[test]
    fn externs_marker_sets_script_flag() {
        let script =
            parse_helper("t.js", "/** @externs */ /** @const {string} */ var y = \"hi\";");
        assert!(script.externs);
        let stmt = &script.children[0];
        assert!(stmt.doc.as_ref().is_some_and(|d| d.ty.is_some()));
    }

    #[test]
    fn es_modules_get_a_module_body() {
        let script = parse_helper("t.js", "import {A} from './a';\nexport var x = 4;");
        let body = &script.children[0];
        assert_eq!(body.token, Token::ModuleBody);
        assert_eq!(body.children[0].token, Token::Import);
        assert_eq!(body.children[1].token, Token::Export);
    }

    #[test]
    fn rest_params_lower_to_rest_nodes() {
        let script = parse_helper("t.js", "function f(x, ...rest) { return x; }");
        let params = &script.children[0].children[1];
        assert_eq!(params.children[1].token, Token::Rest);
        assert_eq!(params.children[1].string(), "rest");
    }

    #[test]
    fn class_members_lower() {
        let script = parse_helper(
            "t.js",
            "class A extends B {\n  constructor(x) {}\n  m(y) { return y; }\n}",
        );
        let class = &script.children[0];
        assert_eq!(class.token, Token::Class);
        assert_eq!(class.children[1].string(), "B");
        let members = &class.children[2];
        assert_eq!(members.children[0].string(), "constructor");
        assert_eq!(members.children[1].string(), "m");
    }

    #[test]
    fn parse_error_is_reported() {
        let err = parse_source("bad.js", "var = ;").expect_err("should fail");
        assert!(matches!(err, Error::Parse { .. }));
    }
}
