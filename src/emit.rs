//! TypeScript emission: a base JavaScript emitter over [`Node`] trees
//! extended with the typed forms the passes produce.
//!
//! Each node goes through a pre-hook (attached comments, casts), an
//! override check (synthetic tokens the base rules cannot express),
//! the base rules, and a post-hook (default field values, constructor
//! parentheses).

use crate::ast::{Node, Token, Visibility};
use crate::error::Error;

/// Emits one script as TypeScript source text.
pub fn emit_script(script: &Node) -> Result<String, Error> {
    let mut emitter = Emitter {
        out: String::new(),
        indent: 0,
    };
    let body = match script.first_child() {
        Some(b) if b.token == Token::ModuleBody => b,
        _ => script,
    };
    for stmt in &body.children {
        emitter.emit_stmt(stmt)?;
    }
    Ok(emitter.out)
}

struct Emitter {
    out: String,
    indent: usize,
}

impl Emitter {
    fn write(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn emit_stmt(&mut self, n: &Node) -> Result<(), Error> {
        if let Some(comment) = &n.comment {
            self.write_indent();
            self.write(comment);
            self.write("\n");
        }
        self.write_indent();
        self.add(n)?;
        if stmt_needs_semicolon(n) {
            self.write(";");
        }
        self.write("\n");
        Ok(())
    }

    fn add(&mut self, n: &Node) -> Result<(), Error> {
        // Pre-hook: casts seize code generation entirely.
        if n.token == Token::Cast {
            self.write("(");
            if let Some(expr) = n.first_child() {
                self.add(expr)?;
            }
            self.write(" as ");
            match &n.declared_type {
                Some(t) => self.add(t)?,
                None => self.write("any"),
            }
            self.write(")");
            return Ok(());
        }

        if self.maybe_override(n) {
            return Ok(());
        }
        self.add_base(n)?;

        // Post-hook.
        match n.token {
            // The base rule for fields drops initializers.
            Token::MemberVariableDef => {
                if let Some(init) = n.children.last() {
                    self.write(" = ");
                    self.add(init)?;
                }
            }
            // Restore the `()` dropped from no-argument constructions.
            Token::New if n.children.len() == 1 => self.write("()"),
            _ => {}
        }
        Ok(())
    }

    /// Synthetic tokens with no base rule.
    fn maybe_override(&mut self, n: &Node) -> bool {
        if n.token == Token::UndefinedType {
            self.write("undefined");
            return true;
        }
        false
    }

    fn add_base(&mut self, n: &Node) -> Result<(), Error> {
        match n.token {
            Token::Empty => {}

            // Bindings and names. A name carries its optional marker,
            // declared type, and initializer.
            Token::Name => {
                self.write(n.string());
                if n.opt_es6_typed {
                    self.write("?");
                }
                if let Some(t) = &n.declared_type {
                    self.write(": ");
                    self.add(t)?;
                }
                if let Some(init) = n.children.first() {
                    self.write(" = ");
                    self.add(init)?;
                }
            }
            Token::Rest => {
                self.write("...");
                self.write(n.string());
                self.write(": ");
                match &n.declared_type {
                    Some(t) => self.add(t)?,
                    None => self.write("any[]"),
                }
            }
            Token::Var | Token::Let | Token::Const => {
                self.write(match n.token {
                    Token::Var => "var ",
                    Token::Let => "let ",
                    _ => "const ",
                });
                for (i, d) in n.children.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.add(d)?;
                }
            }

            Token::Function => {
                self.write("function");
                let name = n.children[0].string();
                if !name.is_empty() {
                    self.write(" ");
                    self.write(name);
                }
                self.emit_params(&n.children[1])?;
                if let Some(t) = &n.declared_type {
                    self.write(": ");
                    self.add(t)?;
                }
                self.write(" ");
                self.emit_block(&n.children[2])?;
            }

            Token::Class => {
                self.write("class");
                let name = n.children[0].string();
                if !name.is_empty() {
                    self.write(" ");
                    self.write(name);
                }
                if n.children[1].token != Token::Empty {
                    self.write(" extends ");
                    self.add(&n.children[1])?;
                }
                self.write(" {\n");
                self.indent += 1;
                for member in &n.children[2].children {
                    if let Some(comment) = &member.comment {
                        self.write_indent();
                        self.write(comment);
                        self.write("\n");
                    }
                    self.write_indent();
                    self.add(member)?;
                    if member.token == Token::MemberVariableDef {
                        self.write(";");
                    }
                    self.write("\n");
                }
                self.indent -= 1;
                self.write_indent();
                self.write("}");
            }

            Token::MemberFunctionDef => {
                self.emit_member_modifiers(n);
                self.write(n.string());
                let func = &n.children[0];
                self.emit_params(&func.children[1])?;
                if let Some(t) = &func.declared_type {
                    self.write(": ");
                    self.add(t)?;
                }
                self.write(" ");
                self.emit_block(&func.children[2])?;
            }

            Token::MemberVariableDef => {
                self.emit_member_modifiers(n);
                self.write(n.string());
                if let Some(t) = &n.declared_type {
                    self.write(": ");
                    self.add(t)?;
                }
                // The initializer is appended by the post-hook.
            }

            Token::Import => {
                self.write("import ");
                let default = &n.children[0];
                let specs = &n.children[1];
                if default.token != Token::Empty {
                    self.write(default.string());
                    if !specs.children.is_empty() {
                        self.write(", ");
                    }
                }
                if default.token == Token::Empty || !specs.children.is_empty() {
                    self.emit_import_specs(specs)?;
                }
                self.write(" from '");
                self.write(n.children[2].string());
                self.write("'");
            }

            Token::Export => {
                self.write("export ");
                let child = &n.children[0];
                if child.token == Token::ImportSpecs {
                    self.emit_import_specs(child)?;
                } else {
                    self.add(child)?;
                }
            }

            // Statements.
            Token::ExprResult => self.add(&n.children[0])?,
            Token::Return => {
                self.write("return");
                if let Some(arg) = n.children.first() {
                    self.write(" ");
                    self.add(arg)?;
                }
            }
            Token::If => {
                self.write("if (");
                self.add(&n.children[0])?;
                self.write(") ");
                self.emit_block(&n.children[1])?;
                if let Some(alt) = n.children.get(2) {
                    self.write(" else ");
                    if alt.token == Token::If {
                        self.add(alt)?;
                    } else {
                        self.emit_block(alt)?;
                    }
                }
            }
            Token::While => {
                self.write("while (");
                self.add(&n.children[0])?;
                self.write(") ");
                self.emit_block(&n.children[1])?;
            }
            Token::For => {
                self.write("for (");
                self.add(&n.children[0])?;
                self.write("; ");
                self.add(&n.children[1])?;
                self.write("; ");
                self.add(&n.children[2])?;
                self.write(") ");
                self.emit_block(&n.children[3])?;
            }
            Token::Break => self.write("break"),
            Token::Continue => self.write("continue"),
            Token::Throw => {
                self.write("throw ");
                self.add(&n.children[0])?;
            }
            Token::Block => self.emit_block(n)?,

            // Expressions.
            Token::GetProp => {
                self.add(&n.children[0])?;
                self.write(".");
                self.write(n.string());
            }
            Token::GetElem => {
                self.add(&n.children[0])?;
                self.write("[");
                self.add(&n.children[1])?;
                self.write("]");
            }
            Token::Call => {
                self.add(&n.children[0])?;
                self.write("(");
                self.emit_list(&n.children[1..])?;
                self.write(")");
            }
            Token::New => {
                self.write("new ");
                self.add(&n.children[0])?;
                if n.children.len() > 1 {
                    self.write("(");
                    self.emit_list(&n.children[1..])?;
                    self.write(")");
                }
            }
            Token::Assign | Token::BinaryOp => {
                self.add(&n.children[0])?;
                self.write(" ");
                self.write(n.string());
                self.write(" ");
                self.add(&n.children[1])?;
            }
            Token::UnaryOp => {
                let op = n.string();
                self.write(op);
                if op.chars().all(|c| c.is_alphabetic()) {
                    self.write(" ");
                }
                self.add(&n.children[0])?;
            }
            Token::Update => {
                if n.prefix {
                    self.write(n.string());
                    self.add(&n.children[0])?;
                } else {
                    self.add(&n.children[0])?;
                    self.write(n.string());
                }
            }
            Token::Hook => {
                self.add(&n.children[0])?;
                self.write(" ? ");
                self.add(&n.children[1])?;
                self.write(" : ");
                self.add(&n.children[2])?;
            }
            Token::Paren => {
                self.write("(");
                self.add(&n.children[0])?;
                self.write(")");
            }
            Token::ArrayLit => {
                self.write("[");
                self.emit_list(&n.children)?;
                self.write("]");
            }
            Token::ObjectLit => {
                self.write("{");
                self.emit_list(&n.children)?;
                self.write("}");
            }
            Token::StringKey => {
                self.write(n.string());
                if let Some(t) = &n.declared_type {
                    self.write(": ");
                    self.add(t)?;
                } else if let Some(value) = n.children.first() {
                    self.write(": ");
                    self.add(value)?;
                }
            }

            // Literals.
            Token::Number | Token::Regex => self.write(n.string()),
            Token::String => {
                let escaped = escape_string(n.string());
                self.write(&escaped);
            }
            Token::True => self.write("true"),
            Token::False => self.write("false"),
            Token::Null => self.write("null"),
            Token::This => self.write("this"),

            // Declared types.
            Token::AnyType => self.write("any"),
            Token::BooleanType => self.write("boolean"),
            Token::NumberType => self.write("number"),
            Token::StringType => self.write("string"),
            Token::VoidType => self.write("void"),
            Token::NamedType => self.write(n.string()),
            Token::ParameterizedType => {
                self.add(&n.children[0])?;
                self.write("<");
                self.emit_list(&n.children[1..])?;
                self.write(">");
            }
            Token::ArrayType => {
                let elem = &n.children[0];
                let needs_parens =
                    matches!(elem.token, Token::UnionType | Token::FunctionType);
                if needs_parens {
                    self.write("(");
                }
                self.add(elem)?;
                if needs_parens {
                    self.write(")");
                }
                self.write("[]");
            }
            Token::RecordType => {
                self.write("{");
                self.emit_list(&n.children)?;
                self.write("}");
            }
            Token::UnionType => {
                for (i, member) in n.children.iter().enumerate() {
                    if i > 0 {
                        self.write(" | ");
                    }
                    self.add(member)?;
                }
            }
            Token::FunctionType => {
                self.write("(");
                self.emit_list(&n.children[1..])?;
                self.write(") => ");
                self.add(&n.children[0])?;
            }

            other => return Err(Error::Emit(format!("{:?}", other))),
        }
        Ok(())
    }

    fn emit_member_modifiers(&mut self, n: &Node) {
        match n.access_modifier {
            Some(Visibility::Private) => self.write("private "),
            Some(Visibility::Protected) => self.write("protected "),
            _ => {}
        }
        if n.is_static {
            self.write("static ");
        }
    }

    fn emit_params(&mut self, params: &Node) -> Result<(), Error> {
        self.write("(");
        self.emit_list(&params.children)?;
        self.write(")");
        Ok(())
    }

    fn emit_import_specs(&mut self, specs: &Node) -> Result<(), Error> {
        self.write("{");
        for (i, spec) in specs.children.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            match spec.children.as_slice() {
                [name] => self.write(name.string()),
                [orig, alias] => {
                    self.write(orig.string());
                    self.write(" as ");
                    self.write(alias.string());
                }
                _ => return Err(Error::Emit("import specifier".to_owned())),
            }
        }
        self.write("}");
        Ok(())
    }

    fn emit_list(&mut self, items: &[Node]) -> Result<(), Error> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.add(item)?;
        }
        Ok(())
    }

    fn emit_block(&mut self, block: &Node) -> Result<(), Error> {
        if block.children.is_empty() {
            self.write("{}");
            return Ok(());
        }
        self.write("{\n");
        self.indent += 1;
        for stmt in &block.children {
            self.emit_stmt(stmt)?;
        }
        self.indent -= 1;
        self.write_indent();
        self.write("}");
        Ok(())
    }
}

fn stmt_needs_semicolon(n: &Node) -> bool {
    match n.token {
        Token::Var
        | Token::Let
        | Token::Const
        | Token::ExprResult
        | Token::Return
        | Token::Break
        | Token::Continue
        | Token::Throw
        | Token::Import => true,
        Token::Export => match n.first_child() {
            Some(c) => c.token == Token::ImportSpecs || stmt_needs_semicolon(c),
            None => false,
        },
        _ => false,
    }
}

fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::TypeAnnotationPass;
    use crate::modules::SymbolIndex;
    use crate::style;
    use crate::testing::parse_helper;
    use std::collections::HashMap;

    fn pipeline(src: &str) -> String {
        let index = SymbolIndex::new();
        let externs = HashMap::new();
        let mut pass = TypeAnnotationPass::new(&index, &externs);
        let mut script = parse_helper("test.js", src);
        pass.process_script(&mut script).expect("annotate");
        pass.inject_imports(&mut script);
        style::fix_styles(&mut script);
        emit_script(&script).expect("emit")
    }

    #[test]
    fn typed_var() {
        assert_eq!(pipeline("/** @type {number} */ var x = 4;"), "var x: number = 4;\n");
    }

    #[test]
    fn cast_parenthesizes() {
        assert_eq!(
            pipeline("var x = /** @type {number} */ (y);"),
            "var x = (y as number);\n"
        );
    }

    #[test]
    fn new_keeps_parens() {
        assert_eq!(pipeline("var a = new Foo;"), "var a = new Foo();\n");
        assert_eq!(pipeline("var a = new Foo(1);"), "var a = new Foo(1);\n");
    }

    #[test]
    fn member_variable_initializer_survives() {
        let out = pipeline("class A { /** @private @type {number} */ x = 4; }");
        assert_eq!(out, "class A {\n  private x: number = 4;\n}\n");
    }

    #[test]
    fn lifted_function_with_types() {
        let out = pipeline(
            "/** @param {number} x @param {...string} rest @return {number} */\nconst f = function(x, rest) { return x; };",
        );
        assert_eq!(
            out,
            "function f(x: number, ...rest: string[]): number {\n  return x;\n}\n"
        );
    }

    #[test]
    fn nullable_union_spelling() {
        assert_eq!(pipeline("/** @type {?string} */ var s;"), "var s: null | string;\n");
    }

    #[test]
    fn record_type_spelling() {
        assert_eq!(
            pipeline("/** @type {{foo: number, bar}} */ var r;"),
            "var r: {foo: number, bar};\n"
        );
    }

    #[test]
    fn function_type_spelling() {
        assert_eq!(
            pipeline("/** @type {function(number): string} */ var f;"),
            "var f: (p1: number) => string;\n"
        );
    }

    #[test]
    fn optional_parameter_spelling() {
        let out = pipeline("/** @param {number=} a */\nfunction f(a) {}");
        assert_eq!(out, "function f(a?: number) {}\n");
    }

    #[test]
    fn comments_are_replayed() {
        let out = pipeline("// count\nvar x = 4;");
        assert_eq!(out, "// count\nvar x = 4;\n");
    }

    #[test]
    fn control_flow_emission() {
        let out = pipeline("function f(a) { if (a > 1) { return a; } else { return 0; } }");
        assert_eq!(
            out,
            "function f(a) {\n  if (a > 1) {\n    return a;\n  } else {\n    return 0;\n  }\n}\n"
        );
    }

    #[test]
    fn class_method_with_return_type() {
        let out = pipeline("class A { /** @return {void} */ m() {} }");
        assert_eq!(out, "class A {\n  m(): void {}\n}\n");
    }
}
