//! Style fixes applied after annotation: `var` bindings of class or
//! function literals become `let`, and bindings whose right-hand side
//! is a class or function literal are lifted into direct declarations.

use crate::ast::{any_type, array_type, Node, Token};

/// Runs the style-fix pass over one script, bottom-up.
pub fn fix_styles(script: &mut Node) {
    visit_children(script);
}

fn visit_children(n: &mut Node) {
    for i in 0..n.children.len() {
        visit_children(&mut n.children[i]);
        if let Some(replacement) = rewrite(&mut n.children[i]) {
            n.children[i] = replacement;
        }
    }
}

/// Returns the lifted declaration when the statement should be
/// replaced wholesale.
fn rewrite(n: &mut Node) -> Option<Node> {
    match n.token {
        Token::Var | Token::Let => {
            let rhs = n.first_grandchild_token();
            if n.token == Token::Var {
                // Plain initializers keep their original keyword.
                if !matches!(rhs, Some(Token::Class | Token::Function)) {
                    return None;
                }
                n.token = Token::Let;
            }
            // Only classes are lifted for var and let.
            if rhs == Some(Token::Class) && n.children.len() == 1 {
                return Some(lift(n));
            }
            None
        }
        Token::Const => {
            if n.children.len() != 1 {
                return None;
            }
            match n.first_grandchild_token() {
                Some(Token::Class) => Some(lift(n)),
                Some(Token::Function) => rewrite_const_function(n),
                _ => None,
            }
        }
        _ => None,
    }
}

/// `const f = function(...) {...}` lifts when the binding is untyped,
/// or when its declared function type matches the literal's arity; a
/// mismatch leaves the statement untouched.
fn rewrite_const_function(n: &mut Node) -> Option<Node> {
    let binding = &n.children[0];
    let Some(ty) = binding.declared_type.as_deref() else {
        return Some(lift(n));
    };
    if ty.token != Token::FunctionType {
        return None;
    }
    let num_params = binding.children[0].children[1].children.len();
    if num_params != ty.children.len() - 1 {
        log::debug!(
            "not lifting `{}`: declared type has {} parameters, function has {}",
            binding.string(),
            ty.children.len() - 1,
            num_params
        );
        return None;
    }

    // Splice the function type onto the literal: return type first,
    // then one declared parameter per literal parameter.
    let binding = &mut n.children[0];
    let mut ty = *binding.declared_type.take()?;
    let mut parts: Vec<Node> = ty.children.drain(..).collect();
    let ret = parts.remove(0);

    let func = &mut binding.children[0];
    func.declared_type = Some(Box::new(ret));
    for (param, mut typed) in func.children[1].children.iter_mut().zip(parts) {
        typed.string = Some(param.string().to_owned());
        if typed.token == Token::Rest && typed.declared_type.is_none() {
            typed.declared_type = Some(Box::new(array_type(any_type())));
        }
        *param = typed;
    }

    Some(lift(n))
}

/// Rewrites `var/let/const x = class/function {...}` into
/// `class/function x {...}`, moving the bound name into the literal's
/// name slot.
fn lift(n: &mut Node) -> Node {
    let mut name = n.children.remove(0);
    let mut rhs = name.children.remove(0);
    rhs.children[0] = name;
    if rhs.comment.is_none() {
        rhs.comment = n.comment.take();
    }
    rhs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::TypeAnnotationPass;
    use crate::modules::SymbolIndex;
    use crate::testing::parse_helper;
    use std::collections::HashMap;

    fn annotate_and_fix(src: &str) -> Node {
        let index = SymbolIndex::new();
        let externs = HashMap::new();
        let mut pass = TypeAnnotationPass::new(&index, &externs);
        let mut script = parse_helper("test.js", src);
        pass.process_script(&mut script).expect("pass");
        fix_styles(&mut script);
        script
    }

    #[test]
    fn plain_var_keeps_keyword() {
        let script = annotate_and_fix("var x = 4;");
        assert_eq!(script.children[0].token, Token::Var);
    }

    #[test]
    fn class_bindings_lift() {
        for src in ["var A = class {};", "let A = class {};", "const A = class {};"] {
            let script = annotate_and_fix(src);
            let decl = &script.children[0];
            assert_eq!(decl.token, Token::Class, "from {}", src);
            assert_eq!(decl.children[0].string(), "A");
        }
    }

    #[test]
    fn var_function_retokens_without_lifting() {
        let script = annotate_and_fix("var f = function() {};");
        let decl = &script.children[0];
        assert_eq!(decl.token, Token::Let);
        assert_eq!(decl.children[0].children[0].token, Token::Function);
    }

    #[test]
    fn untyped_const_function_lifts() {
        let script = annotate_and_fix("const f = function(x) { return x; };");
        let decl = &script.children[0];
        assert_eq!(decl.token, Token::Function);
        assert_eq!(decl.children[0].string(), "f");
    }

    #[test]
    fn typed_const_function_splices_types() {
        let script = annotate_and_fix(
            "/** @type {function(number, ...string): boolean} */\nconst f = function(x, rest) {};",
        );
        let decl = &script.children[0];
        assert_eq!(decl.token, Token::Function);
        assert_eq!(
            decl.declared_type.as_ref().map(|t| t.token),
            Some(Token::BooleanType)
        );
        let params = &decl.children[1];
        assert_eq!(params.children[0].string(), "x");
        assert_eq!(
            params.children[0].declared_type.as_ref().map(|t| t.token),
            Some(Token::NumberType)
        );
        assert_eq!(params.children[1].token, Token::Rest);
        assert_eq!(params.children[1].string(), "rest");
    }

    #[test]
    fn arity_mismatch_skips_lift() {
        let script = annotate_and_fix(
            "/** @type {function(number): boolean} */\nconst f = function(x, y) {};",
        );
        let decl = &script.children[0];
        assert_eq!(decl.token, Token::Const);
        // The declared type stays on the binding for emission.
        assert!(decl.children[0].declared_type.is_some());
    }

    #[test]
    fn multi_declarator_statements_are_left_alone() {
        let script = annotate_and_fix("const A = class {}, b = 4;");
        assert_eq!(script.children[0].token, Token::Const);
    }

    #[test]
    fn comment_moves_to_lifted_declaration() {
        let script = annotate_and_fix("// widget\nconst A = class {};");
        let decl = &script.children[0];
        assert_eq!(decl.token, Token::Class);
        assert_eq!(decl.comment.as_deref(), Some("// widget"));
    }
}
