//! The type-annotation pass: promotes documentation-comment types onto
//! AST nodes as declared-type expressions, rewrites namespaced type
//! references to module-local names, and queues the imports that
//! justify them.
//!
//! Two post-order traversals run over each script: the conversion
//! traversal attaches declared types, then the access-modifier
//! traversal copies visibility and constancy. Import injection runs
//! last.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::ast::{
    any_type, array_type, boolean_type, function_type, named_type, null_type, number_type,
    parameterized_type, record_type, string_type, undefined_type, union_type, void_type, DocInfo,
    Node, Token, Visibility,
};
use crate::error::Error;
use crate::modules::SymbolIndex;
use crate::{names, paths};

/// Pass state for one compilation. The type-rewrite table and pending
/// imports live here for the duration and are not visible to other
/// passes.
pub struct TypeAnnotationPass<'a> {
    symbol_index: &'a SymbolIndex,
    externs_map: &'a HashMap<String, String>,
    /// file -> namespace -> local symbol already committed for it.
    type_rewrite: IndexMap<String, IndexMap<String, String>>,
    /// file -> import statements still to be spliced in.
    imports_needed: IndexMap<String, Vec<Node>>,
    current_file: String,
}

impl<'a> TypeAnnotationPass<'a> {
    /// A fresh pass over the given compilation-wide inputs.
    pub fn new(symbol_index: &'a SymbolIndex, externs_map: &'a HashMap<String, String>) -> Self {
        TypeAnnotationPass {
            symbol_index,
            externs_map,
            type_rewrite: IndexMap::new(),
            imports_needed: IndexMap::new(),
            current_file: String::new(),
        }
    }

    /// Runs both traversals over one script.
    pub fn process_script(&mut self, script: &mut Node) -> Result<(), Error> {
        self.current_file = script.source_file.clone().unwrap_or_default();
        self.convert_traverse(script, None)?;
        access_traverse(script, None);
        Ok(())
    }

    /// Splices this script's queued imports into its body: before the
    /// first existing import when one exists, at the top otherwise.
    pub fn inject_imports(&mut self, script: &mut Node) {
        let Some(file) = script.source_file.clone() else {
            return;
        };
        let Some(imports) = self.imports_needed.shift_remove(&file) else {
            return;
        };

        let has_module_body = script
            .first_child()
            .is_some_and(|c| c.token == Token::ModuleBody);
        let body = if has_module_body {
            &mut script.children[0]
        } else {
            script
        };

        let pos = body
            .children
            .iter()
            .position(|c| c.token == Token::Import)
            .unwrap_or(0);
        for (k, import) in imports.into_iter().enumerate() {
            body.children.insert(pos + k, import);
        }
    }

    fn convert_traverse(
        &mut self,
        n: &mut Node,
        inherited: Option<&DocInfo>,
    ) -> Result<(), Error> {
        let token = n.token;
        {
            let Node { doc, children, .. } = n;
            let down = if passes_doc_down(token) {
                doc.as_ref().or(inherited)
            } else {
                None
            };
            for child in children.iter_mut() {
                self.convert_traverse(child, down)?;
            }
        }

        match token {
            // Fields default to the any type.
            Token::MemberVariableDef => {
                let best = n.doc.as_ref().or(inherited);
                match best.and_then(|d| d.ty.as_ref()) {
                    Some(ty) => {
                        if let Some(converted) = self.convert(ty, false)? {
                            n.declared_type = Some(Box::new(converted));
                        }
                    }
                    None => n.declared_type = Some(Box::new(any_type())),
                }
            }
            // Functions carry their return type and typed parameters.
            Token::Function => {
                let d = n.doc.as_ref().or(inherited);
                if let Some(d) = d {
                    if let Some(rt) = d.return_type.as_ref() {
                        if let Some(converted) = self.convert(rt, true)? {
                            n.declared_type = Some(Box::new(converted));
                        }
                    }
                    if let Some(list) = n.children.get_mut(1) {
                        if list.token == Token::ParamList {
                            for slot in list.children.iter_mut() {
                                self.annotate_param(slot, d)?;
                            }
                        }
                    }
                }
            }
            // Variable declarations annotate each bound name.
            Token::Var | Token::Let | Token::Const => {
                let best = n.doc.as_ref().or(inherited);
                if let Some(ty) = best.and_then(|d| d.ty.as_ref()) {
                    if let Some(converted) = self.convert(ty, false)? {
                        for child in n.children.iter_mut() {
                            if child.token == Token::Name {
                                child.declared_type = Some(Box::new(converted.clone()));
                            }
                        }
                    }
                }
            }
            Token::Cast => {
                let converted = match n.doc.as_ref().and_then(|d| d.ty.as_ref()) {
                    Some(ty) => self.convert(ty, false)?,
                    None => None,
                };
                if let Some(converted) = converted {
                    n.declared_type = Some(Box::new(converted));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Applies the documented parameter type to one parameter slot,
    /// replacing the node when the doc marks it variadic or optional.
    fn annotate_param(&mut self, slot: &mut Node, doc: &DocInfo) -> Result<(), Error> {
        match slot.token {
            Token::Name => {
                let name = slot.string().to_owned();
                let Some(ptype) = doc.params.get(&name) else {
                    return Ok(());
                };
                let root = ptype.token;
                let converted = self.convert(ptype, false)?;
                if root == Token::Ellipsis {
                    let mut rest = Node::rest(name);
                    rest.comment = slot.comment.take();
                    *slot = rest;
                } else if root == Token::Equals {
                    let mut opt = Node::name(name);
                    opt.opt_es6_typed = true;
                    opt.comment = slot.comment.take();
                    *slot = opt;
                }
                if let Some(converted) = converted {
                    slot.declared_type = Some(Box::new(converted));
                }
            }
            // A source-level `...rest` parameter is already a Rest
            // node; only the type needs attaching.
            Token::Rest => {
                if let Some(ptype) = doc.params.get(slot.string()) {
                    if let Some(converted) = self.convert(ptype, false)? {
                        slot.declared_type = Some(Box::new(converted));
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Converts a documentation type expression into the
    /// typed-declaration sub-grammar. `None` means no annotation.
    ///
    /// Conversion is total over the grammar; any other token is a hard
    /// error rather than a guess.
    pub fn convert(&mut self, n: &Node, is_return_type: bool) -> Result<Option<Node>, Error> {
        let converted = match n.token {
            // A `@return` with no declared type.
            Token::Empty => return Ok(None),
            Token::Star => any_type(),
            Token::Void => {
                if is_return_type {
                    void_type()
                } else {
                    undefined_type()
                }
            }
            // Non-null is the TypeScript default.
            Token::Bang => {
                return match n.first_child() {
                    Some(c) => self.convert(c, false),
                    None => Ok(None),
                }
            }
            Token::Qmark => match n.first_child() {
                None => any_type(),
                Some(c) => {
                    let mut members = vec![null_type()];
                    if let Some(inner) = self.convert(c, false)? {
                        members.push(inner);
                    }
                    flat_union_type(members)
                }
            },
            Token::String => self.convert_named(n, is_return_type)?,
            Token::Lc => {
                let mut fields = Vec::new();
                if let Some(list) = n.first_child() {
                    for field in &list.children {
                        fields.push(self.convert_record_field(field)?);
                    }
                }
                record_type(fields)
            }
            Token::Pipe => {
                let mut types = Vec::new();
                for child in &n.children {
                    if let Some(t) = self.convert(child, false)? {
                        types.push(t);
                    }
                }
                match types.len() {
                    0 => return Ok(None),
                    1 => types.swap_remove(0),
                    _ => flat_union_type(types),
                }
            }
            Token::Function => self.convert_function(n)?,
            // Variadic parameters are encoded as an array.
            Token::Ellipsis => {
                let inner = match n.first_child() {
                    Some(c) => self.convert(c, false)?,
                    None => None,
                };
                array_type(inner.unwrap_or_else(any_type))
            }
            // Optionality rides on the parameter, not the type.
            Token::Equals => {
                return match n.first_child() {
                    Some(c) => self.convert(c, false),
                    None => Ok(None),
                }
            }
            other => {
                return Err(Error::UnsupportedTypeConstruct(format!(
                    "{:?} `{}`",
                    other,
                    n.string()
                )))
            }
        };
        Ok(Some(converted))
    }

    fn convert_named(&mut self, n: &Node, is_return_type: bool) -> Result<Node, Error> {
        let type_name = n.string();
        let converted = match type_name {
            "boolean" => boolean_type(),
            "number" => number_type(),
            "string" => string_type(),
            "null" => null_type(),
            // Closure treats undefined and void as aliases; TypeScript
            // prefers void in return position and undefined elsewhere.
            "undefined" | "void" => {
                if is_return_type {
                    void_type()
                } else {
                    undefined_type()
                }
            }
            _ => {
                let new_name = self.convert_type_name(type_name);
                let new_name = self.convert_extern_name(&new_name);
                match n.first_child().filter(|c| c.token == Token::Block) {
                    Some(block) => {
                        if type_name == "Array" {
                            match block.first_child() {
                                Some(first) => array_type(
                                    self.convert(first, false)?.unwrap_or_else(any_type),
                                ),
                                None => named_type(new_name),
                            }
                        } else {
                            let mut args = Vec::new();
                            for arg in &block.children {
                                if let Some(t) = self.convert(arg, false)? {
                                    args.push(t);
                                }
                            }
                            parameterized_type(named_type(new_name), args)
                        }
                    }
                    None => named_type(new_name),
                }
            }
        };
        Ok(converted)
    }

    fn convert_record_field(&mut self, field: &Node) -> Result<Node, Error> {
        let declared = field.token == Token::Colon;
        let name_node = if declared { field.first_child() } else { Some(field) };
        let mut name = name_node.map(|f| f.string().to_owned()).unwrap_or_default();
        if name.starts_with('\'') || name.starts_with('"') {
            name = name[1..name.len() - 1].to_owned();
        }
        let mut key = Node::with_string(Token::StringKey, name);
        if declared {
            if let Some(last) = field.children.last() {
                if let Some(t) = self.convert(last, false)? {
                    key.declared_type = Some(Box::new(t));
                }
            }
        }
        Ok(key)
    }

    /// Function types number their parameters `p1, p2, ...`; `new`/
    /// `this` markers are accepted and discarded; a missing return
    /// type defaults to `any`.
    fn convert_function(&mut self, n: &Node) -> Result<Node, Error> {
        let mut return_type = any_type();
        let mut params = Vec::new();
        for child in &n.children {
            match child.token {
                Token::ParamList => {
                    for (idx, param) in child.children.iter().enumerate() {
                        let pname = format!("p{}", idx + 1);
                        let slot = match param.token {
                            Token::Ellipsis => {
                                let mut rest = Node::rest(pname);
                                if param.first_child().is_some() {
                                    if let Some(t) = self.convert(param, false)? {
                                        rest.declared_type = Some(Box::new(t));
                                    }
                                }
                                rest
                            }
                            Token::Equals => {
                                let mut p = Node::name(pname);
                                p.opt_es6_typed = true;
                                if let Some(t) = self.convert(param, false)? {
                                    p.declared_type = Some(Box::new(t));
                                }
                                p
                            }
                            _ => {
                                let mut p = Node::name(pname);
                                if let Some(t) = self.convert(param, false)? {
                                    p.declared_type = Some(Box::new(t));
                                }
                                p
                            }
                        };
                        params.push(slot);
                    }
                }
                Token::New | Token::This => {}
                _ => {
                    return_type = self.convert(child, true)?.unwrap_or_else(any_type);
                }
            }
        }
        Ok(function_type(return_type, params))
    }

    /// Rewrites a namespaced type name to its module-local form,
    /// queueing the import that justifies it. Every entry committed to
    /// the rewrite table corresponds to exactly one queued import.
    fn convert_type_name(&mut self, type_name: &str) -> String {
        let index = self.symbol_index;
        let file = self.current_file.clone();

        let prefix = {
            let rewritten = self
                .type_rewrite
                .get(&file)
                .into_iter()
                .flat_map(|m| m.keys().map(String::as_str));
            match names::find_longest_name_prefix(type_name, rewritten.chain(index.namespaces()))
            {
                Some(p) => p,
                None => return type_name.to_owned(),
            }
        };

        if let Some(symbol) = self.type_rewrite.get(&file).and_then(|m| m.get(&prefix)) {
            // Already imported by this file; reuse the local name.
            return names::replace_prefix_in_name(type_name, &prefix, symbol);
        }

        let Some(module) = index.get(&prefix) else {
            log::debug!("no module provides `{}`; leaving `{}` unchanged", prefix, type_name);
            return type_name.to_owned();
        };
        let Some(symbol) = module.symbols.get(&prefix) else {
            log::debug!("module for `{}` exports no symbol for it", prefix);
            return type_name.to_owned();
        };

        let import = if module.uses_goog_scheme() {
            new_import(symbol, &format!("goog:{}", prefix))
        } else {
            new_import(symbol, &paths::get_import_path(&file, &module.file))
        };
        self.imports_needed.entry(file.clone()).or_default().push(import);
        self.type_rewrite
            .entry(file)
            .or_default()
            .insert(prefix.clone(), symbol.clone());

        names::replace_prefix_in_name(type_name, &prefix, symbol)
    }

    /// Externally-named types may map to a different standard-library
    /// name; absence is not an error.
    fn convert_extern_name(&self, extern_name: &str) -> String {
        match self.externs_map.get(extern_name) {
            Some(typing) => typing.clone(),
            None => extern_name.to_owned(),
        }
    }
}

/// Copies `private`/`protected` visibility into the structural modifier
/// and retokens doc-constant `var`/`let` bindings to `const`.
fn access_traverse(n: &mut Node, inherited: Option<&DocInfo>) {
    let token = n.token;
    {
        let Node { doc, children, .. } = n;
        let down = if passes_doc_down(token) {
            doc.as_ref().or(inherited)
        } else {
            None
        };
        for child in children.iter_mut() {
            access_traverse(child, down);
        }
    }

    let best = n.doc.as_ref().or(inherited);
    if let Some(d) = best {
        match d.visibility {
            Visibility::Private | Visibility::Protected => {
                n.access_modifier = Some(d.visibility);
            }
            Visibility::Public => {}
        }
        if d.constant && matches!(n.token, Token::Var | Token::Let) {
            n.token = Token::Const;
        }
    }
}

/// Documentation info reaches the node it describes through its
/// enclosing declaration; these are the links it flows across.
fn passes_doc_down(token: Token) -> bool {
    matches!(
        token,
        Token::Var
            | Token::Let
            | Token::Const
            | Token::Name
            | Token::Assign
            | Token::ExprResult
            | Token::Export
            | Token::MemberFunctionDef
            | Token::MemberVariableDef
    )
}

fn new_import(symbol: &str, module_spec: &str) -> Node {
    Node::new(Token::Import)
        .push(Node::new(Token::Empty))
        .push(
            Node::new(Token::ImportSpecs)
                .push(Node::new(Token::ImportSpec).push(Node::name(symbol))),
        )
        .push(Node::with_string(Token::String, module_spec))
}

/// Deep-flattens nested unions. Each member appears once, at the
/// position it was first seen; in particular `null` survives exactly
/// once no matter how deeply the nullables nest.
fn flat_union_type(types: Vec<Node>) -> Node {
    let mut flat = Vec::new();
    flatten(types, &mut flat);
    if flat.len() == 1 {
        flat.swap_remove(0)
    } else {
        union_type(flat)
    }
}

fn flatten(types: Vec<Node>, result: &mut Vec<Node>) {
    for t in types {
        match t.token {
            // Moving the children out is the snapshot-then-detach the
            // recursion needs.
            Token::UnionType => flatten(t.children, result),
            _ => {
                if !result.contains(&t) {
                    result.push(t);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsdoc::parse_type_expression;
    use crate::modules::{ModuleKind, ModuleRecord};
    use crate::testing::parse_helper;
    use indexmap::IndexMap;

    fn convert(src: &str, is_return: bool) -> Option<Node> {
        let index = SymbolIndex::new();
        let externs = HashMap::new();
        let mut pass = TypeAnnotationPass::new(&index, &externs);
        let ty = parse_type_expression(src).expect("parse");
        pass.convert(&ty, is_return).expect("convert")
    }

    fn run(pass: &mut TypeAnnotationPass, src: &str) -> Node {
        let mut script = parse_helper("test.js", src);
        pass.process_script(&mut script).expect("pass");
        pass.inject_imports(&mut script);
        script
    }

    #[test]
    fn primitives() {
        assert_eq!(convert("number", false).map(|t| t.token), Some(Token::NumberType));
        assert_eq!(convert("*", false).map(|t| t.token), Some(Token::AnyType));
        assert_eq!(convert("null", false).map(|t| t.token), Some(Token::Null));
    }

    #[test]
    fn void_depends_on_position() {
        assert_eq!(convert("void", true).map(|t| t.token), Some(Token::VoidType));
        assert_eq!(convert("void", false).map(|t| t.token), Some(Token::UndefinedType));
        assert_eq!(convert("undefined", true).map(|t| t.token), Some(Token::VoidType));
        assert_eq!(convert("undefined", false).map(|t| t.token), Some(Token::UndefinedType));
    }

    #[test]
    fn nullable_becomes_null_union() {
        let t = convert("?string", false).expect("type");
        assert_eq!(t.token, Token::UnionType);
        assert_eq!(t.children[0].token, Token::Null);
        assert_eq!(t.children[1].token, Token::StringType);

        assert_eq!(convert("?", false).map(|t| t.token), Some(Token::AnyType));
    }

    #[test]
    fn non_null_is_stripped() {
        assert_eq!(convert("!Foo", false).map(|t| t.token), Some(Token::NamedType));
    }

    #[test]
    fn union_flattening_dedups_by_first_occurrence() {
        let t = convert("(string|(number|string|null)|null)", false).expect("type");
        assert_eq!(t.token, Token::UnionType);
        let tokens: Vec<Token> = t.children.iter().map(|c| c.token).collect();
        assert_eq!(
            tokens,
            vec![Token::StringType, Token::NumberType, Token::Null]
        );
    }

    #[test]
    fn nested_nullable_keeps_one_null() {
        let t = convert("?(string|?number)", false).expect("type");
        let nulls = t.children.iter().filter(|c| c.token == Token::Null).count();
        assert_eq!(nulls, 1);
        assert_eq!(t.children[0].token, Token::Null);
    }

    #[test]
    fn array_sugar() {
        let t = convert("Array<string>", false).expect("type");
        assert_eq!(t.token, Token::ArrayType);
        assert_eq!(t.children[0].token, Token::StringType);
    }

    #[test]
    fn generics() {
        let t = convert("Map<string, number>", false).expect("type");
        assert_eq!(t.token, Token::ParameterizedType);
        assert_eq!(t.children[0].string(), "Map");
        assert_eq!(t.children.len(), 3);
    }

    #[test]
    fn record_fields_keep_order_and_strip_quotes() {
        let t = convert("{foo: number, 'bar': string, baz}", false).expect("type");
        assert_eq!(t.token, Token::RecordType);
        let names: Vec<&str> = t.children.iter().map(|c| c.string()).collect();
        assert_eq!(names, vec!["foo", "bar", "baz"]);
        assert!(t.children[2].declared_type.is_none());
    }

    #[test]
    fn function_type_numbers_params() {
        let t = convert("function(number, string=, ...boolean): void", false).expect("type");
        assert_eq!(t.token, Token::FunctionType);
        assert_eq!(t.children[0].token, Token::VoidType);
        assert_eq!(t.children[1].string(), "p1");
        assert!(t.children[2].opt_es6_typed);
        assert_eq!(t.children[3].token, Token::Rest);
        // The rest type arrives already as an array.
        assert_eq!(
            t.children[3].declared_type.as_ref().map(|d| d.token),
            Some(Token::ArrayType)
        );
    }

    #[test]
    fn function_type_defaults_return_to_any() {
        let t = convert("function(number)", false).expect("type");
        assert_eq!(t.children[0].token, Token::AnyType);
    }

    #[test]
    fn member_fields_default_to_any() {
        let index = SymbolIndex::new();
        let externs = HashMap::new();
        let mut pass = TypeAnnotationPass::new(&index, &externs);
        let script = run(&mut pass, "class A { x = 1; }");
        let member = &script.children[0].children[2].children[0];
        assert_eq!(member.token, Token::MemberVariableDef);
        assert_eq!(
            member.declared_type.as_ref().map(|d| d.token),
            Some(Token::AnyType)
        );
    }

    #[test]
    fn params_are_annotated_and_replaced() {
        let index = SymbolIndex::new();
        let externs = HashMap::new();
        let mut pass = TypeAnnotationPass::new(&index, &externs);
        let script = run(
            &mut pass,
            "/** @param {number} a @param {string=} b @param {...boolean} c */\nfunction f(a, b, c) {}",
        );
        let params = &script.children[0].children[1];
        assert_eq!(
            params.children[0].declared_type.as_ref().map(|d| d.token),
            Some(Token::NumberType)
        );
        assert!(params.children[1].opt_es6_typed);
        assert_eq!(params.children[2].token, Token::Rest);
        assert_eq!(
            params.children[2].declared_type.as_ref().map(|d| d.token),
            Some(Token::ArrayType)
        );
    }

    #[test]
    fn source_level_rest_param_gets_type() {
        let index = SymbolIndex::new();
        let externs = HashMap::new();
        let mut pass = TypeAnnotationPass::new(&index, &externs);
        let script = run(
            &mut pass,
            "/** @param {...string} rest */\nfunction f(...rest) {}",
        );
        let rest = &script.children[0].children[1].children[0];
        assert_eq!(rest.token, Token::Rest);
        assert_eq!(
            rest.declared_type.as_ref().map(|d| d.token),
            Some(Token::ArrayType)
        );
    }

    #[test]
    fn extern_names_are_mapped() {
        let index = SymbolIndex::new();
        let mut externs = HashMap::new();
        externs.insert("MyExternType".to_owned(), "MyTsType".to_owned());
        let mut pass = TypeAnnotationPass::new(&index, &externs);
        let script = run(&mut pass, "/** @type {MyExternType} */ var z;");
        let name = &script.children[0].children[0];
        assert_eq!(
            name.declared_type.as_ref().map(|d| d.string().to_owned()),
            Some("MyTsType".to_owned())
        );
    }

    #[test]
    fn namespaced_type_queues_one_import() {
        let mut index = SymbolIndex::new();
        let mut symbols = IndexMap::new();
        symbols.insert("ns.T".to_owned(), "T".to_owned());
        index.insert(ModuleRecord {
            file: "t.js".to_owned(),
            kind: ModuleKind::LegacyNamespace,
            symbols,
        });
        let externs = HashMap::new();
        let mut pass = TypeAnnotationPass::new(&index, &externs);
        let script = run(
            &mut pass,
            "/** @type {ns.T} */ var a;\n/** @type {ns.T} */ var b;",
        );
        let imports: Vec<&Node> = script
            .children
            .iter()
            .filter(|c| c.token == Token::Import)
            .collect();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].children[2].string(), "goog:ns.T");
        // Both references use the rewritten local name.
        let a = &script.children[1].children[0];
        assert_eq!(
            a.declared_type.as_ref().map(|d| d.string().to_owned()),
            Some("T".to_owned())
        );
    }

    #[test]
    fn unknown_namespace_is_left_alone() {
        let index = SymbolIndex::new();
        let externs = HashMap::new();
        let mut pass = TypeAnnotationPass::new(&index, &externs);
        let script = run(&mut pass, "/** @type {mystery.T} */ var a;");
        assert!(!script.children.iter().any(|c| c.token == Token::Import));
        let a = &script.children[0].children[0];
        assert_eq!(
            a.declared_type.as_ref().map(|d| d.string().to_owned()),
            Some("mystery.T".to_owned())
        );
    }

    #[test]
    fn bare_const_retokens_binding() {
        let index = SymbolIndex::new();
        let externs = HashMap::new();
        let mut pass = TypeAnnotationPass::new(&index, &externs);
        let script = run(&mut pass, "/** @const */ var x = 3;");
        assert_eq!(script.children[0].token, Token::Const);
    }

    #[test]
    fn typed_const_keeps_binding_kind() {
        let index = SymbolIndex::new();
        let externs = HashMap::new();
        let mut pass = TypeAnnotationPass::new(&index, &externs);
        let script = run(&mut pass, "/** @const {string} */ var y = \"hello\";");
        assert_eq!(script.children[0].token, Token::Var);
        let name = &script.children[0].children[0];
        assert_eq!(
            name.declared_type.as_ref().map(|d| d.token),
            Some(Token::StringType)
        );
    }

    #[test]
    fn visibility_becomes_modifier() {
        let index = SymbolIndex::new();
        let externs = HashMap::new();
        let mut pass = TypeAnnotationPass::new(&index, &externs);
        let script = run(&mut pass, "class A { /** @private @type {number} */ x = 1; }");
        let member = &script.children[0].children[2].children[0];
        assert_eq!(member.access_modifier, Some(Visibility::Private));
    }

    #[test]
    fn cast_gets_declared_type() {
        let index = SymbolIndex::new();
        let externs = HashMap::new();
        let mut pass = TypeAnnotationPass::new(&index, &externs);
        let script = run(&mut pass, "var x = /** @type {number} */ (y);");
        let cast = &script.children[0].children[0].children[0];
        assert_eq!(cast.token, Token::Cast);
        assert_eq!(
            cast.declared_type.as_ref().map(|d| d.token),
            Some(Token::NumberType)
        );
    }
}
