//! Module metadata: which file provides which namespace, and how that
//! namespace is addressed from other files.

use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{Node, Token};

/// How a module's exports are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// Exports addressed by a dotted namespace string; imported via a
    /// `goog:` specifier.
    LegacyNamespace,
    /// Exports addressed by relative path with standard `import`
    /// syntax.
    EcmaScript,
}

/// Per-file module record consumed read-only by the annotation pass.
#[derive(Debug, Clone)]
pub struct ModuleRecord {
    /// Canonical path of the providing file.
    pub file: String,
    /// How imports of this module are written.
    pub kind: ModuleKind,
    /// Namespace string to the local symbol an import of it binds.
    pub symbols: IndexMap<String, String>,
}

impl ModuleRecord {
    /// True when imports of this module must use the `goog:` scheme.
    pub fn uses_goog_scheme(&self) -> bool {
        self.kind == ModuleKind::LegacyNamespace
    }
}

/// Namespace string to module record, covering every module visible in
/// the compilation.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    records: HashMap<String, Rc<ModuleRecord>>,
}

impl SymbolIndex {
    /// An empty index.
    pub fn new() -> Self {
        SymbolIndex::default()
    }

    /// Registers a record under every namespace it provides.
    pub fn insert(&mut self, record: ModuleRecord) {
        let record = Rc::new(record);
        for namespace in record.symbols.keys() {
            self.records.insert(namespace.clone(), Rc::clone(&record));
        }
    }

    /// The record providing `namespace`, when one is registered.
    pub fn get(&self, namespace: &str) -> Option<&ModuleRecord> {
        self.records.get(namespace).map(Rc::as_ref)
    }

    /// All registered namespaces, for longest-prefix matching.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

/// Scans a lowered script for `goog.module('ns')` / `goog.provide('ns')`
/// calls and builds the file's module record. The local symbol bound by
/// importing `ns` is the last dotted component of `ns`.
///
/// ECMAScript-form records are registered by the caller through
/// [`SymbolIndex::insert`]; this collector only understands the legacy
/// namespace form.
pub fn collect_module(script: &Node) -> Option<ModuleRecord> {
    let file = script.source_file.clone()?;
    let body = match script.first_child() {
        Some(b) if b.token == Token::ModuleBody => b,
        _ => script,
    };

    let mut symbols = IndexMap::new();
    for stmt in &body.children {
        if let Some(namespace) = goog_declaration(stmt) {
            let local = namespace.rsplit('.').next().unwrap_or(&namespace).to_owned();
            symbols.insert(namespace, local);
        }
    }

    if symbols.is_empty() {
        return None;
    }
    Some(ModuleRecord {
        file,
        kind: ModuleKind::LegacyNamespace,
        symbols,
    })
}

/// Matches `goog.module('ns')` or `goog.provide('ns')` statements and
/// returns the namespace.
fn goog_declaration(stmt: &Node) -> Option<String> {
    if stmt.token != Token::ExprResult {
        return None;
    }
    let call = stmt.first_child()?;
    if call.token != Token::Call || call.children.len() != 2 {
        return None;
    }
    let callee = &call.children[0];
    if callee.token != Token::GetProp
        || !matches!(callee.string(), "module" | "provide")
        || callee.first_child().map(|o| (o.token, o.string())) != Some((Token::Name, "goog"))
    {
        return None;
    }
    let arg = &call.children[1];
    if arg.token != Token::String {
        return None;
    }
    arg.string.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::parse_helper;

    #[test]
    fn collects_goog_module() {
        let script = parse_helper("mod.js", "goog.module('ns.widget.Widget');\nexports = 4;");
        let record = collect_module(&script).expect("record");
        assert_eq!(record.kind, ModuleKind::LegacyNamespace);
        assert_eq!(record.symbols["ns.widget.Widget"], "Widget");
        assert_eq!(record.file, "mod.js");
    }

    #[test]
    fn collects_goog_provide() {
        let script = parse_helper("mod.js", "goog.provide('ns.a');\ngoog.provide('ns.b');");
        let record = collect_module(&script).expect("record");
        assert_eq!(record.symbols.len(), 2);
        assert_eq!(record.symbols["ns.b"], "b");
    }

    #[test]
    fn plain_scripts_have_no_record() {
        let script = parse_helper("plain.js", "var x = 4;");
        assert!(collect_module(&script).is_none());
    }

    #[test]
    fn index_lookup() {
        let mut index = SymbolIndex::new();
        let script = parse_helper("mod.js", "goog.module('ns.T');");
        index.insert(collect_module(&script).expect("record"));
        assert!(index.get("ns.T").is_some());
        assert!(index.get("ns.Other").is_none());
    }
}
