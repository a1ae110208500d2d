//! Documentation-comment parsing: tag scanning plus the embedded type
//! grammar.
//!
//! The type parser produces [`Node`] trees in the documentation-comment
//! grammar (`Star`, `Bang`, `Qmark`, `Pipe`, `Lc`, `Ellipsis`,
//! `Equals`, `Function`, named `String` roots); the annotation pass
//! translates those into the typed-declaration grammar.

use crate::ast::{DocInfo, Node, Token, Visibility};
use crate::error::Error;

/// True for block comments of the `/** ... */` form. `text` is the
/// comment interior as reported by the parser.
pub fn is_doc_comment(text: &str) -> bool {
    text.starts_with('*')
}

/// Parses the interior of a documentation comment into a [`DocInfo`].
///
/// Unknown tags are ignored. A malformed type expression drops that one
/// tag with a warning; missing doc info is never fatal downstream.
pub fn parse(text: &str) -> DocInfo {
    let mut doc = DocInfo::default();
    let text = strip_decorations(text);
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '@' || !at_tag_start(&chars, i) {
            i += 1;
            continue;
        }
        i += 1;
        let tag = read_ident(&chars, &mut i);
        match tag.as_str() {
            "type" => {
                if let Some(ty) = read_braced_type(&chars, &mut i) {
                    doc.ty = Some(Box::new(ty));
                }
            }
            "const" => {
                skip_spaces(&chars, &mut i);
                if i < chars.len() && chars[i] == '{' {
                    if let Some(ty) = read_braced_type(&chars, &mut i) {
                        doc.ty = Some(Box::new(ty));
                    }
                } else {
                    doc.constant = true;
                }
            }
            "param" => {
                skip_spaces(&chars, &mut i);
                let ty = if i < chars.len() && chars[i] == '{' {
                    read_braced_type(&chars, &mut i)
                } else {
                    None
                };
                skip_spaces(&chars, &mut i);
                let name = read_ident(&chars, &mut i);
                if let (Some(ty), false) = (ty, name.is_empty()) {
                    doc.params.insert(name, ty);
                }
            }
            "return" | "returns" => {
                skip_spaces(&chars, &mut i);
                if i < chars.len() && chars[i] == '{' {
                    if let Some(ty) = read_braced_type(&chars, &mut i) {
                        doc.return_type = Some(Box::new(ty));
                    }
                } else {
                    doc.return_type = Some(Box::new(Node::new(Token::Empty)));
                }
            }
            "private" => doc.visibility = Visibility::Private,
            "protected" => doc.visibility = Visibility::Protected,
            // @export surfaces a symbol; for emission it is public.
            "public" | "export" => doc.visibility = Visibility::Public,
            "externs" => doc.externs = true,
            _ => {}
        }
    }
    doc
}

/// Strips the leading `*` decoration from each comment line.
fn strip_decorations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let line = line.trim_start();
        let line = line.strip_prefix('*').unwrap_or(line);
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// A tag must follow start-of-text or whitespace so that `{@link ...}`
/// and e-mail addresses are not misread as tags.
fn at_tag_start(chars: &[char], i: usize) -> bool {
    i == 0 || chars[i - 1].is_whitespace()
}

fn skip_spaces(chars: &[char], i: &mut usize) {
    while *i < chars.len() && chars[*i].is_whitespace() {
        *i += 1;
    }
}

fn read_ident(chars: &[char], i: &mut usize) -> String {
    let mut s = String::new();
    while *i < chars.len() {
        let c = chars[*i];
        if c.is_alphanumeric() || c == '_' || c == '$' {
            s.push(c);
            *i += 1;
        } else {
            break;
        }
    }
    s
}

/// Reads a balanced `{...}` group and parses its contents as a type
/// expression. Returns `None` (with a warning) when the braces are
/// missing or the expression is malformed.
fn read_braced_type(chars: &[char], i: &mut usize) -> Option<Node> {
    skip_spaces(chars, i);
    if *i >= chars.len() || chars[*i] != '{' {
        return None;
    }
    let start = *i + 1;
    let mut depth = 0usize;
    let mut end = None;
    let mut j = *i;
    while j < chars.len() {
        match chars[j] {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(j);
                    break;
                }
            }
            _ => {}
        }
        j += 1;
    }
    let end = end?;
    let src: String = chars[start..end].iter().collect();
    *i = end + 1;
    match parse_type_expression(&src) {
        Ok(ty) => Some(ty),
        Err(e) => {
            log::warn!("ignoring malformed doc type `{{{}}}`: {}", src, e);
            None
        }
    }
}

/// Parses one documentation type expression, e.g. `?Array<string>` or
/// `function(number, ...string): boolean`.
pub fn parse_type_expression(src: &str) -> Result<Node, Error> {
    let mut p = TypeParser {
        chars: src.chars().collect(),
        pos: 0,
    };
    p.skip_ws();
    if p.at_end() {
        return Ok(Node::new(Token::Empty));
    }
    let root = p.parse_param_type()?;
    p.skip_ws();
    if !p.at_end() {
        return Err(p.unsupported("trailing input"));
    }
    Ok(root)
}

struct TypeParser {
    chars: Vec<char>,
    pos: usize,
}

impl TypeParser {
    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), Error> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.unsupported("unexpected character"))
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(k, c)| self.chars.get(self.pos + k) == Some(&c))
    }

    fn unsupported(&self, what: &str) -> Error {
        let rest: String = self.chars[self.pos.min(self.chars.len())..].iter().collect();
        Error::UnsupportedTypeConstruct(format!("{} at `{}`", what, rest))
    }

    /// Top level for parameter positions: a leading `...` marks a
    /// variadic type; anything else falls through to a plain type.
    fn parse_param_type(&mut self) -> Result<Node, Error> {
        self.skip_ws();
        if self.starts_with("...") {
            self.pos += 3;
            self.skip_ws();
            let mut n = Node::new(Token::Ellipsis);
            if self.starts_type() {
                n.children.push(self.parse_union()?);
            }
            return Ok(n);
        }
        self.parse_union()
    }

    fn parse_union(&mut self) -> Result<Node, Error> {
        let mut members = vec![self.parse_term()?];
        loop {
            self.skip_ws();
            if self.eat('|') {
                members.push(self.parse_term()?);
            } else {
                break;
            }
        }
        if members.len() == 1 {
            Ok(members.pop().unwrap_or_else(|| Node::new(Token::Empty)))
        } else {
            let mut n = Node::new(Token::Pipe);
            n.children = members;
            Ok(n)
        }
    }

    fn parse_term(&mut self) -> Result<Node, Error> {
        self.skip_ws();
        let mut term = match self.peek() {
            Some('!') => {
                self.pos += 1;
                Node::new(Token::Bang).push(self.parse_term()?)
            }
            Some('?') => {
                self.pos += 1;
                self.skip_ws();
                if self.starts_type() {
                    Node::new(Token::Qmark).push(self.parse_term()?)
                } else {
                    Node::new(Token::Qmark)
                }
            }
            Some('*') => {
                self.pos += 1;
                Node::new(Token::Star)
            }
            Some('(') => {
                self.pos += 1;
                let inner = self.parse_union()?;
                self.skip_ws();
                self.expect(')')?;
                inner
            }
            Some('{') => self.parse_record()?,
            Some(c) if is_ident_start(c) => {
                if self.starts_with("function") && self.function_follows() {
                    self.parse_function()?
                } else {
                    self.parse_named()?
                }
            }
            _ => return Err(self.unsupported("expected a type")),
        };
        // Trailing `=` marks an optional parameter.
        if self.eat('=') {
            term = Node::new(Token::Equals).push(term);
        }
        Ok(term)
    }

    /// True when the upcoming characters can begin a type; used to
    /// distinguish `?` and bare `...` from their prefixed forms.
    fn starts_type(&self) -> bool {
        matches!(
            self.peek(),
            Some('!') | Some('?') | Some('*') | Some('(') | Some('{')
        ) || self.peek().is_some_and(is_ident_start)
    }

    fn function_follows(&self) -> bool {
        let mut k = self.pos + "function".len();
        while self.chars.get(k).is_some_and(|c| c.is_whitespace()) {
            k += 1;
        }
        self.chars.get(k) == Some(&'(')
    }

    fn parse_record(&mut self) -> Result<Node, Error> {
        self.expect('{')?;
        let mut fields = Vec::new();
        loop {
            self.skip_ws();
            if self.eat('}') {
                break;
            }
            let key = self.parse_record_key()?;
            self.skip_ws();
            let field = if self.eat(':') {
                let ty = self.parse_union()?;
                Node::new(Token::Colon)
                    .push(Node::with_string(Token::StringKey, key))
                    .push(ty)
            } else {
                Node::with_string(Token::StringKey, key)
            };
            fields.push(field);
            self.skip_ws();
            if !self.eat(',') {
                self.expect('}')?;
                break;
            }
        }
        let mut list = Node::new(Token::Lb);
        list.children = fields;
        Ok(Node::new(Token::Lc).push(list))
    }

    /// Record keys may be quoted; the quotes are kept in the payload
    /// and stripped during conversion.
    fn parse_record_key(&mut self) -> Result<String, Error> {
        match self.peek() {
            Some(q @ ('\'' | '"')) => {
                self.pos += 1;
                let mut s = String::new();
                s.push(q);
                loop {
                    match self.bump() {
                        Some(c) if c == q => break,
                        Some(c) => s.push(c),
                        None => return Err(self.unsupported("unterminated record key")),
                    }
                }
                s.push(q);
                Ok(s)
            }
            Some(c) if is_ident_start(c) || c.is_ascii_digit() => {
                let mut s = String::new();
                while self.peek().is_some_and(|c| is_ident_part(c)) {
                    if let Some(c) = self.bump() {
                        s.push(c);
                    }
                }
                Ok(s)
            }
            _ => Err(self.unsupported("expected a record key")),
        }
    }

    fn parse_function(&mut self) -> Result<Node, Error> {
        self.pos += "function".len();
        self.skip_ws();
        self.expect('(')?;
        let mut ctor = None;
        let mut this = None;
        let mut params = Node::new(Token::ParamList);
        loop {
            self.skip_ws();
            if self.eat(')') {
                break;
            }
            if self.starts_with("new") && self.colon_after_word("new") {
                self.pos += "new".len();
                self.skip_ws();
                self.expect(':')?;
                ctor = Some(Node::new(Token::New).push(self.parse_union()?));
            } else if self.starts_with("this") && self.colon_after_word("this") {
                self.pos += "this".len();
                self.skip_ws();
                self.expect(':')?;
                this = Some(Node::new(Token::This).push(self.parse_union()?));
            } else {
                params.children.push(self.parse_param_type()?);
            }
            self.skip_ws();
            if !self.eat(',') {
                self.expect(')')?;
                break;
            }
        }
        let mut func = Node::new(Token::Function);
        if let Some(c) = ctor {
            func.children.push(c);
        }
        if let Some(t) = this {
            func.children.push(t);
        }
        func.children.push(params);
        self.skip_ws();
        if self.eat(':') {
            func.children.push(self.parse_union()?);
        }
        Ok(func)
    }

    fn colon_after_word(&self, word: &str) -> bool {
        let mut k = self.pos + word.len();
        if self.chars.get(k).is_some_and(|&c| is_ident_part(c)) {
            return false;
        }
        while self.chars.get(k).is_some_and(|c| c.is_whitespace()) {
            k += 1;
        }
        self.chars.get(k) == Some(&':')
    }

    fn parse_named(&mut self) -> Result<Node, Error> {
        let mut name = String::new();
        loop {
            while self.peek().is_some_and(is_ident_part) {
                if let Some(c) = self.bump() {
                    name.push(c);
                }
            }
            // Dotted segments; `.<` is the legacy generic marker.
            if self.peek() == Some('.')
                && self.chars.get(self.pos + 1).is_some_and(|&c| is_ident_start(c))
            {
                self.pos += 1;
                name.push('.');
            } else {
                break;
            }
        }
        if name == "void" {
            return Ok(Node::new(Token::Void));
        }
        let generic = if self.starts_with(".<") {
            self.pos += 2;
            true
        } else {
            self.eat('<')
        };
        let mut node = Node::with_string(Token::String, name);
        if generic {
            let mut block = Node::new(Token::Block);
            loop {
                self.skip_ws();
                if self.eat('>') {
                    break;
                }
                block.children.push(self.parse_union()?);
                self.skip_ws();
                if !self.eat(',') {
                    self.expect('>')?;
                    break;
                }
            }
            node.children.push(block);
        }
        Ok(node)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(src: &str) -> Node {
        parse_type_expression(src).expect("type should parse")
    }

    #[test]
    fn primitives_and_star() {
        assert_eq!(ty("number").token, Token::String);
        assert_eq!(ty("number").string(), "number");
        assert_eq!(ty("*").token, Token::Star);
        assert_eq!(ty("void").token, Token::Void);
    }

    #[test]
    fn prefix_operators() {
        let bang = ty("!Foo");
        assert_eq!(bang.token, Token::Bang);
        assert_eq!(bang.children[0].string(), "Foo");

        let nullable = ty("?string");
        assert_eq!(nullable.token, Token::Qmark);
        assert_eq!(nullable.children[0].string(), "string");

        assert!(ty("?").children.is_empty());
    }

    #[test]
    fn unions_flatten_later() {
        let u = ty("(string|number|null)");
        assert_eq!(u.token, Token::Pipe);
        assert_eq!(u.children.len(), 3);

        // Nested unions stay nested here; the conversion pass flattens.
        let nested = ty("string|(number|boolean)");
        assert_eq!(nested.children[1].token, Token::Pipe);
    }

    #[test]
    fn generics_both_syntaxes() {
        for src in ["Array<string>", "Array.<string>"] {
            let t = ty(src);
            assert_eq!(t.string(), "Array");
            assert_eq!(t.children[0].token, Token::Block);
            assert_eq!(t.children[0].children[0].string(), "string");
        }
        let m = ty("Map<string, number>");
        assert_eq!(m.children[0].children.len(), 2);
    }

    #[test]
    fn records() {
        let r = ty("{foo: number, bar, 'baz': string}");
        assert_eq!(r.token, Token::Lc);
        let fields = &r.children[0].children;
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].token, Token::Colon);
        assert_eq!(fields[1].token, Token::StringKey);
        assert_eq!(fields[2].children[0].string(), "'baz'");
    }

    #[test]
    fn function_types() {
        let f = ty("function(number, ...string): boolean");
        assert_eq!(f.token, Token::Function);
        let params = &f.children[0];
        assert_eq!(params.token, Token::ParamList);
        assert_eq!(params.children.len(), 2);
        assert_eq!(params.children[1].token, Token::Ellipsis);
        assert_eq!(f.children.last().map(|n| n.string()), Some("boolean"));

        let ctor = ty("function(new:Foo, string)");
        assert_eq!(ctor.children[0].token, Token::New);
    }

    #[test]
    fn variadic_and_optional_markers() {
        let rest = ty("...string");
        assert_eq!(rest.token, Token::Ellipsis);

        let opt = ty("number=");
        assert_eq!(opt.token, Token::Equals);
        assert_eq!(opt.children[0].string(), "number");
    }

    #[test]
    fn tags() {
        let doc = parse("* Widget state.\n * @type {number}\n * @private\n");
        assert_eq!(doc.ty.as_ref().map(|t| t.string()), Some("number"));
        assert_eq!(doc.visibility, Visibility::Private);
        assert!(!doc.constant);

        let doc = parse("* @const");
        assert!(doc.constant);
        let doc = parse("* @const {string}");
        assert!(!doc.constant);
        assert!(doc.ty.is_some());
    }

    #[test]
    fn param_and_return_tags() {
        let doc = parse("* @param {number} x\n * @param {...string} rest\n * @return {number}\n");
        assert_eq!(doc.params.len(), 2);
        assert_eq!(doc.params["rest"].token, Token::Ellipsis);
        assert_eq!(doc.return_type.as_ref().map(|t| t.string()), Some("number"));

        let bare = parse("* @return\n");
        assert_eq!(bare.return_type.as_ref().map(|t| t.token), Some(Token::Empty));
    }

    #[test]
    fn externs_tag() {
        assert!(parse("* @externs ").externs);
    }

    #[test]
    fn malformed_type_is_dropped() {
        let doc = parse("* @type {<<nope>>}\n");
        assert!(doc.ty.is_none());
    }
}
