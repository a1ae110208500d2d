use indexmap::IndexMap;

/// Token tag identifying the shape of a [`Node`].
///
/// One flat enum covers the three tree flavours that flow through the
/// pipeline: ordinary JavaScript syntax, documentation-comment type
/// expressions (the `Star`..`Colon` group), and the typed-declaration
/// sub-grammar the emitter understands (the `AnyType`..`UnionType`
/// group).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Token {
    // Containers.
    Script,
    ModuleBody,
    Block,
    Empty,

    // Declarations and bindings.
    Var,
    Let,
    Const,
    Name,
    ParamList,
    Rest,
    Function,
    Class,
    ClassMembers,
    MemberVariableDef,
    MemberFunctionDef,

    // Module syntax.
    Import,
    ImportSpecs,
    ImportSpec,
    Export,

    // Statements.
    ExprResult,
    Return,
    If,
    While,
    For,
    Break,
    Continue,
    Throw,

    // Expressions.
    Assign,
    Call,
    New,
    GetProp,
    GetElem,
    Hook,
    BinaryOp,
    UnaryOp,
    Update,
    Paren,
    Cast,
    ArrayLit,
    ObjectLit,
    StringKey,
    Number,
    String,
    Regex,
    True,
    False,
    Null,
    This,

    // Documentation-comment type expressions.
    Star,
    Bang,
    Qmark,
    Pipe,
    Ellipsis,
    Equals,
    Lc,
    Lb,
    Colon,
    Void,

    // Typed-declaration sub-grammar.
    AnyType,
    BooleanType,
    NumberType,
    StringType,
    VoidType,
    UndefinedType,
    NamedType,
    ParameterizedType,
    ArrayType,
    RecordType,
    FunctionType,
    UnionType,
}

/// Member visibility recorded from documentation comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// No modifier is emitted.
    #[default]
    Public,
    /// Emitted as the `private` keyword.
    Private,
    /// Emitted as the `protected` keyword.
    Protected,
}

/// Structured contents of one documentation comment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocInfo {
    /// Overall type from `@type {T}` or `@const {T}`.
    pub ty: Option<Box<Node>>,
    /// Return type from `@return {T}`. A bare `@return` yields an
    /// [`Token::Empty`] root.
    pub return_type: Option<Box<Node>>,
    /// Parameter name to type-expression root, in declaration order.
    pub params: IndexMap<String, Node>,
    /// Visibility from `@private` / `@protected` / `@public`.
    pub visibility: Visibility,
    /// Set by a bare `@const`. A braced `@const {T}` contributes only
    /// the overall type.
    pub constant: bool,
    /// Set by `@externs`; marks the whole file as ambient.
    pub externs: bool,
}

impl DocInfo {
    /// Returns true when no recognized tag was found, so the comment
    /// should be kept as plain text instead.
    pub fn is_empty(&self) -> bool {
        self.ty.is_none()
            && self.return_type.is_none()
            && self.params.is_empty()
            && self.visibility == Visibility::Public
            && !self.constant
            && !self.externs
    }
}

/// A node in the syntax tree all passes operate on.
///
/// Metadata rides directly on the node: the attached documentation
/// info, the declared-type expression promoted from it, and any plain
/// comment to re-emit verbatim above the node.
///
/// Equality is structural; union flattening relies on it to drop
/// duplicate members.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Shape tag.
    pub token: Token,
    /// Ordered children.
    pub children: Vec<Node>,
    /// Payload: identifier text, literal text, property or key name.
    pub string: Option<String>,
    /// Source file this node was parsed from; set on `Script` roots.
    pub source_file: Option<String>,
    /// Parsed documentation comment attached to this node.
    pub doc: Option<DocInfo>,
    /// Declared type in the typed-declaration sub-grammar.
    pub declared_type: Option<Box<Node>>,
    /// Leading non-documentation comment, re-emitted verbatim.
    pub comment: Option<String>,
    /// Marks an optional parameter, emitted as `name?: T`.
    pub opt_es6_typed: bool,
    /// `private` / `protected` modifier copied from the doc info.
    pub access_modifier: Option<Visibility>,
    /// Static class member.
    pub is_static: bool,
    /// Prefix position of an `Update` expression.
    pub prefix: bool,
    /// File-level `@externs` marker; scripts only.
    pub externs: bool,
}

impl Node {
    /// Creates a childless node.
    pub fn new(token: Token) -> Self {
        Node {
            token,
            children: Vec::new(),
            string: None,
            source_file: None,
            doc: None,
            declared_type: None,
            comment: None,
            opt_es6_typed: false,
            access_modifier: None,
            is_static: false,
            prefix: false,
            externs: false,
        }
    }

    /// Creates a node carrying a payload string.
    pub fn with_string(token: Token, string: impl Into<String>) -> Self {
        let mut n = Node::new(token);
        n.string = Some(string.into());
        n
    }

    /// Creates a `Name` node.
    pub fn name(s: impl Into<String>) -> Self {
        Node::with_string(Token::Name, s)
    }

    /// Creates a `Rest` parameter node.
    pub fn rest(s: impl Into<String>) -> Self {
        Node::with_string(Token::Rest, s)
    }

    /// Appends a child and returns self, for literal tree building.
    pub fn push(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Payload string, or `""` when absent.
    pub fn string(&self) -> &str {
        self.string.as_deref().unwrap_or("")
    }

    /// First child, when any.
    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    /// A child of a child exists; used to detect initialized bindings.
    pub fn has_grandchildren(&self) -> bool {
        self.children.first().is_some_and(|c| !c.children.is_empty())
    }

    /// Token of the first child's first child, when present.
    pub fn first_grandchild_token(&self) -> Option<Token> {
        self.children
            .first()
            .and_then(|c| c.children.first())
            .map(|g| g.token)
    }
}

// Typed-declaration constructors, mirroring the declared-type grammar
// the emitter understands.

/// The `any` type.
pub fn any_type() -> Node {
    Node::new(Token::AnyType)
}

/// The `boolean` type.
pub fn boolean_type() -> Node {
    Node::new(Token::BooleanType)
}

/// The `number` type.
pub fn number_type() -> Node {
    Node::new(Token::NumberType)
}

/// The `string` type.
pub fn string_type() -> Node {
    Node::new(Token::StringType)
}

/// The `void` type, valid in return position.
pub fn void_type() -> Node {
    Node::new(Token::VoidType)
}

/// The `undefined` type.
pub fn undefined_type() -> Node {
    Node::new(Token::UndefinedType)
}

/// The `null` type.
pub fn null_type() -> Node {
    Node::new(Token::Null)
}

/// A reference to a (possibly rewritten) named type.
pub fn named_type(name: impl Into<String>) -> Node {
    Node::with_string(Token::NamedType, name)
}

/// An array of `elem`, emitted `elem[]`.
pub fn array_type(elem: Node) -> Node {
    Node::new(Token::ArrayType).push(elem)
}

/// A generic application such as `Map<K, V>`.
pub fn parameterized_type(root: Node, args: Vec<Node>) -> Node {
    let mut n = Node::new(Token::ParameterizedType).push(root);
    n.children.extend(args);
    n
}

/// A record type; each field is a `StringKey` whose declared type is
/// optional.
pub fn record_type(fields: Vec<Node>) -> Node {
    let mut n = Node::new(Token::RecordType);
    n.children.extend(fields);
    n
}

/// A union of the given members, in order.
pub fn union_type(members: Vec<Node>) -> Node {
    let mut n = Node::new(Token::UnionType);
    n.children.extend(members);
    n
}

/// A function type. The return type is the first child; parameters
/// (`Name` or `Rest` nodes carrying declared types) follow.
pub fn function_type(return_type: Node, params: Vec<Node>) -> Node {
    let mut n = Node::new(Token::FunctionType).push(return_type);
    n.children.extend(params);
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grandchildren() {
        let stmt = Node::new(Token::Var).push(Node::name("x").push(Node::with_string(Token::Number, "4")));
        assert!(stmt.has_grandchildren());
        assert_eq!(stmt.first_grandchild_token(), Some(Token::Number));

        let bare = Node::new(Token::Var).push(Node::name("x"));
        assert!(!bare.has_grandchildren());
    }

    #[test]
    fn type_constructors_shape() {
        let t = parameterized_type(named_type("Map"), vec![string_type(), number_type()]);
        assert_eq!(t.token, Token::ParameterizedType);
        assert_eq!(t.children.len(), 3);
        assert_eq!(t.children[0].string(), "Map");

        let f = function_type(void_type(), vec![Node::name("p1")]);
        assert_eq!(f.children[0].token, Token::VoidType);
    }
}
