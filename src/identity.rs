//! Canonical type identities and the syntax-level references that resolve to them.
//!
//! A [`TypeRef`] is what a declaration spells (`int?`, `List<Message>`,
//! `(int, string)`); a [`TypeIdentity`] is what the host's semantic model says
//! that spelling means (`System.Nullable<System.Int32>`, ...). The registry
//! only ever works on identities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decl::TypeDeclaration;
use crate::error::{ResolveError, TypeRefParseError};

/// `T?` for value types resolves to this generic wrapper.
pub const NULLABLE: &str = "System.Nullable";
/// `T[]` resolves to this name with the element as its only argument.
pub const ARRAY: &str = "System.Array";
/// `(A, B)` tuple syntax resolves to this name.
pub const VALUE_TUPLE: &str = "System.ValueTuple";
pub const VOID: &str = "System.Void";
/// Root of every base-type chain.
pub const OBJECT: &str = "System.Object";

/// Fully-qualified source type name plus ordered type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeIdentity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeIdentity>,
}

impl TypeIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeIdentity>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// The generic definition this identity instantiates (arguments dropped).
    pub fn open(&self) -> TypeIdentity {
        TypeIdentity::new(self.name.clone())
    }

    /// Last namespace or nesting segment, without a backtick arity suffix.
    ///
    /// `Chat.Models.Message` -> `Message`, `Outer+Inner` -> `Inner`,
    /// ``Page`1`` -> `Page`.
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

pub(crate) fn simple_name(name: &str) -> &str {
    let tail = name.rsplit(|c| c == '.' || c == '+').next().unwrap_or(name);
    tail.split('`').next().unwrap_or(tail)
}

/// A type reference as written in a declaration.
///
/// Parses from (and prints as) C#-like text so models can spell references
/// as plain strings: `Dictionary<string, List<int?>>`, `(int Id, string)[]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    /// `Name` or `Name<Arg, ...>`.
    Named { name: String, args: Vec<TypeRef> },
    /// Suffix-nullable reference: `int?`.
    Nullable(Box<TypeRef>),
    /// Array reference: `T[]`.
    Array(Box<TypeRef>),
    /// Tuple syntax: `(A, B)`.
    Tuple(Vec<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            name: name.into(),
            args,
        }
    }

    pub fn nullable(inner: TypeRef) -> Self {
        TypeRef::Nullable(Box::new(inner))
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    pub fn tuple(elements: Vec<TypeRef>) -> Self {
        TypeRef::Tuple(elements)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    write_list(f, args)?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeRef::Nullable(inner) => write!(f, "{inner}?"),
            TypeRef::Array(element) => write!(f, "{element}[]"),
            TypeRef::Tuple(elements) => {
                f.write_str("(")?;
                write_list(f, elements)?;
                f.write_str(")")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeRef]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl FromStr for TypeRef {
    type Err = TypeRefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = RefParser { src: s, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos < s.len() {
            return Err(parser.error("unexpected trailing text"));
        }
        Ok(ty)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = TypeRefParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

/// Recursive descent over the reference grammar:
///
/// ```text
/// type   := (name args? | '(' type name? (',' type name?)+ ')') suffix*
/// args   := '<' type (',' type)* '>'
/// suffix := '?' | '[' ']'
/// ```
struct RefParser<'a> {
    src: &'a str,
    pos: usize,
}

impl RefParser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), TypeRefParseError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{expected}`")))
        }
    }

    fn error(&self, message: impl Into<String>) -> TypeRefParseError {
        TypeRefParseError {
            text: self.src.to_string(),
            offset: self.pos,
            message: message.into(),
        }
    }

    fn parse_type(&mut self) -> Result<TypeRef, TypeRefParseError> {
        let mut ty = if self.eat('(') {
            let mut elements = vec![self.parse_tuple_element()?];
            while self.eat(',') {
                elements.push(self.parse_tuple_element()?);
            }
            self.expect(')')?;
            if elements.len() < 2 {
                return Err(self.error("a tuple needs at least two elements"));
            }
            TypeRef::Tuple(elements)
        } else {
            let name = self.parse_name()?;
            let mut args = Vec::new();
            if self.eat('<') {
                args.push(self.parse_type()?);
                while self.eat(',') {
                    args.push(self.parse_type()?);
                }
                self.expect('>')?;
            }
            TypeRef::Named { name, args }
        };

        loop {
            if self.eat('?') {
                ty = TypeRef::Nullable(Box::new(ty));
            } else if self.eat('[') {
                self.expect(']')?;
                ty = TypeRef::Array(Box::new(ty));
            } else {
                break;
            }
        }
        Ok(ty)
    }

    /// Tuple elements may carry a name (`(int Id, string Name)`); it is dropped.
    fn parse_tuple_element(&mut self) -> Result<TypeRef, TypeRefParseError> {
        let ty = self.parse_type()?;
        self.skip_ws();
        if matches!(self.peek(), Some(c) if is_name_start(c)) {
            self.parse_name()?;
        }
        Ok(ty)
    }

    fn parse_name(&mut self) -> Result<String, TypeRefParseError> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(c) if is_name_start(c) => {}
            _ => return Err(self.error("expected a type name")),
        }
        while matches!(self.peek(), Some(c) if is_name_char(c)) {
            self.bump();
        }
        let name = &self.src[start..self.pos];
        if name.ends_with('.') || name.contains("..") {
            return Err(self.error(format!("malformed qualified name `{name}`")));
        }
        Ok(name.to_string())
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '+' | '`')
}

/// The semantic model behind a declaration, supplied by the host.
pub trait TypeResolver {
    /// Map a reference to its canonical identity.
    fn resolve(&self, ty: &TypeRef) -> Result<TypeIdentity, ResolveError>;

    /// The declaration behind an identity, if the host has one.
    fn declaration(&self, identity: &TypeIdentity) -> Option<&TypeDeclaration>;
}
