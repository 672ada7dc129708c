//! Run-scoped resolution of source types to TypeScript text.
//!
//! A [`TypeRegistry`] lives for exactly one generation run. It borrows the
//! constant [`MappingTable`] and the host's [`TypeResolver`], and caches every
//! identity it resolves so that repeated references share one
//! [`TypeMapping`] and each declaration form is written once.

use std::cell::OnceCell;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use tracing::debug;

use crate::decl::{DeclKind, TypeDeclaration};
use crate::identity::{TypeIdentity, TypeRef, TypeResolver, OBJECT, VOID};
use crate::table::{Family, MappingTable};

/// How a mapping was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    Primitive,
    Nullable,
    Future,
    Sequence,
    Map,
    Tuple,
    Enum,
    Record,
    /// Placeholder for a type nothing could be determined about.
    Unresolved,
    /// Placeholder for a dictionary whose key TypeScript cannot index by.
    UnsupportedKey,
}

/// A resolved type: inline name form plus an optional standalone declaration.
#[derive(Debug)]
pub struct TypeMapping {
    pub identity: TypeIdentity,
    /// Text used wherever the type is referenced.
    pub name: String,
    pub kind: MappingKind,
    declaration: OnceCell<String>,
}

impl TypeMapping {
    fn new(identity: TypeIdentity, name: impl Into<String>, kind: MappingKind) -> Self {
        Self {
            identity,
            name: name.into(),
            kind,
            declaration: OnceCell::new(),
        }
    }

    fn declared(
        identity: TypeIdentity,
        name: impl Into<String>,
        kind: MappingKind,
        declaration: String,
    ) -> Self {
        let mapping = Self::new(identity, name, kind);
        let _ = mapping.declaration.set(declaration);
        mapping
    }

    /// Standalone `interface`/`enum` block; empty for simple renames.
    pub fn declaration(&self) -> &str {
        self.declaration.get().map_or("", String::as_str)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, MappingKind::Unresolved | MappingKind::UnsupportedKey)
    }
}

/// How `Nullable<T>` is spelled in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullableStyle {
    /// `number?`
    #[default]
    Suffix,
    /// `number | null`
    Union,
}

impl NullableStyle {
    fn apply(self, name: &str) -> String {
        match self {
            NullableStyle::Suffix => format!("{name}?"),
            NullableStyle::Union => format!("{name} | null"),
        }
    }
}

/// A recorded, non-fatal resolution outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WarningKind {
    /// The resolver could not identify a type, or it has no usable shape.
    UnresolvedType,
    /// Dictionary key is neither text nor numeric.
    UnsupportedKeyType,
    /// A future wrapping another future.
    NestedFuture,
    /// The hub names a client contract the resolver has no declaration for.
    MissingClientContract,
}

impl WarningKind {
    pub fn label(self) -> &'static str {
        match self {
            WarningKind::UnresolvedType => "unresolved type",
            WarningKind::UnsupportedKeyType => "unsupported key type",
            WarningKind::NestedFuture => "nested future",
            WarningKind::MissingClientContract => "missing client contract",
        }
    }
}

/// Visible stand-in for text the registry could not produce.
fn placeholder(label: &str, detail: &str) -> String {
    format!("any /* {label}: {detail} */")
}

pub struct TypeRegistry<'a> {
    table: &'a MappingTable,
    resolver: &'a dyn TypeResolver,
    nullable_style: NullableStyle,
    cache: IndexMap<TypeIdentity, Rc<TypeMapping>>,
    /// Mappings with a declaration form, in the order they were completed.
    declarations: Vec<Rc<TypeMapping>>,
    written: usize,
    uses_dictionary: bool,
    tuple_arities: IndexSet<usize>,
    warnings: Vec<Warning>,
}

impl<'a> TypeRegistry<'a> {
    pub fn new(table: &'a MappingTable, resolver: &'a dyn TypeResolver) -> Self {
        Self {
            table,
            resolver,
            nullable_style: NullableStyle::default(),
            cache: IndexMap::new(),
            declarations: Vec::new(),
            written: 0,
            uses_dictionary: false,
            tuple_arities: IndexSet::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_nullable_style(mut self, style: NullableStyle) -> Self {
        self.nullable_style = style;
        self
    }

    /// Resolve a reference through the host resolver.
    ///
    /// A reference the resolver rejects has no identity to cache; it maps to
    /// a placeholder and is reported every time it is met.
    pub fn resolve(&mut self, ty: &TypeRef) -> Rc<TypeMapping> {
        match self.resolver.resolve(ty) {
            Ok(identity) => self.resolve_identity(&identity),
            Err(err) => {
                let text = ty.to_string();
                self.warn(WarningKind::UnresolvedType, format!("`{text}`: {err}"));
                Rc::new(TypeMapping::new(
                    TypeIdentity::new(text.clone()),
                    placeholder("UNRESOLVED", &text),
                    MappingKind::Unresolved,
                ))
            }
        }
    }

    /// Resolve an identity. Within one registry the same identity always
    /// yields the same `Rc`.
    pub fn resolve_identity(&mut self, identity: &TypeIdentity) -> Rc<TypeMapping> {
        if let Some(hit) = self.cache.get(identity) {
            return Rc::clone(hit);
        }

        let table = self.table;
        if let Some(name) = table.primitive(identity) {
            return self.store(TypeMapping::new(
                identity.clone(),
                name,
                MappingKind::Primitive,
            ));
        }

        let mapping = match table.family(&identity.name) {
            Some(Family::Nullable) => self.map_nullable(identity),
            Some(Family::Future) => self.map_future(identity),
            Some(Family::Sequence) => self.map_sequence(identity),
            Some(Family::Map) => self.map_dictionary(identity),
            Some(Family::Tuple) => self.map_tuple(identity),
            None => return self.map_declared(identity),
        };
        self.store(mapping)
    }

    /// Declaration forms completed since the last call, in completion order.
    pub fn take_pending_declarations(&mut self) -> Vec<Rc<TypeMapping>> {
        let pending = self.declarations[self.written..].to_vec();
        self.written = self.declarations.len();
        pending
    }

    /// Whether any dictionary resolved successfully this run.
    pub fn uses_dictionary(&self) -> bool {
        self.uses_dictionary
    }

    /// Distinct tuple sizes used this run, first use first.
    pub fn tuple_arities(&self) -> impl Iterator<Item = usize> + '_ {
        self.tuple_arities.iter().copied()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    /// Number of distinct identities resolved so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let message = message.into();
        debug!(kind = kind.label(), %message, "type mapping warning");
        self.warnings.push(Warning { kind, message });
    }

    /// Cache a finished mapping. If a recursive resolution already stored
    /// this identity, the earlier mapping wins so callers keep seeing one `Rc`.
    fn store(&mut self, mapping: TypeMapping) -> Rc<TypeMapping> {
        let identity = mapping.identity.clone();
        Rc::clone(self.cache.entry(identity).or_insert_with(|| Rc::new(mapping)))
    }

    fn unresolved(&mut self, identity: &TypeIdentity, reason: &str) -> TypeMapping {
        self.warn(
            WarningKind::UnresolvedType,
            format!("`{identity}`: {reason}"),
        );
        TypeMapping::new(
            identity.clone(),
            placeholder("UNRESOLVED", &identity.to_string()),
            MappingKind::Unresolved,
        )
    }

    fn map_nullable(&mut self, identity: &TypeIdentity) -> TypeMapping {
        let [inner] = identity.args.as_slice() else {
            return self.unresolved(identity, "expected exactly one type argument");
        };
        let inner = self.resolve_identity(inner);
        let name = if inner.kind == MappingKind::Nullable || inner.is_placeholder() {
            inner.name.clone()
        } else {
            self.nullable_style.apply(&inner.name)
        };
        TypeMapping::new(identity.clone(), name, MappingKind::Nullable)
    }

    /// Futures unwrap exactly one layer; the wrapper never reaches the output.
    fn map_future(&mut self, identity: &TypeIdentity) -> TypeMapping {
        let name = match identity.args.as_slice() {
            [] => self.void_name(),
            [inner] if self.table.family(&inner.name) == Some(Family::Future) => {
                self.warn(
                    WarningKind::NestedFuture,
                    format!("`{identity}` wraps another future; resolved as void"),
                );
                self.void_name()
            }
            [inner] => self.resolve_identity(inner).name.clone(),
            _ => return self.unresolved(identity, "expected at most one type argument"),
        };
        TypeMapping::new(identity.clone(), name, MappingKind::Future)
    }

    fn void_name(&mut self) -> String {
        self.resolve_identity(&TypeIdentity::new(VOID)).name.clone()
    }

    fn map_sequence(&mut self, identity: &TypeIdentity) -> TypeMapping {
        let [element] = identity.args.as_slice() else {
            return self.unresolved(identity, "expected exactly one element type");
        };
        let element = self.resolve_identity(element);
        TypeMapping::new(
            identity.clone(),
            format!("Array<{}>", element.name),
            MappingKind::Sequence,
        )
    }

    fn map_dictionary(&mut self, identity: &TypeIdentity) -> TypeMapping {
        let [key, value] = identity.args.as_slice() else {
            return self.unresolved(identity, "expected a key and a value type");
        };

        // Only text and numeric primitives index a TypeScript object. The key
        // is checked before it is resolved so a rejected key declares nothing.
        let table = self.table;
        if !matches!(table.primitive(key), Some("string" | "number")) {
            self.warn(
                WarningKind::UnsupportedKeyType,
                format!("`{identity}`: key type `{key}` is neither text nor numeric"),
            );
            return TypeMapping::new(
                identity.clone(),
                placeholder("UNSUPPORTED KEY", &identity.to_string()),
                MappingKind::UnsupportedKey,
            );
        }

        let value = self.resolve_identity(value);
        if !self.uses_dictionary {
            debug!(%identity, "first dictionary of the run");
            self.uses_dictionary = true;
        }
        TypeMapping::new(
            identity.clone(),
            format!("IDictionary<{}>", value.name),
            MappingKind::Map,
        )
    }

    fn map_tuple(&mut self, identity: &TypeIdentity) -> TypeMapping {
        if identity.args.is_empty() {
            return self.unresolved(identity, "tuple without elements");
        }
        let elements: Vec<String> = identity
            .args
            .iter()
            .map(|arg| self.resolve_identity(arg).name.clone())
            .collect();
        self.tuple_arities.insert(elements.len());
        TypeMapping::new(
            identity.clone(),
            format!("Tuple{}<{}>", elements.len(), elements.join(", ")),
            MappingKind::Tuple,
        )
    }

    /// Enums, records and anything else the resolver has to describe.
    fn map_declared(&mut self, identity: &TypeIdentity) -> Rc<TypeMapping> {
        if identity.is_generic() {
            // Every instantiation shares its definition's declaration.
            let open = self.resolve_identity(&identity.open());
            let alias = TypeMapping::new(identity.clone(), open.name.clone(), open.kind);
            return self.store(alias);
        }

        let resolver = self.resolver;
        let Some(decl) = resolver.declaration(identity) else {
            let mapping = self.unresolved(identity, "no declaration is known");
            return self.store(mapping);
        };

        match decl.kind {
            DeclKind::Enum => {
                let mapping = self.store(TypeMapping::declared(
                    identity.clone(),
                    identity.simple_name(),
                    MappingKind::Enum,
                    render_enum(identity.simple_name(), &decl.enumerators),
                ));
                self.declarations.push(Rc::clone(&mapping));
                mapping
            }
            DeclKind::Class | DeclKind::Struct | DeclKind::Interface => {
                self.map_record(identity, decl)
            }
        }
    }

    fn map_record(&mut self, identity: &TypeIdentity, decl: &TypeDeclaration) -> Rc<TypeMapping> {
        let name = identity.simple_name().to_string();
        // Cached before the members are visited so that self and mutual
        // references resolve to the name form instead of recursing.
        let mapping = self.store(TypeMapping::new(
            identity.clone(),
            name.clone(),
            MappingKind::Record,
        ));

        let mut body = format!("interface {name} {{\n");
        for member in decl
            .members
            .iter()
            .filter(|m| m.is_data() && m.is_public() && !m.is_static)
        {
            let member_type = match &member.ty {
                Some(ty) => self.resolve(&erase_type_params(ty, &decl.type_params)).name.clone(),
                None => {
                    let text = format!("{}.{}", decl.name, member.name);
                    self.warn(WarningKind::UnresolvedType, format!("`{text}` has no type"));
                    placeholder("UNRESOLVED", &text)
                }
            };
            body.push_str(&format!("    {}: {};\n", member.name, member_type));
        }
        body.push('}');

        let _ = mapping.declaration.set(body);
        self.declarations.push(Rc::clone(&mapping));
        mapping
    }
}

/// Replace an open definition's own type parameters with `object`, which
/// maps to `any`, keeping the wrapper shape around them.
fn erase_type_params(ty: &TypeRef, params: &[String]) -> TypeRef {
    if params.is_empty() {
        return ty.clone();
    }
    match ty {
        TypeRef::Named { name, args } if args.is_empty() && params.contains(name) => {
            TypeRef::named(OBJECT)
        }
        TypeRef::Named { name, args } => TypeRef::generic(
            name.clone(),
            args.iter().map(|a| erase_type_params(a, params)).collect(),
        ),
        TypeRef::Nullable(inner) => TypeRef::nullable(erase_type_params(inner, params)),
        TypeRef::Array(element) => TypeRef::array(erase_type_params(element, params)),
        TypeRef::Tuple(elements) => TypeRef::tuple(
            elements.iter().map(|e| erase_type_params(e, params)).collect(),
        ),
    }
}

fn render_enum(name: &str, enumerators: &[String]) -> String {
    let mut out = format!("enum {name} {{\n");
    for (i, enumerator) in enumerators.iter().enumerate() {
        out.push_str("    ");
        out.push_str(enumerator);
        if i + 1 < enumerators.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::Member;
    use crate::error::ResolveError;
    use std::collections::HashMap;

    /// Resolves references by exact full name against a fixed set of
    /// declarations; framework names are accepted as written.
    #[derive(Default)]
    struct FakeResolver {
        decls: HashMap<String, TypeDeclaration>,
    }

    impl FakeResolver {
        fn with(mut self, decl: TypeDeclaration) -> Self {
            self.decls.insert(decl.name.clone(), decl);
            self
        }
    }

    impl TypeResolver for FakeResolver {
        fn resolve(&self, ty: &TypeRef) -> Result<TypeIdentity, ResolveError> {
            match ty {
                TypeRef::Named { name, args } if name != "Missing" => Ok(TypeIdentity::generic(
                    name.clone(),
                    args.iter().map(|a| self.resolve(a)).collect::<Result<_, _>>()?,
                )),
                TypeRef::Named { name, .. } => Err(ResolveError::UnknownSymbol(name.clone())),
                TypeRef::Nullable(inner) => Ok(TypeIdentity::generic(
                    crate::identity::NULLABLE,
                    vec![self.resolve(inner)?],
                )),
                TypeRef::Array(element) => Ok(TypeIdentity::generic(
                    crate::identity::ARRAY,
                    vec![self.resolve(element)?],
                )),
                TypeRef::Tuple(elements) => Ok(TypeIdentity::generic(
                    crate::identity::VALUE_TUPLE,
                    elements.iter().map(|e| self.resolve(e)).collect::<Result<_, _>>()?,
                )),
            }
        }

        fn declaration(&self, identity: &TypeIdentity) -> Option<&TypeDeclaration> {
            self.decls.get(&identity.name)
        }
    }

    fn id(name: &str) -> TypeIdentity {
        TypeIdentity::new(name)
    }

    fn generic(name: &str, args: Vec<TypeIdentity>) -> TypeIdentity {
        TypeIdentity::generic(name, args)
    }

    fn r(text: &str) -> TypeRef {
        text.parse().unwrap()
    }

    #[test]
    fn primitives_come_from_the_table() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default();
        let mut registry = TypeRegistry::new(&table, &resolver);

        let int = registry.resolve_identity(&id("System.Int32"));
        assert_eq!(int.name, "number");
        assert_eq!(int.kind, MappingKind::Primitive);
        assert_eq!(int.declaration(), "");
        assert_eq!(registry.resolve(&r("System.String")).name, "string");
        assert_eq!(registry.resolve(&r("System.Void")).name, "void");
    }

    #[test]
    fn repeated_resolution_returns_the_same_mapping() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default().with(
            TypeDeclaration::class("Chat.User")
                .with_member(Member::property("Name", r("System.String")).public()),
        );
        let mut registry = TypeRegistry::new(&table, &resolver);

        let first = registry.resolve(&r("Chat.User"));
        let second = registry.resolve(&r("Chat.User"));
        assert!(Rc::ptr_eq(&first, &second));

        let list_a = registry.resolve(&r("System.Collections.Generic.List<Chat.User>"));
        let list_b = registry.resolve(&r("System.Collections.Generic.List<Chat.User>"));
        assert!(Rc::ptr_eq(&list_a, &list_b));

        let pending = registry.take_pending_declarations();
        assert_eq!(pending.len(), 1);
        assert!(registry.take_pending_declarations().is_empty());
    }

    #[test]
    fn nullable_marker_is_applied_once() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default();
        let mut registry = TypeRegistry::new(&table, &resolver);

        assert_eq!(registry.resolve(&r("System.Int32?")).name, "number?");
        assert_eq!(registry.resolve(&r("System.Int32??")).name, "number?");

        let nested = generic(
            crate::identity::NULLABLE,
            vec![generic(crate::identity::NULLABLE, vec![id("System.Int32")])],
        );
        assert_eq!(registry.resolve_identity(&nested).name, "number?");
    }

    #[test]
    fn nullable_union_style() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default();
        let mut registry =
            TypeRegistry::new(&table, &resolver).with_nullable_style(NullableStyle::Union);
        assert_eq!(registry.resolve(&r("System.Int32?")).name, "number | null");
        assert_eq!(registry.resolve(&r("System.Int32??")).name, "number | null");
    }

    #[test]
    fn futures_unwrap_one_layer() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default();
        let mut registry = TypeRegistry::new(&table, &resolver);

        assert_eq!(registry.resolve(&r("System.Threading.Tasks.Task")).name, "void");
        assert_eq!(
            registry
                .resolve(&r("System.Threading.Tasks.Task<System.Int32>"))
                .name,
            "number"
        );
        assert_eq!(
            registry
                .resolve(&r("System.Threading.Tasks.ValueTask<System.String[]>"))
                .name,
            "Array<string>"
        );
        assert!(registry.warnings().is_empty());

        let nested = registry.resolve(&r(
            "System.Threading.Tasks.Task<System.Threading.Tasks.Task<System.Int32>>",
        ));
        assert_eq!(nested.name, "void");
        assert_eq!(registry.warnings()[0].kind, WarningKind::NestedFuture);
    }

    #[test]
    fn sequences() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default();
        let mut registry = TypeRegistry::new(&table, &resolver);

        assert_eq!(registry.resolve(&r("System.Int32[]")).name, "Array<number>");
        assert_eq!(
            registry
                .resolve(&r("System.Collections.Generic.IEnumerable<System.Int32?[]>"))
                .name,
            "Array<Array<number?>>"
        );
        assert_eq!(registry.resolve(&r("System.Byte[]")).name, "string");
    }

    #[test]
    fn dictionaries_need_text_or_numeric_keys() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default().with(TypeDeclaration::class("Chat.User"));
        let mut registry = TypeRegistry::new(&table, &resolver);

        let ok = registry.resolve(&r(
            "System.Collections.Generic.Dictionary<System.String, System.Int32>",
        ));
        assert_eq!(ok.name, "IDictionary<number>");
        assert_eq!(ok.kind, MappingKind::Map);
        assert!(registry.uses_dictionary());

        let numeric = registry.resolve(&r(
            "System.Collections.Generic.IDictionary<System.Int64, System.Boolean>",
        ));
        assert_eq!(numeric.name, "IDictionary<boolean>");

        let bad = registry.resolve(&r(
            "System.Collections.Generic.Dictionary<Chat.User, System.Int32>",
        ));
        assert_eq!(bad.kind, MappingKind::UnsupportedKey);
        assert!(bad.is_placeholder());
        assert!(bad.name.contains("UNSUPPORTED KEY"));
        assert_eq!(registry.warnings().len(), 1);
        assert_eq!(registry.warnings()[0].kind, WarningKind::UnsupportedKeyType);
    }

    #[test]
    fn rejected_record_keys_are_not_declared() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default().with(
            TypeDeclaration::class("Chat.Secret")
                .with_member(Member::property("Value", r("System.String")).public()),
        );
        let mut registry = TypeRegistry::new(&table, &resolver);

        let bad = registry.resolve(&r(
            "System.Collections.Generic.Dictionary<Chat.Secret, System.String>",
        ));
        assert_eq!(bad.kind, MappingKind::UnsupportedKey);
        assert!(registry.take_pending_declarations().is_empty());

        let enum_key = FakeResolver::default()
            .with(TypeDeclaration::enumeration("Chat.Mood", ["Happy"]));
        let mut registry = TypeRegistry::new(&table, &enum_key);
        registry.resolve(&r("System.Collections.Generic.Dictionary<Chat.Mood, System.Int32>"));
        assert!(registry.take_pending_declarations().is_empty());
        assert_eq!(registry.warnings()[0].kind, WarningKind::UnsupportedKeyType);
    }

    #[test]
    fn rejected_dictionary_alone_does_not_require_the_shape() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default();
        let mut registry = TypeRegistry::new(&table, &resolver);

        registry.resolve(&r(
            "System.Collections.Generic.Dictionary<System.Boolean, System.Int32>",
        ));
        assert!(!registry.uses_dictionary());
    }

    #[test]
    fn tuples_record_their_arity() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default();
        let mut registry = TypeRegistry::new(&table, &resolver);

        assert_eq!(
            registry.resolve(&r("(System.Int32, System.String)")).name,
            "Tuple2<number, string>"
        );
        assert_eq!(
            registry
                .resolve(&r("System.Tuple<System.Boolean, System.Int32, System.Int32>"))
                .name,
            "Tuple3<boolean, number, number>"
        );
        registry.resolve(&r("(System.Double, System.Double)"));
        assert_eq!(registry.tuple_arities().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn enums_declare_enumerators_in_order() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default().with(TypeDeclaration::enumeration(
            "Chat.Mood",
            ["Happy", "Sad", "Indifferent"],
        ));
        let mut registry = TypeRegistry::new(&table, &resolver);

        let mood = registry.resolve(&r("Chat.Mood"));
        assert_eq!(mood.name, "Mood");
        assert_eq!(
            mood.declaration(),
            "enum Mood {\n    Happy,\n    Sad,\n    Indifferent\n}"
        );
    }

    #[test]
    fn records_list_public_instance_data() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default().with(
            TypeDeclaration::class("Chat.Message")
                .with_member(Member::property("Text", r("System.String")).public())
                .with_member(Member::field("SentAt", r("System.DateTime?")).public())
                .with_member(Member::field("secret", r("System.String")))
                .with_member(Member::property("Count", r("System.Int32")).public().as_static())
                .with_member(Member::method("Format", Some(r("System.String")), vec![]).public()),
        );
        let mut registry = TypeRegistry::new(&table, &resolver);

        let message = registry.resolve(&r("Chat.Message"));
        assert_eq!(
            message.declaration(),
            "interface Message {\n    Text: string;\n    SentAt: string?;\n}"
        );
    }

    #[test]
    fn self_referencing_record_terminates() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default().with(
            TypeDeclaration::class("Chat.Node")
                .with_member(Member::property("Value", r("System.Int32")).public())
                .with_member(Member::property("Next", r("Chat.Node")).public()),
        );
        let mut registry = TypeRegistry::new(&table, &resolver);

        let node = registry.resolve(&r("Chat.Node"));
        let declaration = node.declaration();
        assert_eq!(declaration.matches("Next: Node;").count(), 1);
        assert_eq!(
            declaration,
            "interface Node {\n    Value: number;\n    Next: Node;\n}"
        );
        assert!(Rc::ptr_eq(&node, &registry.resolve(&r("Chat.Node"))));
    }

    #[test]
    fn mutually_recursive_records_complete_dependencies_first() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default()
            .with(
                TypeDeclaration::class("Chat.Room").with_member(
                    Member::property("Members", r("System.Collections.Generic.List<Chat.User>"))
                        .public(),
                ),
            )
            .with(
                TypeDeclaration::class("Chat.User")
                    .with_member(Member::property("Room", r("Chat.Room")).public()),
            );
        let mut registry = TypeRegistry::new(&table, &resolver);

        registry.resolve(&r("Chat.Room"));
        let pending = registry.take_pending_declarations();
        let names: Vec<&str> = pending.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["User", "Room"]);
        assert!(pending[0].declaration().contains("Room: Room;"));
        assert!(pending[1].declaration().contains("Members: Array<User>;"));
    }

    #[test]
    fn generic_instantiations_share_the_definition() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default().with(
            TypeDeclaration::class("Chat.Page")
                .with_member(Member::property("Total", r("System.Int32")).public()),
        );
        let mut registry = TypeRegistry::new(&table, &resolver);

        assert_eq!(registry.resolve(&r("Chat.Page<System.Int32>")).name, "Page");
        assert_eq!(registry.resolve(&r("Chat.Page<System.String>")).name, "Page");
        assert_eq!(registry.take_pending_declarations().len(), 1);
    }

    #[test]
    fn own_type_parameters_map_to_any_inside_wrappers() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default().with(
            TypeDeclaration::class("Chat.Page")
                .with_type_params(["T"])
                .with_member(
                    Member::property("Items", r("System.Collections.Generic.List<T>")).public(),
                )
                .with_member(Member::property("Current", r("T?")).public())
                .with_member(Member::property("Total", r("System.Int32")).public()),
        );
        let mut registry = TypeRegistry::new(&table, &resolver);

        let page = registry.resolve(&r("Chat.Page<System.String>"));
        assert_eq!(page.name, "Page");
        let pending = registry.take_pending_declarations();
        assert_eq!(
            pending[0].declaration(),
            "interface Page {\n    Items: Array<any>;\n    Current: any?;\n    Total: number;\n}"
        );
        assert!(registry.warnings().is_empty());
    }

    #[test]
    fn unknown_types_become_visible_placeholders() {
        let table = MappingTable::standard();
        let resolver = FakeResolver::default();
        let mut registry = TypeRegistry::new(&table, &resolver);

        let missing = registry.resolve(&r("Missing"));
        assert_eq!(missing.kind, MappingKind::Unresolved);
        assert_eq!(missing.name, "any /* UNRESOLVED: Missing */");

        let undeclared = registry.resolve(&r("Chat.Ghost"));
        assert_eq!(undeclared.name, "any /* UNRESOLVED: Chat.Ghost */");

        let wrapped = registry.resolve(&r("System.Collections.Generic.List<Chat.Ghost>"));
        assert_eq!(wrapped.name, "Array<any /* UNRESOLVED: Chat.Ghost */>");

        assert_eq!(registry.warnings().len(), 2);
        assert!(registry
            .warnings()
            .iter()
            .all(|w| w.kind == WarningKind::UnresolvedType));
    }
}
