//! A model-backed [`TypeResolver`].
//!
//! The catalog stands in for the host's semantic model: it knows the
//! declarations loaded from a JSON model plus the framework types the
//! [`MappingTable`] covers, and resolves names the way C# name lookup would
//! for the common cases (keywords, full names, `using` namespaces, unique
//! simple names).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::decl::TypeDeclaration;
use crate::error::{ModelError, ResolveError};
use crate::identity::{
    simple_name, TypeIdentity, TypeRef, TypeResolver, ARRAY, NULLABLE, VALUE_TUPLE,
};
use crate::table::{Family, MappingTable};

/// C# keyword aliases for framework types.
const KEYWORDS: &[(&str, &str)] = &[
    ("bool", "System.Boolean"),
    ("byte", "System.Byte"),
    ("sbyte", "System.SByte"),
    ("short", "System.Int16"),
    ("ushort", "System.UInt16"),
    ("int", "System.Int32"),
    ("uint", "System.UInt32"),
    ("long", "System.Int64"),
    ("ulong", "System.UInt64"),
    ("float", "System.Single"),
    ("double", "System.Double"),
    ("decimal", "System.Decimal"),
    ("string", "System.String"),
    ("char", "System.Char"),
    ("object", "System.Object"),
    ("dynamic", "System.Object"),
    ("void", "System.Void"),
];

/// Whether an external name may be used with type arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    Plain,
    Generic,
    Any,
}

impl Arity {
    fn accepts(self, generic: bool) -> bool {
        match self {
            Arity::Plain => !generic,
            Arity::Generic => generic,
            Arity::Any => true,
        }
    }
}

/// On-disk model format.
#[derive(Debug, Deserialize)]
struct ModelFile {
    #[serde(default)]
    usings: Vec<String>,
    #[serde(default)]
    types: Vec<TypeDeclaration>,
}

#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: IndexMap<String, TypeDeclaration>,
    usings: Vec<String>,
    external: HashMap<String, Arity>,
    by_simple: HashMap<String, Vec<String>>,
}

impl TypeCatalog {
    /// An empty catalog that knows the table's framework types.
    pub fn new(table: &MappingTable) -> Self {
        let mut catalog = Self::default();
        for name in table.primitive_names() {
            catalog.add_external(name, Arity::Plain);
        }
        for name in table.family_names() {
            // `Task` stands alone as well as wrapping a result
            let arity = match table.family(name) {
                Some(Family::Future) => Arity::Any,
                _ => Arity::Generic,
            };
            catalog.add_external(name, arity);
        }
        catalog
    }

    /// Parse a JSON model: `{ "usings": [...], "types": [...] }`.
    pub fn from_json(text: &str, table: &MappingTable) -> Result<Self, ModelError> {
        let model: ModelFile = serde_json::from_str(text)?;
        let mut catalog = Self::new(table);
        catalog.usings = model.usings;
        for decl in model.types {
            catalog.insert(decl)?;
        }
        Ok(catalog)
    }

    pub fn load(path: &Path, table: &MappingTable) -> Result<Self, ModelError> {
        let text = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text, table)
    }

    pub fn insert(&mut self, decl: TypeDeclaration) -> Result<(), ModelError> {
        if self.types.contains_key(&decl.name) {
            return Err(ModelError::Duplicate(decl.name));
        }
        self.index(&decl.name);
        self.types.insert(decl.name.clone(), decl);
        Ok(())
    }

    /// Accept an external type (e.g. a hub base class) with or without
    /// type arguments.
    pub fn add_known_type(&mut self, name: &str) {
        self.add_external(name, Arity::Any);
    }

    pub fn add_using(&mut self, namespace: impl Into<String>) {
        self.usings.push(namespace.into());
    }

    pub fn declarations(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.types.values()
    }

    /// Find a declaration by full name or by unique simple name.
    pub fn get(&self, name: &str) -> Option<&TypeDeclaration> {
        if let Some(decl) = self.types.get(name) {
            return Some(decl);
        }
        let mut matches = self.types.values().filter(|d| d.simple_name() == name);
        match (matches.next(), matches.next()) {
            (Some(decl), None) => Some(decl),
            _ => None,
        }
    }

    fn add_external(&mut self, name: &str, arity: Arity) {
        if self.external.insert(name.to_string(), arity).is_none() {
            self.index(name);
        }
    }

    fn index(&mut self, full: &str) {
        self.by_simple
            .entry(simple_name(full).to_string())
            .or_default()
            .push(full.to_string());
    }

    fn is_known(&self, full: &str, generic: bool) -> bool {
        self.types.contains_key(full)
            || self
                .external
                .get(full)
                .is_some_and(|arity| arity.accepts(generic))
    }

    fn lookup(&self, name: &str, generic: bool) -> Result<String, ResolveError> {
        if let Some((_, full)) = KEYWORDS.iter().find(|(keyword, _)| *keyword == name) {
            return Ok(full.to_string());
        }
        if self.is_known(name, generic) {
            return Ok(name.to_string());
        }
        for namespace in &self.usings {
            let candidate = format!("{namespace}.{name}");
            if self.is_known(&candidate, generic) {
                return Ok(candidate);
            }
        }

        let candidates: Vec<&String> = self
            .by_simple
            .get(name)
            .map(|fulls| fulls.iter().filter(|f| self.is_known(f, generic)).collect())
            .unwrap_or_default();
        match candidates.as_slice() {
            [one] => Ok(one.to_string()),
            // the host is authoritative for qualified names it hasn't described
            [] if name.contains('.') => Ok(name.to_string()),
            [] => Err(ResolveError::UnknownSymbol(name.to_string())),
            many => {
                let mut candidates: Vec<String> = many.iter().map(|s| s.to_string()).collect();
                candidates.sort();
                Err(ResolveError::Ambiguous {
                    name: name.to_string(),
                    candidates,
                })
            }
        }
    }

    fn resolve_all(&self, refs: &[TypeRef]) -> Result<Vec<TypeIdentity>, ResolveError> {
        refs.iter().map(|r| self.resolve(r)).collect()
    }
}

impl TypeResolver for TypeCatalog {
    fn resolve(&self, ty: &TypeRef) -> Result<TypeIdentity, ResolveError> {
        match ty {
            TypeRef::Named { name, args } => {
                let full = self.lookup(name, !args.is_empty())?;
                Ok(TypeIdentity::generic(full, self.resolve_all(args)?))
            }
            TypeRef::Nullable(inner) => Ok(TypeIdentity::generic(
                NULLABLE,
                vec![self.resolve(inner)?],
            )),
            TypeRef::Array(element) => Ok(TypeIdentity::generic(
                ARRAY,
                vec![self.resolve(element)?],
            )),
            TypeRef::Tuple(elements) => Ok(TypeIdentity::generic(
                VALUE_TUPLE,
                self.resolve_all(elements)?,
            )),
        }
    }

    fn declaration(&self, identity: &TypeIdentity) -> Option<&TypeDeclaration> {
        self.types.get(&identity.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::DeclKind;

    fn r(text: &str) -> TypeRef {
        text.parse().unwrap()
    }

    fn catalog() -> TypeCatalog {
        let table = MappingTable::standard();
        let mut catalog = TypeCatalog::new(&table);
        catalog.insert(TypeDeclaration::class("Chat.Models.Message")).unwrap();
        catalog
    }

    #[test]
    fn keywords_resolve_to_framework_names() {
        let catalog = catalog();
        assert_eq!(
            catalog.resolve(&r("int")).unwrap(),
            TypeIdentity::new("System.Int32")
        );
        assert_eq!(
            catalog.resolve(&r("string?")).unwrap(),
            TypeIdentity::generic(NULLABLE, vec![TypeIdentity::new("System.String")])
        );
    }

    #[test]
    fn simple_names_resolve_when_unique() {
        let catalog = catalog();
        assert_eq!(
            catalog.resolve(&r("List<Message>")).unwrap(),
            TypeIdentity::generic(
                "System.Collections.Generic.List",
                vec![TypeIdentity::new("Chat.Models.Message")]
            )
        );
        assert_eq!(
            catalog.resolve(&r("Task")).unwrap(),
            TypeIdentity::new("System.Threading.Tasks.Task")
        );
    }

    #[test]
    fn argument_count_disambiguates_framework_names() {
        let catalog = catalog();
        assert_eq!(
            catalog.resolve(&r("IEnumerable")).unwrap().name,
            "System.Collections.IEnumerable"
        );
        assert_eq!(
            catalog.resolve(&r("IEnumerable<int>")).unwrap().name,
            "System.Collections.Generic.IEnumerable"
        );
    }

    #[test]
    fn usings_are_searched_in_order() {
        let mut catalog = catalog();
        catalog.insert(TypeDeclaration::class("Other.Message")).unwrap();
        assert!(matches!(
            catalog.resolve(&r("Message")),
            Err(ResolveError::Ambiguous { .. })
        ));

        catalog.add_using("Other");
        assert_eq!(catalog.resolve(&r("Message")).unwrap().name, "Other.Message");
    }

    #[test]
    fn unknown_names() {
        let catalog = catalog();
        assert_eq!(
            catalog.resolve(&r("Widget")),
            Err(ResolveError::UnknownSymbol("Widget".into()))
        );
        // qualified names are taken at face value
        assert_eq!(
            catalog.resolve(&r("Vendor.Widget")).unwrap(),
            TypeIdentity::new("Vendor.Widget")
        );
        assert!(catalog.declaration(&TypeIdentity::new("Vendor.Widget")).is_none());
    }

    #[test]
    fn tuples_and_arrays() {
        let catalog = catalog();
        assert_eq!(
            catalog.resolve(&r("(int, Message)[]")).unwrap().to_string(),
            "System.Array<System.ValueTuple<System.Int32, Chat.Models.Message>>"
        );
    }

    #[test]
    fn loads_json_models() {
        let json = r#"{
            "usings": ["Microsoft.AspNetCore.SignalR"],
            "types": [
                { "name": "Chat.Mood", "kind": "enum", "enumerators": ["Happy", "Sad"] },
                {
                    "name": "Chat.ChatHub",
                    "kind": "class",
                    "base": "Hub",
                    "members": [
                        { "name": "Send", "kind": "method", "visibility": "public",
                          "params": [{ "name": "mood", "type": "Mood" }] }
                    ]
                }
            ]
        }"#;
        let table = MappingTable::standard();
        let mut catalog = TypeCatalog::from_json(json, &table).unwrap();
        catalog.add_known_type("Microsoft.AspNetCore.SignalR.Hub");

        assert_eq!(catalog.declarations().count(), 2);
        let hub = catalog.get("ChatHub").unwrap();
        assert_eq!(hub.kind, DeclKind::Class);
        assert_eq!(
            catalog.resolve(hub.base.as_ref().unwrap()).unwrap().name,
            "Microsoft.AspNetCore.SignalR.Hub"
        );
        assert_eq!(catalog.get("Mood").unwrap().enumerators, vec!["Happy", "Sad"]);
    }

    #[test]
    fn duplicate_declarations_are_rejected() {
        let json = r#"{ "types": [
            { "name": "Chat.A", "kind": "class" },
            { "name": "Chat.A", "kind": "struct" }
        ] }"#;
        let err = TypeCatalog::from_json(json, &MappingTable::standard()).unwrap_err();
        assert!(matches!(err, ModelError::Duplicate(name) if name == "Chat.A"));
    }
}
