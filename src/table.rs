//! The constant part of type mapping: primitive correspondences and the
//! well-known wrapper families.
//!
//! A [`MappingTable`] is built once and borrowed by every
//! [`TypeRegistry`](crate::registry::TypeRegistry); registries never mutate it.

use std::collections::HashMap;

use crate::identity::{TypeIdentity, ARRAY, NULLABLE, OBJECT, VALUE_TUPLE, VOID};

/// Compound source types the registry knows how to unwrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// `Nullable<T>`
    Nullable,
    /// `Task`, `Task<T>`, `ValueTask<T>`
    Future,
    /// Arrays, lists, sets and enumerables of `T`.
    Sequence,
    /// Dictionaries keyed by `K`.
    Map,
    /// `Tuple<...>` and `ValueTuple<...>`
    Tuple,
}

const PRIMITIVES: &[(&str, &str)] = &[
    (VOID, "void"),
    (OBJECT, "any"),
    ("System.Boolean", "boolean"),
    // numbers
    ("System.Byte", "number"),
    ("System.SByte", "number"),
    ("System.Int16", "number"),
    ("System.UInt16", "number"),
    ("System.Int32", "number"),
    ("System.UInt32", "number"),
    ("System.Int64", "number"),
    ("System.UInt64", "number"),
    ("System.Single", "number"),
    ("System.Double", "number"),
    ("System.Decimal", "number"),
    // serialized as JSON strings
    ("System.String", "string"),
    ("System.Char", "string"),
    ("System.DateTime", "string"),
    ("System.DateTimeOffset", "string"),
    ("System.TimeSpan", "string"),
    ("System.Guid", "string"),
    ("System.Uri", "string"),
    ("System.Type", "string"),
    ("System.Exception", "string"),
    // untyped payloads
    ("System.Collections.IEnumerable", "Array<any>"),
    ("System.Collections.ArrayList", "Array<any>"),
    ("Newtonsoft.Json.Linq.JToken", "any"),
    ("Newtonsoft.Json.Linq.JObject", "any"),
    ("Newtonsoft.Json.Linq.JArray", "Array<any>"),
    ("System.Text.Json.JsonElement", "any"),
];

const FAMILIES: &[(&str, Family)] = &[
    (NULLABLE, Family::Nullable),
    ("System.Threading.Tasks.Task", Family::Future),
    ("System.Threading.Tasks.ValueTask", Family::Future),
    (ARRAY, Family::Sequence),
    ("System.Collections.Generic.List", Family::Sequence),
    ("System.Collections.Generic.IList", Family::Sequence),
    ("System.Collections.Generic.IEnumerable", Family::Sequence),
    ("System.Collections.Generic.ICollection", Family::Sequence),
    ("System.Collections.Generic.IReadOnlyList", Family::Sequence),
    ("System.Collections.Generic.IReadOnlyCollection", Family::Sequence),
    ("System.Collections.Generic.HashSet", Family::Sequence),
    ("System.Collections.Generic.ISet", Family::Sequence),
    ("System.Collections.Generic.SortedSet", Family::Sequence),
    ("System.Collections.Generic.LinkedList", Family::Sequence),
    ("System.Collections.Generic.Queue", Family::Sequence),
    ("System.Collections.Generic.Stack", Family::Sequence),
    ("System.Collections.ObjectModel.Collection", Family::Sequence),
    ("System.Collections.ObjectModel.ObservableCollection", Family::Sequence),
    ("System.Collections.ObjectModel.ReadOnlyCollection", Family::Sequence),
    ("System.Collections.Immutable.ImmutableArray", Family::Sequence),
    ("System.Collections.Immutable.ImmutableList", Family::Sequence),
    ("System.Collections.Generic.Dictionary", Family::Map),
    ("System.Collections.Generic.IDictionary", Family::Map),
    ("System.Collections.Generic.IReadOnlyDictionary", Family::Map),
    ("System.Collections.Generic.SortedDictionary", Family::Map),
    ("System.Collections.Generic.SortedList", Family::Map),
    ("System.Collections.Concurrent.ConcurrentDictionary", Family::Map),
    ("System.Collections.Immutable.ImmutableDictionary", Family::Map),
    ("System.Tuple", Family::Tuple),
    (VALUE_TUPLE, Family::Tuple),
];

/// Immutable lookup table shared by every generation run.
#[derive(Debug, Clone)]
pub struct MappingTable {
    primitives: HashMap<TypeIdentity, String>,
    families: HashMap<String, Family>,
}

impl MappingTable {
    /// The built-in .NET -> TypeScript correspondences.
    pub fn standard() -> Self {
        let mut primitives: HashMap<TypeIdentity, String> = PRIMITIVES
            .iter()
            .map(|(name, ts)| (TypeIdentity::new(*name), ts.to_string()))
            .collect();
        // byte[] travels as a base64 string
        primitives.insert(
            TypeIdentity::generic(ARRAY, vec![TypeIdentity::new("System.Byte")]),
            "string".to_string(),
        );

        let families = FAMILIES
            .iter()
            .map(|(name, family)| (name.to_string(), *family))
            .collect();

        Self {
            primitives,
            families,
        }
    }

    /// Add (or override) a primitive correspondence, e.g. from configuration.
    pub fn with_primitive(mut self, identity: TypeIdentity, ts: impl Into<String>) -> Self {
        self.primitives.insert(identity, ts.into());
        self
    }

    pub fn primitive(&self, identity: &TypeIdentity) -> Option<&str> {
        self.primitives.get(identity).map(String::as_str)
    }

    pub fn family(&self, name: &str) -> Option<Family> {
        self.families.get(name).copied()
    }

    /// Names of the non-generic primitives.
    pub fn primitive_names(&self) -> impl Iterator<Item = &str> {
        self.primitives
            .keys()
            .filter(|id| !id.is_generic())
            .map(|id| id.name.as_str())
    }

    /// Names of the generic wrapper types.
    pub fn family_names(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::standard()
    }
}
