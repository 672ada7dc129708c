//! Deciding whether a declaration is a SignalR hub.

use std::collections::HashSet;

use indexmap::IndexSet;
use tracing::debug;

use crate::decl::{DeclKind, TypeDeclaration};
use crate::error::ResolveError;
use crate::identity::{TypeIdentity, TypeRef, TypeResolver, OBJECT};

pub const ASPNET_HUB: &str = "Microsoft.AspNet.SignalR.Hub";
pub const ASPNETCORE_HUB: &str = "Microsoft.AspNetCore.SignalR.Hub";

/// Recognises the framework base types a hub derives from.
pub trait HubTypePredicate {
    fn is_well_known_hub_type(&self, identity: &TypeIdentity) -> bool;
}

/// The SignalR hub base classes, plus any configured extras.
///
/// Matching is by name, so `Hub` and `Hub<T>` both qualify.
#[derive(Debug, Clone)]
pub struct SignalRHubTypes {
    names: IndexSet<String>,
}

impl Default for SignalRHubTypes {
    fn default() -> Self {
        Self {
            names: [ASPNET_HUB, ASPNETCORE_HUB]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl SignalRHubTypes {
    pub fn with_extra<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl HubTypePredicate for SignalRHubTypes {
    fn is_well_known_hub_type(&self, identity: &TypeIdentity) -> bool {
        self.names.contains(&identity.name)
    }
}

/// Walk the base chain to the first well-known hub type.
///
/// Only the head of each base is needed to identify it, so a base whose type
/// arguments the resolver can't place still counts. Stops at `System.Object`,
/// at a base the resolver can't identify or describe, and at a chain that
/// revisits a type.
pub fn hub_base(
    decl: &TypeDeclaration,
    resolver: &dyn TypeResolver,
    predicate: &dyn HubTypePredicate,
) -> Option<TypeIdentity> {
    find_hub_base(decl, resolver, predicate).map(|(identity, _)| identity)
}

fn find_hub_base<'a>(
    decl: &'a TypeDeclaration,
    resolver: &'a dyn TypeResolver,
    predicate: &dyn HubTypePredicate,
) -> Option<(TypeIdentity, &'a TypeRef)> {
    let mut seen = HashSet::new();
    seen.insert(decl.identity());

    let mut base = decl.base.as_ref()?;
    loop {
        let identity = resolve_head(base, resolver)?;
        if predicate.is_well_known_hub_type(&identity) {
            return Some((identity, base));
        }
        if identity.name == OBJECT || !seen.insert(identity.open()) {
            return None;
        }
        base = resolver.declaration(&identity.open())?.base.as_ref()?;
    }
}

fn resolve_head(base: &TypeRef, resolver: &dyn TypeResolver) -> Option<TypeIdentity> {
    match resolver.resolve(base) {
        Ok(identity) => Some(identity),
        Err(err) => match base {
            TypeRef::Named { name, args } if !args.is_empty() => {
                debug!(%base, %err, "base arguments unresolved, identifying by name");
                resolver.resolve(&TypeRef::named(name.clone())).ok()
            }
            _ => None,
        },
    }
}

pub fn is_hub_declaration(
    decl: &TypeDeclaration,
    resolver: &dyn TypeResolver,
    predicate: &dyn HubTypePredicate,
) -> bool {
    decl.kind == DeclKind::Class && hub_base(decl, resolver, predicate).is_some()
}

/// The declaration describing the hub's client callbacks.
///
/// An explicit `client_contract` wins; otherwise the `T` of a `Hub<T>` base.
/// A contract the resolver can't identify is an error.
pub fn client_contract_of(
    decl: &TypeDeclaration,
    resolver: &dyn TypeResolver,
    predicate: &dyn HubTypePredicate,
) -> Result<Option<TypeIdentity>, ResolveError> {
    if let Some(contract) = &decl.client_contract {
        return resolver.resolve(contract).map(Some);
    }
    match find_hub_base(decl, resolver, predicate) {
        Some((_, TypeRef::Named { args, .. })) if args.len() == 1 => {
            resolver.resolve(&args[0]).map(Some)
        }
        _ => Ok(None),
    }
}
