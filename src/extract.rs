//! Method signature extraction from hub and client-contract declarations.

use crate::decl::{DeclKind, Member, MemberKind, TypeDeclaration};
use crate::identity::{TypeIdentity, VOID};
use crate::registry::TypeRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameter {
    pub name: String,
    /// Target name form.
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    /// Target name form of the (unwrapped) return type.
    pub return_type: String,
    pub params: Vec<MethodParameter>,
}

/// Public methods of a hub, in declaration order.
///
/// Overloads are kept as separate signatures.
pub fn extract(decl: &TypeDeclaration, registry: &mut TypeRegistry<'_>) -> Vec<MethodSignature> {
    decl.members
        .iter()
        .filter(|m| is_method(m) && m.is_public())
        .map(|m| signature(m, registry))
        .collect()
}

/// Callback methods of a client contract.
///
/// Interface members are implicitly public, so every instance method of an
/// interface contract qualifies; class contracts follow the public rule.
/// Static members are never callbacks.
pub fn extract_client(
    contract: &TypeDeclaration,
    registry: &mut TypeRegistry<'_>,
) -> Vec<MethodSignature> {
    let implicitly_public = contract.kind == DeclKind::Interface;
    contract
        .members
        .iter()
        .filter(|m| is_method(m) && !m.is_static && (implicitly_public || m.is_public()))
        .map(|m| signature(m, registry))
        .collect()
}

fn is_method(member: &Member) -> bool {
    member.kind == MemberKind::Method
}

fn signature(member: &Member, registry: &mut TypeRegistry<'_>) -> MethodSignature {
    let return_type = match &member.ty {
        Some(ty) => registry.resolve(ty),
        None => registry.resolve_identity(&TypeIdentity::new(VOID)),
    };
    let params = member
        .params
        .iter()
        .map(|p| MethodParameter {
            name: p.name.clone(),
            ty: registry.resolve(&p.ty).name.clone(),
        })
        .collect();

    MethodSignature {
        name: member.name.clone(),
        return_type: return_type.name.clone(),
        params,
    }
}
