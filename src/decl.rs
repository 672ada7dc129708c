//! Declaration handles supplied by the host: hubs, records, enums and client contracts.

use serde::{Deserialize, Serialize};

use crate::identity::{simple_name, TypeIdentity, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    /// C# default for class members.
    #[default]
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Method,
    Property,
    Field,
    Constructor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Class,
    Struct,
    Interface,
    Enum,
}

/// A method parameter: `string message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A member of a type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Return type for methods, value type for fields and properties.
    /// A method without one returns `void`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Parameter>,
}

impl Member {
    pub fn method(name: impl Into<String>, returns: Option<TypeRef>, params: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Method,
            visibility: Visibility::Private,
            is_static: false,
            ty: returns,
            params,
        }
    }

    pub fn property(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Property,
            visibility: Visibility::Private,
            is_static: false,
            ty: Some(ty),
            params: Vec::new(),
        }
    }

    pub fn field(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            kind: MemberKind::Field,
            ..Self::property(name, ty)
        }
    }

    pub fn public(mut self) -> Self {
        self.visibility = Visibility::Public;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Fields and properties carry data; methods and constructors don't.
    pub fn is_data(&self) -> bool {
        matches!(self.kind, MemberKind::Field | MemberKind::Property)
    }
}

/// A type declaration handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    /// Fully-qualified name, e.g. `Chat.Hubs.ChatHub`.
    pub name: String,
    pub kind: DeclKind,
    /// Generic parameter names of an open definition, e.g. `T` of `Page<T>`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
    /// Enumerator names, in declaration order (enums only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enumerators: Vec<String>,
    /// `[HubName("...")]` override for the client-side proxy property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_name: Option<String>,
    /// Interface declaring the hub -> client callbacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_contract: Option<TypeRef>,
}

impl TypeDeclaration {
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            base: None,
            members: Vec::new(),
            enumerators: Vec::new(),
            hub_name: None,
            client_contract: None,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, DeclKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, DeclKind::Interface)
    }

    pub fn enumeration<I, S>(name: impl Into<String>, enumerators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enumerators: enumerators.into_iter().map(Into::into).collect(),
            ..Self::new(name, DeclKind::Enum)
        }
    }

    pub fn with_type_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_base(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_hub_name(mut self, name: impl Into<String>) -> Self {
        self.hub_name = Some(name.into());
        self
    }

    pub fn with_client_contract(mut self, contract: TypeRef) -> Self {
        self.client_contract = Some(contract);
        self
    }

    pub fn identity(&self) -> TypeIdentity {
        TypeIdentity::new(self.name.clone())
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_member_with_string_types() {
        let json = r#"{
            "name": "Send",
            "kind": "method",
            "visibility": "public",
            "type": "Task<int?>",
            "params": [{ "name": "message", "type": "string" }]
        }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.kind, MemberKind::Method);
        assert!(member.is_public());
        assert!(!member.is_static);
        assert_eq!(member.ty.unwrap().to_string(), "Task<int?>");
        assert_eq!(member.params[0].ty, TypeRef::named("string"));
    }

    #[test]
    fn members_default_to_private() {
        let json = r#"{ "name": "secret", "kind": "field", "type": "int" }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.visibility, Visibility::Private);
        assert!(member.is_data());
    }

    #[test]
    fn invalid_type_text_is_a_deserialization_error() {
        let json = r#"{ "name": "x", "kind": "field", "type": "List<" }"#;
        assert!(serde_json::from_str::<Member>(json).is_err());
    }

    #[test]
    fn declaration_simple_name() {
        let decl = TypeDeclaration::class("Chat.Hubs.ChatHub");
        assert_eq!(decl.simple_name(), "ChatHub");
        assert_eq!(decl.identity(), TypeIdentity::new("Chat.Hubs.ChatHub"));
    }
}
