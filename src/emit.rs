//! TypeScript text generation for hub interfaces and the document around them.
//!
//! Everything here is pure string building: signatures and declaration
//! forms come in already resolved, text goes out.

use crate::extract::MethodSignature;

const INDENT: &str = "    ";

/// How a method's return type is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnStyle {
    /// `IPromise<R>`: server methods are invoked asynchronously.
    Promise,
    /// `R`: client callbacks are implemented by the page.
    Plain,
}

pub fn server_interface_name(hub: &str) -> String {
    format!("I{hub}")
}

pub fn client_interface_name(hub: &str) -> String {
    format!("I{hub}Client")
}

pub fn proxy_interface_name(hub: &str) -> String {
    format!("I{hub}Proxy")
}

/// Lowercase the first character, the way the JavaScript proxies name hubs
/// and hub methods.
pub fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `send(name: string, message: string): IPromise<void>`
pub fn render_signature(signature: &MethodSignature, style: ReturnStyle) -> String {
    let params = signature
        .params
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty))
        .collect::<Vec<_>>()
        .join(", ");
    let returns = match style {
        ReturnStyle::Promise => format!("IPromise<{}>", signature.return_type),
        ReturnStyle::Plain => signature.return_type.clone(),
    };
    format!("{}({}): {}", camel_case(&signature.name), params, returns)
}

pub fn emit_interface(name: &str, signatures: &[MethodSignature], style: ReturnStyle) -> String {
    let mut out = format!("interface {name} {{\n");
    for signature in signatures {
        out.push_str(INDENT);
        out.push_str(&render_signature(signature, style));
        out.push_str(";\n");
    }
    out.push('}');
    out
}

pub fn emit_proxy(hub: &str) -> String {
    format!(
        "interface {} {{\n{INDENT}server: {};\n{INDENT}client: {};\n}}",
        proxy_interface_name(hub),
        server_interface_name(hub),
        client_interface_name(hub),
    )
}

/// Merge a typed hub property into the prelude's `SignalR` interface so that
/// `$.connection.<property>` is typed.
pub fn emit_connection_augmentation(proxy_name: &str, property: &str) -> String {
    format!("interface SignalR {{\n{INDENT}{property}: {proxy_name};\n}}")
}

/// `interface Tuple2<T1, T2> { Item1: T1; Item2: T2; }`
pub fn emit_tuple_shape(arity: usize) -> String {
    let params = (1..=arity)
        .map(|i| format!("T{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut out = format!("interface Tuple{arity}<{params}> {{\n");
    for i in 1..=arity {
        out.push_str(&format!("{INDENT}Item{i}: T{i};\n"));
    }
    out.push('}');
    out
}

pub fn emit_dictionary_shape() -> String {
    format!("interface IDictionary<T> {{\n{INDENT}[key: string]: T;\n}}")
}

/// Everything a hub document is assembled from.
#[derive(Debug, Clone, Default)]
pub struct HubDocument {
    /// Full source name, used in the header.
    pub source_name: String,
    /// Simple type name; interface names derive from it.
    pub type_name: String,
    /// Relative path to the prelude.
    pub reference: String,
    /// Declaration forms, in the order they must appear.
    pub declarations: Vec<String>,
    pub dictionary_shape: bool,
    pub tuple_arities: Vec<usize>,
    pub server: Vec<MethodSignature>,
    pub client: Vec<MethodSignature>,
    /// Connection property for the `SignalR` augmentation, if any.
    pub connection_property: Option<String>,
}

pub fn emit_hub_document(doc: &HubDocument) -> String {
    let mut sections: Vec<String> = Vec::new();
    sections.push(format!(
        "// Generated by hub-typings for {}.\n// Changes will be lost when the typings are regenerated.\n/// <reference path=\"{}\" />",
        doc.source_name, doc.reference
    ));

    sections.extend(doc.declarations.iter().cloned());
    if doc.dictionary_shape {
        sections.push(emit_dictionary_shape());
    }
    sections.extend(doc.tuple_arities.iter().map(|n| emit_tuple_shape(*n)));

    sections.push(format!(
        "// Hub interfaces:\n{}",
        emit_interface(
            &server_interface_name(&doc.type_name),
            &doc.server,
            ReturnStyle::Promise
        )
    ));
    sections.push(format!(
        "//\n// Client interfaces:\n// These are to be implemented by the user.\n// These are for Hub -> Client calls.\n// Some dynamic calls may be missing.\n{}",
        emit_interface(
            &client_interface_name(&doc.type_name),
            &doc.client,
            ReturnStyle::Plain
        )
    ));
    sections.push(emit_proxy(&doc.type_name));
    if let Some(property) = &doc.connection_property {
        sections.push(emit_connection_augmentation(
            &proxy_interface_name(&doc.type_name),
            property,
        ));
    }

    let mut out = sections.join("\n\n");
    out.push('\n');
    out
}
