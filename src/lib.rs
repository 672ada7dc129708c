//! TypeScript typings for SignalR hubs.
//!
//! This crate reads C#-style hub declarations and writes `.d.ts` documents
//! describing each hub's server methods, its client callbacks and the proxy
//! combining both. Source types are translated through a run-scoped
//! [`TypeRegistry`]: primitives come from a constant [`MappingTable`],
//! wrappers (nullable, futures, sequences, dictionaries, tuples) are
//! unwrapped, and user enums and records get a declaration of their own,
//! written once per document ahead of the interfaces that use them.
//!
//! ```
//! use hub_typings::{
//!     generate, GenerateOptions, MappingTable, MemoryProject, SignalRHubTypes, TypeCatalog,
//! };
//!
//! let model = r#"{
//!     "usings": ["Microsoft.AspNetCore.SignalR"],
//!     "types": [{
//!         "name": "Chat.ChatHub",
//!         "kind": "class",
//!         "base": "Hub",
//!         "members": [{
//!             "name": "Send", "kind": "method", "visibility": "public",
//!             "params": [
//!                 { "name": "name", "type": "string" },
//!                 { "name": "message", "type": "string" }
//!             ]
//!         }]
//!     }]
//! }"#;
//! let table = MappingTable::standard();
//! let mut catalog = TypeCatalog::from_json(model, &table).unwrap();
//! catalog.add_known_type("Microsoft.AspNetCore.SignalR.Hub");
//!
//! let hub = catalog.get("ChatHub").unwrap();
//! let mut project = MemoryProject::new();
//! let report = generate(
//!     hub,
//!     &catalog,
//!     &SignalRHubTypes::default(),
//!     &table,
//!     &mut project,
//!     &GenerateOptions::default(),
//! )
//! .unwrap();
//!
//! let text = &project.get(&report.document).unwrap().text;
//! assert!(text.contains("send(name: string, message: string): IPromise<void>;"));
//! ```

pub mod catalog;
pub mod config;
pub mod decl;
pub mod emit;
pub mod error;
pub mod extract;
pub mod generate;
pub mod identity;
pub mod prelude;
pub mod registry;
pub mod report;
pub mod sink;
pub mod table;
pub mod trigger;

pub use catalog::TypeCatalog;
pub use config::HubTypingsConfig;
pub use decl::{DeclKind, Member, MemberKind, Parameter, TypeDeclaration, Visibility};
pub use emit::ReturnStyle;
pub use error::{ConfigError, GenerateError, ModelError, ResolveError, SinkError, TypeRefParseError};
pub use extract::{extract, extract_client, MethodParameter, MethodSignature};
pub use generate::{generate, GenerateOptions, GenerationReport};
pub use identity::{TypeIdentity, TypeRef, TypeResolver};
pub use registry::{MappingKind, NullableStyle, TypeMapping, TypeRegistry, Warning, WarningKind};
pub use sink::{DirectoryProject, GeneratedDocument, MemoryProject, OutputSink};
pub use table::MappingTable;
pub use trigger::{is_hub_declaration, HubTypePredicate, SignalRHubTypes};
