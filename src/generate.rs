//! One generation run: a hub declaration in, typings documents out.

use tracing::{debug, info, warn};

use crate::decl::TypeDeclaration;
use crate::emit::{camel_case, emit_hub_document, HubDocument};
use crate::error::GenerateError;
use crate::extract::{extract, extract_client};
use crate::identity::TypeResolver;
use crate::prelude::{
    declares_dictionary, prelude_document, DEFAULT_HUBS_FOLDER, DEFAULT_PRELUDE_FOLDER,
    PRELUDE_NAME,
};
use crate::registry::{NullableStyle, TypeRegistry, Warning, WarningKind};
use crate::sink::{folder_segments, relative_path, GeneratedDocument, OutputSink};
use crate::table::MappingTable;
use crate::trigger::{client_contract_of, is_hub_declaration, HubTypePredicate};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Folder of the hub documents, `/`-separated.
    pub hubs_folder: String,
    /// Folder the prelude is created in when the project has none.
    pub prelude_folder: String,
    pub nullable_style: NullableStyle,
    /// Add the hub proxy to the prelude's `SignalR` interface.
    pub augment_connection: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            hubs_folder: DEFAULT_HUBS_FOLDER.to_string(),
            prelude_folder: DEFAULT_PRELUDE_FOLDER.to_string(),
            nullable_style: NullableStyle::default(),
            augment_connection: true,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Full name of the hub.
    pub hub: String,
    /// Project-relative path of the hub document.
    pub document: String,
    pub prelude_created: bool,
    pub server_methods: usize,
    pub client_methods: usize,
    pub warnings: Vec<Warning>,
}

/// Render the typings for one hub and add them to `sink`.
///
/// Every document is rendered before the sink is written to. The prelude is
/// only created when the sink has no `signalR.d.ts` yet.
pub fn generate(
    decl: &TypeDeclaration,
    resolver: &dyn TypeResolver,
    predicate: &dyn HubTypePredicate,
    table: &MappingTable,
    sink: &mut dyn OutputSink,
    options: &GenerateOptions,
) -> Result<GenerationReport, GenerateError> {
    if !is_hub_declaration(decl, resolver, predicate) {
        return Err(GenerateError::NotAHub(decl.name.clone()));
    }
    info!(hub = %decl.name, "generating typings");

    let mut registry =
        TypeRegistry::new(table, resolver).with_nullable_style(options.nullable_style);
    let server = extract(decl, &mut registry);

    let mut contract_warning = None;
    let client = match client_contract_of(decl, resolver, predicate) {
        Ok(Some(identity)) => match resolver.declaration(&identity.open()) {
            Some(contract) => extract_client(contract, &mut registry),
            None => {
                contract_warning = Some(format!(
                    "client contract `{identity}` of `{}` has no declaration",
                    decl.name
                ));
                Vec::new()
            }
        },
        Ok(None) => {
            debug!(hub = %decl.name, "no client contract");
            Vec::new()
        }
        Err(err) => {
            contract_warning = Some(format!("client contract of `{}`: {err}", decl.name));
            Vec::new()
        }
    };

    let declarations: Vec<String> = registry
        .take_pending_declarations()
        .iter()
        .map(|mapping| mapping.declaration().to_string())
        .collect();
    let uses_dictionary = registry.uses_dictionary();
    let tuple_arities: Vec<usize> = registry.tuple_arities().collect();
    let mut warnings = registry.into_warnings();
    if let Some(message) = contract_warning {
        warn!(hub = %decl.name, %message);
        warnings.push(Warning {
            kind: WarningKind::MissingClientContract,
            message,
        });
    }

    let existing = sink.find(PRELUDE_NAME)?;
    let (prelude, prelude_folders, dictionary_shape) = match existing {
        Some(found) => {
            debug!(path = %found.path(), "prelude already present");
            let missing_dictionary = uses_dictionary && !declares_dictionary(&found.text);
            (None, found.folders, missing_dictionary)
        }
        None => {
            let doc = prelude_document(&options.prelude_folder, uses_dictionary);
            let folders = doc.folders.clone();
            (Some(doc), folders, false)
        }
    };

    let hubs_folders = folder_segments(&options.hubs_folder);
    let type_name = decl.simple_name().to_string();
    let connection_property = options.augment_connection.then(|| {
        decl.hub_name
            .clone()
            .unwrap_or_else(|| camel_case(&type_name))
    });
    let hub_doc = HubDocument {
        source_name: decl.name.clone(),
        type_name,
        reference: relative_path(&hubs_folders, &prelude_folders, PRELUDE_NAME),
        declarations,
        dictionary_shape,
        tuple_arities,
        server,
        client,
        connection_property,
    };
    let document = GeneratedDocument {
        name: format!("{}.d.ts", hub_doc.type_name),
        folders: hubs_folders,
        text: emit_hub_document(&hub_doc),
    };
    let document_path = document.path();

    let prelude_created = prelude.is_some();
    if let Some(prelude) = prelude {
        info!(path = %prelude.path(), "creating prelude");
        sink.add_document(prelude)?;
    }
    sink.add_document(document)?;

    info!(
        hub = %decl.name,
        path = %document_path,
        warnings = warnings.len(),
        "typings generated"
    );
    Ok(GenerationReport {
        hub: decl.name.clone(),
        document: document_path,
        prelude_created,
        server_methods: hub_doc.server.len(),
        client_methods: hub_doc.client.len(),
        warnings,
    })
}
