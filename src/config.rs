//! Project configuration (hub-typings.toml) parsing and types.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::generate::GenerateOptions;
use crate::identity::TypeIdentity;
use crate::prelude::{DEFAULT_HUBS_FOLDER, DEFAULT_PRELUDE_FOLDER};
use crate::registry::NullableStyle;
use crate::table::MappingTable;
use crate::trigger::SignalRHubTypes;

pub const CONFIG_FILE: &str = "hub-typings.toml";

/// Root configuration structure for hub-typings.toml.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct HubTypingsConfig {
    /// Where documents are written.
    #[serde(default)]
    pub output: OutputConfig,
    /// Type mapping options.
    #[serde(default)]
    pub types: TypesConfig,
    /// Hub detection and proxy options.
    #[serde(default)]
    pub hubs: HubsConfig,
}

/// Output section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputConfig {
    /// Project root documents are written below.
    pub root: Option<String>,
    /// Folder of the hub documents, relative to the root.
    pub hubs_dir: Option<String>,
    /// Folder the prelude is created in, relative to the root.
    pub prelude_dir: Option<String>,
    /// Write a `<Hub>.dts-report.md` next to each hub document.
    pub report: Option<bool>,
}

/// Types section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TypesConfig {
    /// "suffix" (`number?`) or "union" (`number | null`).
    pub nullable_style: Option<NullableStyle>,
    /// Extra primitive correspondences, full source name to TypeScript.
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
}

/// Hubs section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct HubsConfig {
    /// Additional base classes that make a class a hub.
    #[serde(default)]
    pub base_types: Vec<String>,
    /// Type `$.connection.<hub>` through the prelude's `SignalR` interface.
    pub augment_connection: Option<bool>,
}

impl HubTypingsConfig {
    /// Load configuration from a specific path.
    /// Returns None if the file doesn't exist.
    pub fn load_from_path(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
            .map(Some)
            .map_err(|source| ConfigError::Toml {
                path: path.display().to_string(),
                source,
            })
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// The standard table extended with the configured mappings.
    pub fn mapping_table(&self) -> MappingTable {
        self.types
            .mappings
            .iter()
            .fold(MappingTable::standard(), |table, (name, ts)| {
                table.with_primitive(TypeIdentity::new(name.clone()), ts.clone())
            })
    }

    pub fn hub_types(&self) -> SignalRHubTypes {
        SignalRHubTypes::default().with_extra(self.hubs.base_types.iter().cloned())
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            hubs_folder: self.output.hubs_dir().to_string(),
            prelude_folder: self.output.prelude_dir().to_string(),
            nullable_style: self.types.nullable_style(),
            augment_connection: self.hubs.augment_connection(),
        }
    }
}

impl OutputConfig {
    /// Get the project root, defaulting to ".".
    pub fn root(&self) -> &str {
        self.root.as_deref().unwrap_or(".")
    }

    /// Get the hubs folder (default: Scripts/typings/hubs).
    pub fn hubs_dir(&self) -> &str {
        self.hubs_dir.as_deref().unwrap_or(DEFAULT_HUBS_FOLDER)
    }

    /// Get the prelude folder (default: Scripts/typings/signalR).
    pub fn prelude_dir(&self) -> &str {
        self.prelude_dir.as_deref().unwrap_or(DEFAULT_PRELUDE_FOLDER)
    }

    /// Get whether reports are written (default: false).
    pub fn report(&self) -> bool {
        self.report.unwrap_or(false)
    }
}

impl TypesConfig {
    pub fn nullable_style(&self) -> NullableStyle {
        self.nullable_style.unwrap_or_default()
    }
}

impl HubsConfig {
    /// Get whether the connection is augmented (default: true).
    pub fn augment_connection(&self) -> bool {
        self.augment_connection.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::HubTypePredicate;

    #[test]
    fn test_parse_empty_config() {
        let config = HubTypingsConfig::parse("").unwrap();
        assert!(config.output.root.is_none());
        assert!(config.types.mappings.is_empty());
        assert!(config.hubs.base_types.is_empty());
    }

    #[test]
    fn test_defaults() {
        let config = HubTypingsConfig::default();
        assert_eq!(config.output.root(), ".");
        assert_eq!(config.output.hubs_dir(), "Scripts/typings/hubs");
        assert_eq!(config.output.prelude_dir(), "Scripts/typings/signalR");
        assert!(!config.output.report());
        assert_eq!(config.types.nullable_style(), NullableStyle::Suffix);
        assert!(config.hubs.augment_connection());
    }

    #[test]
    fn test_parse_output_config() {
        let toml = r#"
[output]
root = "web"
hubs_dir = "wwwroot/types/hubs"
prelude_dir = "wwwroot/types"
report = true
"#;
        let config = HubTypingsConfig::parse(toml).unwrap();
        assert_eq!(config.output.root(), "web");
        assert_eq!(config.output.hubs_dir(), "wwwroot/types/hubs");
        assert_eq!(config.output.prelude_dir(), "wwwroot/types");
        assert!(config.output.report());

        let options = config.generate_options();
        assert_eq!(options.hubs_folder, "wwwroot/types/hubs");
        assert_eq!(options.prelude_folder, "wwwroot/types");
    }

    #[test]
    fn test_parse_types_config() {
        let toml = r#"
[types]
nullable_style = "union"

[types.mappings]
"NodaTime.Instant" = "string"
"Acme.Money" = "number"
"#;
        let config = HubTypingsConfig::parse(toml).unwrap();
        assert_eq!(config.types.nullable_style(), NullableStyle::Union);
        assert_eq!(config.types.mappings.len(), 2);

        let table = config.mapping_table();
        assert_eq!(
            table.primitive(&TypeIdentity::new("NodaTime.Instant")),
            Some("string")
        );
        assert_eq!(table.primitive(&TypeIdentity::new("Acme.Money")), Some("number"));
        assert_eq!(
            table.primitive(&TypeIdentity::new("System.Int32")),
            Some("number")
        );
    }

    #[test]
    fn test_parse_hubs_config() {
        let toml = r#"
[hubs]
base_types = ["Acme.Realtime.HubBase"]
augment_connection = false
"#;
        let config = HubTypingsConfig::parse(toml).unwrap();
        assert!(!config.hubs.augment_connection());
        assert!(!config.generate_options().augment_connection);

        let hubs = config.hub_types();
        assert!(hubs.is_well_known_hub_type(&TypeIdentity::new("Acme.Realtime.HubBase")));
        assert!(hubs.is_well_known_hub_type(&TypeIdentity::new(
            "Microsoft.AspNet.SignalR.Hub"
        )));
    }

    #[test]
    fn test_invalid_nullable_style() {
        let toml = r#"
[types]
nullable_style = "optional"
"#;
        assert!(HubTypingsConfig::parse(toml).is_err());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert!(HubTypingsConfig::load_from_path(&path).unwrap().is_none());

        fs::write(&path, "[output]\nreport = true\n").unwrap();
        let config = HubTypingsConfig::load_from_path(&path).unwrap().unwrap();
        assert!(config.output.report());

        fs::write(&path, "[output\n").unwrap();
        let err = HubTypingsConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }
}
