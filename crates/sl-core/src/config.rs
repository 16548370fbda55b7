//! Configuration types and parsing for schemalint.yml

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::default_true;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "schemalint.yml";

/// Main analyzer configuration from schemalint.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Module path fragments; modules whose path contains any of them are skipped
    #[serde(default = "default_skip_packages")]
    pub skip_packages: Vec<String>,

    /// File name suffixes that identify resource and data source definitions
    #[serde(default)]
    pub file_suffixes: FileSuffixes,

    /// File name suffixes that are never analyzed
    #[serde(default = "default_skip_files")]
    pub skip_files: Vec<String>,

    /// Import paths of modules that declare the `Schema` type.
    ///
    /// Used for the type-identity check when the facts provider reports the
    /// type of a map literal.
    #[serde(default = "default_schema_modules")]
    pub schema_modules: Vec<String>,

    /// Receivers whose `Get`/`GetOk` calls read a configuration field
    #[serde(default = "default_accessor_receivers")]
    pub accessor_receivers: Vec<String>,

    /// Receivers whose `SetID`/`SetId` calls commit the resource identifier
    #[serde(default = "default_commit_receivers")]
    pub commit_receivers: Vec<String>,

    /// Discovery settings for the shared schema helper module
    #[serde(default)]
    pub shared_schema: SharedSchemaConfig,

    /// Only report findings in files the change scope marks as new
    #[serde(default = "default_true")]
    pub new_files_only: bool,
}

/// File suffixes that classify a source file as a definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSuffixes {
    /// Suffix of resource definition files
    #[serde(default = "default_resource_suffix")]
    pub resource: String,

    /// Suffix of data source definition files
    #[serde(default = "default_data_source_suffix")]
    pub data_source: String,
}

impl Default for FileSuffixes {
    fn default() -> Self {
        Self {
            resource: default_resource_suffix(),
            data_source: default_data_source_suffix(),
        }
    }
}

/// Where the shared schema helper module lives relative to the analyzed code.
///
/// Discovery walks up from the analyzed module's directory until it finds
/// `sentinel_dir`, steps one level above it, then joins `relative_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharedSchemaConfig {
    /// Set to false to never consult the shared helper module
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory name that marks the provider's source tree
    #[serde(default = "default_sentinel_dir")]
    pub sentinel_dir: String,

    /// Path of the helper module below the repository root
    #[serde(default = "default_relative_path")]
    pub relative_path: String,

    /// Name of the facts export inside the helper module directory
    #[serde(default = "default_facts_file")]
    pub facts_file: String,
}

impl Default for SharedSchemaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sentinel_dir: default_sentinel_dir(),
            relative_path: default_relative_path(),
            facts_file: default_facts_file(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip_packages: default_skip_packages(),
            file_suffixes: FileSuffixes::default(),
            skip_files: default_skip_files(),
            schema_modules: default_schema_modules(),
            accessor_receivers: default_accessor_receivers(),
            commit_receivers: default_commit_receivers(),
            shared_schema: SharedSchemaConfig::default(),
            new_files_only: true,
        }
    }
}

fn default_skip_packages() -> Vec<String> {
    [
        "_test",
        "/migration",
        "/client",
        "/validate",
        "/test-data",
        "/parse",
        "/models",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_skip_files() -> Vec<String> {
    vec!["_test.go".to_string(), "registration.go".to_string()]
}

fn default_resource_suffix() -> String {
    "_resource.go".to_string()
}

fn default_data_source_suffix() -> String {
    "_data_source.go".to_string()
}

fn default_schema_modules() -> Vec<String> {
    vec![
        "github.com/hashicorp/terraform-plugin-sdk/v2/helper/schema".to_string(),
        "github.com/hashicorp/terraform-provider-azurerm/internal/tf/pluginsdk".to_string(),
    ]
}

fn default_accessor_receivers() -> Vec<String> {
    vec!["d".to_string()]
}

fn default_commit_receivers() -> Vec<String> {
    vec!["d".to_string(), "meta".to_string(), "metadata".to_string()]
}

fn default_sentinel_dir() -> String {
    "internal".to_string()
}

fn default_relative_path() -> String {
    "vendor/github.com/hashicorp/go-azure-helpers/resourcemanager/commonschema".to_string()
}

fn default_facts_file() -> String {
    "schemalint.facts.json".to_string()
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the given config file, or `schemalint.yml` from `dir` when present,
    /// falling back to the built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> CoreResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            log::debug!("using config {}", candidate.display());
            Self::load(&candidate)
        } else {
            log::debug!("no {CONFIG_FILE_NAME} in {}, using defaults", dir.display());
            Ok(Self::default())
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.file_suffixes.resource.is_empty() || self.file_suffixes.data_source.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "file_suffixes entries must not be empty".to_string(),
            });
        }
        if self.commit_receivers.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "commit_receivers must name at least one receiver".to_string(),
            });
        }
        if self.shared_schema.enabled && self.shared_schema.sentinel_dir.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "shared_schema.sentinel_dir must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Whether a module path matches one of the skipped package fragments
    pub fn is_skipped_package(&self, module_path: &str) -> bool {
        self.skip_packages
            .iter()
            .any(|skip| module_path.contains(skip.as_str()))
    }

    /// Whether a file name carries one of the skipped suffixes
    pub fn is_skipped_file(&self, file_name: &str) -> bool {
        self.skip_files
            .iter()
            .any(|suffix| file_name.ends_with(suffix.as_str()))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
