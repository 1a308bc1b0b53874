//! Registration documents.
//!
//! A registration document lists services to apply to a container, one entry
//! per implementation:
//!
//! ```json
//! {
//!   "services": [
//!     {
//!       "type": "app.MessageService",
//!       "name": "greeting",
//!       "version": "1.0",
//!       "parameters": { "message": "foobar" },
//!       "properties": { "retries": "3" }
//!     }
//!   ]
//! }
//! ```
//!
//! Field names are accepted in camelCase or PascalCase. The `type` string is
//! looked up in a [`TypeCatalog`]; entries are applied in document order.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::TypeCatalog;
use crate::container::Container;
use crate::error::{IocError, IocResult};

/// A parsed registration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerDocument {
    #[serde(alias = "Services")]
    pub services: Vec<ServiceEntry>,
}

/// One service entry of a registration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceEntry {
    /// Catalog identifier of the implementation type
    #[serde(rename = "type", alias = "Type")]
    pub type_name: String,
    #[serde(alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "Version", skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Informational only
    #[serde(alias = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Scalar constructor parameters by name
    #[serde(alias = "Parameters")]
    pub parameters: HashMap<String, String>,
    /// Scalar properties by name
    #[serde(alias = "Properties")]
    pub properties: HashMap<String, String>,
}

impl ContainerDocument {
    /// Parses a JSON document.
    ///
    /// ```rust
    /// use ferrous_ioc::ContainerDocument;
    ///
    /// let doc = ContainerDocument::from_json_str(
    ///     r#"{ "Services": [ { "Type": "app.Clock", "Name": "utc" } ] }"#,
    /// ).unwrap();
    /// assert_eq!(doc.services[0].type_name, "app.Clock");
    /// assert_eq!(doc.services[0].name.as_deref(), Some("utc"));
    /// assert!(doc.services[0].parameters.is_empty());
    /// ```
    pub fn from_json_str(text: &str) -> IocResult<Self> {
        serde_json::from_str(text).map_err(IocError::config)
    }

    /// Parses a JSON document from a reader.
    pub fn from_json_reader<R: Read>(reader: R) -> IocResult<Self> {
        serde_json::from_reader(reader).map_err(IocError::config)
    }

    /// Parses a YAML document.
    pub fn from_yaml_str(text: &str) -> IocResult<Self> {
        serde_yaml::from_str(text).map_err(IocError::config)
    }

    /// Reads a document from disk.
    ///
    /// `.yaml` and `.yml` files are parsed as YAML, anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> IocResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(IocError::invalid_argument(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }
        let text = fs::read_to_string(path).map_err(IocError::config)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::from_yaml_str(&text)
            }
            _ => Self::from_json_str(&text),
        }
    }
}

impl Container {
    /// Applies every entry of `document`, in order.
    ///
    /// An unknown `type` fails with [`IocError::TypeLoadFailure`]. Entries
    /// applied before a failing entry stay registered.
    pub fn apply_document(&self, document: &ContainerDocument, catalog: &TypeCatalog) -> IocResult<&Self> {
        for entry in &document.services {
            let ty = catalog.resolve(&entry.type_name)?;
            tracing::debug!(
                implementation = %entry.type_name,
                name = entry.name.as_deref().unwrap_or_default(),
                version = entry.version.as_deref().unwrap_or_default(),
                "applying configured service"
            );
            self.apply(
                ty,
                entry.parameters.clone(),
                entry.properties.clone(),
                entry.name.as_deref(),
                entry.version.as_deref(),
            )?;
        }
        Ok(self)
    }

    /// Parses and applies a JSON document.
    pub fn apply_json(&self, text: &str, catalog: &TypeCatalog) -> IocResult<&Self> {
        let document = ContainerDocument::from_json_str(text)?;
        self.apply_document(&document, catalog)
    }

    /// Reads and applies a document file; see [`ContainerDocument::from_path`].
    pub fn apply_file(&self, path: impl AsRef<Path>, catalog: &TypeCatalog) -> IocResult<&Self> {
        let document = ContainerDocument::from_path(path)?;
        self.apply_document(&document, catalog)
    }
}
