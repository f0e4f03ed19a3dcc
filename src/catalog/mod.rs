//! Schema catalog: the read-only source of collection and field names
//!
//! The completion core only ever asks two questions of the data store's
//! metadata: which collections exist, and which fields a collection has. The
//! [`SchemaCatalog`] trait captures exactly that. How the answers are obtained
//! and refreshed is up to the implementation; the shell ships
//! [`StaticCatalog`], loaded from a schema file or from the configuration.
//!
//! Schema files are TOML or JSON:
//!
//! ```toml
//! [[collections]]
//! name = "books"
//! fields = ["id", "title", "author", "price"]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Read-only provider of schema names
pub trait SchemaCatalog: Send + Sync {
    /// Names of all collections, in catalog order
    fn list_collections(&self) -> Vec<String>;

    /// Names of the fields of `collection`, in catalog order
    ///
    /// Unknown collections have no fields.
    fn list_fields(&self, collection: &str) -> Vec<String>;
}

/// One collection and its fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSchema {
    /// Collection name
    pub name: String,

    /// Field names
    #[serde(default)]
    pub fields: Vec<String>,
}

impl CollectionSchema {
    /// Create a collection schema
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// On-disk layout of a schema file
#[derive(Debug, Default, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    collections: Vec<CollectionSchema>,
}

/// In-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    collections: Vec<CollectionSchema>,
}

impl StaticCatalog {
    /// Build a catalog from collection schemas
    ///
    /// # Errors
    /// * `SchemaError::DuplicateCollection` - a name appears twice
    pub fn new(collections: Vec<CollectionSchema>) -> Result<Self> {
        let mut seen = HashSet::new();
        for collection in &collections {
            if !seen.insert(collection.name.as_str()) {
                return Err(SchemaError::DuplicateCollection(collection.name.clone()).into());
            }
        }

        Ok(Self { collections })
    }

    /// Catalog without any collection
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a collection (builder style)
    ///
    /// A collection with the same name is replaced.
    pub fn with_collection<I, S>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let schema = CollectionSchema::new(name, fields);
        match self.collections.iter_mut().find(|c| c.name == schema.name) {
            Some(existing) => *existing = schema,
            None => self.collections.push(schema),
        }
        self
    }

    /// Load a catalog from a `.toml` or `.json` schema file
    ///
    /// # Arguments
    /// * `path` - Path to the schema file
    ///
    /// # Returns
    /// * `Result<StaticCatalog>` - Loaded catalog or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        if !path.exists() {
            return Err(SchemaError::FileNotFound(shown).into());
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let content = std::fs::read_to_string(path)?;
        let file: SchemaFile = match extension.as_deref() {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| SchemaError::InvalidFormat(format!("{shown}: {e}")))?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| SchemaError::InvalidFormat(format!("{shown}: {e}")))?,
            _ => return Err(SchemaError::UnsupportedFormat(shown).into()),
        };

        tracing::debug!(
            path = %shown,
            collections = file.collections.len(),
            "loaded schema file"
        );

        Self::new(file.collections)
    }

    /// Collection schemas held by the catalog
    pub fn collections(&self) -> &[CollectionSchema] {
        &self.collections
    }
}

impl SchemaCatalog for StaticCatalog {
    fn list_collections(&self) -> Vec<String> {
        self.collections.iter().map(|c| c.name.clone()).collect()
    }

    fn list_fields(&self, collection: &str) -> Vec<String> {
        self.collections
            .iter()
            .find(|c| c.name == collection)
            .map(|c| c.fields.clone())
            .unwrap_or_default()
    }
}
