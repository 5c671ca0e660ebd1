//! Dataset schema lookup
//!
//! The semantic validator needs to know which external datasets exist, who
//! owns them and which columns they carry. That knowledge lives outside the
//! engine; callers hand it in through [`SchemaLookup`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A column as reported by the dataset store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(default)]
    pub data_type: String,
}

/// The known shape of an external dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSchema {
    #[serde(default)]
    pub columns: Vec<ColumnSchema>,
}

impl DatasetSchema {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Resolve an external dataset id for a principal.
///
/// Returns `None` both when the dataset does not exist and when it belongs to
/// someone else. Implementations may block (for example on a remote call);
/// the engine applies no retry or timeout of its own.
pub trait SchemaLookup {
    fn resolve(&self, external_id: &str, owner: &str) -> Option<DatasetSchema>;
}

impl<T: SchemaLookup + ?Sized> SchemaLookup for &T {
    fn resolve(&self, external_id: &str, owner: &str) -> Option<DatasetSchema> {
        (**self).resolve(external_id, owner)
    }
}

/// One dataset entry in a [`StaticSchemaLookup`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub owner: String,
    #[serde(default)]
    pub columns: Vec<ColumnSchema>,
}

/// In-memory schema lookup keyed by `(external id, owner)`
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaLookup {
    entries: HashMap<(String, String), DatasetSchema>,
}

impl StaticSchemaLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dataset with `(name, data_type)` columns
    pub fn with_dataset(mut self, external_id: &str, owner: &str, columns: &[(&str, &str)]) -> Self {
        let schema = DatasetSchema {
            columns: columns
                .iter()
                .map(|(name, data_type)| ColumnSchema {
                    name: name.to_string(),
                    data_type: data_type.to_string(),
                })
                .collect(),
        };
        self.insert(external_id, owner, schema);
        self
    }

    pub fn insert(&mut self, external_id: &str, owner: &str, schema: DatasetSchema) {
        self.entries
            .insert((external_id.to_string(), owner.to_string()), schema);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CatalogEntry> for StaticSchemaLookup {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        let mut lookup = Self::new();
        for entry in iter {
            lookup.insert(
                &entry.id,
                &entry.owner,
                DatasetSchema {
                    columns: entry.columns,
                },
            );
        }
        lookup
    }
}

impl SchemaLookup for StaticSchemaLookup {
    fn resolve(&self, external_id: &str, owner: &str) -> Option<DatasetSchema> {
        self.entries
            .get(&(external_id.to_string(), owner.to_string()))
            .cloned()
    }
}
