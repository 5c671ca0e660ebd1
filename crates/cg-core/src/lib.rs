//! cg-core - Core library for contextgraph
//!
//! This crate parses context documents into a normalized model, validates
//! them against an external dataset catalog, and resolves join paths across
//! the datasets they declare.

pub mod config;
pub mod document;
pub mod error;
pub mod fingerprint;
pub mod graph;
pub mod join_path;
pub mod lookup;
mod open_enum;
pub mod parser;
pub mod resolver;
mod serializer;
pub mod validation;
pub mod validator;

pub use config::ResolverConfig;
pub use document::{
    BusinessRule, ColumnRef, ContextDocument, ContextStatus, ContextType, DatasetRef,
    DocumentSummary, Filter, FilterParameter, GlossaryEntry, JoinCondition, JoinType, Metric,
    Relationship, RuleSeverity, RuleType,
};
pub use error::{CoreError, CoreResult};
pub use fingerprint::ContentFingerprint;
pub use graph::{find_directed_cycle, RelationshipGraph};
pub use join_path::{JoinPath, JoinPathEdge, TraversalDirection};
pub use lookup::{CatalogEntry, ColumnSchema, DatasetSchema, SchemaLookup, StaticSchemaLookup};
pub use parser::{parse, split_document, DocumentParts};
pub use resolver::{
    connected_datasets, estimate_cost, find_multi_path, find_path, is_valid_path, suggest_joins,
    DisconnectedDatasets, JoinStrategy,
};
pub use validation::{
    IssueCode, Severity, ValidationIssue, ValidationResult, ValidationStatus, ValidationSummary,
};
pub use validator::{validate, ContextValidator};
