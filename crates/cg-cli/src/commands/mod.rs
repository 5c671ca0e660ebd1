//! CLI command implementations

pub(crate) mod common;
pub(crate) mod fmt;
pub(crate) mod glossary;
pub(crate) mod parse;
pub(crate) mod path;
pub(crate) mod query;
pub(crate) mod validate;
