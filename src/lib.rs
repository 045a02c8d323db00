//! # book-catalog Library
//!
//! Loads a catalog of book records from an XML document and answers two queries
//! against it: whether a book id exists, and the typed summary of that book.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod output;

pub use catalog::{BOOK_TAG, BookField, BookInfo, Catalog, FieldValue, ID_ATTRIBUTE};
pub use cli::{Cli, OutputFormat, VerbosityLevel};
pub use config::{CatalogConfig, Config, ConfigError, ConfigManager, OutputConfig};
pub use document::{Attribute, AttributeMap, Document, Element, Node};
pub use error::{CatalogError, FieldProblem, LoadError, MalformedRecordError};
pub use output::{OutputSink, QuerySummary, Reporter};
