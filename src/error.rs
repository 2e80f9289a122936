//! Errors and warnings raised while parsing or editing feature documents.
//!
//! [`Error`] aborts the operation that raised it and leaves the caller's
//! document untouched. [`Warning`] never aborts anything: the operation
//! completes and reports what it had to tolerate. Warnings are additionally
//! emitted as [`tracing`] events at warn level by the code that detects them.

use thiserror::Error as ThisError;

/// Errors from parsing, editing or serializing an OpenAPI document.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The document source is not valid YAML.
    ///
    /// Carries the parser error with the offending position so it can be
    /// surfaced to the user verbatim.
    #[error("malformed document: {0}")]
    MalformedDocument(#[source] serde_norway::Error),

    /// No schema with the given name exists under `components.schemas`.
    #[error("schema `{0}` not found in the document")]
    SchemaNotFound(String),

    /// A schema with the given name already exists under `components.schemas`.
    #[error("schema `{0}` already exists in the document")]
    DuplicateSchema(String),

    /// Re-serializing the document tree to YAML failed.
    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_norway::Error),
}

/// Non-fatal inconsistencies found while reading or merging `x-fbp`
/// extensions.
///
/// The document that accompanies a warning is still valid and usable.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Warning {
    /// More than one property of a schema carries `x-fbp-enum-name`.
    ///
    /// The extension names the one enumeration type generated for the schema,
    /// so only the value on the first property in document order is read.
    /// The next merge rewrites the extension onto a single property.
    #[error("schema `{schema}`: multiple properties carry x-fbp-enum-name, keeping the value from the first")]
    AmbiguousEnumName {
        /// Schema the properties belong to.
        schema: String,
        /// Names of the carrying properties, in document order.
        properties: Vec<String>,
    },

    /// An enum name was requested for a schema that has no enum-typed
    /// property to attach it to. The name is not written anywhere.
    #[error("schema `{schema}`: no enum-typed property to carry enum name `{enum_name}`")]
    OrphanedEnumName {
        /// Schema the name was requested for.
        schema: String,
        /// The requested enumeration type name.
        enum_name: String,
    },
}
