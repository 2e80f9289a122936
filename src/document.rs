//! In-memory model of one OpenAPI feature document.
//!
//! A [`Document`] wraps the parsed YAML tree without imposing a typed schema
//! on it. Feature documents are edited by hand as well as by the wizard, so
//! the tree is taken as found: unknown keys, vendor extensions and partially
//! filled objects all survive a parse, edit and serialize cycle. Accessors
//! return nothing rather than failing when a node is absent or has an
//! unexpected shape.

use serde::{Deserialize, Serialize};
use serde_norway::{Mapping, Value};

use crate::error::Error;

/// OpenAPI version written into new documents.
const OPENAPI_VERSION: &str = "3.0.3";

/// A parsed OpenAPI document holding feature schemas and their `x-fbp`
/// extensions.
///
/// Construct one with [`Document::parse`] from existing YAML source, or with
/// [`Document::new`] to start a fresh feature from the standard template.
/// [`Document::to_yaml`] serializes the tree back out deterministically, with
/// key order preserved from the source.
///
/// # Examples
///
/// ```rust
/// # use fbp_spec::Document;
/// let mut document = Document::new("Billing", "Invoicing feature");
/// document.add_schema("Invoice").unwrap();
///
/// assert_eq!(document.schema_names(), ["Invoice"]);
/// ```
#[derive(Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "debug", derive(Debug))]
#[serde(transparent)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Parse YAML source into a [`Document`].
    ///
    /// Any well-formed YAML is accepted, including JSON. Returns
    /// [`Error::MalformedDocument`] when the source does not parse, with the
    /// parser's own position information preserved.
    pub fn parse(source: &str) -> Result<Document, Error> {
        let root = serde_norway::from_str(source).map_err(Error::MalformedDocument)?;

        Ok(Document { root })
    }

    /// Construct a new document from the feature template.
    ///
    /// The template carries `openapi: 3.0.3`, an `info` block with the given
    /// title and description and version `1.0.0`, empty `servers` and `paths`
    /// and an empty `components.schemas` map. An empty `title` or
    /// `description` falls back to a placeholder so the document stays valid.
    pub fn new<S: AsRef<str>>(title: S, description: S) -> Document {
        let mut info = Mapping::new();
        info.insert("title".into(), non_empty_or(title.as_ref(), "Service Title"));
        info.insert("version".into(), "1.0.0".into());
        info.insert(
            "description".into(),
            non_empty_or(description.as_ref(), "Service Description"),
        );

        let mut components = Mapping::new();
        components.insert("schemas".into(), Value::Mapping(Mapping::new()));

        let mut root = Mapping::new();
        root.insert("openapi".into(), OPENAPI_VERSION.into());
        root.insert("info".into(), Value::Mapping(info));
        root.insert("servers".into(), Value::Sequence(Vec::new()));
        root.insert("paths".into(), Value::Mapping(Mapping::new()));
        root.insert("components".into(), Value::Mapping(components));

        Document {
            root: Value::Mapping(root),
        }
    }

    /// Serialize the document to YAML.
    ///
    /// Output is deterministic for a given tree: two-space indentation, keys
    /// in tree order, no anchors or aliases. Parsing the output yields a tree
    /// equal to the one serialized.
    pub fn to_yaml(&self) -> Result<String, Error> {
        serde_norway::to_string(&self.root).map_err(Error::Serialize)
    }

    /// Names of the schemas under `components.schemas`, in document order.
    ///
    /// Returns an empty list when the path is absent or not a mapping.
    pub fn schema_names(&self) -> Vec<String> {
        self.schemas()
            .map(|schemas| {
                schemas
                    .keys()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether a schema object with this name exists under
    /// `components.schemas`.
    pub fn contains_schema(&self, name: &str) -> bool {
        self.schema_node(name).is_some()
    }

    /// Append an empty object schema named `name` to `components.schemas`.
    ///
    /// The new schema has `type: object` and an empty `properties` map, and
    /// becomes the last entry of the schema map. Missing `components` or
    /// `schemas` nodes are created on the way. Returns
    /// [`Error::DuplicateSchema`] when the name is already taken.
    pub fn add_schema<S: AsRef<str>>(&mut self, name: S) -> Result<(), Error> {
        let name = name.as_ref();
        if self
            .schemas()
            .is_some_and(|schemas| schemas.contains_key(name))
        {
            return Err(Error::DuplicateSchema(name.to_string()));
        }

        let mut schema = Mapping::new();
        schema.insert("type".into(), "object".into());
        schema.insert("properties".into(), Value::Mapping(Mapping::new()));

        self.schemas_mut()
            .insert(name.into(), Value::Mapping(schema));

        Ok(())
    }

    /// Borrow the underlying YAML tree.
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Consume the document, returning the underlying YAML tree.
    pub fn into_value(self) -> Value {
        self.root
    }

    /// The `components.schemas` mapping, if present.
    pub(crate) fn schemas(&self) -> Option<&Mapping> {
        self.root
            .get("components")
            .and_then(|components| components.get("schemas"))
            .and_then(Value::as_mapping)
    }

    /// The `components.schemas` mapping, created if absent.
    fn schemas_mut(&mut self) -> &mut Mapping {
        let root = ensure_mapping(&mut self.root);
        let components = ensure_child_mapping(root, "components");

        ensure_child_mapping(components, "schemas")
    }

    /// The schema object named `name`, if present and a mapping.
    pub(crate) fn schema_node(&self, name: &str) -> Option<&Mapping> {
        self.schemas()
            .and_then(|schemas| schemas.get(name))
            .and_then(Value::as_mapping)
    }

    /// Mutable access to the schema object named `name`.
    pub(crate) fn schema_node_mut(&mut self, name: &str) -> Option<&mut Mapping> {
        self.root
            .get_mut("components")
            .and_then(|components| components.get_mut("schemas"))
            .and_then(Value::as_mapping_mut)
            .and_then(|schemas| schemas.get_mut(name))
            .and_then(Value::as_mapping_mut)
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Document { root }
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        document.root
    }
}

fn non_empty_or(value: &str, fallback: &str) -> Value {
    if value.is_empty() {
        fallback.into()
    } else {
        value.into()
    }
}

/// Coerce `slot` to a mapping, replacing any other value, and borrow it.
pub(crate) fn ensure_mapping(slot: &mut Value) -> &mut Mapping {
    if !slot.is_mapping() {
        *slot = Value::Mapping(Mapping::new());
    }
    match slot {
        Value::Mapping(mapping) => mapping,
        _ => unreachable!("slot was coerced to a mapping above"),
    }
}

/// Borrow `parent[key]` as a mapping, creating or coercing it as needed.
pub(crate) fn ensure_child_mapping<'a>(parent: &'a mut Mapping, key: &str) -> &'a mut Mapping {
    let slot = parent
        .entry(key.into())
        .or_insert_with(|| Value::Mapping(Mapping::new()));

    ensure_mapping(slot)
}
