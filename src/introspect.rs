//! Schema introspection: property listings and current extension state.
//!
//! The extension editor renders a form from two reads. The property listing
//! ([`Document::schema_properties`]) drives the per-property fields, the
//! extension state ([`Document::extension_state`]) pre-fills the form with
//! whatever a previous edit left in the document. Both reads are lenient:
//! hand edited documents with odd shapes produce defaults, not errors.

use std::fmt::{self, Display, Formatter};

use serde::de::DeserializeOwned;
use serde_norway::{Mapping, Value};

use crate::document::Document;
use crate::error::{Error, Warning};
use crate::extensions::{
    BusinessNames, ExtensionSet, ENUM_NAME_EXTENSION, PARAMS_EXTENSION, PROPS_EXTENSION,
};

/// One property of a schema, as rendered in the extension editor.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct SchemaProperty {
    /// Name of the property.
    pub name: String,
    /// Kind inferred from the property definition.
    pub kind: PropertyKind,
}

/// Inferred kind of a schema property.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub enum PropertyKind {
    /// The property declares a non-empty `enum` variant list. Takes
    /// precedence over any declared `type`.
    Enum,
    /// The property declares a `type` and no enum variants.
    Typed(String),
    /// The property declares neither enum variants nor a `type`.
    Unknown,
}

impl PropertyKind {
    /// Whether this is the enum kind.
    pub fn is_enum(&self) -> bool {
        matches!(self, PropertyKind::Enum)
    }

    fn of(node: &Value) -> PropertyKind {
        let has_variants = node
            .get("enum")
            .and_then(Value::as_sequence)
            .is_some_and(|variants| !variants.is_empty());
        if has_variants {
            return PropertyKind::Enum;
        }

        match node.get("type").and_then(Value::as_str) {
            Some(declared) => PropertyKind::Typed(declared.to_string()),
            None => PropertyKind::Unknown,
        }
    }
}

impl Display for PropertyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::Enum => f.write_str("enum"),
            PropertyKind::Typed(declared) => f.write_str(declared),
            PropertyKind::Unknown => f.write_str("unknown"),
        }
    }
}

/// Extension state read from a schema, with anything suspicious the read ran
/// into.
#[cfg_attr(feature = "debug", derive(Debug))]
#[non_exhaustive]
pub struct ExtensionState {
    /// The extension values currently present, defaults filled in.
    pub extensions: ExtensionSet,
    /// Inconsistencies tolerated while reading.
    pub warnings: Vec<Warning>,
}

impl Document {
    /// List the properties of the schema named `schema_name`, in document
    /// order.
    ///
    /// Properties declaring a non-empty `enum` list report
    /// [`PropertyKind::Enum`] regardless of their declared `type`. Returns an
    /// empty list when the schema or its `properties` map is missing.
    pub fn schema_properties(&self, schema_name: &str) -> Vec<SchemaProperty> {
        let Some(properties) = self
            .schema_node(schema_name)
            .and_then(|schema| schema.get("properties"))
            .and_then(Value::as_mapping)
        else {
            return Vec::new();
        };

        properties
            .iter()
            .filter_map(|(name, node)| {
                let name = name.as_str()?;

                Some(SchemaProperty {
                    name: name.to_string(),
                    kind: PropertyKind::of(node),
                })
            })
            .collect()
    }

    /// Read the current `x-fbp` extension state of the schema named
    /// `schema_name`.
    ///
    /// Missing extension blocks and fields produce their defaults, so a
    /// schema that was never edited reads as [`ExtensionSet::default`].
    /// Unreadable list entries are dropped rather than failing the read.
    /// When several properties carry the enum name extension, the first in
    /// document order wins and a [`Warning::AmbiguousEnumName`] is reported.
    ///
    /// Returns [`Error::SchemaNotFound`] when no schema object with that
    /// name exists.
    pub fn extension_state(&self, schema_name: &str) -> Result<ExtensionState, Error> {
        let Some(schema) = self.schema_node(schema_name) else {
            return Err(Error::SchemaNotFound(schema_name.to_string()));
        };

        let params = schema.get(PARAMS_EXTENSION).and_then(Value::as_mapping);

        let mut business_names = BusinessNames::default();
        let mut enum_name = None;
        let mut warnings = Vec::new();

        if let Some(properties) = schema.get("properties").and_then(Value::as_mapping) {
            for (name, node) in properties {
                let Some(name) = name.as_str() else { continue };
                let business_name = node
                    .get(PROPS_EXTENSION)
                    .and_then(|props| props.get("businessName"))
                    .and_then(Value::as_str);
                if let Some(business_name) = business_name {
                    business_names.insert(name.to_string(), business_name.to_string());
                }
            }

            enum_name = properties
                .iter()
                .find_map(|(_, node)| node.get(ENUM_NAME_EXTENSION))
                .and_then(Value::as_str)
                .map(str::to_string);

            let carriers: Vec<String> = properties
                .iter()
                .filter(|(_, node)| node.get(ENUM_NAME_EXTENSION).is_some())
                .filter_map(|(name, _)| name.as_str().map(str::to_string))
                .collect();
            if carriers.len() > 1 {
                tracing::warn!(
                    schema = schema_name,
                    properties = ?carriers,
                    "multiple properties carry x-fbp-enum-name, keeping the first"
                );
                warnings.push(Warning::AmbiguousEnumName {
                    schema: schema_name.to_string(),
                    properties: carriers,
                });
            }
        }

        let extensions = ExtensionSet {
            root_schema: flag(params, "rootSchema", false),
            generate_persistence_layer: flag(params, "generatePersistenceLayer", false),
            persist: flag(params, "persist", false),
            set_defaults: flag(params, "setDefaults", false),
            is_modifiable: flag(params, "isModifiable", true),
            table_name: params
                .and_then(|params| params.get("tableName"))
                .and_then(Value::as_str)
                .map(str::to_string),
            repo_methods: list(params, "repoMethods"),
            override_methods: list(params, "overrideMethods"),
            interfaces: list(params, "interfaces"),
            end_points: list(params, "endPoints"),
            non_modifiable_attributes: list(params, "nonModifiableAttributes"),
            business_names,
            enum_name,
        };

        Ok(ExtensionState {
            extensions,
            warnings,
        })
    }
}

fn flag(params: Option<&Mapping>, key: &str, default: bool) -> bool {
    params
        .and_then(|params| params.get(key))
        .and_then(Value::as_bool)
        .unwrap_or(default)
}

fn list<T: DeserializeOwned>(params: Option<&Mapping>, key: &str) -> Vec<T> {
    params
        .and_then(|params| params.get(key))
        .and_then(Value::as_sequence)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_norway::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
