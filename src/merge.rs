//! The extension merge engine.
//!
//! Merging writes an [`ExtensionSet`] into one schema of a document. The
//! operation is total: every submitted value is written, whether or not it
//! differs from what the document holds, and values the set no longer
//! contains are cleared. Everything outside the target schema is left
//! byte for byte as it was, and applying the same set twice produces the
//! same document as applying it once.

use serde::Serialize;
use serde_norway::{Mapping, Value};

use crate::document::{ensure_child_mapping, Document};
use crate::error::{Error, Warning};
use crate::extensions::{
    BusinessNames, ExtensionSet, ENUM_NAME_EXTENSION, PARAMS_EXTENSION, PROPS_EXTENSION,
};

/// Outcome of [`Document::apply_extensions`].
#[cfg_attr(feature = "debug", derive(Debug))]
#[non_exhaustive]
pub struct Merged {
    /// The document with the extensions applied.
    pub document: Document,
    /// Inconsistencies tolerated while merging.
    pub warnings: Vec<Warning>,
}

impl Document {
    /// Apply the desired extension state to the schema named `schema_name`,
    /// returning the updated document.
    ///
    /// The receiver is not modified. On success the returned
    /// [`Merged::document`] differs from the receiver only inside the target
    /// schema:
    ///
    /// * the scalar fields land in the schema's `x-fbp-params` block, which
    ///   is created when missing, with `table_name: None` written as an
    ///   explicit `null`,
    /// * the list fields replace their `x-fbp-params` arrays wholesale, an
    ///   empty list replacing with an empty array,
    /// * business names are reconciled into per-property `x-fbp-props`
    ///   blocks: submitted names are written, creating missing property
    ///   nodes on the way, names the set does not carry are removed and
    ///   `x-fbp-props` blocks left empty are deleted,
    /// * `x-fbp-enum-name` is removed from every property and then written
    ///   on the first enum-typed property, when an enum name is set. A name
    ///   with no enum-typed property to land on is dropped with a
    ///   [`Warning::OrphanedEnumName`].
    ///
    /// Returns [`Error::SchemaNotFound`] when no schema object with that
    /// name exists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fbp_spec::{Document, ExtensionSet};
    /// let document = Document::parse(
    ///     "
    /// components:
    ///   schemas:
    ///     Order:
    ///       type: object
    ///       properties:
    ///         id:
    ///           type: integer
    /// ",
    /// )
    /// .unwrap();
    ///
    /// let extensions = ExtensionSet::builder().persist(true).build();
    /// let merged = document.apply_extensions("Order", &extensions).unwrap();
    ///
    /// assert!(merged.document.to_yaml().unwrap().contains("persist: true"));
    /// ```
    pub fn apply_extensions(
        &self,
        schema_name: &str,
        extensions: &ExtensionSet,
    ) -> Result<Merged, Error> {
        let enum_target = self
            .schema_properties(schema_name)
            .into_iter()
            .find(|property| property.kind.is_enum())
            .map(|property| property.name);

        let mut document = self.clone();
        let Some(schema) = document.schema_node_mut(schema_name) else {
            return Err(Error::SchemaNotFound(schema_name.to_string()));
        };

        let mut warnings = Vec::new();
        write_params(schema, extensions)?;
        write_business_names(schema, &extensions.business_names);
        place_enum_name(
            schema,
            schema_name,
            extensions.enum_name.as_deref(),
            enum_target.as_deref(),
            &mut warnings,
        );

        Ok(Merged { document, warnings })
    }
}

/// Write the scalar and list fields into the schema's `x-fbp-params` block.
///
/// Keys already present keep their position, new keys are appended in a
/// fixed order, so repeated writes are stable.
fn write_params(schema: &mut Mapping, extensions: &ExtensionSet) -> Result<(), Error> {
    let params = ensure_child_mapping(schema, PARAMS_EXTENSION);

    params.insert("rootSchema".into(), extensions.root_schema.into());
    params.insert(
        "generatePersistenceLayer".into(),
        extensions.generate_persistence_layer.into(),
    );
    params.insert("persist".into(), extensions.persist.into());
    params.insert("setDefaults".into(), extensions.set_defaults.into());
    params.insert("isModifiable".into(), extensions.is_modifiable.into());
    params.insert(
        "tableName".into(),
        match &extensions.table_name {
            Some(table_name) => table_name.as_str().into(),
            None => Value::Null,
        },
    );

    params.insert("repoMethods".into(), to_value(&extensions.repo_methods)?);
    params.insert(
        "overrideMethods".into(),
        to_value(&extensions.override_methods)?,
    );
    params.insert("interfaces".into(), to_value(&extensions.interfaces)?);
    params.insert("endPoints".into(), to_value(&extensions.end_points)?);
    params.insert(
        "nonModifiableAttributes".into(),
        to_value(&extensions.non_modifiable_attributes)?,
    );

    Ok(())
}

/// Reconcile per-property `x-fbp-props` business names with the submitted
/// set.
///
/// Names missing from the set, or submitted as the empty string, are
/// cleared. Submitted names are written, creating a stub property node when
/// the document does not declare the property. Property nodes that are not
/// mappings are left alone. An `x-fbp-props` block left empty afterwards is
/// deleted.
fn write_business_names(schema: &mut Mapping, names: &BusinessNames) {
    if let Some(properties) = schema.get_mut("properties").and_then(Value::as_mapping_mut) {
        for (name, node) in properties.iter_mut() {
            let keeps_name = name
                .as_str()
                .is_some_and(|name| names.get(name).is_some_and(|label| !label.is_empty()));
            if keeps_name {
                continue;
            }
            if let Some(props) = node.get_mut(PROPS_EXTENSION).and_then(Value::as_mapping_mut) {
                props.shift_remove("businessName");
            }
        }
    }

    for (property, name) in names.iter() {
        if name.is_empty() {
            continue;
        }
        let properties = ensure_child_mapping(schema, "properties");
        let Some(node) = property_slot(properties, property) else {
            continue;
        };
        let props = ensure_child_mapping(node, PROPS_EXTENSION);
        props.insert("businessName".into(), name.as_str().into());
    }

    if let Some(properties) = schema.get_mut("properties").and_then(Value::as_mapping_mut) {
        for (_, node) in properties.iter_mut() {
            let Some(node) = node.as_mapping_mut() else {
                continue;
            };
            if node
                .get(PROPS_EXTENSION)
                .and_then(Value::as_mapping)
                .is_some_and(Mapping::is_empty)
            {
                node.shift_remove(PROPS_EXTENSION);
            }
        }
    }
}

/// The property node named `name`, created as an empty mapping when absent.
///
/// Returns `None` when the property exists but is not a mapping.
fn property_slot<'a>(properties: &'a mut Mapping, name: &str) -> Option<&'a mut Mapping> {
    properties
        .entry(name.into())
        .or_insert_with(|| Value::Mapping(Mapping::new()))
        .as_mapping_mut()
}

/// Remove `x-fbp-enum-name` from every property and re-place it on the
/// first enum-typed one.
///
/// `target` is the name of the first enum-typed property of the schema, as
/// introspected before the merge. An empty `enum_name` counts as absent.
fn place_enum_name(
    schema: &mut Mapping,
    schema_name: &str,
    enum_name: Option<&str>,
    target: Option<&str>,
    warnings: &mut Vec<Warning>,
) {
    let enum_name = enum_name.filter(|name| !name.is_empty());
    let destination = enum_name.and(target);

    if let Some(properties) = schema.get_mut("properties").and_then(Value::as_mapping_mut) {
        for (name, node) in properties.iter_mut() {
            if destination.is_some() && name.as_str() == destination {
                continue;
            }
            if let Some(node) = node.as_mapping_mut() {
                node.shift_remove(ENUM_NAME_EXTENSION);
            }
        }
    }

    let Some(enum_name) = enum_name else { return };

    let Some(destination) = destination else {
        tracing::warn!(
            schema = schema_name,
            enum_name,
            "no enum-typed property to carry x-fbp-enum-name"
        );
        warnings.push(Warning::OrphanedEnumName {
            schema: schema_name.to_string(),
            enum_name: enum_name.to_string(),
        });
        return;
    };

    if let Some(node) = schema
        .get_mut("properties")
        .and_then(Value::as_mapping_mut)
        .and_then(|properties| properties.get_mut(destination))
        .and_then(Value::as_mapping_mut)
    {
        node.insert(ENUM_NAME_EXTENSION.into(), enum_name.into());
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, Error> {
    serde_norway::to_value(value).map_err(Error::Serialize)
}
