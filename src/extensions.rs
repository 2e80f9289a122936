//! Typed form state for the `x-fbp` vendor extensions.
//!
//! The extension editor works on an [`ExtensionSet`]: the complete desired
//! extension state for one schema. Reading a schema produces one (see
//! [`Document::extension_state`][crate::Document::extension_state]), the
//! merge engine writes one back (see
//! [`Document::apply_extensions`][crate::Document::apply_extensions]).
//!
//! An [`ExtensionSet`] is total. Every field is written on merge, so leaving
//! a field at its default clears the corresponding document value rather than
//! keeping whatever was there before.

use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{builder, set_value};

/// Schema-level extension block holding code generation parameters.
pub const PARAMS_EXTENSION: &str = "x-fbp-params";
/// Property-level extension block holding display metadata.
pub const PROPS_EXTENSION: &str = "x-fbp-props";
/// Property-level extension naming the enumeration type generated for the
/// schema. At most one property of a schema carries it.
pub const ENUM_NAME_EXTENSION: &str = "x-fbp-enum-name";

builder! {
    /// Desired `x-fbp` extension state for one schema.
    ///
    /// Scalar fields land in the schema's `x-fbp-params` block, the lists
    /// land there as whole arrays, [`business_names`][Self::business_names]
    /// fan out into per-property `x-fbp-props` blocks and
    /// [`enum_name`][Self::enum_name] onto the first enum-typed property.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fbp_spec::ExtensionSet;
    /// let extensions = ExtensionSet::builder()
    ///     .persist(true)
    ///     .table_name(Some("purchase_order"))
    ///     .business_name("id", "Order Number")
    ///     .build();
    ///
    /// assert!(extensions.is_modifiable);
    /// ```
    #[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "debug", derive(Debug))]
    #[serde(rename_all = "camelCase", default)]
    #[non_exhaustive]
    pub struct ExtensionSet => ExtensionSetBuilder {
        /// Whether the schema is the aggregate root of the feature.
        pub root_schema: bool,
        /// Whether a persistence layer is generated for the schema.
        pub generate_persistence_layer: bool,
        /// Whether instances of the schema are persisted.
        pub persist: bool,
        /// Whether generated fields are initialized with defaults.
        pub set_defaults: bool,
        /// Whether generated records accept modification. Defaults to `true`.
        pub is_modifiable: bool,
        /// Database table backing the schema. `None` is written as an
        /// explicit YAML `null`.
        pub table_name: Option<String>,
        /// Repository methods to generate.
        pub repo_methods: Vec<RepoMethod>,
        /// Generated methods whose bodies are overridden.
        pub override_methods: Vec<OverrideMethod>,
        /// Extra interfaces the generated entity implements.
        pub interfaces: Vec<Interface>,
        /// REST endpoints to generate.
        pub end_points: Vec<Endpoint>,
        /// Names of properties excluded from modification.
        pub non_modifiable_attributes: Vec<String>,
        /// Business names keyed by property name.
        pub business_names: BusinessNames,
        /// Name of the enumeration type generated for the schema.
        pub enum_name: Option<String>,
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self {
            root_schema: false,
            generate_persistence_layer: false,
            persist: false,
            set_defaults: false,
            is_modifiable: true,
            table_name: None,
            repo_methods: Vec::new(),
            override_methods: Vec::new(),
            interfaces: Vec::new(),
            end_points: Vec::new(),
            non_modifiable_attributes: Vec::new(),
            business_names: BusinessNames::default(),
            enum_name: None,
        }
    }
}

impl ExtensionSetBuilder {
    /// Mark the schema as the aggregate root of the feature.
    pub fn root_schema(mut self, root_schema: bool) -> Self {
        set_value!(self root_schema root_schema)
    }

    /// Generate a persistence layer for the schema.
    pub fn generate_persistence_layer(mut self, generate_persistence_layer: bool) -> Self {
        set_value!(self generate_persistence_layer generate_persistence_layer)
    }

    /// Persist instances of the schema.
    pub fn persist(mut self, persist: bool) -> Self {
        set_value!(self persist persist)
    }

    /// Initialize generated fields with defaults.
    pub fn set_defaults(mut self, set_defaults: bool) -> Self {
        set_value!(self set_defaults set_defaults)
    }

    /// Allow modification of generated records.
    pub fn is_modifiable(mut self, is_modifiable: bool) -> Self {
        set_value!(self is_modifiable is_modifiable)
    }

    /// Set the database table backing the schema.
    pub fn table_name<S: Into<String>>(mut self, table_name: Option<S>) -> Self {
        set_value!(self table_name table_name.map(Into::into))
    }

    /// Set the repository methods to generate.
    pub fn repo_methods<I: IntoIterator<Item = RepoMethod>>(mut self, repo_methods: I) -> Self {
        set_value!(self repo_methods repo_methods.into_iter().collect())
    }

    /// Append one repository method.
    pub fn repo_method(mut self, repo_method: RepoMethod) -> Self {
        self.repo_methods.push(repo_method);

        self
    }

    /// Set the generated methods whose bodies are overridden.
    pub fn override_methods<I: IntoIterator<Item = OverrideMethod>>(
        mut self,
        override_methods: I,
    ) -> Self {
        set_value!(self override_methods override_methods.into_iter().collect())
    }

    /// Append one override method.
    pub fn override_method(mut self, override_method: OverrideMethod) -> Self {
        self.override_methods.push(override_method);

        self
    }

    /// Set the extra interfaces the generated entity implements.
    pub fn interfaces<I: IntoIterator<Item = Interface>>(mut self, interfaces: I) -> Self {
        set_value!(self interfaces interfaces.into_iter().collect())
    }

    /// Append one interface.
    pub fn interface(mut self, interface: Interface) -> Self {
        self.interfaces.push(interface);

        self
    }

    /// Set the REST endpoints to generate.
    pub fn end_points<I: IntoIterator<Item = Endpoint>>(mut self, end_points: I) -> Self {
        set_value!(self end_points end_points.into_iter().collect())
    }

    /// Append one endpoint.
    pub fn end_point(mut self, end_point: Endpoint) -> Self {
        self.end_points.push(end_point);

        self
    }

    /// Set the properties excluded from modification.
    pub fn non_modifiable_attributes<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        non_modifiable_attributes: I,
    ) -> Self {
        set_value!(self non_modifiable_attributes non_modifiable_attributes
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Set all business names at once.
    pub fn business_names(mut self, business_names: BusinessNames) -> Self {
        set_value!(self business_names business_names)
    }

    /// Assign a business name to one property.
    pub fn business_name<K: Into<String>, V: Into<String>>(mut self, property: K, name: V) -> Self {
        self.business_names.insert(property.into(), name.into());

        self
    }

    /// Set the name of the enumeration type generated for the schema.
    pub fn enum_name<S: Into<String>>(mut self, enum_name: Option<S>) -> Self {
        set_value!(self enum_name enum_name.map(Into::into))
    }
}

/// Business name assignments for the properties of one schema.
///
/// Keys are property names, values the human readable names shown in
/// generated user interfaces. Entries keep their insertion order, which is
/// the order the merge engine writes them in. An empty string value means
/// the property has no business name and clears an existing one on merge.
#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "debug", derive(Debug))]
#[serde(transparent)]
pub struct BusinessNames {
    names: IndexMap<String, String>,
}

impl Deref for BusinessNames {
    type Target = IndexMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &self.names
    }
}

impl DerefMut for BusinessNames {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.names
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BusinessNames {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl From<IndexMap<String, String>> for BusinessNames {
    fn from(names: IndexMap<String, String>) -> Self {
        Self { names }
    }
}

impl From<BusinessNames> for IndexMap<String, String> {
    fn from(business_names: BusinessNames) -> Self {
        business_names.names
    }
}

builder! {
    /// Repository method to generate for a schema.
    #[derive(Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "debug", derive(Debug))]
    #[serde(rename_all = "camelCase", default)]
    #[non_exhaustive]
    pub struct RepoMethod => RepoMethodBuilder {
        /// Name of the generated method.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        /// Query the method executes.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub query: Option<String>,
        /// Fetch method backing the query.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub fetch_method: Option<String>,
        /// Comma separated fetch parameter names.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub fetch_params: Option<String>,
        /// Return type of the generated method.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub return_type: Option<String>,
        /// Parameters of the generated method.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub parameters: Vec<Parameter>,
    }
}

impl RepoMethodBuilder {
    /// Set the name of the generated method.
    pub fn name<S: Into<String>>(mut self, name: Option<S>) -> Self {
        set_value!(self name name.map(Into::into))
    }

    /// Set the query the method executes.
    pub fn query<S: Into<String>>(mut self, query: Option<S>) -> Self {
        set_value!(self query query.map(Into::into))
    }

    /// Set the fetch method backing the query.
    pub fn fetch_method<S: Into<String>>(mut self, fetch_method: Option<S>) -> Self {
        set_value!(self fetch_method fetch_method.map(Into::into))
    }

    /// Set the comma separated fetch parameter names.
    pub fn fetch_params<S: Into<String>>(mut self, fetch_params: Option<S>) -> Self {
        set_value!(self fetch_params fetch_params.map(Into::into))
    }

    /// Set the return type of the generated method.
    pub fn return_type<S: Into<String>>(mut self, return_type: Option<S>) -> Self {
        set_value!(self return_type return_type.map(Into::into))
    }

    /// Append one parameter.
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);

        self
    }
}

builder! {
    /// Generated method whose body is overridden by hand written code.
    #[derive(Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "debug", derive(Debug))]
    #[serde(rename_all = "camelCase", default)]
    #[non_exhaustive]
    pub struct OverrideMethod => OverrideMethodBuilder {
        /// Name of the overridden method.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        /// Return type of the overridden method.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub return_type: Option<String>,
        /// Parameters of the overridden method.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub parameters: Vec<Parameter>,
    }
}

impl OverrideMethodBuilder {
    /// Set the name of the overridden method.
    pub fn name<S: Into<String>>(mut self, name: Option<S>) -> Self {
        set_value!(self name name.map(Into::into))
    }

    /// Set the return type of the overridden method.
    pub fn return_type<S: Into<String>>(mut self, return_type: Option<S>) -> Self {
        set_value!(self return_type return_type.map(Into::into))
    }

    /// Append one parameter.
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);

        self
    }
}

builder! {
    /// Interface the generated entity implements in addition to the
    /// defaults.
    #[derive(Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "debug", derive(Debug))]
    #[serde(rename_all = "camelCase", default)]
    #[non_exhaustive]
    pub struct Interface => InterfaceBuilder {
        /// Simple name of the interface.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        /// Package the interface lives in.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub package: Option<String>,
    }
}

impl InterfaceBuilder {
    /// Set the simple name of the interface.
    pub fn name<S: Into<String>>(mut self, name: Option<S>) -> Self {
        set_value!(self name name.map(Into::into))
    }

    /// Set the package the interface lives in.
    pub fn package<S: Into<String>>(mut self, package: Option<S>) -> Self {
        set_value!(self package package.map(Into::into))
    }
}

builder! {
    /// REST endpoint to generate for a schema.
    #[derive(Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "debug", derive(Debug))]
    #[serde(rename_all = "camelCase", default)]
    #[non_exhaustive]
    pub struct Endpoint => EndpointBuilder {
        /// Path of the endpoint relative to the service root.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub path: Option<String>,
        /// HTTP method of the endpoint, one of `GET`, `POST`, `PUT` or
        /// `DELETE`.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub method: Option<String>,
        /// Operation id used for the generated handler.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub operation_id: Option<String>,
        /// Parameters of the endpoint.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub parameters: Vec<Parameter>,
    }
}

impl EndpointBuilder {
    /// Set the path of the endpoint.
    pub fn path<S: Into<String>>(mut self, path: Option<S>) -> Self {
        set_value!(self path path.map(Into::into))
    }

    /// Set the HTTP method of the endpoint.
    pub fn method<S: Into<String>>(mut self, method: Option<S>) -> Self {
        set_value!(self method method.map(Into::into))
    }

    /// Set the operation id used for the generated handler.
    pub fn operation_id<S: Into<String>>(mut self, operation_id: Option<S>) -> Self {
        set_value!(self operation_id operation_id.map(Into::into))
    }

    /// Append one parameter.
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);

        self
    }
}

builder! {
    /// Parameter of a generated endpoint or method.
    #[derive(Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "debug", derive(Debug))]
    #[serde(rename_all = "camelCase", default)]
    #[non_exhaustive]
    pub struct Parameter => ParameterBuilder {
        /// Name of the parameter.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        /// Location of the parameter, for example `path` or `query`.
        #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
        pub parameter_in: Option<String>,
        /// Declared type of the parameter.
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        pub param_type: Option<String>,
        /// Whether the parameter is required.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub required: Option<bool>,
    }
}

impl ParameterBuilder {
    /// Set the name of the parameter.
    pub fn name<S: Into<String>>(mut self, name: Option<S>) -> Self {
        set_value!(self name name.map(Into::into))
    }

    /// Set the location of the parameter.
    pub fn parameter_in<S: Into<String>>(mut self, parameter_in: Option<S>) -> Self {
        set_value!(self parameter_in parameter_in.map(Into::into))
    }

    /// Set the declared type of the parameter.
    pub fn param_type<S: Into<String>>(mut self, param_type: Option<S>) -> Self {
        set_value!(self param_type param_type.map(Into::into))
    }

    /// Set whether the parameter is required.
    pub fn required(mut self, required: Option<bool>) -> Self {
        set_value!(self required required)
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn default_set_is_modifiable_and_otherwise_empty() {
        let extensions = ExtensionSet::default();

        assert!(extensions.is_modifiable);
        assert!(!extensions.root_schema);
        assert!(!extensions.persist);
        assert!(extensions.table_name.is_none());
        assert!(extensions.repo_methods.is_empty());
        assert!(extensions.business_names.is_empty());
        assert!(extensions.enum_name.is_none());
    }

    #[test]
    fn builder_assembles_full_set() {
        let extensions = ExtensionSet::builder()
            .root_schema(true)
            .persist(true)
            .table_name(Some("purchase_order"))
            .repo_method(
                RepoMethod::builder()
                    .query(Some("findByStatus"))
                    .fetch_params(Some("status"))
                    .build(),
            )
            .non_modifiable_attributes(["createdAt"])
            .business_name("id", "Order Number")
            .business_name("status", "Order Status")
            .enum_name(Some("OrderStatus"))
            .build();

        assert!(extensions.root_schema);
        assert_eq!(extensions.table_name.as_deref(), Some("purchase_order"));
        assert_eq!(extensions.repo_methods.len(), 1);
        assert_eq!(extensions.non_modifiable_attributes, ["createdAt"]);
        assert_eq!(
            extensions.business_names.get("status").map(String::as_str),
            Some("Order Status")
        );
        assert_eq!(extensions.enum_name.as_deref(), Some("OrderStatus"));
    }

    #[test]
    fn business_names_keep_insertion_order() {
        let names = BusinessNames::from_iter([
            ("zeta", "Zeta"),
            ("alpha", "Alpha"),
            ("mid", "Mid"),
        ]);

        let keys: Vec<&str> = names.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn repo_method_serializes_only_present_fields() {
        let method = RepoMethod::builder()
            .query(Some("findByStatus"))
            .fetch_method(Some("findByStatus"))
            .fetch_params(Some("status"))
            .build();

        assert_json_eq!(
            serde_json::to_value(&method).unwrap(),
            json!({
                "query": "findByStatus",
                "fetchMethod": "findByStatus",
                "fetchParams": "status",
            })
        );
    }

    #[test]
    fn parameter_uses_reserved_yaml_key_names() {
        let parameter = Parameter::builder()
            .name(Some("orderId"))
            .parameter_in(Some("path"))
            .param_type(Some("integer"))
            .required(Some(true))
            .build();

        assert_json_eq!(
            serde_json::to_value(&parameter).unwrap(),
            json!({
                "name": "orderId",
                "in": "path",
                "type": "integer",
                "required": true,
            })
        );
    }

    #[test]
    fn extension_set_deserializes_with_defaults() {
        let extensions: ExtensionSet = serde_json::from_value(json!({
            "persist": true,
            "businessNames": { "id": "Identifier" },
        }))
        .unwrap();

        assert!(extensions.persist);
        assert!(extensions.is_modifiable);
        assert_eq!(
            extensions.business_names.get("id").map(String::as_str),
            Some("Identifier")
        );
    }
}
