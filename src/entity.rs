//! Entity specifications submitted alongside the OpenAPI document.
//!
//! A feature submission can carry auxiliary persistence models next to the
//! document itself. Each [`EntitySpec`] is committed as its own
//! `<entityName>.entity.json` file and describes a database entity: its
//! fields, keys and relationships. The merge engine never touches these,
//! they are serialized verbatim into the submission.

use serde::{Deserialize, Serialize};

use crate::{builder, set_value};

builder! {
    /// One database entity captured by the wizard.
    #[derive(Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "debug", derive(Debug))]
    #[serde(rename_all = "camelCase", default)]
    #[non_exhaustive]
    pub struct EntitySpec => EntitySpecBuilder {
        /// Identifier assigned by the editing session.
        pub id: String,
        /// Name of the entity. Also names the submitted file.
        pub entity_name: String,
        /// Database table backing the entity.
        pub table_name: Option<String>,
        /// Fields of the entity.
        pub fields: Vec<EntityField>,
        /// Relationships to other entities.
        pub relationships: Vec<EntityRelationship>,
        /// Whether the entity stands alone instead of backing a schema.
        pub is_standalone: bool,
        /// Name of the schema the entity is linked to, when not standalone.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub linked_schema_name: Option<String>,
    }
}

impl EntitySpec {
    /// Construct a new entity specification with the given identifier and
    /// name.
    pub fn new<S: Into<String>>(id: S, entity_name: S) -> EntitySpec {
        EntitySpec {
            id: id.into(),
            entity_name: entity_name.into(),
            ..EntitySpec::default()
        }
    }

    /// Serialize the entity to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the entity to pretty JSON, as submitted.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Name of the file the entity is committed as.
    pub fn file_name(&self) -> String {
        format!("{}.entity.json", self.entity_name)
    }
}

impl EntitySpecBuilder {
    /// Set the identifier assigned by the editing session.
    pub fn id<S: Into<String>>(mut self, id: S) -> Self {
        set_value!(self id id.into())
    }

    /// Set the name of the entity.
    pub fn entity_name<S: Into<String>>(mut self, entity_name: S) -> Self {
        set_value!(self entity_name entity_name.into())
    }

    /// Set the database table backing the entity.
    pub fn table_name<S: Into<String>>(mut self, table_name: Option<S>) -> Self {
        set_value!(self table_name table_name.map(Into::into))
    }

    /// Set the fields of the entity.
    pub fn fields<I: IntoIterator<Item = EntityField>>(mut self, fields: I) -> Self {
        set_value!(self fields fields.into_iter().collect())
    }

    /// Append one field.
    pub fn field(mut self, field: EntityField) -> Self {
        self.fields.push(field);

        self
    }

    /// Set the relationships to other entities.
    pub fn relationships<I: IntoIterator<Item = EntityRelationship>>(
        mut self,
        relationships: I,
    ) -> Self {
        set_value!(self relationships relationships.into_iter().collect())
    }

    /// Append one relationship.
    pub fn relationship(mut self, relationship: EntityRelationship) -> Self {
        self.relationships.push(relationship);

        self
    }

    /// Mark the entity as standalone.
    pub fn is_standalone(mut self, is_standalone: bool) -> Self {
        set_value!(self is_standalone is_standalone)
    }

    /// Set the name of the schema the entity is linked to.
    pub fn linked_schema_name<S: Into<String>>(mut self, linked_schema_name: Option<S>) -> Self {
        set_value!(self linked_schema_name linked_schema_name.map(Into::into))
    }
}

builder! {
    /// One field of an entity.
    #[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "debug", derive(Debug))]
    #[serde(rename_all = "camelCase", default)]
    #[non_exhaustive]
    pub struct EntityField => EntityFieldBuilder {
        /// Name of the field.
        pub field_name: String,
        /// Database column backing the field.
        pub column_name: Option<String>,
        /// Domain data type of the field, for example `Long` or `String`.
        pub domain_data_type: String,
        /// Whether the field is part of the primary key.
        pub is_primary_key: bool,
        /// How primary key values are generated. Only meaningful on key
        /// fields.
        pub primary_key_generation_strategy: Option<PrimaryKeyGeneration>,
        /// Whether the column accepts null values.
        pub is_nullable: bool,
    }
}

impl Default for EntityField {
    fn default() -> Self {
        Self {
            field_name: String::new(),
            column_name: None,
            domain_data_type: String::new(),
            is_primary_key: false,
            primary_key_generation_strategy: None,
            is_nullable: true,
        }
    }
}

impl EntityFieldBuilder {
    /// Set the name of the field.
    pub fn field_name<S: Into<String>>(mut self, field_name: S) -> Self {
        set_value!(self field_name field_name.into())
    }

    /// Set the database column backing the field.
    pub fn column_name<S: Into<String>>(mut self, column_name: Option<S>) -> Self {
        set_value!(self column_name column_name.map(Into::into))
    }

    /// Set the domain data type of the field.
    pub fn domain_data_type<S: Into<String>>(mut self, domain_data_type: S) -> Self {
        set_value!(self domain_data_type domain_data_type.into())
    }

    /// Mark the field as part of the primary key.
    pub fn is_primary_key(mut self, is_primary_key: bool) -> Self {
        set_value!(self is_primary_key is_primary_key)
    }

    /// Set how primary key values are generated.
    pub fn primary_key_generation_strategy(
        mut self,
        primary_key_generation_strategy: Option<PrimaryKeyGeneration>,
    ) -> Self {
        set_value!(self primary_key_generation_strategy primary_key_generation_strategy)
    }

    /// Set whether the column accepts null values.
    pub fn is_nullable(mut self, is_nullable: bool) -> Self {
        set_value!(self is_nullable is_nullable)
    }
}

builder! {
    /// One relationship from an entity to another.
    #[derive(Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
    #[cfg_attr(feature = "debug", derive(Debug))]
    #[serde(rename_all = "camelCase", default)]
    #[non_exhaustive]
    pub struct EntityRelationship => EntityRelationshipBuilder {
        /// Name of the field holding the relationship.
        pub field_name: String,
        /// Name of the entity the relationship points to.
        pub target_entity: String,
        /// Cardinality of the relationship.
        pub relationship_type: RelationshipKind,
        /// Field on the target entity owning the relationship, when
        /// inverse.
        pub mapped_by: Option<String>,
        /// How the related entity is loaded.
        pub fetch_type: FetchKind,
        /// Operations cascading to the related entity.
        pub cascade_options: Vec<CascadeOption>,
        /// Join column backing the relationship.
        pub join_column_name: Option<String>,
    }
}

impl EntityRelationshipBuilder {
    /// Set the name of the field holding the relationship.
    pub fn field_name<S: Into<String>>(mut self, field_name: S) -> Self {
        set_value!(self field_name field_name.into())
    }

    /// Set the name of the entity the relationship points to.
    pub fn target_entity<S: Into<String>>(mut self, target_entity: S) -> Self {
        set_value!(self target_entity target_entity.into())
    }

    /// Set the cardinality of the relationship.
    pub fn relationship_type(mut self, relationship_type: RelationshipKind) -> Self {
        set_value!(self relationship_type relationship_type)
    }

    /// Set the field on the target entity owning the relationship.
    pub fn mapped_by<S: Into<String>>(mut self, mapped_by: Option<S>) -> Self {
        set_value!(self mapped_by mapped_by.map(Into::into))
    }

    /// Set how the related entity is loaded.
    pub fn fetch_type(mut self, fetch_type: FetchKind) -> Self {
        set_value!(self fetch_type fetch_type)
    }

    /// Set the operations cascading to the related entity.
    pub fn cascade_options<I: IntoIterator<Item = CascadeOption>>(
        mut self,
        cascade_options: I,
    ) -> Self {
        set_value!(self cascade_options cascade_options.into_iter().collect())
    }

    /// Set the join column backing the relationship.
    pub fn join_column_name<S: Into<String>>(mut self, join_column_name: Option<S>) -> Self {
        set_value!(self join_column_name join_column_name.map(Into::into))
    }
}

/// How primary key values are generated.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug", derive(Debug))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimaryKeyGeneration {
    /// The persistence provider picks a strategy.
    Auto,
    /// Values come from a database sequence.
    Sequence,
    /// Values come from an identity column.
    Identity,
    /// Values are assigned by the application.
    None,
}

/// Cardinality of an entity relationship.
#[derive(Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    #[default]
    ManyToOne,
    ManyToMany,
}

/// How a related entity is loaded.
#[derive(Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug", derive(Debug))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchKind {
    #[default]
    Lazy,
    Eager,
}

/// Operation cascading from an entity to a related one.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug", derive(Debug))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CascadeOption {
    All,
    Persist,
    Merge,
    Remove,
    Refresh,
    Detach,
}

/// Find the entity whose name equals `name`, compared case insensitively.
///
/// Entity names become file names, so two entities may not differ only in
/// case.
pub fn find_duplicate<'a>(entities: &'a [EntitySpec], name: &str) -> Option<&'a EntitySpec> {
    entities
        .iter()
        .find(|entity| entity.entity_name.eq_ignore_ascii_case(name))
}
