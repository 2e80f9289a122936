//! Document engine for FBP feature specifications.
//!
//! A feature specification is an OpenAPI document whose schemas carry
//! `x-fbp` vendor extensions describing what to generate for them. This
//! crate is the editing core behind the specification wizard: it parses and
//! serializes the documents, introspects their schemas for form rendering
//! and merges edited extension state back into the YAML without disturbing
//! anything else in the file.
//!
//! * [`Document`] parses, serializes and extends the OpenAPI YAML tree.
//! * [`Document::schema_properties`] and [`Document::extension_state`] read
//!   a schema for the editor form.
//! * [`Document::apply_extensions`] writes an [`ExtensionSet`] back into a
//!   schema.
//! * [`entity`] holds the auxiliary entity specifications submitted next to
//!   the document.
//!
//! Documents are edited by hand as much as through the wizard, so every
//! operation preserves key order, unknown keys and unrelated content, and
//! reads tolerate odd shapes instead of failing.
//!
//! # Examples
//!
//! Parse a feature document, apply extension state to one schema and
//! serialize it back:
//!
//! ```rust
//! use fbp_spec::{Document, ExtensionSet};
//!
//! let document = Document::parse(
//!     "
//! openapi: 3.0.3
//! components:
//!   schemas:
//!     Order:
//!       type: object
//!       properties:
//!         status:
//!           type: string
//!           enum:
//!             - OPEN
//!             - CLOSED
//! ",
//! )
//! .unwrap();
//!
//! let extensions = ExtensionSet::builder()
//!     .persist(true)
//!     .business_name("status", "Order Status")
//!     .enum_name(Some("OrderStatus"))
//!     .build();
//!
//! let merged = document.apply_extensions("Order", &extensions).unwrap();
//! let yaml = merged.document.to_yaml().unwrap();
//!
//! assert!(yaml.contains("persist: true"));
//! assert!(yaml.contains("businessName: Order Status"));
//! assert!(yaml.contains("x-fbp-enum-name: OrderStatus"));
//! ```

pub use self::document::Document;
pub use self::error::{Error, Warning};
pub use self::extensions::{
    BusinessNames, Endpoint, EndpointBuilder, ExtensionSet, ExtensionSetBuilder, Interface,
    InterfaceBuilder, OverrideMethod, OverrideMethodBuilder, Parameter, ParameterBuilder,
    RepoMethod, RepoMethodBuilder, ENUM_NAME_EXTENSION, PARAMS_EXTENSION, PROPS_EXTENSION,
};
pub use self::introspect::{ExtensionState, PropertyKind, SchemaProperty};
pub use self::merge::Merged;

pub mod document;
pub mod entity;
pub mod error;
pub mod extensions;
pub mod introspect;
pub mod merge;

macro_rules! set_value {
    ( $self:ident $field:ident $value:expr ) => {{
        $self.$field = $value;

        $self
    }};
}
pub(crate) use set_value;

macro_rules! builder {
    ( $( #[$meta:meta] )* $vis:vis struct $name:ident => $builder:ident {
        $( $( #[$field_meta:meta] )* $field_vis:vis $field:ident: $field_ty:ty, )*
    } ) => {
        $( #[$meta] )*
        $vis struct $name {
            $( $( #[$field_meta] )* $field_vis $field: $field_ty, )*
        }

        impl $name {
            #[doc = concat!("Construct a new [`", stringify!($builder), "`].")]
            $vis fn builder() -> $builder {
                $builder::new()
            }
        }

        #[doc = concat!("Builder for [`", stringify!($name),
            "`] with chainable configuration methods.")]
        #[cfg_attr(feature = "debug", derive(Debug))]
        $vis struct $builder {
            $( $field: $field_ty, )*
        }

        impl Default for $builder {
            fn default() -> Self {
                let base = $name::default();
                Self {
                    $( $field: base.$field, )*
                }
            }
        }

        impl $builder {
            #[doc = concat!("Construct a new [`", stringify!($builder), "`].")]
            $vis fn new() -> Self {
                Self::default()
            }

            #[doc = concat!("Construct the [`", stringify!($name), "`] from this builder.")]
            $vis fn build(self) -> $name {
                $name {
                    $( $field: self.$field, )*
                }
            }
        }

        impl From<$builder> for $name {
            fn from(builder: $builder) -> Self {
                builder.build()
            }
        }

        impl From<$name> for $builder {
            fn from(value: $name) -> Self {
                Self {
                    $( $field: value.$field, )*
                }
            }
        }
    };
}
pub(crate) use builder;
