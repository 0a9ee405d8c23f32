//! Compiles sieve filter queries into parameterized SQL fragments.
//!
//! ```
//! use sql_adaptor::{Schema, SqlAdaptor};
//!
//! let schema = Schema::new().field("name", "String").field("age", "u32");
//! let adaptor = SqlAdaptor::from_schema(&schema).unwrap();
//! let fragment = adaptor.compile_query(r#"name="max" AND age>10"#).unwrap();
//! assert_eq!(fragment.raw, "(name=? AND age>?)");
//! assert_eq!(fragment.values, vec!["max", "10"]);
//! ```
//!
//! User input only ever reaches the `values` list. The template holds
//! schema-declared identifiers, comparators and `?` placeholders.

mod adaptor;
mod config;
mod errors;
mod fragment;
mod matchers;
mod schema;
mod validators;

pub use adaptor::{DefaultField, SqlAdaptor};
pub use config::AdaptorConfig;
pub use errors::AdaptorError;
pub use fragment::SqlFragment;
pub use matchers::{default_matcher, FieldMatcher, KeyValueConfig, KeyValueMatcher};
pub use query_parser;
pub use schema::{canonical_field_name, FieldType, Schema, SchemaField};
pub use validators::{integer_validator, null_validator, numeric_validator, ValidatorFn};

#[cfg(test)]
mod tests;
