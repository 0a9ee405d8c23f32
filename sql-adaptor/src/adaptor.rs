use crate::config::AdaptorConfig;
use crate::errors::AdaptorError;
use crate::fragment::SqlFragment;
use crate::matchers::{default_matcher, FieldMatcher, KeyValueConfig, KeyValueMatcher};
use crate::schema::{canonical_field_name, is_sql_identifier, Schema, SchemaField};
use crate::validators::ValidatorFn;
use log::{debug, trace};
use query_parser::{Expression, Node, Operation, SyntaxError};
use regex::Regex;
use std::collections::HashMap;

/// A schema-declared field: the column it compiles to and the check its
/// values must pass.
#[derive(Debug, Clone, Copy)]
pub struct DefaultField<'a> {
    pub column: &'a str,
    pub validator: ValidatorFn,
}

#[derive(Debug, Clone)]
struct FieldEntry {
    column: String,
    validator: ValidatorFn,
}

struct CustomMatcher {
    pattern: Regex,
    matcher: Box<dyn FieldMatcher>,
}

/// Compiles parsed queries into parameterized SQL fragments.
///
/// Leaves are resolved against the custom matchers first, in registration
/// order, then against the default fields by canonical name. Built once and
/// shared read-only afterwards.
#[derive(Default)]
pub struct SqlAdaptor {
    matchers: Vec<CustomMatcher>,
    default_fields: HashMap<String, FieldEntry>,
}

impl std::fmt::Debug for SqlAdaptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let patterns: Vec<&str> = self.matchers.iter().map(|m| m.pattern.as_str()).collect();
        let mut fields: Vec<&str> = self.default_fields.keys().map(String::as_str).collect();
        fields.sort_unstable();
        f.debug_struct("SqlAdaptor")
            .field("matchers", &patterns)
            .field("default_fields", &fields)
            .finish()
    }
}

impl SqlAdaptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the default fields from a schema descriptor, inferring each
    /// field's validator from its declared type.
    pub fn from_schema(schema: &Schema) -> Result<Self, AdaptorError> {
        let mut adaptor = Self::new();
        for field in &schema.fields {
            adaptor.add_schema_field(field)?;
        }
        Ok(adaptor)
    }

    pub fn from_config(config: &AdaptorConfig) -> Result<Self, AdaptorError> {
        let mut adaptor = Self::from_schema(&config.fields)?;
        for key_value in &config.key_value {
            adaptor = adaptor.with_key_value(key_value.clone())?;
        }
        debug!(
            "adaptor ready: {} fields, {} matchers",
            adaptor.default_fields.len(),
            adaptor.matchers.len()
        );
        Ok(adaptor)
    }

    fn add_schema_field(&mut self, field: &SchemaField) -> Result<(), AdaptorError> {
        self.insert_field(&field.name, field.column(), field.field_type().validator())
    }

    fn insert_field(
        &mut self,
        name: &str,
        column: &str,
        validator: ValidatorFn,
    ) -> Result<(), AdaptorError> {
        if !is_sql_identifier(column) {
            return Err(AdaptorError::InvalidIdentifier {
                identifier: column.to_string(),
            });
        }
        let canonical = canonical_field_name(name);
        if canonical.is_empty() || self.default_fields.contains_key(&canonical) {
            return Err(AdaptorError::DuplicateField {
                field: name.to_string(),
            });
        }
        trace!("default field {name} -> {column}");
        self.default_fields.insert(
            canonical,
            FieldEntry {
                column: column.to_string(),
                validator,
            },
        );
        Ok(())
    }

    /// Adds a default field with a caller-supplied validator.
    pub fn with_field(
        mut self,
        name: &str,
        column: &str,
        validator: ValidatorFn,
    ) -> Result<Self, AdaptorError> {
        self.insert_field(name, column, validator)?;
        Ok(self)
    }

    /// Registers a custom matcher for field names matching `pattern`.
    /// Matchers are tried in the order they were added.
    pub fn with_matcher(
        mut self,
        pattern: &str,
        matcher: impl FieldMatcher + 'static,
    ) -> Result<Self, AdaptorError> {
        let regex = Regex::new(pattern).map_err(|source| AdaptorError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.matchers.push(CustomMatcher {
            pattern: regex,
            matcher: Box::new(matcher),
        });
        Ok(self)
    }

    /// Registers a [`KeyValueMatcher`] under its collection pattern.
    pub fn with_key_value(self, config: KeyValueConfig) -> Result<Self, AdaptorError> {
        let pattern = config.pattern();
        let matcher = KeyValueMatcher::new(config)?;
        self.with_matcher(&pattern, matcher)
    }

    /// Resolves a field name against the default fields.
    pub fn default_field(&self, name: &str) -> Option<DefaultField<'_>> {
        self.default_fields
            .get(&canonical_field_name(name))
            .map(|entry| DefaultField {
                column: &entry.column,
                validator: entry.validator,
            })
    }

    /// Parses `query` and compiles the resulting tree.
    pub fn compile_query(&self, query: &str) -> Result<SqlFragment, AdaptorError> {
        let node = query_parser::parse(query)?;
        self.compile(&node)
    }

    pub fn compile(&self, node: &Node) -> Result<SqlFragment, AdaptorError> {
        let fragment = match node {
            Node::Expression(expression) => self.compile_expression(expression)?,
            Node::Operation(operation) => self.compile_operation(operation)?,
        };
        debug!(
            "compiled {} placeholders into {}",
            fragment.values.len(),
            fragment.raw
        );
        Ok(fragment)
    }

    fn compile_operation(&self, operation: &Operation) -> Result<SqlFragment, AdaptorError> {
        let left = self.compile_node(&operation.left)?;
        match (operation.gate, &operation.right) {
            (None, None) => Ok(SqlFragment::group(left)),
            (Some(gate), Some(right)) => {
                let right = self.compile_node(right)?;
                Ok(SqlFragment::join(left, gate, right))
            }
            (Some(gate), None) => Err(SyntaxError::new(format!(
                "found open gate: {gate} with no right operand"
            ))
            .into()),
            (None, Some(_)) => {
                Err(SyntaxError::new("expected AND or OR between two expressions").into())
            }
        }
    }

    fn compile_node(&self, node: &Node) -> Result<SqlFragment, AdaptorError> {
        match node {
            Node::Expression(expression) => self.compile_expression(expression),
            Node::Operation(operation) => self.compile_operation(operation),
        }
    }

    fn compile_expression(&self, expression: &Expression) -> Result<SqlFragment, AdaptorError> {
        if let Some(custom) = self
            .matchers
            .iter()
            .find(|custom| custom.pattern.is_match(&expression.field))
        {
            trace!(
                "field {} matched custom pattern {}",
                expression.field,
                custom.pattern.as_str()
            );
            return custom.matcher.compile(expression);
        }

        let field = self
            .default_field(&expression.field)
            .ok_or_else(|| AdaptorError::unknown_field(&expression.field))?;
        (field.validator)(&expression.value).map_err(|reason| {
            AdaptorError::invalid_value(&expression.field, &expression.value, reason)
        })?;
        Ok(default_matcher(
            field.column,
            expression.comparator,
            &expression.value,
        ))
    }
}
