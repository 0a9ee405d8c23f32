use crate::errors::AdaptorError;
use crate::fragment::SqlFragment;
use crate::schema::is_sql_identifier;
use log::trace;
use query_parser::{Comparator, Expression};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Compiles a leaf whose field name matched a custom pattern. The matcher
/// owns the whole SQL shape of the leaf.
pub trait FieldMatcher: Send + Sync {
    fn compile(&self, expression: &Expression) -> Result<SqlFragment, AdaptorError>;
}

impl<F> FieldMatcher for F
where
    F: Fn(&Expression) -> Result<SqlFragment, AdaptorError> + Send + Sync,
{
    fn compile(&self, expression: &Expression) -> Result<SqlFragment, AdaptorError> {
        self(expression)
    }
}

/// `column CMP ?` with the value bound, or `column LIKE ?` with `%value%`
/// for the containment comparator.
pub fn default_matcher(column: &str, comparator: Comparator, value: &str) -> SqlFragment {
    match comparator {
        Comparator::Like => SqlFragment::new(format!("{column} LIKE ?"), vec![like_pattern(value)]),
        _ => SqlFragment::new(
            format!("{column}{}?", comparator.as_str()),
            vec![value.to_string()],
        ),
    }
}

fn like_pattern(value: &str) -> String {
    format!("%{value}%")
}

fn default_owner_column() -> String {
    "id".to_string()
}

fn default_key_column() -> String {
    "key".to_string()
}

fn default_value_column() -> String {
    "value".to_string()
}

/// Layout of a side table holding key/value pairs for an owning row, e.g.
/// `tags(model_id, key, value, deleted_at)` for `models`.
///
/// The default `key` and `value` columns are reserved words in some
/// dialects (MySQL's `KEY`). Rename them there and set `key_column` and
/// `value_column` to match, since identifiers are emitted unquoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueConfig {
    /// Name used in queries, `tags` for `tags[colour]="red"`
    pub collection: String,
    /// Side table, defaults to the collection name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default = "default_owner_column")]
    pub owner_column: String,
    pub foreign_key: String,
    #[serde(default = "default_key_column")]
    pub key_column: String,
    #[serde(default = "default_value_column")]
    pub value_column: String,
    /// Rows with this column set are ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_delete_column: Option<String>,
}

impl KeyValueConfig {
    pub fn new(collection: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            table: None,
            owner_column: default_owner_column(),
            foreign_key: foreign_key.into(),
            key_column: default_key_column(),
            value_column: default_value_column(),
            soft_delete_column: None,
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn owner_column(mut self, column: impl Into<String>) -> Self {
        self.owner_column = column.into();
        self
    }

    pub fn key_column(mut self, column: impl Into<String>) -> Self {
        self.key_column = column.into();
        self
    }

    pub fn value_column(mut self, column: impl Into<String>) -> Self {
        self.value_column = column.into();
        self
    }

    pub fn soft_delete_column(mut self, column: impl Into<String>) -> Self {
        self.soft_delete_column = Some(column.into());
        self
    }

    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.collection)
    }

    /// Field pattern this collection answers to: `<collection>[<key>]`,
    /// collection name matched case-insensitively.
    pub fn pattern(&self) -> String {
        format!(r"^(?i:{})\[(.+)\]$", regex::escape(&self.collection))
    }
}

/// Matcher for `collection[key] CMP value` fields, compiled to a membership
/// subquery against the side table.
#[derive(Debug, Clone)]
pub struct KeyValueMatcher {
    config: KeyValueConfig,
    field_re: Regex,
}

impl KeyValueMatcher {
    pub fn new(config: KeyValueConfig) -> Result<Self, AdaptorError> {
        let identifiers = [
            Some(config.table_name()),
            Some(config.owner_column.as_str()),
            Some(config.foreign_key.as_str()),
            Some(config.key_column.as_str()),
            Some(config.value_column.as_str()),
            config.soft_delete_column.as_deref(),
        ];
        for identifier in identifiers.into_iter().flatten() {
            if !is_sql_identifier(identifier) {
                return Err(AdaptorError::InvalidIdentifier {
                    identifier: identifier.to_string(),
                });
            }
        }
        let pattern = config.pattern();
        let field_re = Regex::new(&pattern)
            .map_err(|source| AdaptorError::InvalidPattern { pattern, source })?;
        Ok(Self { config, field_re })
    }

    pub fn config(&self) -> &KeyValueConfig {
        &self.config
    }

    /// The key inside the brackets, if `field` belongs to this collection.
    pub fn key<'a>(&self, field: &'a str) -> Option<&'a str> {
        self.field_re
            .captures(field)
            .and_then(|captures| captures.get(1))
            .map(|key| key.as_str())
    }
}

impl FieldMatcher for KeyValueMatcher {
    fn compile(&self, expression: &Expression) -> Result<SqlFragment, AdaptorError> {
        let key = self
            .key(&expression.field)
            .ok_or_else(|| AdaptorError::unknown_field(&expression.field))?;
        trace!("key/value lookup on {}[{}]", self.config.collection, key);

        let value_match = default_matcher(
            &self.config.value_column,
            expression.comparator,
            &expression.value,
        );
        let mut raw = format!(
            "{} IN (SELECT {} FROM {} WHERE {}=? AND {}",
            self.config.owner_column,
            self.config.foreign_key,
            self.config.table_name(),
            self.config.key_column,
            value_match.raw,
        );
        if let Some(column) = &self.config.soft_delete_column {
            raw.push_str(&format!(" AND {column} IS NULL"));
        }
        raw.push(')');

        let mut values = vec![key.to_string()];
        values.extend(value_match.values);
        Ok(SqlFragment::new(raw, values))
    }
}
