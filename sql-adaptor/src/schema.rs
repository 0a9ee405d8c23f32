use crate::validators::{integer_validator, null_validator, numeric_validator, ValidatorFn};
use serde::{Deserialize, Serialize};

/// Value validation class inferred from a field's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Numeric,
    Integer,
    Opaque,
}

const NUMERIC_TYPES: &[&str] = &[
    "f32",
    "f64",
    "float",
    "float32",
    "float64",
    "double",
    "double precision",
    "real",
];

const INTEGER_TYPES: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize", "int",
    "int2", "int4", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32",
    "uint64", "integer", "tinyint", "smallint", "bigint", "serial", "bigserial",
];

impl FieldType {
    /// Maps a declared type name to its validation class. Floating point
    /// types are numeric, every integer width is integer, anything else,
    /// `Option<..>` and other nullable wrappers included, is opaque.
    pub fn from_declared(declared: &str) -> Self {
        let declared = declared.trim().to_ascii_lowercase();
        if NUMERIC_TYPES.contains(&declared.as_str()) {
            FieldType::Numeric
        } else if INTEGER_TYPES.contains(&declared.as_str()) {
            FieldType::Integer
        } else {
            FieldType::Opaque
        }
    }

    pub fn validator(self) -> ValidatorFn {
        match self {
            FieldType::Numeric => numeric_validator,
            FieldType::Integer => integer_validator,
            FieldType::Opaque => null_validator,
        }
    }
}

/// One `(name, declared type)` entry of a schema descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: String,
    /// Backing column, when it differs from `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            column: None,
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn field_type(&self) -> FieldType {
        FieldType::from_declared(&self.declared_type)
    }

    /// The identifier written into compiled SQL.
    pub fn column(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}

/// Ordered list of the fields a query may filter on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub fields: Vec<SchemaField>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        self.fields.push(SchemaField::new(name, declared_type));
        self
    }

    pub fn push(&mut self, field: SchemaField) {
        self.fields.push(field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

impl<N: Into<String>, T: Into<String>> FromIterator<(N, T)> for Schema {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, declared_type)| SchemaField::new(name, declared_type))
                .collect(),
        }
    }
}

/// Lookup key for field names: lowercase with word separators removed, so
/// `member_number`, `memberNumber` and `Member-Number` are the same field.
pub fn canonical_field_name(name: &str) -> String {
    name.chars()
        .filter(|ch| !matches!(ch, '_' | '-' | '.' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Plain `[A-Za-z_][A-Za-z0-9_]*` identifiers, optionally dot-qualified.
pub(crate) fn is_sql_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(ch) if ch.is_ascii_alphabetic() || ch == '_')
                && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        })
}
