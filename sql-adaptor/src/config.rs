use crate::matchers::KeyValueConfig;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};

/// Everything needed to build a [`crate::SqlAdaptor`], in a form that can be
/// loaded from YAML or JSON.
///
/// ```yaml
/// fields:
///   - { name: name, type: String }
///   - { name: age, type: u32 }
///   - { name: memberNumber, type: String, column: member_number }
/// key_value:
///   - collection: tags
///     foreign_key: model_id
///     soft_delete_column: deleted_at
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptorConfig {
    #[serde(default)]
    pub fields: Schema,
    #[serde(default)]
    pub key_value: Vec<KeyValueConfig>,
}

impl AdaptorConfig {
    pub fn new(fields: Schema) -> Self {
        Self {
            fields,
            key_value: Vec::new(),
        }
    }

    pub fn key_value(mut self, config: KeyValueConfig) -> Self {
        self.key_value.push(config);
        self
    }
}
