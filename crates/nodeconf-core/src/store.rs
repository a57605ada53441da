//! Settings store.
//!
//! `ConfigStore` holds one value per schema field and persists them as a
//! flat JSON object keyed by field name.

use serde::Serialize;
use serde_json::{Map, Value as Json};
use tracing::{debug, info, warn};

use crate::error::{FieldError, LoadError, SaveError};
use crate::schema::{FieldSpec, Schema, NODE_SCHEMA};
use crate::storage::{Storage, CONFIG_PATH, MAX_CONFIG_SIZE};
use crate::value::{FieldValue, Value};

/// Outcome of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// Fields overwritten from the file.
    pub applied: Vec<String>,
    /// Known fields present with an incompatible JSON type.
    pub skipped: Vec<String>,
    /// Keys not part of the schema.
    pub ignored: Vec<String>,
}

/// In-memory settings record driven by a `Schema`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    schema: &'static Schema,
    values: Vec<Value>,
}

impl ConfigStore {
    /// Create a store holding the schema defaults.
    pub fn new(schema: &'static Schema) -> Self {
        let values = schema.fields().iter().map(FieldSpec::default_value).collect();
        Self { schema, values }
    }

    /// Create a store for the node schema.
    pub fn node() -> Self {
        Self::new(&NODE_SCHEMA)
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Fields with their current values, in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, &Value)> {
        self.schema.fields().iter().zip(self.values.iter())
    }

    /// Current value of a field.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).map(|i| &self.values[i])
    }

    /// Typed read of a field.
    ///
    /// Returns `None` for unknown fields or when `T` does not match the
    /// field's kind.
    pub fn get<T: FieldValue>(&self, name: &str) -> Option<T> {
        self.value(name).and_then(T::from_value)
    }

    /// Overwrite a field.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FieldError> {
        let index = self
            .schema
            .index_of(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        let spec = &self.schema.fields()[index];
        let value = value.into();
        if value.kind() != spec.kind() {
            return Err(FieldError::KindMismatch {
                field: spec.name,
                expected: spec.kind(),
                actual: value.kind(),
            });
        }
        self.values[index] = value;
        Ok(())
    }

    /// Restore every field to its default.
    pub fn reset_to_defaults(&mut self) {
        for (slot, spec) in self.values.iter_mut().zip(self.schema.fields()) {
            *slot = spec.default_value();
        }
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Value {
        &mut self.values[index]
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Load settings from `CONFIG_PATH`.
    ///
    /// Only fields present in the file with a compatible JSON type are
    /// overwritten. On error nothing is changed.
    pub fn load<S: Storage + ?Sized>(&mut self, storage: &S) -> Result<LoadReport, LoadError> {
        info!("Load config...");
        let open_error = |source| LoadError::Open {
            path: CONFIG_PATH.to_string(),
            source,
        };

        let size = storage.size(CONFIG_PATH).map_err(open_error)?;
        if size > MAX_CONFIG_SIZE as u64 {
            warn!(size, "Config file size is too large");
            return Err(LoadError::TooLarge {
                size,
                max: MAX_CONFIG_SIZE,
            });
        }

        let bytes = storage.read(CONFIG_PATH).map_err(open_error)?;
        if bytes.len() > MAX_CONFIG_SIZE {
            warn!(size = bytes.len(), "Config file size is too large");
            return Err(LoadError::TooLarge {
                size: bytes.len() as u64,
                max: MAX_CONFIG_SIZE,
            });
        }

        self.load_slice(&bytes)
    }

    /// Merge a JSON document into the store.
    pub fn load_str(&mut self, text: &str) -> Result<LoadReport, LoadError> {
        self.load_slice(text.as_bytes())
    }

    /// Invalid UTF-8 is malformed content, reported as `LoadError::Parse`.
    fn load_slice(&mut self, bytes: &[u8]) -> Result<LoadReport, LoadError> {
        let json: Json = serde_json::from_slice(bytes).map_err(|e| {
            warn!(error = %e, "Failed to parse config file");
            LoadError::Parse(e)
        })?;
        let Json::Object(object) = json else {
            warn!("Config file is not a JSON object");
            return Err(LoadError::NotAnObject);
        };

        Ok(self.merge(&object))
    }

    fn merge(&mut self, object: &Map<String, Json>) -> LoadReport {
        let mut report = LoadReport::default();

        for (index, spec) in self.schema.fields().iter().enumerate() {
            if let Some(json) = object.get(spec.name) {
                match Value::from_json(spec.kind(), json) {
                    Some(value) => {
                        self.values[index] = value;
                        report.applied.push(spec.name.to_string());
                    }
                    None => {
                        warn!(field = spec.name, "Config field has incompatible type, keeping current value");
                        report.skipped.push(spec.name.to_string());
                    }
                }
            }
            debug!("{}: {}", spec.name, spec.display(&self.values[index]));
        }

        report.ignored = object
            .keys()
            .filter(|key| self.schema.index_of(key).is_none())
            .cloned()
            .collect();

        info!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            ignored = report.ignored.len(),
            "Config loaded"
        );
        report
    }

    /// Save all settings to `CONFIG_PATH`, replacing prior content.
    pub fn save<S: Storage + ?Sized>(&self, storage: &S) -> Result<(), SaveError> {
        let text = self.to_json_string()?;
        if text.len() > MAX_CONFIG_SIZE {
            warn!(size = text.len(), "Encoded config exceeds the load limit, not saving");
            return Err(SaveError::TooLarge {
                size: text.len(),
                max: MAX_CONFIG_SIZE,
            });
        }

        storage.write(CONFIG_PATH, &text).map_err(|source| {
            warn!(error = %source, "Failed to open config file for writing");
            SaveError::Open {
                path: CONFIG_PATH.to_string(),
                source,
            }
        })?;

        info!(bytes = text.len(), "Config saved");
        Ok(())
    }

    /// All settings as a JSON object, in schema order.
    pub fn to_json(&self) -> Map<String, Json> {
        self.iter()
            .map(|(spec, value)| (spec.name.to_string(), value.to_json()))
            .collect()
    }

    /// Compact JSON document as written by `save`.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_json())
    }

    /// JSON view safe to show to clients: secret fields are masked.
    pub fn to_json_masked(&self) -> Map<String, Json> {
        self.iter()
            .map(|(spec, value)| {
                let json = if spec.secret {
                    Json::String(spec.display(value))
                } else {
                    value.to_json()
                };
                (spec.name.to_string(), json)
            })
            .collect()
    }
}

/// Stores are equal when they share the same schema and hold the same values.
impl PartialEq for ConfigStore {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.values == other.values
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::node()
    }
}
