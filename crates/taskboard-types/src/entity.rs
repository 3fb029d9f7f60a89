use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Wire key of the last-modified timestamp.
pub const UPDATED_AT: &str = "updatedAt";

/// A record kept in one of the board's collections.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human-readable name used in messages, e.g. `"Task"`.
    const KIND: &'static str;
    /// Collection / route segment, e.g. `"tasks"`.
    const COLLECTION: &'static str;
    /// Prefix of server-generated identifiers, e.g. `"task"`.
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;

    fn set_updated_at(&mut self, at: DateTime<Utc>);

    /// Shallow-merge a JSON object over this record.
    ///
    /// Keys present in `patch` replace the record's value wholesale, absent
    /// keys are kept. `updatedAt` is skipped since the store restamps it. Nothing is protected: `_id` and `createdAt` can be
    /// overwritten like any other field. Fails when the merged object no
    /// longer describes a valid record.
    fn merged(&self, patch: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut value {
            for (key, v) in patch.iter().filter(|(key, _)| key.as_str() != UPDATED_AT) {
                fields.insert(key.clone(), v.clone());
            }
        }
        serde_json::from_value(value)
    }
}
