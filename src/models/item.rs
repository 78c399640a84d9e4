use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-assigned item identifier: creation time in milliseconds.
/// Two items created within the same millisecond collide.
pub type ItemId = i64;

/// A client-defined JSON record with a reserved, server-assigned `id`.
///
/// Everything besides `id` is opaque to the server and kept in client key
/// order. On the wire and on disk the item is one flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}

impl Item {
    /// Build a new item from a client payload, assigning a fresh id.
    /// A client-supplied `id` key is discarded.
    pub fn create(mut fields: IndexMap<String, Value>) -> Self {
        fields.shift_remove("id");
        Self {
            id: next_id(),
            fields,
        }
    }

    /// Shallow-merge a patch onto this item: top-level patch keys replace
    /// existing keys, unmentioned keys survive. The `id` key is ignored.
    pub fn merge(&mut self, patch: IndexMap<String, Value>) {
        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            self.fields.insert(key, value);
        }
    }
}

/// Millisecond-clock id generation, as the original service did it.
pub fn next_id() -> ItemId {
    Utc::now().timestamp_millis()
}
