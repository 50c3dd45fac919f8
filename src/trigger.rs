//! Object-created notifications that start pipeline invocations.
//!
//! A notification batch is a JSON document of the form
//! `{"Records":[{"s3":{"bucket":{"name":"..."},"object":{"key":"..."}}}]}`.
//! Each record becomes one [`ObjectRef`] and, if it sits under the input
//! prefix, one independent invocation.

use serde::Deserialize;
use std::fmt;

/// Address of an uploaded object: a container plus a key inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub container: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(container: impl Into<String>, key: impl Into<String>) -> Self {
        ObjectRef {
            container: container.into(),
            key: key.into(),
        }
    }

    /// Returns `true` if the key starts with `prefix`.
    pub fn is_under(&self, prefix: &str) -> bool {
        self.key.starts_with(prefix)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container, self.key)
    }
}

#[derive(Debug, Deserialize)]
struct NotificationBatch {
    #[serde(rename = "Records", default)]
    records: Vec<Notification>,
}

#[derive(Debug, Deserialize)]
struct Notification {
    s3: Entity,
}

#[derive(Debug, Deserialize)]
struct Entity {
    bucket: Bucket,
    object: Object,
}

#[derive(Debug, Deserialize)]
struct Bucket {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Object {
    key: String,
}

/// Decodes a notification batch into object references, in batch order.
pub fn decode_batch(json: &str) -> serde_json::Result<Vec<ObjectRef>> {
    let batch: NotificationBatch = serde_json::from_str(json)?;
    Ok(batch
        .records
        .into_iter()
        .map(|n| ObjectRef::new(n.s3.bucket.name, n.s3.object.key))
        .collect())
}

/// Splits objects into those under `prefix` and those outside it.
pub fn scope(objects: Vec<ObjectRef>, prefix: &str) -> (Vec<ObjectRef>, Vec<ObjectRef>) {
    objects.into_iter().partition(|o| o.is_under(prefix))
}
