//! Strongly typed front end over [`DiffTracker`].
//!
//! Entities are any `serde` type that serializes to a JSON object. Field
//! names are the serialized names, so `#[serde(rename_all = "camelCase")]`
//! entities produce camelCase pending changes, ready to send as a partial
//! update.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{json_kind, Error, Result};
use crate::options::TrackerOptions;
use crate::tracker::{DiffTracker, Fields};

#[derive(Debug, Clone)]
pub struct TypedDiffTracker<T> {
    inner: DiffTracker,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Default for TypedDiffTracker<T> {
    fn default() -> Self {
        Self::new(TrackerOptions::default())
    }
}

impl<T> TypedDiffTracker<T> {
    pub fn new(options: TrackerOptions) -> Self {
        Self {
            inner: DiffTracker::new(options),
            _entity: PhantomData,
        }
    }

    pub fn handle_field_change(&mut self, changes: Fields) -> bool {
        self.inner.handle_field_change(changes)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn refresh_snapshot(&mut self) {
        self.inner.refresh_snapshot();
    }

    pub fn pending_changes(&self) -> &Fields {
        self.inner.pending_changes()
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.is_dirty()
    }

    pub fn form_key(&self) -> u64 {
        self.inner.form_key()
    }

    pub fn tracker(&self) -> &DiffTracker {
        &self.inner
    }
}

impl<T: Serialize + DeserializeOwned> TypedDiffTracker<T> {
    pub fn sync(&mut self, entity: Option<&T>) -> Result<()> {
        match entity {
            Some(entity) => {
                let fields = to_fields(entity)?;
                self.inner.sync(Some(&fields));
            }
            None => self.inner.sync(None),
        }
        Ok(())
    }

    /// Records an edit of a single field.
    pub fn set_field<V: Serialize>(&mut self, field: &str, value: V) -> Result<bool> {
        let mut changes = Fields::new();
        changes.insert(field.to_owned(), serde_json::to_value(value)?);
        Ok(self.inner.handle_field_change(changes))
    }

    /// The entity as currently edited, or `None` before the first sync.
    pub fn current(&self) -> Result<Option<T>> {
        if self.inner.baseline().is_none() {
            return Ok(None);
        }
        let entity = serde_json::from_value(Value::Object(self.inner.current()))?;
        Ok(Some(entity))
    }
}

/// Serializes an entity into its field map.
pub fn to_fields<T: Serialize>(entity: &T) -> Result<Fields> {
    match serde_json::to_value(entity)? {
        Value::Object(fields) => Ok(fields),
        other => Err(Error::NotAnObject(json_kind(&other))),
    }
}
