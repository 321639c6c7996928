//! Baseline snapshot plus sparse pending-change map for one edited entity.
//!
//! Invariants:
//! - every key in the pending map differs from the baseline under
//!   [`is_equal`] (after missing-value normalization);
//! - field edits never touch the baseline, only [`DiffTracker::sync`] on a
//!   different entity id, [`DiffTracker::refresh_snapshot`] and a soft
//!   [`DiffTracker::reset`] do.

use std::borrow::Cow;

use serde_json::{Map, Value};
use tracing::{debug, trace, Level};
use widget_diff_util::json_clone::deep_clone_object;
use widget_diff_util::{deep_equal, is_equal};

use crate::options::TrackerOptions;

/// A JSON object: an entity snapshot or a set of field changes.
pub type Fields = Map<String, Value>;

/// Key holding the entity identifier.
const ID_FIELD: &str = "id";

/// Converts a JSON value into a field map. Non-object values yield an empty map.
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

/// Tracks unsaved field-level edits to a single entity.
///
/// Each edit form owns its own tracker; nothing is shared between instances.
#[derive(Debug, Clone, Default)]
pub struct DiffTracker {
    options: TrackerOptions,
    baseline: Option<Fields>,
    pending: Fields,
    form_key: u64,
    revision: u64,
}

impl DiffTracker {
    pub fn new(options: TrackerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Feeds the current entity to the tracker, typically on every render.
    ///
    /// The first entity becomes the baseline; pending changes made before it
    /// are kept unless they match it. After that only a change of `id`
    /// matters: the baseline is replaced by a copy of the new entity and
    /// pending changes are discarded. An entity with the same id (e.g. a
    /// background refetch) leaves edits in place.
    pub fn sync(&mut self, entity: Option<&Fields>) {
        let Some(entity) = entity else {
            return;
        };
        let next_id = entity.get(ID_FIELD);

        let Some(baseline) = self.baseline.as_ref() else {
            debug!(entity_id = ?next_id, "captured initial baseline");
            self.baseline = Some(deep_clone_object(entity));
            self.drop_pending_matching_baseline();
            self.revision += 1;
            return;
        };

        if baseline.get(ID_FIELD) == next_id {
            if tracing::enabled!(Level::TRACE) && !same_fields(baseline, entity) {
                trace!(entity_id = ?next_id, "same entity with new content, keeping edits");
            }
            return;
        }

        debug!(
            from = ?baseline.get(ID_FIELD),
            to = ?next_id,
            discarded = self.pending.len(),
            "entity changed, re-baselining"
        );
        self.pending.clear();
        self.baseline = Some(deep_clone_object(entity));
        self.revision += 1;
    }

    /// Records a batch of field edits.
    ///
    /// A field whose new value matches the baseline is dropped from the
    /// pending map; any other value replaces what is pending for it. An empty
    /// batch, or one that only repeats baseline values for fields that are not
    /// pending (a controlled input echoing its old value after a reset), is
    /// ignored. Returns whether the pending map changed.
    ///
    /// The echo check uses the raw baseline, where a missing field equals
    /// `[]`. So a lone `[]` for a field the baseline lacks is ignored, while
    /// the same `[]` inside a batch with other changes is compared against
    /// `null` (unless `coerce_array_undefined` is set) and recorded.
    pub fn handle_field_change(&mut self, changes: Fields) -> bool {
        if changes.is_empty() {
            return false;
        }

        let baseline = self.baseline.as_ref();
        let echoes_baseline = changes
            .iter()
            .all(|(field, value)| is_equal(Some(value), baseline.and_then(|b| b.get(field))));
        if echoes_baseline && !changes.keys().any(|field| self.pending.contains_key(field)) {
            trace!(fields = changes.len(), "ignoring edit that matches the baseline");
            return false;
        }

        let mut changed = false;
        for (field, value) in changes {
            let base = effective_baseline(baseline, &field, &value, &self.options);
            if is_equal(Some(&value), Some(&base)) {
                if self.pending.remove(&field).is_some() {
                    trace!(field = %field, "field reverted to baseline");
                    changed = true;
                }
            } else if !self
                .pending
                .get(&field)
                .is_some_and(|pending| is_equal(Some(pending), Some(&value)))
            {
                trace!(field = %field, value = %value, "field changed");
                self.pending.insert(field, value);
                changed = true;
            }
        }

        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Cancels all unsaved edits and bumps the form key.
    ///
    /// With `refresh_snapshot_on_reset` the discarded values are folded into
    /// the baseline first, so later edits are compared against what the form
    /// still shows.
    pub fn reset(&mut self) {
        if self.options.refresh_snapshot_on_reset {
            self.fold_pending_into_baseline();
        } else {
            self.pending.clear();
        }
        self.form_key += 1;
        self.revision += 1;
        debug!(form_key = self.form_key, "reset pending changes");
    }

    /// Accepts the pending changes as the new baseline without saving them.
    pub fn refresh_snapshot(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        debug!(fields = self.pending.len(), "accepting pending changes into baseline");
        self.fold_pending_into_baseline();
        self.revision += 1;
    }

    fn drop_pending_matching_baseline(&mut self) {
        let baseline = self.baseline.as_ref();
        let options = &self.options;
        self.pending.retain(|field, value| {
            let base = effective_baseline(baseline, field, value, options);
            !is_equal(Some(&*value), Some(&base))
        });
    }

    fn fold_pending_into_baseline(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        self.baseline.get_or_insert_with(Fields::new).extend(pending);
    }

    pub fn pending_changes(&self) -> &Fields {
        &self.pending
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Counter consumers key uncontrolled form subtrees on; bumped by every reset.
    pub fn form_key(&self) -> u64 {
        self.form_key
    }

    /// Number of observable state updates so far. No-op calls leave it unchanged.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn baseline(&self) -> Option<&Fields> {
        self.baseline.as_ref()
    }

    /// The value `value` is compared against when entered into `field`:
    /// the baseline value, or the empty value of its type when the baseline
    /// lacks the field.
    pub fn compared_baseline(&self, field: &str, value: &Value) -> Value {
        effective_baseline(self.baseline.as_ref(), field, value, &self.options).into_owned()
    }

    pub fn entity_id(&self) -> Option<&Value> {
        self.baseline.as_ref().and_then(|b| b.get(ID_FIELD))
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    /// The baseline with pending changes applied, i.e. what the form shows.
    pub fn current(&self) -> Fields {
        let mut current = self.baseline.as_ref().map(deep_clone_object).unwrap_or_default();
        for (field, value) in &self.pending {
            current.insert(field.clone(), value.clone());
        }
        current
    }
}

/// Computes the pending changes a form would hold after every field of
/// `edited` was entered at once on top of `baseline`.
///
/// Fields absent from `edited` are left alone, so the result is a partial
/// update payload rather than a full replacement.
pub fn diff_entities(options: TrackerOptions, baseline: &Fields, edited: &Fields) -> Fields {
    let mut tracker = DiffTracker::new(options);
    tracker.sync(Some(baseline));
    tracker.handle_field_change(edited.clone());
    tracker.pending
}

fn same_fields(a: &Fields, b: &Fields) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| deep_equal(value, other)))
}

/// Baseline value a new value is compared against. A missing baseline value
/// stands in as the empty value of the new value's type.
fn effective_baseline<'a>(
    baseline: Option<&'a Fields>,
    field: &str,
    value: &Value,
    options: &TrackerOptions,
) -> Cow<'a, Value> {
    if let Some(existing) = baseline.and_then(|b| b.get(field)) {
        return Cow::Borrowed(existing);
    }
    Cow::Owned(match value {
        Value::String(_) => Value::String(String::new()),
        Value::Bool(_) => Value::Bool(false),
        Value::Number(_) => Value::from(0),
        Value::Array(_) if options.coerce_array_undefined => Value::Array(Vec::new()),
        Value::Array(_) | Value::Null | Value::Object(_) => Value::Null,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widget() -> Fields {
        fields(json!({"id": "w1", "name": "Original", "tags": ["foo"]}))
    }

    fn tracker_for(entity: &Fields, options: TrackerOptions) -> DiffTracker {
        let mut tracker = DiffTracker::new(options);
        tracker.sync(Some(entity));
        tracker
    }

    #[test]
    fn fresh_tracker_is_clean() {
        let tracker = tracker_for(&widget(), TrackerOptions::default());
        assert!(!tracker.is_dirty());
        assert!(tracker.pending_changes().is_empty());
        assert_eq!(tracker.form_key(), 0);
        assert_eq!(tracker.entity_id(), Some(&json!("w1")));
    }

    #[test]
    fn sync_none_is_ignored() {
        let mut tracker = DiffTracker::default();
        tracker.sync(None);
        assert!(tracker.baseline().is_none());
        assert_eq!(tracker.revision(), 0);
    }

    #[test]
    fn edits_before_first_entity_survive_capture() {
        let mut tracker = DiffTracker::default();
        assert!(tracker.handle_field_change(fields(json!({"name": "Early"}))));
        tracker.sync(Some(&widget()));
        assert_eq!(tracker.pending_changes()["name"], json!("Early"));
    }

    #[test]
    fn early_edit_matching_first_entity_is_dropped() {
        let mut tracker = DiffTracker::default();
        assert!(tracker.handle_field_change(fields(json!({"name": "Original", "color": "red"}))));
        tracker.sync(Some(&widget()));
        assert_eq!(tracker.pending_changes(), &fields(json!({"color": "red"})));

        let mut tracker = DiffTracker::default();
        tracker.handle_field_change(fields(json!({"name": "Original"})));
        tracker.sync(Some(&widget()));
        assert!(tracker.pending_changes().is_empty());
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn lone_empty_array_for_missing_field_is_ignored() {
        let mut tracker = tracker_for(&widget(), TrackerOptions::default());
        let revision = tracker.revision();
        assert!(!tracker.handle_field_change(fields(json!({"categories": []}))));
        assert!(!tracker.is_dirty());
        assert_eq!(tracker.revision(), revision);
    }

    #[test]
    fn compared_baseline_uses_typed_empty_values() {
        let tracker = tracker_for(&widget(), TrackerOptions::default());
        assert_eq!(tracker.compared_baseline("name", &json!("x")), json!("Original"));
        assert_eq!(tracker.compared_baseline("title", &json!("x")), json!(""));
        assert_eq!(tracker.compared_baseline("count", &json!(5)), json!(0));
        assert_eq!(tracker.compared_baseline("list", &json!([1])), json!(null));
    }

    #[test]
    fn change_then_revert_cleans_up() {
        let mut tracker = tracker_for(&widget(), TrackerOptions::default());
        assert!(tracker.handle_field_change(fields(json!({"name": "Updated"}))));
        assert!(tracker.is_dirty());
        assert!(tracker.handle_field_change(fields(json!({"name": "Original"}))));
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn empty_change_keeps_existing_diffs() {
        let mut tracker = tracker_for(&widget(), TrackerOptions::default());
        tracker.handle_field_change(fields(json!({"name": "Updated"})));
        let revision = tracker.revision();
        assert!(!tracker.handle_field_change(Fields::new()));
        assert_eq!(tracker.revision(), revision);
        assert_eq!(tracker.pending_changes().len(), 1);
    }

    #[test]
    fn echo_of_baseline_is_a_no_op() {
        let mut tracker = tracker_for(&widget(), TrackerOptions::default());
        let revision = tracker.revision();
        assert!(!tracker.handle_field_change(fields(json!({"name": "Original", "tags": ["foo"]}))));
        assert_eq!(tracker.revision(), revision);
    }

    #[test]
    fn repeated_value_is_idempotent() {
        let mut tracker = tracker_for(&widget(), TrackerOptions::default());
        assert!(tracker.handle_field_change(fields(json!({"tags": ["foo", "bar"]}))));
        let revision = tracker.revision();
        assert!(!tracker.handle_field_change(fields(json!({"tags": ["bar", "foo"]}))));
        assert_eq!(tracker.revision(), revision);
        assert_eq!(tracker.pending_changes()["tags"], json!(["foo", "bar"]));
    }

    #[test]
    fn array_reorder_is_not_a_change() {
        let mut tracker = tracker_for(
            &fields(json!({"id": "w1", "tags": ["a", "b"]})),
            TrackerOptions::default(),
        );
        assert!(!tracker.handle_field_change(fields(json!({"tags": ["b", "a"]}))));
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn missing_baseline_uses_typed_empty_values() {
        let mut tracker = tracker_for(&fields(json!({"id": "w1"})), TrackerOptions::default());
        tracker.handle_field_change(fields(json!({"title": "Menu"})));
        let changed = tracker.handle_field_change(fields(json!({
            "title": "",
            "visible": false,
            "position": 0,
            "extra": null
        })));
        assert!(changed);
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn batch_with_empty_array_records_array_without_coercion() {
        let mut tracker = tracker_for(&widget(), TrackerOptions::default());
        tracker.handle_field_change(fields(json!({"name": "Updated", "categories": []})));
        assert_eq!(
            tracker.pending_changes(),
            &fields(json!({"name": "Updated", "categories": []}))
        );
    }

    #[test]
    fn coerce_array_undefined_treats_missing_as_empty() {
        let options = TrackerOptions::default().with_coerce_array_undefined(true);
        let mut tracker = tracker_for(&widget(), options);
        tracker.handle_field_change(fields(json!({"name": "Updated", "categories": []})));
        assert_eq!(tracker.pending_changes(), &fields(json!({"name": "Updated"})));
    }

    #[test]
    fn reset_clears_and_bumps_form_key() {
        let mut tracker = tracker_for(&widget(), TrackerOptions::default());
        tracker.handle_field_change(fields(json!({"name": "Updated"})));
        tracker.reset();
        assert!(tracker.pending_changes().is_empty());
        assert_eq!(tracker.form_key(), 1);
        assert_eq!(tracker.baseline().unwrap()["name"], json!("Original"));
    }

    #[test]
    fn soft_reset_folds_into_baseline() {
        let options = TrackerOptions::default().with_refresh_snapshot_on_reset(true);
        let mut tracker = tracker_for(&widget(), options);
        tracker.handle_field_change(fields(json!({"name": "One"})));
        tracker.reset();
        assert_eq!(tracker.baseline().unwrap()["name"], json!("One"));
        assert!(!tracker.is_dirty());
        assert_eq!(tracker.form_key(), 1);
    }

    #[test]
    fn refresh_snapshot_without_pending_is_quiet() {
        let mut tracker = tracker_for(&widget(), TrackerOptions::default());
        let revision = tracker.revision();
        tracker.refresh_snapshot();
        assert_eq!(tracker.revision(), revision);
        assert_eq!(tracker.form_key(), 0);
    }

    #[test]
    fn refresh_snapshot_before_any_entity_creates_baseline() {
        let mut tracker = DiffTracker::default();
        tracker.handle_field_change(fields(json!({"name": "Draft"})));
        tracker.refresh_snapshot();
        assert_eq!(tracker.baseline(), Some(&fields(json!({"name": "Draft"}))));
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn current_applies_pending_over_baseline() {
        let mut tracker = tracker_for(&widget(), TrackerOptions::default());
        tracker.handle_field_change(fields(json!({"name": "Updated", "color": "red"})));
        assert_eq!(
            tracker.current(),
            fields(json!({"id": "w1", "name": "Updated", "tags": ["foo"], "color": "red"}))
        );
    }

    #[test]
    fn diff_entities_returns_partial_payload() {
        let edited = fields(json!({"id": "w1", "name": "Renamed", "tags": ["foo"]}));
        let payload = diff_entities(TrackerOptions::default(), &widget(), &edited);
        assert_eq!(payload, fields(json!({"name": "Renamed"})));
    }

    #[test]
    fn fields_of_non_object_is_empty() {
        assert!(fields(json!([1, 2])).is_empty());
        assert!(fields(json!("w1")).is_empty());
    }
}
