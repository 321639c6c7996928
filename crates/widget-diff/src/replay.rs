//! Edit session replay.
//!
//! A session is a newline-delimited list of JSON events; blank lines and
//! lines starting with `#` are skipped:
//!
//! ```text
//! {"op": "sync", "entity": {"id": "w1", "name": "Original"}}
//! {"op": "change", "fields": {"name": "Updated"}}
//! {"op": "reset"}
//! {"op": "refreshSnapshot"}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::options::TrackerOptions;
use crate::tracker::{DiffTracker, Fields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum SessionEvent {
    /// The form received an entity (or `null`) from its data source.
    Sync {
        #[serde(default)]
        entity: Option<Fields>,
    },
    /// One or more inputs changed.
    Change { fields: Fields },
    Reset,
    RefreshSnapshot,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Sync { .. } => "sync",
            SessionEvent::Change { .. } => "change",
            SessionEvent::Reset => "reset",
            SessionEvent::RefreshSnapshot => "refreshSnapshot",
        }
    }

    pub fn apply(&self, tracker: &mut DiffTracker) {
        match self {
            SessionEvent::Sync { entity } => tracker.sync(entity.as_ref()),
            SessionEvent::Change { fields } => {
                tracker.handle_field_change(fields.clone());
            }
            SessionEvent::Reset => tracker.reset(),
            SessionEvent::RefreshSnapshot => tracker.refresh_snapshot(),
        }
    }
}

/// Tracker state observed right after an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateReport {
    pub event: &'static str,
    pub form_key: u64,
    pub dirty: bool,
    pub pending_changes: Fields,
    pub revision: u64,
}

impl StateReport {
    pub fn capture(event: &SessionEvent, tracker: &DiffTracker) -> Self {
        Self {
            event: event.name(),
            form_key: tracker.form_key(),
            dirty: tracker.is_dirty(),
            pending_changes: tracker.pending_changes().clone(),
            revision: tracker.revision(),
        }
    }
}

pub fn parse_session(text: &str) -> Result<Vec<SessionEvent>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| Error::InvalidEvent {
                line: index + 1,
                source,
            })
        })
        .collect()
}

/// Runs `events` through a fresh tracker, reporting the state after each one.
pub fn replay(options: TrackerOptions, events: &[SessionEvent]) -> Vec<StateReport> {
    let mut tracker = DiffTracker::new(options);
    events
        .iter()
        .map(|event| {
            event.apply(&mut tracker);
            StateReport::capture(event, &tracker)
        })
        .collect()
}
