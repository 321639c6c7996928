//! widget-diff — field-level dirty tracking for entity edit forms.
//!
//! A [`DiffTracker`] holds a baseline snapshot of the entity being edited
//! and a sparse map of pending field changes. Edit forms feed every field
//! edit through [`DiffTracker::handle_field_change`], read
//! [`DiffTracker::is_dirty`] to enable Save/Cancel, submit
//! [`DiffTracker::pending_changes`] as the partial-update payload, and key
//! uncontrolled inputs on [`DiffTracker::form_key`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use widget_diff::{fields, DiffTracker, TrackerOptions};
//!
//! let widget = fields(json!({"id": "w1", "name": "Original", "tags": ["foo"]}));
//! let mut tracker = DiffTracker::new(TrackerOptions::default());
//! tracker.sync(Some(&widget));
//!
//! tracker.handle_field_change(fields(json!({"name": "Updated"})));
//! assert!(tracker.is_dirty());
//! assert_eq!(tracker.pending_changes()["name"], json!("Updated"));
//!
//! tracker.reset();
//! assert!(!tracker.is_dirty());
//! assert_eq!(tracker.form_key(), 1);
//! ```

pub mod cli;
pub mod error;
pub mod options;
pub mod replay;
pub mod tracker;
pub mod typed;

pub use error::{Error, Result};
pub use options::TrackerOptions;
pub use replay::{parse_session, replay, SessionEvent, StateReport};
pub use tracker::{diff_entities, fields, DiffTracker, Fields};
pub use typed::TypedDiffTracker;
