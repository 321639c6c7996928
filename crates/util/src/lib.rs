//! widget-diff-util - JSON value helpers for widget-diff
//!
//! Deep cloning, deterministic serialization and the normalized equality
//! rule the diff tracker uses to decide whether a field has changed.

pub mod json_clone;
pub mod json_equal;
pub mod json_stable;

// Re-exports for convenience
pub use json_clone::deep_clone;
pub use json_equal::{deep_equal, is_equal, normalize_array, sort_key};
pub use json_stable::stringify;
