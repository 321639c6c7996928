//! JSON cloning utilities.
//!
//! Produces structurally independent copies of JSON values and objects.

mod clone;

pub use clone::{deep_clone, deep_clone_object};
