//! JSON equality utilities.
//!
//! [`deep_equal`] is strict structural equality. [`is_equal`] is the looser
//! rule used for form fields: missing values equal empty arrays and arrays
//! compare regardless of element order.

mod deep_equal;
mod is_equal;

pub use deep_equal::deep_equal;
pub use is_equal::{is_equal, normalize_array, sort_key};
