//! Client-side validation of user input.
//!
//! Validation never touches the network: a form either normalizes into the
//! wire payload or produces a [`FieldErrors`] map for inline display.

pub mod account;
pub mod field_errors;
pub mod task;

pub use account::*;
pub use field_errors::*;
pub use task::*;
