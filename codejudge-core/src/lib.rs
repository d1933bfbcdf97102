//! Core domain model for the Codejudge client.
//!
//! Everything in this crate is free of I/O: the wire types exchanged with the
//! judge server, the task-authoring validator that turns raw form input into a
//! creation payload, account form validation, and the clipboard codec for
//! public test cases.

pub mod codec;
pub mod domain;
pub mod error;
pub mod validation;

pub use codec::*;
pub use domain::*;
pub use error::*;
pub use validation::*;
