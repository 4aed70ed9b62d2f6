//! Gateway Command Wrappers
//!
//! Frontend bindings to the HTTP mutation gateway.

mod todo;

pub use todo::*;
