//! Small shared helpers.

pub mod debounce;
pub mod parse;
