//! CLI-facing operations. Each one is a thin layer over [`crate::remote`]
//! and [`crate::invoice`] that prints its result.

pub mod config;
mod new_id;
mod print;
mod search;
mod submit;

pub use new_id::new_id;
pub use print::print;
pub use search::{EMPTY_SEARCH_TEXT, search, search_invoice};
pub use submit::{submit, submit_invoice};
