//! Core definitions (errors and result handling), relied upon by all otzar-* crates.

pub mod error;
pub mod result;

pub use result::Result;
