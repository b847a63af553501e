//! Shared Types

pub mod permission;
pub mod section;

pub use permission::*;
pub use section::*;
