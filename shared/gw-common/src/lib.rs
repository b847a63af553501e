//! GraceWay Common Library
//!
//! Shared permission, role and section types used by the access engine and
//! the desktop client that renders its projection.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
