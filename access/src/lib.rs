//! `GraceWay` Access
//!
//! Resolves which application sections a user may open from the
//! permissions their role grants.

pub mod config;
pub mod db;
pub mod permissions;
