//! Shared helpers.

pub mod ansi;
