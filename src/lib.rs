//! Moodlens
//!
//! Session-oriented facial-expression analysis. This crate re-exports
//! [`moodlens_core`]; the `moodlens` binary lives in `moodlens-cli`.

pub use moodlens_core::*;
