//! CLI command implementations.

pub mod backends;
pub mod common;
pub mod inspect;
pub mod random;
pub mod run;
pub mod sweep;
pub mod version;
