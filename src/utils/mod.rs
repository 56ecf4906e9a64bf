//! Utility modules shared by the library and the CLI

pub mod logger;
pub(crate) mod progress;
