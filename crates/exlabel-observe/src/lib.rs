//! Logging setup shared by exlabel binaries.
mod logger;
pub use logger::*;
