//! Modview CLI support library
//!
//! Logging setup and terminal formatting shared by the `modview` binary.

pub mod logging;
pub mod output;

pub use logging::LogTarget;
