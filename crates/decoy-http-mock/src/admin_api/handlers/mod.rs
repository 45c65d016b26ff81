//! Admin API request handlers.

pub mod expectations;
pub mod logs;
pub mod system;
