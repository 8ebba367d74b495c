//! The `utils` module collects the pieces shared by every layer: the
//! relay's error type and logging setup.

pub mod error;
pub mod logging;
