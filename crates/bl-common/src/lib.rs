//! Bloglist Common
//!
//! Infrastructure shared by the platform library and the server binary.

pub mod logging;

pub use logging::{init_logging, LogFormat};
