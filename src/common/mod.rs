pub mod config;
pub mod errors;
pub mod format;

pub use config::Config;
pub use errors::{PackError, Result};
