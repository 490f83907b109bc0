pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod eval;

pub use config::Config;
pub use error::{EdgevalError, Result};
