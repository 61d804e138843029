pub mod cache;
pub mod config;
pub mod resolver;

use std::time::Duration;

pub use anyhow::Result;

#[derive(thiserror::Error, Debug)]
pub enum ResolverError {
    #[error("no address found for {0}")]
    NoEntry(String),

    #[error("resolving {name} timed out after {timeout:?}")]
    Timeout { name: String, timeout: Duration },
}
