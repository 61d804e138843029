use crate::{cache::DEFAULT_CACHE_SIZE, Result};
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_DNS_TIMEOUT: f64 = 60.0;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DnsCacheConfig {
    pub enabled: bool,
    pub size: usize,
    /// Seconds.
    pub timeout: f64,
}

impl Default for DnsCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: DEFAULT_CACHE_SIZE,
            timeout: DEFAULT_DNS_TIMEOUT,
        }
    }
}

impl DnsCacheConfig {
    pub fn validate(&self) -> Result<()> {
        self.timeout()?;
        Ok(())
    }

    /// A disabled cache has a size of zero.
    pub fn cache_size(&self) -> usize {
        if self.enabled {
            self.size
        } else {
            0
        }
    }

    pub fn timeout(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.timeout).with_context(|| {
            format!(
                "DNS timeout must be a non-negative number of seconds, got {}",
                self.timeout
            )
        })
    }
}
