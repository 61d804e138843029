use super::{install::ResolverSlots, SimpleResolver};
use crate::{
    cache::{CachedRecord, DnsCache},
    config::DnsCacheConfig,
    Result,
};
use std::{net::IpAddr, sync::Arc, time::Duration};
use tracing::debug;

/// Caches the address returned by a single result resolver.
///
/// The timeout given by callers is ignored, every lookup runs with the timeout
/// this resolver is built with.
#[derive(Debug)]
pub struct CachingThreadedResolver<R: SimpleResolver + 'static> {
    resolver: Arc<R>,
    cache: DnsCache,
    timeout: Duration,
}

impl<R: SimpleResolver + 'static> CachingThreadedResolver<R> {
    pub fn new(resolver: R, cache: DnsCache, cache_size: usize, timeout: Duration) -> Self {
        cache.set_capacity(cache_size);

        Self {
            resolver: Arc::new(resolver),
            cache,
            timeout,
        }
    }

    pub fn from_config(resolver: R, cache: DnsCache, config: &DnsCacheConfig) -> Result<Self> {
        Ok(Self::new(
            resolver,
            cache,
            config.cache_size(),
            config.timeout()?,
        ))
    }

    pub fn install_on(
        slots: &mut ResolverSlots,
        resolver: R,
        cache: DnsCache,
        config: &DnsCacheConfig,
    ) -> Result<()> {
        slots.install_resolver(Arc::new(Self::from_config(resolver, cache, config)?));
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait::async_trait]
impl<R: SimpleResolver + 'static> SimpleResolver for CachingThreadedResolver<R> {
    async fn get_host_by_name(&self, name: &str, _timeout: Option<Duration>) -> Result<IpAddr> {
        if let Some(addr) = self.cache.get_address(name) {
            debug!("DNS cache hit for {}: {}", name, addr);
            return Ok(addr);
        }

        debug!("DNS cache miss for {}, resolving with timeout {:?}", name, self.timeout);

        let resolver = self.resolver.clone();
        let cache = self.cache.clone();
        let should_cache = self.cache.capacity() > 0;
        let timeout = self.timeout;
        let name = name.to_owned();

        // The lookup runs in its own task so the result still lands in the
        // cache if the caller stops waiting for it.
        tokio::spawn(async move {
            let addr = resolver.get_host_by_name(&name, Some(timeout)).await?;
            if should_cache {
                cache.set(name, CachedRecord::Address(addr));
            }
            Ok::<_, anyhow::Error>(addr)
        })
        .await?
    }
}
