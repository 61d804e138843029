use super::{
    install::ResolverSlots, receiver::CachingResolutionReceiver, AddressType, HostResolution,
    HostnameResolver, ResolutionReceiver, TransportSemantics,
};
use crate::{cache::DnsCache, config::DnsCacheConfig, Result};
use std::sync::Arc;
use tracing::debug;

/// Caches the resolutions reported by a streaming resolver.
///
/// A cached resolution is returned directly, `receiver` is not notified in
/// that case. Successful resolutions are cached whatever the capacity is.
#[derive(Debug)]
pub struct CachingHostnameResolver<R: HostnameResolver> {
    resolver: R,
    cache: DnsCache,
}

impl<R: HostnameResolver + 'static> CachingHostnameResolver<R> {
    pub fn new(resolver: R, cache: DnsCache, cache_size: usize) -> Self {
        cache.set_capacity(cache_size);

        Self { resolver, cache }
    }

    pub fn from_config(resolver: R, cache: DnsCache, config: &DnsCacheConfig) -> Self {
        Self::new(resolver, cache, config.cache_size())
    }

    pub fn install_on(
        slots: &mut ResolverSlots,
        resolver: R,
        cache: DnsCache,
        config: &DnsCacheConfig,
    ) {
        slots.install_name_resolver(Arc::new(Self::from_config(resolver, cache, config)));
    }
}

#[async_trait::async_trait]
impl<R: HostnameResolver> HostnameResolver for CachingHostnameResolver<R> {
    async fn resolve_host_name(
        &self,
        receiver: &mut dyn ResolutionReceiver,
        host_name: &str,
        port: u16,
        address_types: Option<&[AddressType]>,
        transport: TransportSemantics,
    ) -> Result<HostResolution> {
        if let Some(resolution) = self.cache.get_resolution(host_name) {
            debug!("DNS cache hit for {}", host_name);
            return Ok(resolution);
        }

        debug!("DNS cache miss for {}", host_name);

        let mut receiver = CachingResolutionReceiver::new(receiver, host_name, self.cache.clone());
        self.resolver
            .resolve_host_name(&mut receiver, host_name, port, address_types, transport)
            .await
    }
}
