use super::{
    AddressType, HostResolution, HostnameResolver, ResolutionReceiver, SimpleResolver,
    TransportSemantics,
};
use crate::{ResolverError, Result};
use dns_lookup::{getaddrinfo, AddrFamily, AddrInfoHints, SockType};
use itertools::Itertools;
use std::{
    io,
    net::{IpAddr, SocketAddr},
    time::Duration,
};
use tracing::debug;

// The sum of the retry schedule (1, 3, 11, 45) event loops use by default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolves IPv4 addresses with the blocking system resolver on the blocking
/// thread pool.
#[derive(Debug, Default, Clone)]
pub struct ThreadedResolver {}

impl ThreadedResolver {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl SimpleResolver for ThreadedResolver {
    async fn get_host_by_name(&self, name: &str, timeout: Option<Duration>) -> Result<IpAddr> {
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);

        let addrs = match tokio::time::timeout(
            timeout,
            lookup(name, Some(AddrFamily::Inet), SockType::Stream),
        )
        .await
        {
            Ok(result) => result?.map_err(|err| {
                anyhow::Error::from(err).context(ResolverError::NoEntry(name.to_owned()))
            })?,
            Err(_) => {
                return Err(ResolverError::Timeout {
                    name: name.to_owned(),
                    timeout,
                }
                .into())
            }
        };

        Ok(addrs
            .first()
            .copied()
            .ok_or_else(|| ResolverError::NoEntry(name.to_owned()))?)
    }
}

/// Streams the addresses `getaddrinfo` finds. A failed lookup is reported as
/// a resolution without any address.
#[derive(Debug, Default, Clone)]
pub struct GaiResolver {}

impl GaiResolver {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl HostnameResolver for GaiResolver {
    async fn resolve_host_name(
        &self,
        receiver: &mut dyn ResolutionReceiver,
        host_name: &str,
        port: u16,
        address_types: Option<&[AddressType]>,
        transport: TransportSemantics,
    ) -> Result<HostResolution> {
        let resolution = HostResolution::new(host_name);
        receiver.resolution_began(&resolution);

        let socktype = match transport {
            TransportSemantics::Tcp => SockType::Stream,
            TransportSemantics::Udp => SockType::DGram,
        };

        let addresses = match lookup(host_name, family(address_types), socktype).await? {
            Ok(ips) => ips
                .into_iter()
                .map(|ip| SocketAddr::new(ip, port))
                .collect_vec(),
            Err(err) => {
                debug!("Failed to resolve {}: {}", host_name, err);
                Vec::new()
            }
        };

        for addr in &addresses {
            receiver.address_resolved(*addr);
        }
        receiver.resolution_complete();

        Ok(resolution.with_addresses(addresses))
    }
}

// No filter, an empty filter and a filter with both types all mean any family.
fn family(address_types: Option<&[AddressType]>) -> Option<AddrFamily> {
    let types = address_types?;
    let ipv4 = types.contains(&AddressType::Ipv4);
    let ipv6 = types.contains(&AddressType::Ipv6);

    match (ipv4, ipv6) {
        (true, false) => Some(AddrFamily::Inet),
        (false, true) => Some(AddrFamily::Inet6),
        _ => None,
    }
}

// The outer error is a failure of the blocking pool, the inner one a failure of
// the lookup itself.
async fn lookup(
    name: &str,
    family: Option<AddrFamily>,
    socktype: SockType,
) -> Result<io::Result<Vec<IpAddr>>> {
    let hints = AddrInfoHints {
        socktype: socktype.into(),
        address: family.map_or(0, Into::into),
        ..AddrInfoHints::default()
    };

    let name = name.to_owned();
    Ok(
        tokio::task::spawn_blocking(move || getaddrinfo(Some(&name), None, Some(hints)))
            .await?
            .map_err(Into::<io::Error>::into)
            .map(|addrs| {
                addrs
                    .filter_map(|r| r.ok())
                    .map(|r| r.sockaddr.ip())
                    .unique()
                    .collect()
            }),
    )
}
