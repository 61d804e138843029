pub mod caching;
pub mod hostname;
pub mod install;
pub mod receiver;
pub mod system;

#[cfg(test)]
pub(crate) mod testing;

use crate::Result;
use std::{
    fmt::Debug,
    net::{IpAddr, SocketAddr},
    time::Duration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressType {
    Ipv4,
    Ipv6,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportSemantics {
    #[default]
    Tcp,
    Udp,
}

/// The outcome of a streaming resolution of a host name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostResolution {
    name: String,
    addresses: Vec<SocketAddr>,
}

impl HostResolution {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            addresses: Vec::new(),
        }
    }

    pub fn with_addresses(mut self, addresses: Vec<SocketAddr>) -> Self {
        self.addresses = addresses;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addresses(&self) -> &[SocketAddr] {
        &self.addresses
    }
}

/// Observer of a streaming resolution. A resolver calls `resolution_began`
/// once, `address_resolved` for every address it finds, and then
/// `resolution_complete` once.
pub trait ResolutionReceiver: Send {
    fn resolution_began(&mut self, resolution: &HostResolution);
    fn address_resolved(&mut self, address: SocketAddr);
    fn resolution_complete(&mut self);
}

/// Resolves a host name to a single address.
#[async_trait::async_trait]
#[auto_impl::auto_impl(Arc)]
pub trait SimpleResolver: Debug + Send + Sync {
    async fn get_host_by_name(&self, name: &str, timeout: Option<Duration>) -> Result<IpAddr>;
}

/// Resolves a host name to any number of addresses, reported to `receiver` as
/// they are found.
#[async_trait::async_trait]
#[auto_impl::auto_impl(Arc)]
pub trait HostnameResolver: Debug + Send + Sync {
    async fn resolve_host_name(
        &self,
        receiver: &mut dyn ResolutionReceiver,
        host_name: &str,
        port: u16,
        address_types: Option<&[AddressType]>,
        transport: TransportSemantics,
    ) -> Result<HostResolution>;
}
