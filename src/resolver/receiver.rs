use super::{HostResolution, ResolutionReceiver};
use crate::cache::{CachedRecord, DnsCache};
use std::net::SocketAddr;
use tracing::{debug, warn};

enum State {
    Idle,
    InProgress(HostResolution),
    Terminal,
}

/// Forwards every callback to the wrapped receiver untouched and, once the
/// resolution completes with at least one address, stores it in the cache.
///
/// One instance serves exactly one resolution.
pub struct CachingResolutionReceiver<'a> {
    receiver: &'a mut dyn ResolutionReceiver,
    host_name: String,
    cache: DnsCache,
    state: State,
    addresses: Vec<SocketAddr>,
}

impl<'a> CachingResolutionReceiver<'a> {
    pub fn new(
        receiver: &'a mut dyn ResolutionReceiver,
        host_name: impl Into<String>,
        cache: DnsCache,
    ) -> Self {
        Self {
            receiver,
            host_name: host_name.into(),
            cache,
            state: State::Idle,
            addresses: Vec::new(),
        }
    }

    fn resolved(&self) -> bool {
        !self.addresses.is_empty()
    }
}

impl ResolutionReceiver for CachingResolutionReceiver<'_> {
    fn resolution_began(&mut self, resolution: &HostResolution) {
        self.receiver.resolution_began(resolution);

        match self.state {
            State::Idle => {
                self.addresses.clear();
                self.state = State::InProgress(resolution.clone());
            }
            _ => warn!(
                "Resolution of {} began more than once, the result will not be cached",
                self.host_name
            ),
        }
    }

    fn address_resolved(&mut self, address: SocketAddr) {
        self.receiver.address_resolved(address);

        match self.state {
            State::InProgress(_) => self.addresses.push(address),
            _ => warn!(
                "Got address {} for {} outside of a resolution",
                address, self.host_name
            ),
        }
    }

    fn resolution_complete(&mut self) {
        self.receiver.resolution_complete();

        let resolved = self.resolved();
        match std::mem::replace(&mut self.state, State::Terminal) {
            State::InProgress(resolution) if resolved => {
                debug!(
                    "Caching {} address(es) of {}",
                    self.addresses.len(),
                    self.host_name
                );
                let addresses = std::mem::take(&mut self.addresses);
                self.cache.set(
                    self.host_name.clone(),
                    CachedRecord::Resolution(resolution.with_addresses(addresses)),
                );
            }
            State::InProgress(_) => {
                debug!("{} resolved to nothing, not caching", self.host_name)
            }
            State::Idle => warn!(
                "Resolution of {} completed before it began, the result will not be cached",
                self.host_name
            ),
            State::Terminal => warn!("Resolution of {} completed twice", self.host_name),
        }
    }
}
