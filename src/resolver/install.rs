use super::{HostnameResolver, SimpleResolver};
use std::sync::Arc;
use tracing::info;

/// The resolvers an event loop hands out to its connections, at most one per
/// resolution contract.
#[derive(Debug, Default, Clone)]
pub struct ResolverSlots {
    resolver: Option<Arc<dyn SimpleResolver>>,
    name_resolver: Option<Arc<dyn HostnameResolver>>,
}

impl ResolverSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install_resolver(&mut self, resolver: Arc<dyn SimpleResolver>) {
        if self.resolver.replace(resolver).is_some() {
            info!("Replaced the installed resolver");
        }
    }

    pub fn install_name_resolver(&mut self, resolver: Arc<dyn HostnameResolver>) {
        if self.name_resolver.replace(resolver).is_some() {
            info!("Replaced the installed name resolver");
        }
    }

    pub fn resolver(&self) -> Option<Arc<dyn SimpleResolver>> {
        self.resolver.clone()
    }

    pub fn name_resolver(&self) -> Option<Arc<dyn HostnameResolver>> {
        self.name_resolver.clone()
    }
}
