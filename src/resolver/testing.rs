use super::{
    AddressType, HostResolution, HostnameResolver, ResolutionReceiver, SimpleResolver,
    TransportSemantics,
};
use crate::{ResolverError, Result};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    time::Duration,
};

#[derive(Debug, Clone, Copy)]
pub enum Answer {
    Ok(IpAddr, Duration),
    NoEntry,
}

/// Answers every lookup from a script, one answer per call, repeating the last
/// one when the script runs out. An answer slower than the given timeout fails
/// with `ResolverError::Timeout` once the timeout elapses.
#[derive(Debug)]
pub struct CountingResolver {
    answers: Vec<Answer>,
    calls: Mutex<Vec<(String, Option<Duration>)>>,
}

impl CountingResolver {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(addr: &str) -> Self {
        Self::new(vec![Answer::Ok(addr.parse().unwrap(), Duration::ZERO)])
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn timeouts(&self) -> Vec<Option<Duration>> {
        self.calls.lock().iter().map(|(_, t)| *t).collect()
    }
}

#[async_trait::async_trait]
impl SimpleResolver for CountingResolver {
    async fn get_host_by_name(&self, name: &str, timeout: Option<Duration>) -> Result<IpAddr> {
        let answer = {
            let mut calls = self.calls.lock();
            let index = calls.len().min(self.answers.len() - 1);
            calls.push((name.to_owned(), timeout));
            self.answers[index]
        };

        match answer {
            Answer::Ok(addr, delay) => {
                if let Some(timeout) = timeout.filter(|t| *t < delay) {
                    tokio::time::sleep(timeout).await;
                    return Err(ResolverError::Timeout {
                        name: name.to_owned(),
                        timeout,
                    }
                    .into());
                }
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(addr)
            }
            Answer::NoEntry => Err(ResolverError::NoEntry(name.to_owned()).into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Began(String),
    Address(SocketAddr),
    Complete,
}

#[derive(Debug, Default)]
pub struct RecordingReceiver {
    pub events: Vec<Event>,
}

impl ResolutionReceiver for RecordingReceiver {
    fn resolution_began(&mut self, resolution: &HostResolution) {
        self.events.push(Event::Began(resolution.name().to_owned()));
    }

    fn address_resolved(&mut self, address: SocketAddr) {
        self.events.push(Event::Address(address));
    }

    fn resolution_complete(&mut self) {
        self.events.push(Event::Complete);
    }
}

/// Reports the scripted addresses of a host, hosts without a script resolve
/// to nothing. Hosts listed in `failing` error out before any callback.
#[derive(Debug, Default)]
pub struct ScriptedNameResolver {
    hosts: HashMap<String, Vec<IpAddr>>,
    failing: Vec<String>,
    calls: Mutex<Vec<(String, u16, Option<Vec<AddressType>>, TransportSemantics)>>,
}

impl ScriptedNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: &str, addrs: &[&str]) -> Self {
        self.hosts.insert(
            host.to_owned(),
            addrs.iter().map(|a| a.parse().unwrap()).collect(),
        );
        self
    }

    pub fn with_failing_host(mut self, host: &str) -> Self {
        self.failing.push(host.to_owned());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last_call(&self) -> Option<(String, u16, Option<Vec<AddressType>>, TransportSemantics)> {
        self.calls.lock().last().cloned()
    }
}

#[async_trait::async_trait]
impl HostnameResolver for ScriptedNameResolver {
    async fn resolve_host_name(
        &self,
        receiver: &mut dyn ResolutionReceiver,
        host_name: &str,
        port: u16,
        address_types: Option<&[AddressType]>,
        transport: TransportSemantics,
    ) -> Result<HostResolution> {
        self.calls.lock().push((
            host_name.to_owned(),
            port,
            address_types.map(<[AddressType]>::to_vec),
            transport,
        ));

        if self.failing.iter().any(|h| h == host_name) {
            anyhow::bail!("resolver for {} is broken", host_name);
        }

        let resolution = HostResolution::new(host_name);
        receiver.resolution_began(&resolution);

        let addresses: Vec<SocketAddr> = self
            .hosts
            .get(host_name)
            .into_iter()
            .flatten()
            .map(|ip| SocketAddr::new(*ip, port))
            .collect();

        for addr in &addresses {
            receiver.address_resolved(*addr);
        }
        receiver.resolution_complete();

        Ok(resolution.with_addresses(addresses))
    }
}
