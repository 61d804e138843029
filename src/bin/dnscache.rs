use anyhow::Context;
use caching_resolver::{
    cache::DnsCache,
    config::{DnsCacheConfig, DEFAULT_DNS_TIMEOUT},
    resolver::{
        caching::CachingThreadedResolver,
        hostname::CachingHostnameResolver,
        install::ResolverSlots,
        system::{GaiResolver, ThreadedResolver},
        HostResolution, ResolutionReceiver, TransportSemantics,
    },
    Result,
};
use std::{net::SocketAddr, time::Instant};
use structopt::StructOpt;
use tracing::warn;

#[derive(Debug, StructOpt)]
#[structopt(name = "dnscache", about = "Resolve host names through the caching resolvers")]
struct Opt {
    /// Host names to resolve
    hosts: Vec<String>,

    #[structopt(long, default_value = "10000")]
    size: usize,

    #[structopt(long)]
    disable_cache: bool,

    /// Lookup timeout in seconds
    #[structopt(long)]
    timeout: Option<f64>,

    /// Use the streaming resolver, which also returns IPv6 addresses
    #[structopt(long)]
    streaming: bool,

    #[structopt(long, default_value = "0")]
    port: u16,

    /// How many times each host is resolved
    #[structopt(long, default_value = "2")]
    repeat: usize,
}

struct PrintingReceiver;

impl ResolutionReceiver for PrintingReceiver {
    fn resolution_began(&mut self, resolution: &HostResolution) {
        println!("  began resolving {}", resolution.name());
    }

    fn address_resolved(&mut self, address: SocketAddr) {
        println!("  found {}", address);
    }

    fn resolution_complete(&mut self) {
        println!("  complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("warn,caching_resolver=info")?.start()?;

    let opt: Opt = Opt::from_args();

    let config = DnsCacheConfig {
        enabled: !opt.disable_cache,
        size: opt.size,
        timeout: opt.timeout.unwrap_or(DEFAULT_DNS_TIMEOUT),
    };
    config.validate().context("Invalid DNS cache options")?;

    let cache = DnsCache::global();
    let mut slots = ResolverSlots::new();
    if opt.streaming {
        CachingHostnameResolver::install_on(&mut slots, GaiResolver::new(), cache, &config);
    } else {
        CachingThreadedResolver::install_on(&mut slots, ThreadedResolver::new(), cache, &config)?;
    }

    for host in &opt.hosts {
        for _ in 0..opt.repeat {
            let start = Instant::now();

            if let Some(resolver) = slots.name_resolver() {
                let resolution = resolver
                    .resolve_host_name(
                        &mut PrintingReceiver,
                        host,
                        opt.port,
                        None,
                        TransportSemantics::Tcp,
                    )
                    .await?;
                println!(
                    "{} -> {:?} ({:?})",
                    host,
                    resolution.addresses(),
                    start.elapsed()
                );
            } else if let Some(resolver) = slots.resolver() {
                match resolver.get_host_by_name(host, None).await {
                    Ok(addr) => println!("{} -> {} ({:?})", host, addr, start.elapsed()),
                    Err(err) => warn!("Failed to resolve {}: {}", host, err),
                }
            }
        }
    }

    Ok(())
}
