use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, trace};
use trust_dns_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::rr::{RData, RecordType};
use trust_dns_resolver::system_conf::read_system_conf;
use trust_dns_resolver::TokioAsyncResolver;

use crate::error::SetupError;

/// DNS side of the scan. Every negative outcome, expected or not, comes back
/// as `None`; nothing here can fail a hostname's pipeline.
#[async_trait]
pub trait DnsLookup: Send + Sync {
    /// Canonical name of `hostname`, trailing root dot removed.
    async fn resolve_cname(&self, hostname: &str) -> Option<String>;

    /// IPv4 addresses of `hostname` in answer order.
    async fn resolve_a(&self, hostname: &str) -> Option<Vec<String>>;
}

/// Builds a resolver from the system configuration, or from a single UDP
/// nameserver when one is given. Each query gets one attempt bounded by
/// `query_timeout`.
pub fn create_resolver(
    nameserver: Option<SocketAddr>,
    query_timeout: Duration,
) -> Result<TokioAsyncResolver, SetupError> {
    let (config, mut opts) = match nameserver {
        Some(socket_addr) => {
            let mut config = ResolverConfig::new();
            config.add_name_server(NameServerConfig {
                socket_addr,
                protocol: Protocol::Udp,
                tls_dns_name: None,
                trust_negative_responses: false,
                bind_addr: None,
            });
            (config, ResolverOpts::default())
        }
        None => read_system_conf()?,
    };
    opts.timeout = query_timeout;
    opts.attempts = 1;

    Ok(TokioAsyncResolver::tokio(config, opts))
}

pub struct DnsResolver {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl DnsResolver {
    pub fn new(resolver: TokioAsyncResolver, timeout: Duration) -> Self {
        Self { resolver, timeout }
    }
}

#[async_trait]
impl DnsLookup for DnsResolver {
    async fn resolve_cname(&self, hostname: &str) -> Option<String> {
        let query = self.resolver.lookup(hostname, RecordType::CNAME);
        let lookup = match timeout(self.timeout, query).await {
            Ok(Ok(lookup)) => lookup,
            Ok(Err(e)) => {
                log_failure(hostname, "CNAME", &e);
                return None;
            }
            Err(_) => {
                trace!("CNAME lookup for {} timed out", hostname);
                return None;
            }
        };

        lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::CNAME(target) => Some(strip_root(&target.to_string())),
                _ => None,
            })
            .filter(|target| !target.is_empty())
            .last()
    }

    async fn resolve_a(&self, hostname: &str) -> Option<Vec<String>> {
        match timeout(self.timeout, self.resolver.ipv4_lookup(hostname)).await {
            Ok(Ok(lookup)) => {
                let addrs: Vec<String> = lookup.iter().map(|a| a.to_string()).collect();
                (!addrs.is_empty()).then_some(addrs)
            }
            Ok(Err(e)) => {
                log_failure(hostname, "A", &e);
                None
            }
            Err(_) => {
                trace!("A lookup for {} timed out", hostname);
                None
            }
        }
    }
}

fn log_failure(hostname: &str, record: &str, err: &ResolveError) {
    if is_expected_negative(err.kind()) {
        trace!("{} lookup for {}: {}", record, hostname, err);
    } else {
        debug!("DNS error ({}) for {}: {}", record, hostname, err);
    }
}

/// NXDOMAIN, empty answers and timeouts are normal scan outcomes.
pub fn is_expected_negative(kind: &ResolveErrorKind) -> bool {
    matches!(
        kind,
        ResolveErrorKind::NoRecordsFound { .. } | ResolveErrorKind::Timeout
    )
}

pub fn strip_root(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}
