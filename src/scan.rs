use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, error, info, trace, warn};

use crate::config::ScanConfig;
use crate::dns::DnsLookup;
use crate::probe::{HttpProbe, ProbeOutcome};
use crate::takeover::{Classifier, Trigger, Verdict};

/// Everything learned about one hostname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub hostname: String,
    pub cname: Option<String>,
    pub addresses: Option<Vec<String>>,
    pub http_status: Option<u16>,
    pub final_url: Option<String>,
    pub takeover_risk: bool,
    pub trigger: Option<Trigger>,
}

impl ScanResult {
    /// A result with nothing resolved and no risk.
    pub fn unresolved(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            cname: None,
            addresses: None,
            http_status: None,
            final_url: None,
            takeover_risk: false,
            trigger: None,
        }
    }

    /// Risky and serving a 200: the entries worth a manual look.
    pub fn is_dangerous(&self) -> bool {
        self.takeover_risk && self.http_status == Some(200)
    }
}

/// Write side of the result collection handed to workers. Appending is the
/// only operation; each call holds the lock for a single push.
#[derive(Clone, Default)]
struct ResultSink {
    inner: Arc<Mutex<Vec<ScanResult>>>,
}

impl ResultSink {
    fn append(&self, result: ScanResult) {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(result);
    }

    fn finish(self) -> ResultSet {
        let results = match Arc::try_unwrap(self.inner) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(|p| p.into_inner()),
            Err(shared) => shared.lock().unwrap_or_else(|p| p.into_inner()).clone(),
        };
        ResultSet { results }
    }
}

/// The finished, read-only results of a run, in completion order.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    results: Vec<ScanResult>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanResult> {
        self.results.iter()
    }

    /// Stable sort by hostname; duplicates keep completion order.
    pub fn sorted(&self) -> Vec<&ScanResult> {
        let mut sorted: Vec<&ScanResult> = self.results.iter().collect();
        sorted.sort_by(|a, b| a.hostname.cmp(&b.hostname));
        sorted
    }

    pub fn dangerous(&self) -> impl Iterator<Item = &ScanResult> {
        self.results.iter().filter(|r| r.is_dangerous())
    }
}

impl From<Vec<ScanResult>> for ResultSet {
    fn from(results: Vec<ScanResult>) -> Self {
        Self { results }
    }
}

/// Pipeline position of a single hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    CnameResolved,
    RiskShortCircuit,
    AddressesResolved,
    Probed,
    Classified,
    Done,
}

struct ScanContext {
    dns: Arc<dyn DnsLookup>,
    prober: Arc<dyn HttpProbe>,
    classifier: Classifier,
    delay: Duration,
}

struct HostScan {
    hostname: String,
    stage: Stage,
    trail: Vec<Stage>,
    cname: Option<String>,
    verdict: Verdict,
    addresses: Option<Vec<String>>,
    probe: ProbeOutcome,
}

impl HostScan {
    fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            stage: Stage::Start,
            trail: vec![Stage::Start],
            cname: None,
            verdict: Verdict::default(),
            addresses: None,
            probe: ProbeOutcome::default(),
        }
    }

    fn classify(&self, ctx: &ScanContext) -> Verdict {
        self.cname
            .as_deref()
            .map(|cname| ctx.classifier.classify(cname))
            .unwrap_or_default()
    }

    /// Performs the work of the current stage and moves to the next one.
    async fn advance(&mut self, ctx: &ScanContext) {
        let next = match self.stage {
            Stage::Start => {
                self.cname = ctx.dns.resolve_cname(&self.hostname).await;
                self.verdict = self.classify(ctx);
                Stage::CnameResolved
            }
            Stage::CnameResolved if self.verdict.risk => {
                if let Some(trigger) = &self.verdict.trigger {
                    debug!("Potential takeover detected for {} ({})", self.hostname, trigger);
                }
                Stage::RiskShortCircuit
            }
            Stage::CnameResolved => {
                self.addresses = ctx.dns.resolve_a(&self.hostname).await;
                Stage::AddressesResolved
            }
            Stage::RiskShortCircuit | Stage::AddressesResolved => {
                self.probe = ctx.prober.probe(&self.hostname).await;
                if !ctx.delay.is_zero() {
                    sleep(ctx.delay).await;
                }
                Stage::Probed
            }
            Stage::Probed => {
                let recheck = self.classify(ctx);
                if recheck.risk && !self.verdict.risk {
                    debug!("Takeover risk for {} surfaced on re-check", self.hostname);
                }
                self.verdict = std::mem::take(&mut self.verdict).merge(recheck);
                Stage::Classified
            }
            Stage::Classified | Stage::Done => Stage::Done,
        };

        trace!("{}: {:?} -> {:?}", self.hostname, self.stage, next);
        self.stage = next;
        self.trail.push(next);
    }

    async fn run(mut self, ctx: &ScanContext) -> (ScanResult, Vec<Stage>) {
        while self.stage != Stage::Done {
            self.advance(ctx).await;
        }

        let result = ScanResult {
            hostname: self.hostname,
            cname: self.cname,
            addresses: self.addresses,
            http_status: self.probe.status,
            final_url: self.probe.final_url,
            takeover_risk: self.verdict.risk,
            trigger: self.verdict.trigger,
        };
        (result, self.trail)
    }
}

/// Runs every hostname through CNAME lookup, classification, A lookup
/// (skipped once a risk is found), HTTP probing and a final re-check, with at
/// most `workers` hostnames in flight.
pub struct Scanner {
    ctx: Arc<ScanContext>,
    workers: usize,
}

impl Scanner {
    pub fn new(config: &ScanConfig, dns: Arc<dyn DnsLookup>, prober: Arc<dyn HttpProbe>) -> Self {
        Self {
            ctx: Arc::new(ScanContext {
                dns,
                prober,
                classifier: config.classifier(),
                delay: config.delay,
            }),
            workers: config.workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn scan_host(&self, hostname: &str) -> ScanResult {
        HostScan::new(hostname).run(&self.ctx).await.0
    }

    pub async fn run(&self, hostnames: Vec<String>) -> ResultSet {
        self.run_with(hostnames, |_| {}).await
    }

    /// Scans all hostnames; `on_result` sees each result as it completes.
    pub async fn run_with<F>(&self, hostnames: Vec<String>, mut on_result: F) -> ResultSet
    where
        F: FnMut(&ScanResult),
    {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let sink = ResultSink::default();
        let mut tasks = FuturesUnordered::new();

        for hostname in hostnames {
            let ctx = Arc::clone(&self.ctx);
            let semaphore = Arc::clone(&semaphore);
            let sink_clone = sink.clone();
            let host = hostname.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(p) => Some(p),
                    Err(e) => {
                        warn!("Worker pool closed while scheduling {}: {}", host, e);
                        None
                    }
                };

                let (result, _) = HostScan::new(&host).run(&ctx).await;
                sink_clone.append(result.clone());
                result
            });
            tasks.push(handle.map(move |joined| (hostname, joined)));
        }

        while let Some((hostname, joined)) = tasks.next().await {
            match joined {
                Ok(result) => on_result(&result),
                Err(e) => {
                    if e.is_panic() {
                        error!("Scan task for {} panicked: {:?}", hostname, e);
                    } else {
                        error!("Scan task for {} failed: {:?}", hostname, e);
                    }
                    let result = ScanResult::unresolved(hostname);
                    on_result(&result);
                    sink.append(result);
                }
            }
        }

        let results = sink.finish();
        info!(
            "Scan finished: {} results, {} flagged",
            results.len(),
            results.iter().filter(|r| r.takeover_risk).count()
        );
        results
    }
}
