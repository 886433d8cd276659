use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use danglescan::dns::DnsLookup;
use danglescan::probe::{build_client, HttpProbe, HttpProber};
use danglescan::reporting::{write_outputs, Summary};
use danglescan::{ScanConfig, Scanner};
use tempfile::tempdir;
use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

/// Fixed answers keyed by hostname.
struct StaticDns {
    cnames: HashMap<String, String>,
}

#[async_trait]
impl DnsLookup for StaticDns {
    async fn resolve_cname(&self, hostname: &str) -> Option<String> {
        self.cnames.get(hostname).cloned()
    }

    async fn resolve_a(&self, _hostname: &str) -> Option<Vec<String>> {
        Some(vec!["127.0.0.1".to_string()])
    }
}

#[tokio::test]
async fn test_scan_and_report_end_to_end() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let live = mock_server.address().to_string();
    let dead = "127.0.0.1:1".to_string();
    let plain = format!("localhost:{}", mock_server.address().port());

    let dns = StaticDns {
        cnames: HashMap::from([
            (live.clone(), "orphan.herokuapp.com.".to_string()),
            (dead.clone(), "gone.github.io".to_string()),
        ]),
    };
    let timeout = Duration::from_secs(3);
    let config = ScanConfig {
        workers: 2,
        timeout,
        ..ScanConfig::default()
    };
    let prober = HttpProber::new(build_client(timeout).unwrap(), timeout);
    let dns: Arc<dyn DnsLookup> = Arc::new(dns);
    let prober: Arc<dyn HttpProbe> = Arc::new(prober);
    let scanner = Scanner::new(&config, dns, prober);

    let hosts = vec![live.clone(), dead.clone(), plain.clone(), live.clone()];
    let results = scanner.run(hosts).await;

    assert_eq!(results.len(), 4);
    let summary = Summary::from_results(&results);
    assert_eq!(summary.takeover_risk, 3);
    assert_eq!(summary.takeover_200, 2);
    assert_eq!(summary.without_cname, 1);

    let live_row = results.iter().find(|r| r.hostname == live).unwrap();
    assert_eq!(live_row.cname.as_deref(), Some("orphan.herokuapp.com."));
    assert!(live_row.addresses.is_none());

    let dead_row = results.iter().find(|r| r.hostname == dead).unwrap();
    assert!(dead_row.takeover_risk);
    assert_eq!(dead_row.http_status, None);

    let plain_row = results.iter().find(|r| r.hostname == plain).unwrap();
    assert!(!plain_row.takeover_risk);
    assert_eq!(plain_row.addresses, Some(vec!["127.0.0.1".to_string()]));
    assert_eq!(plain_row.http_status, Some(200));

    let dir = tempdir().unwrap();
    let paths = write_outputs(&results, dir.path()).unwrap();

    let danger = std::fs::read_to_string(&paths.danger).unwrap();
    assert_eq!(danger.lines().count(), 2);
    assert!(danger.lines().all(|l| l.starts_with(&live)));

    let csv = std::fs::read_to_string(&paths.csv).unwrap();
    assert_eq!(csv.lines().count(), 5);
    assert!(csv.starts_with("Subdomain,CNAME,IPs,HTTP Status,Final URL,Takeover,Trigger"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.json).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 4);
}
