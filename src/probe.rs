use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::constants::MAX_REDIRECTS;
use crate::error::SetupError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub status: Option<u16>,
    pub final_url: Option<String>,
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        self.status.is_some()
    }
}

#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// Fetches `https://{hostname}` then `http://{hostname}`, following
    /// redirects, and reports the first attempt that got any response.
    async fn probe(&self, hostname: &str) -> ProbeOutcome;
}

pub fn build_client(request_timeout: Duration) -> Result<Client, SetupError> {
    let client = Client::builder()
        .timeout(request_timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .danger_accept_invalid_certs(false)
        .pool_idle_timeout(Some(Duration::from_secs(30)))
        .build()?;
    Ok(client)
}

pub struct HttpProber {
    client: Client,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl HttpProbe for HttpProber {
    async fn probe(&self, hostname: &str) -> ProbeOutcome {
        for scheme in ["https", "http"] {
            let url = format!("{}://{}", scheme, hostname);
            match timeout(self.timeout, self.client.get(&url).send()).await {
                Ok(Ok(resp)) => {
                    trace!("{} answered {}", url, resp.status());
                    return ProbeOutcome {
                        status: Some(resp.status().as_u16()),
                        final_url: Some(resp.url().to_string()),
                    };
                }
                Ok(Err(e)) => {
                    debug!("HTTP error for {} ({}): {}", hostname, scheme, e);
                }
                Err(_) => {
                    debug!("HTTP timeout for {} ({})", hostname, scheme);
                }
            }
        }

        ProbeOutcome::default()
    }
}
