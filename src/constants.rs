use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_WORKERS: usize = 10;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_DELAY: Duration = Duration::ZERO;

pub const DEFAULT_KEYWORDS: &str =
    "amazonaws,elb,herokuapp,github.io,netlify.app,cloudfront.net,azurewebsites.net";

pub const MAX_REDIRECTS: usize = 10;

/// A third-party endpoint whose hostnames can be claimed by whoever registers
/// the matching resource first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub service: String,
    pub pattern: String,
}

impl Fingerprint {
    pub fn new(service: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            pattern: pattern.into().to_lowercase(),
        }
    }
}

// Declaration order is match order.
pub static FINGERPRINTS: Lazy<Vec<Fingerprint>> = Lazy::new(|| {
    [
        ("AWS S3", ".s3.amazonaws.com"),
        ("AWS Elastic Beanstalk", ".elasticbeanstalk.com"),
        ("AWS CloudFront", ".cloudfront.net"),
        ("Microsoft Azure App Services", ".azurewebsites.net"),
        ("Microsoft Azure Blob Storage", ".blob.core.windows.net"),
        ("GitHub Pages", ".github.io"),
        ("Heroku", ".herokuapp.com"),
        ("Shopify", ".myshopify.com"),
        ("Zendesk", ".zendesk.com"),
        ("Freshdesk", ".freshdesk.com"),
        ("Help Scout", ".helpscoutdocs.com"),
        ("Intercom", ".intercom.help"),
        ("UserVoice", ".uservoice.com"),
        ("Unbounce", ".unbouncepages.com"),
        ("ActiveCampaign", ".activehosted.com"),
        ("Kajabi", ".kajabi.com"),
        ("LeadPages", ".lp.com"),
        ("Tilda", ".tilda.ws"),
        ("Canny.io", ".canny.io"),
        ("ReadTheDocs", ".readthedocs.io"),
        ("ReadMe.io", ".readme.io"),
        ("Surge.sh", ".surge.sh"),
    ]
    .into_iter()
    .map(|(service, pattern)| Fingerprint::new(service, pattern))
    .collect()
});

/// Splits a comma separated keyword list, lowercasing and dropping blanks.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|kw| kw.trim().to_lowercase())
        .filter(|kw| !kw.is_empty())
        .collect()
}
