use std::fmt;

use serde::Serialize;

use crate::constants::Fingerprint;

/// Which signal flagged a CNAME.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Trigger {
    Keyword(String),
    Fingerprint(String),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Keyword(kw) => write!(f, "keyword:{}", kw),
            Trigger::Fingerprint(service) => write!(f, "fingerprint:{}", service),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    pub risk: bool,
    pub trigger: Option<Trigger>,
}

impl Verdict {
    fn flagged(trigger: Trigger) -> Self {
        Self {
            risk: true,
            trigger: Some(trigger),
        }
    }

    /// Combines a later verdict into this one. Risk is never cleared and the
    /// first trigger seen is kept.
    pub fn merge(self, later: Verdict) -> Verdict {
        if self.risk {
            self
        } else {
            later
        }
    }
}

/// Matches CNAME targets against takeover keywords and service fingerprints.
///
/// Matching is plain substring containment on the lowercased name, so a
/// pattern embedded mid-string still counts.
#[derive(Debug, Clone)]
pub struct Classifier {
    keywords: Vec<String>,
    fingerprints: Vec<Fingerprint>,
}

impl Classifier {
    pub fn new(keywords: Vec<String>, fingerprints: Vec<Fingerprint>) -> Self {
        let keywords = keywords
            .into_iter()
            .map(|kw| kw.trim().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .collect();
        let fingerprints = fingerprints
            .into_iter()
            .map(|fp| Fingerprint::new(fp.service, fp.pattern))
            .filter(|fp| !fp.pattern.is_empty())
            .collect();

        Self {
            keywords,
            fingerprints,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn fingerprints(&self) -> &[Fingerprint] {
        &self.fingerprints
    }

    pub fn classify(&self, cname: &str) -> Verdict {
        let cname = normalize(cname);
        if cname.is_empty() {
            return Verdict::default();
        }

        if let Some(kw) = self.keywords.iter().find(|kw| cname.contains(kw.as_str())) {
            return Verdict::flagged(Trigger::Keyword(kw.clone()));
        }

        self.fingerprints
            .iter()
            .find(|fp| cname.contains(fp.pattern.as_str()))
            .map(|fp| Verdict::flagged(Trigger::Fingerprint(fp.service.clone())))
            .unwrap_or_default()
    }
}

fn normalize(name: &str) -> String {
    name.trim().trim_end_matches('.').to_lowercase()
}
