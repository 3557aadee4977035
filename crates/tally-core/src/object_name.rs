//! Management object names (`domain:key=value,...`).
//!
//! Only concrete names are accepted: no wildcard patterns and no quoted
//! values. Property order is not significant; the canonical form lists keys
//! sorted.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TallyError};

const RESERVED: [char; 7] = [',', '=', ':', '"', '*', '?', '\n'];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectName {
    domain: String,
    /// Sorted by key; keys are unique.
    properties: Vec<(String, String)>,
}

impl ObjectName {
    pub fn parse(s: &str) -> Result<Self> {
        let bad = |why: &str| TallyError::InvalidObjectName(format!("{s:?}: {why}"));

        let (domain, props) = s.split_once(':').ok_or_else(|| bad("missing ':'"))?;
        if domain.is_empty() {
            return Err(bad("empty domain"));
        }
        if domain.contains(RESERVED) {
            return Err(bad("domain contains a reserved character"));
        }
        if props.is_empty() {
            return Err(bad("empty property list"));
        }

        let mut properties = Vec::new();
        for prop in props.split(',') {
            let (k, v) = prop
                .split_once('=')
                .ok_or_else(|| bad("property without '='"))?;
            if k.is_empty() || v.is_empty() {
                return Err(bad("empty property key or value"));
            }
            if k.contains(RESERVED) || v.contains(RESERVED) {
                return Err(bad("property contains a reserved character"));
            }
            if properties.iter().any(|(existing, _): &(String, String)| existing == k) {
                return Err(bad("duplicate property key"));
            }
            properties.push((k.to_string(), v.to_string()));
        }
        properties.sort();

        Ok(Self {
            domain: domain.to_string(),
            properties,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl FromStr for ObjectName {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (k, v)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}
