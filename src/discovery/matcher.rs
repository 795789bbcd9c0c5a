//! Match expressions that select workloads for a rule
//!
//! Expressions are compiled once when the configuration is loaded, so a
//! malformed expression is a startup error and evaluation is infallible.

use crate::hypervisor::Workload;
use crate::{Result, SdError};
use regex::Regex;
use serde::{Deserialize, Deserializer};

/// A compiled rule match expression
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(expr: &str) -> Result<Self> {
        let regex = Regex::new(expr).map_err(|source| SdError::InvalidPattern {
            pattern: expr.to_string(),
            source,
        })?;

        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Test a fully-qualified workload name. Not anchored unless the
    /// expression anchors itself.
    pub fn is_match(&self, fqdn: &str) -> bool {
        self.regex.is_match(fqdn)
    }

    /// Workloads whose fully-qualified name satisfies this pattern, in
    /// enumeration order
    pub fn matching<'a>(&self, workloads: &'a [Workload]) -> Vec<&'a Workload> {
        workloads
            .iter()
            .filter(|w| self.is_match(&w.fqdn))
            .collect()
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let expr = String::deserialize(deserializer)?;
        Pattern::new(&expr).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workloads(names: &[&str]) -> Vec<Workload> {
        names
            .iter()
            .map(|n| Workload::new(n.to_string(), "example.com"))
            .collect()
    }

    #[test]
    fn test_unanchored_match() {
        let pattern = Pattern::new("web").unwrap();
        assert!(pattern.is_match("web01.example.com"));
        assert!(pattern.is_match("oldweb.example.com"));
        assert!(!pattern.is_match("db01.example.com"));
    }

    #[test]
    fn test_match_sees_domain_suffix() {
        let pattern = Pattern::new(r"^db\d+\.example\.com$").unwrap();
        assert!(pattern.is_match("db01.example.com"));
        assert!(!pattern.is_match("db01.example.org"));
    }

    #[test]
    fn test_matching_preserves_order() {
        let all = workloads(&["web02", "db01", "web01"]);
        let pattern = Pattern::new("^web").unwrap();

        let names: Vec<&str> = pattern
            .matching(&all)
            .iter()
            .map(|w| w.name.as_str())
            .collect();
        assert_eq!(names, vec!["web02", "web01"]);
    }

    #[test]
    fn test_no_match() {
        let all = workloads(&["web01", "web02", "db01"]);
        let pattern = Pattern::new("^cache").unwrap();
        assert!(pattern.matching(&all).is_empty());
    }

    #[test]
    fn test_invalid_expression() {
        let err = Pattern::new("web(").unwrap_err();
        assert!(matches!(err, SdError::InvalidPattern { .. }));
        assert!(err.to_string().contains("web("));
    }

    #[test]
    fn test_deserialize_rejects_invalid_expression() {
        let ok: Pattern = serde_yaml::from_str("'^web'").unwrap();
        assert_eq!(ok.as_str(), "^web");

        let err = serde_yaml::from_str::<Pattern>("'[unclosed'").unwrap_err();
        assert!(err.to_string().contains("Invalid match expression"));
    }
}
