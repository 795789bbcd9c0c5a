/// Domain suffix used when the hypervisor hostname has none
pub const FALLBACK_DOMAIN: &str = "local";

/// A running guest discovered on a hypervisor during one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub name: String,
    pub fqdn: String,
}

impl Workload {
    pub fn new(name: String, domain: &str) -> Self {
        let fqdn = format!("{}.{}", name, domain);
        Self { name, fqdn }
    }
}

/// Naming information derived from the hypervisor's own hostname
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HypervisorIdentity {
    /// Hostname as reported by the hypervisor; used for the `hypervisor`
    /// label and the target file name
    pub name: String,
    /// Suffix appended to workload names
    pub domain: String,
}

impl HypervisorIdentity {
    /// The domain is everything after the first dot that follows a word
    /// character, e.g. `hv1.example.com` -> `example.com`.
    pub fn from_hostname(hostname: &str) -> Self {
        let mut prev_is_word = false;
        let mut domain = None;

        for (idx, ch) in hostname.char_indices() {
            if ch == '.' && prev_is_word {
                domain = Some(&hostname[idx + 1..]);
                break;
            }
            prev_is_word = ch.is_ascii_alphanumeric() || ch == '_';
        }

        let domain = match domain {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => FALLBACK_DOMAIN.to_string(),
        };

        Self {
            name: hostname.to_string(),
            domain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fqdn_hostname() {
        let id = HypervisorIdentity::from_hostname("hv1.example.com");
        assert_eq!(id.name, "hv1.example.com");
        assert_eq!(id.domain, "example.com");
    }

    #[test]
    fn test_short_hostname_uses_fallback() {
        let id = HypervisorIdentity::from_hostname("hv1");
        assert_eq!(id.name, "hv1");
        assert_eq!(id.domain, FALLBACK_DOMAIN);
    }

    #[test]
    fn test_trailing_dot_uses_fallback() {
        assert_eq!(HypervisorIdentity::from_hostname("hv1.").domain, FALLBACK_DOMAIN);
        assert_eq!(HypervisorIdentity::from_hostname("").domain, FALLBACK_DOMAIN);
    }

    #[test]
    fn test_hyphenated_hostname() {
        let id = HypervisorIdentity::from_hostname("kvm-01.dc1.example.net");
        assert_eq!(id.domain, "dc1.example.net");
    }

    #[test]
    fn test_leading_dot_is_skipped() {
        let id = HypervisorIdentity::from_hostname(".hv1.lan");
        assert_eq!(id.domain, "lan");
    }

    #[test]
    fn test_workload_fqdn() {
        let w = Workload::new("web01".to_string(), "example.com");
        assert_eq!(w.name, "web01");
        assert_eq!(w.fqdn, "web01.example.com");
    }
}
