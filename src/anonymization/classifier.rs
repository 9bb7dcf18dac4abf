//! Identifier classification and decomposition
//!
//! Heuristics deciding whether a captured value is an IPv4 literal or a
//! fully-qualified domain name, and helpers splitting names and object paths
//! into their components. The checks are intentionally loose: `999.999.999.999`
//! counts as an IPv4 literal and single-label hostnames are not FQDNs.

/// Shape of a captured host value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// Dotted-quad literal
    Ipv4,
    /// Name with at least one dot and an alphabetic top-level label
    Fqdn,
    /// Anything else (bare hostname, NetBIOS name)
    Bare,
}

/// Classify a host value
///
/// IPv4 literals are tested first; `1.2.3.4` never reaches the FQDN check.
pub fn classify_host(value: &str) -> HostKind {
    if is_ipv4_literal(value) {
        HostKind::Ipv4
    } else if is_fqdn(value) {
        HostKind::Fqdn
    } else {
        HostKind::Bare
    }
}

/// True iff `value` is four dot-separated groups of one to three digits
pub fn is_ipv4_literal(value: &str) -> bool {
    let groups: Vec<&str> = value.split('.').collect();
    groups.len() == 4
        && groups
            .iter()
            .all(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()))
}

/// True iff `value` matches `[A-Za-z0-9.-]+\.[A-Za-z]{2,}` in full
pub fn is_fqdn(value: &str) -> bool {
    // The top-level label holds no dot, so it always follows the last one.
    let Some((head, tld)) = value.rsplit_once('.') else {
        return false;
    };
    !head.is_empty()
        && head
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
        && tld.len() >= 2
        && tld.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Split a fully-qualified name into its leaf label and domain suffix
///
/// ```
/// use logscrub::anonymization::classifier::split_fqdn;
///
/// assert_eq!(split_fqdn("esx01.corp.example.com"), ("esx01", "corp.example.com"));
/// assert_eq!(split_fqdn("standalone"), ("standalone", ""));
/// ```
pub fn split_fqdn(fqdn: &str) -> (&str, &str) {
    fqdn.split_once('.').unwrap_or((fqdn, ""))
}

/// Trailing two-label root of a suffix with more than two labels
///
/// `eu.corp.example.com` yields `example.com`; `example.com` yields `None`.
pub fn root_domain(suffix: &str) -> Option<&str> {
    let mut dots = suffix.rmatch_indices('.');
    let _tld_dot = dots.next()?;
    let (root_dot, _) = dots.next()?;
    Some(&suffix[root_dot + 1..])
}

/// Split a backslash-delimited object path into its components
pub fn split_hierarchical_path(path: &str) -> Vec<&str> {
    path.split('\\').collect()
}

/// Interior components of an object path (first and last discarded)
pub fn interior_components(path: &str) -> Vec<&str> {
    let components = split_hierarchical_path(path);
    if components.len() < 3 {
        return Vec::new();
    }
    components[1..components.len() - 1].to_vec()
}

/// Trailing account name of a domain-qualified account (`DOMAIN\user`)
pub fn account_name(qualified: &str) -> Option<&str> {
    qualified
        .rsplit_once('\\')
        .map(|(_, name)| name)
        .filter(|name| !name.is_empty())
}

/// Blank the first two octets of an IPv4 literal
///
/// ```
/// use logscrub::anonymization::classifier::mask_ipv4;
///
/// assert_eq!(mask_ipv4("10.20.30.40"), "**.**.30.40");
/// ```
pub fn mask_ipv4(ip: &str) -> String {
    ip.split('.')
        .enumerate()
        .map(|(idx, octet)| if idx < 2 { "**" } else { octet })
        .collect::<Vec<_>>()
        .join(".")
}

/// Domain portion of an email address (word characters, dots and dashes after `@`)
pub fn extract_email_domain(address: &str) -> Option<&str> {
    let (_, rest) = address.split_once('@')?;
    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.' || c == '-'))
        .unwrap_or(rest.len());
    let domain = &rest[..end];
    (!domain.is_empty()).then_some(domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("10.20.30.40", true ; "private address")]
    #[test_case("999.999.999.999", true ; "no range validation")]
    #[test_case("1.2.3", false ; "three groups")]
    #[test_case("1.2.3.4.5", false ; "five groups")]
    #[test_case("1.2.3.4444", false ; "four digit group")]
    #[test_case("a.b.c.d", false ; "letters")]
    #[test_case("", false ; "empty")]
    fn test_is_ipv4_literal(value: &str, expected: bool) {
        assert_eq!(is_ipv4_literal(value), expected);
    }

    #[test_case("vcenter01.corp.example.com", true ; "multi label")]
    #[test_case("example.com", true ; "two labels")]
    #[test_case("host-1.lab.local", true ; "dash in label")]
    #[test_case("vcenter01", false ; "single label")]
    #[test_case("10.1.2.3", false ; "numeric tld")]
    #[test_case("host.c", false ; "one letter tld")]
    #[test_case("user@example.com", false ; "at sign")]
    #[test_case(".com", false ; "empty head")]
    fn test_is_fqdn(value: &str, expected: bool) {
        assert_eq!(is_fqdn(value), expected);
    }

    #[test]
    fn test_classify_host() {
        assert_eq!(classify_host("10.0.0.1"), HostKind::Ipv4);
        assert_eq!(classify_host("esx01.lab.local"), HostKind::Fqdn);
        assert_eq!(classify_host("ESX01"), HostKind::Bare);
    }

    #[test]
    fn test_split_fqdn() {
        assert_eq!(split_fqdn("a.b.c"), ("a", "b.c"));
        assert_eq!(split_fqdn("smtp.example.com"), ("smtp", "example.com"));
    }

    #[test_case("eu.corp.example.com", Some("example.com"))]
    #[test_case("corp.example.com", Some("example.com"))]
    #[test_case("example.com", None)]
    #[test_case("local", None)]
    fn test_root_domain(suffix: &str, expected: Option<&str>) {
        assert_eq!(root_domain(suffix), expected);
    }

    #[test]
    fn test_interior_components() {
        assert_eq!(
            interior_components(r"vc01\Datacenter\Prod\vm-app01"),
            vec!["Datacenter", "Prod"]
        );
        assert!(interior_components(r"vc01\vm-app01").is_empty());
        assert!(interior_components("vm-app01").is_empty());
    }

    #[test]
    fn test_account_name() {
        assert_eq!(account_name(r"CORP\jdoe"), Some("jdoe"));
        assert_eq!(account_name(r"CORP\svc\backup"), Some("backup"));
        assert_eq!(account_name("jdoe"), None);
        assert_eq!(account_name(r"CORP\"), None);
    }

    #[test]
    fn test_mask_ipv4_keeps_lower_octets() {
        assert_eq!(mask_ipv4("192.168.1.20"), "**.**.1.20");
        assert_eq!(mask_ipv4("10.1.2.3"), "**.**.2.3");
    }

    #[test]
    fn test_extract_email_domain() {
        assert_eq!(
            extract_email_domain("admin@corp.example.com"),
            Some("corp.example.com")
        );
        assert_eq!(extract_email_domain("admin@corp.example.com>"), Some("corp.example.com"));
        assert_eq!(extract_email_domain("no-at-sign"), None);
        assert_eq!(extract_email_domain("trailing@"), None);
    }
}
