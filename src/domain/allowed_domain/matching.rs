//! Domain normalization and origin matching

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainFormatError {
    #[error("Domain is required")]
    Empty,

    #[error("Invalid domain format")]
    Invalid,
}

/// Normalize user input into the hostname a browser sends in `Origin`.
///
/// The input must be a bare hostname that parses as the host of
/// `https://{domain}`. Schemes, ports, paths, queries and userinfo are
/// rejected. One trailing dot is dropped and internationalised names are
/// stored in their punycode form.
pub fn normalize_domain(domain: &str) -> Result<String, DomainFormatError> {
    let domain = domain.trim();
    let domain = domain.strip_suffix('.').unwrap_or(domain);

    if domain.is_empty() {
        return Err(DomainFormatError::Empty);
    }

    if domain.contains(['/', ':', '?', '#', '@', '\\']) {
        return Err(DomainFormatError::Invalid);
    }

    let url = Url::parse(&format!("https://{}", domain)).map_err(|_| DomainFormatError::Invalid)?;

    url.host_str()
        .filter(|host| !host.is_empty())
        .map(|host| host.to_lowercase())
        .ok_or(DomainFormatError::Invalid)
}

/// Extract the lower-case hostname of an `Origin` header value
pub fn origin_host(origin: &str) -> Option<String> {
    let url = Url::parse(origin.trim()).ok()?;
    url.host_str()
        .filter(|host| !host.is_empty())
        .map(|host| host.to_lowercase())
}

/// Exact match, or `host` is a subdomain of `domain`
pub fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|rest| rest.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("Example.COM").unwrap(), "example.com");
        assert_eq!(normalize_domain(" app.example.nl ").unwrap(), "app.example.nl");
        assert_eq!(normalize_domain("localhost").unwrap(), "localhost");
    }

    #[test]
    fn test_normalize_domain_rejects_empty() {
        assert_eq!(normalize_domain(""), Err(DomainFormatError::Empty));
        assert_eq!(normalize_domain("   "), Err(DomainFormatError::Empty));
        assert_eq!(normalize_domain("."), Err(DomainFormatError::Empty));
    }

    #[test]
    fn test_normalize_domain_drops_trailing_dot() {
        let domain = normalize_domain("Example.com.").unwrap();

        assert_eq!(domain, "example.com");
        assert!(host_matches(&origin_host("https://example.com").unwrap(), &domain));
    }

    #[test]
    fn test_internationalised_domain_matches_punycode_origin() {
        let domain = normalize_domain("münchen.de").unwrap();
        assert_eq!(domain, "xn--mnchen-3ya.de");

        let host = origin_host("https://xn--mnchen-3ya.de").unwrap();
        assert!(host_matches(&host, &domain));

        let host = origin_host("https://shop.münchen.de").unwrap();
        assert!(host_matches(&host, &domain));
    }

    #[test]
    fn test_normalize_domain_rejects_non_hosts() {
        assert_eq!(normalize_domain("https://example.com"), Err(DomainFormatError::Invalid));
        assert_eq!(normalize_domain("example.com/path"), Err(DomainFormatError::Invalid));
        assert_eq!(normalize_domain("example.com:8080"), Err(DomainFormatError::Invalid));
        assert_eq!(normalize_domain("exa mple.com"), Err(DomainFormatError::Invalid));
        assert_eq!(normalize_domain("user@example.com"), Err(DomainFormatError::Invalid));
        assert_eq!(normalize_domain("example.com:443"), Err(DomainFormatError::Invalid));
        assert_eq!(normalize_domain("example.com?q"), Err(DomainFormatError::Invalid));
    }

    #[test]
    fn test_origin_host() {
        assert_eq!(origin_host("https://app.example.com").as_deref(), Some("app.example.com"));
        assert_eq!(origin_host("http://Example.com:3000").as_deref(), Some("example.com"));
        assert_eq!(origin_host("not a url"), None);
        assert_eq!(origin_host("example.com"), None);
    }

    #[test]
    fn test_host_matches() {
        assert!(host_matches("example.com", "example.com"));
        assert!(host_matches("app.example.com", "example.com"));
        assert!(host_matches("a.b.example.com", "example.com"));

        assert!(!host_matches("badexample.com", "example.com"));
        assert!(!host_matches("example.com.evil.io", "example.com"));
        assert!(!host_matches("example.org", "example.com"));
    }
}
