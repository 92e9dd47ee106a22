//! Client identification utilities
//!
//! Resolves the address a request came from, for per-client throttling.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Key used when no client address can be determined
pub const UNKNOWN_CLIENT_KEY: &str = "global";

/// Resolve the client address of a request
///
/// The socket address is authoritative. `X-Forwarded-For` is client
/// controlled, so its first entry is consulted only when
/// `trust_forwarded_for` is set, i.e. when a trusted reverse proxy rewrites
/// the header.
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trust_forwarded_for: bool,
) -> Option<IpAddr> {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|xff| xff.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok());

        if forwarded.is_some() {
            return forwarded;
        }
    }
    direct_ip
}

/// Rate limit bucket for a request
///
/// Requests with no resolvable address share a single bucket.
pub fn client_key(headers: &HeaderMap, direct_ip: Option<IpAddr>, trust_forwarded_for: bool) -> String {
    extract_client_ip(headers, direct_ip, trust_forwarded_for)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT_KEY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_forwarded_for_ignored_by_default() {
        let headers = forwarded("192.168.1.1, 10.0.0.1");
        let direct: IpAddr = "203.0.113.7".parse().unwrap();

        assert_eq!(extract_client_ip(&headers, Some(direct), false), Some(direct));
        assert_eq!(extract_client_ip(&headers, None, false), None);
    }

    #[test]
    fn test_forwarded_for_behind_trusted_proxy() {
        let headers = forwarded("192.168.1.1, 10.0.0.1");
        let direct: IpAddr = "10.0.0.254".parse().unwrap();

        let ip = extract_client_ip(&headers, Some(direct), true);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_client_ip_direct() {
        let headers = HeaderMap::new();
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        assert_eq!(extract_client_ip(&headers, Some(direct), true), Some(direct));
    }

    #[test]
    fn test_malformed_xff_falls_back() {
        let headers = forwarded("not-an-ip");
        let direct: IpAddr = "10.1.2.3".parse().unwrap();

        assert_eq!(extract_client_ip(&headers, Some(direct), true), Some(direct));
    }

    #[test]
    fn test_client_key() {
        let headers = HeaderMap::new();
        assert_eq!(client_key(&headers, None, false), UNKNOWN_CLIENT_KEY);

        let direct: IpAddr = "::1".parse().unwrap();
        assert_eq!(client_key(&headers, Some(direct), false), "::1");
        assert_eq!(client_key(&forwarded("198.51.100.9"), Some(direct), false), "::1");
    }
}
