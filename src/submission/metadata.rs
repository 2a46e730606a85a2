use std::net::IpAddr;

use axum::http::HeaderMap;
use ipnet::IpNet;

/// Request details that go into logs and the email footer.
#[derive(Debug, Clone)]
pub struct ClientMeta {
    pub ip: IpAddr,
    pub user_agent: String,
    pub referer: String,
}

/// Extract client metadata from request headers.
pub fn extract(headers: &HeaderMap, peer_addr: IpAddr, trusted_proxies: &[IpNet]) -> ClientMeta {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string()
    };

    ClientMeta {
        ip: client_ip(headers, peer_addr, trusted_proxies),
        user_agent: header("user-agent"),
        referer: header("referer"),
    }
}

fn client_ip(headers: &HeaderMap, peer: IpAddr, trusted_proxies: &[IpNet]) -> IpAddr {
    // Only trust X-Forwarded-For if the direct connection is from a trusted proxy
    if trusted_proxies.iter().any(|net| net.contains(&peer)) {
        if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
            // Walk right to left, skipping our own proxy hops
            for ip_str in xff.split(',').map(|s| s.trim()).rev() {
                if let Ok(ip) = ip_str.parse::<IpAddr>() {
                    if !trusted_proxies.iter().any(|net| net.contains(&ip)) {
                        return ip;
                    }
                }
            }
        }
    }

    peer
}
