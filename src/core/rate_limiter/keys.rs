//! Key extraction and path matching

use super::types::RateLimitRequest;
use ipnet::IpNet;
use std::net::IpAddr;

/// Key used when no client address header is present
pub const UNKNOWN_IP: &str = "unknown";

/// Client address: `CF-Connecting-IP`, else the first `X-Forwarded-For` hop
pub fn extract_ip(request: &RateLimitRequest) -> String {
    if let Some(ip) = request
        .header("cf-connecting-ip")
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return ip.to_string();
    }

    if let Some(ip) = request
        .header("x-forwarded-for")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return ip.to_string();
    }

    UNKNOWN_IP.to_string()
}

/// Last path segment under `{prefix}/`, if the path lives there
pub fn function_id_from_path(path: &str, prefix: &str) -> Option<String> {
    let prefix = prefix.trim_end_matches('/');
    let rest = path.strip_prefix(prefix)?.strip_prefix('/')?;
    rest.split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Exact or segment-prefix match; `*` stands for exactly one segment
pub fn path_matches(pattern: &str, path: &str) -> bool {
    if !pattern.contains('*') {
        if path == pattern {
            return true;
        }
        return match path.strip_prefix(pattern) {
            Some(rest) => pattern.ends_with('/') || rest.starts_with('/'),
            None => false,
        };
    }

    let mut path_segments = path.split('/');
    for expected in pattern.split('/') {
        match path_segments.next() {
            Some(actual) if expected == "*" => {
                if actual.is_empty() {
                    return false;
                }
            }
            Some(actual) if actual == expected => {}
            _ => return false,
        }
    }
    true
}

/// Addresses exempt from admission control
#[derive(Debug, Clone, Default)]
pub struct IpWhitelist {
    networks: Vec<IpNet>,
    literals: Vec<String>,
}

impl IpWhitelist {
    /// Parse exact addresses and CIDR ranges; `unknown` is accepted verbatim
    pub fn parse(entries: &[String]) -> Result<Self, String> {
        let mut whitelist = Self::default();
        for entry in entries {
            let entry = entry.trim();
            if entry == UNKNOWN_IP {
                whitelist.literals.push(entry.to_string());
            } else if let Ok(net) = entry.parse::<IpNet>() {
                whitelist.networks.push(net);
            } else if let Ok(ip) = entry.parse::<IpAddr>() {
                whitelist.networks.push(IpNet::from(ip));
            } else {
                return Err(format!("Invalid whitelist entry: '{}'", entry));
            }
        }
        Ok(whitelist)
    }

    pub fn contains(&self, ip: &str) -> bool {
        if self.literals.iter().any(|literal| literal == ip) {
            return true;
        }
        match ip.parse::<IpAddr>() {
            Ok(addr) => self.networks.iter().any(|net| net.contains(&addr)),
            Err(_) => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty() && self.literals.is_empty()
    }
}
