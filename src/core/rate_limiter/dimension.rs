//! Dimension names as they appear in configuration

use std::fmt;

/// One axis of admission control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dimension {
    /// Client address from proxy headers
    Ip,
    /// Target function id
    Function,
    /// Value produced by the configured key extractor
    Custom,
    /// `{METHOD} {path}` of the request itself
    Endpoint,
    /// An explicit `METHOD /path` rule; `*` matches one path segment
    EndpointPattern { method: String, pattern: String },
}

impl Dimension {
    /// Parse a rule key from `limits` or `endpoint_limits`
    pub fn parse(name: &str) -> Result<Self, String> {
        let trimmed = name.trim();
        match trimmed {
            "ip" => Ok(Self::Ip),
            "function" => Ok(Self::Function),
            "custom" => Ok(Self::Custom),
            "endpoint" => Ok(Self::Endpoint),
            _ => {
                let (method, pattern) = trimmed
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| format!("Unknown rate limit dimension: '{}'", name))?;
                let pattern = pattern.trim();
                if method.is_empty() || !method.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(format!("Invalid HTTP method in endpoint rule '{}'", name));
                }
                if !pattern.starts_with('/') {
                    return Err(format!(
                        "Endpoint rule '{}' must have a path starting with '/'",
                        name
                    ));
                }
                Ok(Self::EndpointPattern {
                    method: method.to_ascii_uppercase(),
                    pattern: pattern.to_string(),
                })
            }
        }
    }

    /// Name reported as `limitType`
    pub fn limit_type(&self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::Function => "function",
            Self::Custom => "custom",
            Self::Endpoint | Self::EndpointPattern { .. } => "endpoint",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndpointPattern { method, pattern } => write!(f, "{} {}", method, pattern),
            other => f.write_str(other.limit_type()),
        }
    }
}
