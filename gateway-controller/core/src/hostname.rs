//! Hostname patterns as used by Gateway listeners and routes: either a
//! literal DNS name (`example.com`) or a leading-wildcard pattern
//! (`*.example.com`). Comparison is case-sensitive; specs are expected to
//! carry lowercase names and anything else fails validation.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidHostname {
    #[error("hostname is empty")]
    Empty,

    #[error("hostname exceeds 253 characters")]
    TooLong,

    #[error("hostname must not be an IP address")]
    IpAddress,

    #[error("hostname contains an empty DNS label")]
    EmptyLabel,

    #[error("hostname label {0:?} exceeds 63 characters")]
    LabelTooLong(String),

    #[error("hostname label {0:?} contains an invalid character")]
    InvalidLabel(String),
}

/// Validates a hostname pattern. A leading `*.` is permitted; `*` anywhere
/// else is not.
pub fn validate(hostname: &str) -> Result<(), InvalidHostname> {
    if hostname.is_empty() {
        return Err(InvalidHostname::Empty);
    }
    if hostname.len() > 253 {
        return Err(InvalidHostname::TooLong);
    }

    let name = hostname.strip_prefix("*.").unwrap_or(hostname);
    if name.is_empty() || name == "*" {
        return Err(InvalidHostname::Empty);
    }
    if name.parse::<std::net::IpAddr>().is_ok() {
        return Err(InvalidHostname::IpAddress);
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(InvalidHostname::EmptyLabel);
        }
        if label.len() > 63 {
            return Err(InvalidHostname::LabelTooLong(label.to_string()));
        }
        let valid = label.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            && !label.starts_with('-')
            && !label.ends_with('-');
        if !valid {
            return Err(InvalidHostname::InvalidLabel(label.to_string()));
        }
    }

    Ok(())
}

/// Computes the intersection of two hostname patterns, or `None` when they
/// cannot match a common name.
///
/// A wildcard matches one or more leading labels, so `example.com` does not
/// intersect `*.example.com`.
pub fn intersect(a: &str, b: &str) -> Option<String> {
    match (wildcard_suffix(a), wildcard_suffix(b)) {
        (None, None) => (a == b).then(|| a.to_string()),
        (None, Some(suffix)) => literal_in_wildcard(a, suffix).then(|| a.to_string()),
        (Some(suffix), None) => literal_in_wildcard(b, suffix).then(|| b.to_string()),
        (Some(sa), Some(sb)) => {
            if sa == sb || suffix_of(sa, sb) {
                Some(a.to_string())
            } else if suffix_of(sb, sa) {
                Some(b.to_string())
            } else {
                None
            }
        }
    }
}

/// Whether two hostname patterns can match a common name.
pub fn overlaps(a: &str, b: &str) -> bool {
    intersect(a, b).is_some()
}

fn wildcard_suffix(pattern: &str) -> Option<&str> {
    pattern.strip_prefix("*.")
}

fn literal_in_wildcard(literal: &str, suffix: &str) -> bool {
    literal
        .strip_suffix(suffix)
        .and_then(|head| head.strip_suffix('.'))
        .is_some_and(|head| !head.is_empty())
}

// `longer` carries at least as many labels as `shorter`.
fn suffix_of(longer: &str, shorter: &str) -> bool {
    longer
        .strip_suffix(shorter)
        .and_then(|head| head.strip_suffix('.'))
        .is_some()
}
