//! URL well-formedness check, run before any network activity.

use url::{Host, Url};

const SCHEMES: [&str; 2] = ["http", "https"];

/// Returns true if `input` is an absolute http(s) URL with a usable host.
///
/// Hosts must be an IP address, `localhost`, or a dotted domain name.
pub fn is_valid_url(input: &str) -> bool {
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return false;
    }

    let Ok(url) = Url::parse(input) else {
        return false;
    };

    if !SCHEMES.contains(&url.scheme()) {
        return false;
    }

    match url.host() {
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        Some(Host::Domain(domain)) => is_valid_domain(domain),
        None => false,
    }
}

fn is_valid_domain(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    if domain.eq_ignore_ascii_case("localhost") {
        return true;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}
