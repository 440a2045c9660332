//! Shared network session state.
//!
//! One named, persistent session is shared by every surface this controller
//! creates. The proxy rule lives here, not on individual surfaces; engines
//! consult it when building a surface for the same partition.

use std::sync::Mutex;

/// The persistent network context (proxy rule, partition name) shared
/// across views.
pub struct SharedSession {
    partition: String,
    proxy_rule: Mutex<Option<String>>,
}

impl SharedSession {
    pub fn new(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            proxy_rule: Mutex::new(None),
        }
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    /// Install or clear the session proxy rule.
    pub fn set_proxy_rule(&self, rule: Option<String>) {
        if let Ok(mut guard) = self.proxy_rule.lock() {
            *guard = rule;
        }
    }

    /// The currently effective proxy rule, if any.
    pub fn proxy_rule(&self) -> Option<String> {
        self.proxy_rule.lock().ok().and_then(|guard| guard.clone())
    }
}

/// Normalize a user-supplied proxy address into an effective rule.
///
/// Empty (after trimming) addresses are rejected. A missing scheme is
/// defaulted to `http://` rather than failing.
pub fn normalize_proxy_address(address: &str) -> Option<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains("://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("http://{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_prefixes_default_scheme() {
        assert_eq!(
            normalize_proxy_address("1.2.3.4:8080").as_deref(),
            Some("http://1.2.3.4:8080")
        );
    }

    #[test]
    fn normalize_keeps_existing_scheme() {
        assert_eq!(
            normalize_proxy_address("socks5://10.0.0.1:1080").as_deref(),
            Some("socks5://10.0.0.1:1080")
        );
    }

    #[test]
    fn normalize_rejects_empty() {
        assert_eq!(normalize_proxy_address(""), None);
        assert_eq!(normalize_proxy_address("   "), None);
    }

    #[test]
    fn session_rule_is_shared_state() {
        let session = SharedSession::new("persist:webview");
        assert_eq!(session.partition(), "persist:webview");
        assert_eq!(session.proxy_rule(), None);

        session.set_proxy_rule(Some("http://1.2.3.4:8080".into()));
        assert_eq!(session.proxy_rule().as_deref(), Some("http://1.2.3.4:8080"));

        session.set_proxy_rule(None);
        assert_eq!(session.proxy_rule(), None);
    }
}
