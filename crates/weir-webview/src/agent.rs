//! User agent selection.
//!
//! Two fixed identities, keyed by the `is_mobile` setting.

pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) \
AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1";

/// The user agent string for the given identity flag.
pub fn user_agent_for(is_mobile: bool) -> &'static str {
    if is_mobile {
        MOBILE_USER_AGENT
    } else {
        DESKTOP_USER_AGENT
    }
}
