//! Network policy: session proxy rule and ad/tracker block enforcement.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};
use weir_common::WeirError;

use crate::session::{normalize_proxy_address, SharedSession};

/// The prebuilt tracker/ad block-rule provider.
///
/// `start` performs the one-time rule-set load; enablement is tracked per
/// session partition.
#[async_trait]
pub trait BlockerProvider: Send + Sync {
    async fn start(&self) -> Result<(), WeirError>;

    fn enable(&self, partition: &str);

    fn disable(&self, partition: &str);

    fn is_enabled(&self, partition: &str) -> bool;

    /// Whether a request should be blocked under the loaded rules.
    /// Meaningful only after `start` has completed and the partition is
    /// enabled; callers gate on that themselves.
    fn should_block(&self, url: &str, source_url: &str, request_kind: &str) -> bool;
}

/// Owns the shared session's proxy rule and block-list enablement.
pub struct NetworkPolicyController {
    session: Arc<SharedSession>,
    blocker: Arc<dyn BlockerProvider>,
    blocker_ready: AtomicBool,
    init_started: AtomicBool,
}

impl NetworkPolicyController {
    pub fn new(session: Arc<SharedSession>, blocker: Arc<dyn BlockerProvider>) -> Self {
        Self {
            session,
            blocker,
            blocker_ready: AtomicBool::new(false),
            init_started: AtomicBool::new(false),
        }
    }

    pub fn session(&self) -> &Arc<SharedSession> {
        &self.session
    }

    /// Load the block-rule set. Runs the provider's load exactly once;
    /// repeated calls after the first are no-ops.
    pub async fn init_blocker(&self) {
        if self.init_started.swap(true, Ordering::SeqCst) {
            return;
        }
        match self.blocker.start().await {
            Ok(()) => {
                self.blocker_ready.store(true, Ordering::SeqCst);
                info!("block rules loaded");
            }
            Err(e) => {
                error!("block rule load failed: {e}");
            }
        }
    }

    pub fn blocker_ready(&self) -> bool {
        self.blocker_ready.load(Ordering::SeqCst)
    }

    /// Install or clear the session proxy rule.
    ///
    /// An empty address with `enabled` is logged and dropped; the session is
    /// left untouched. Policy setters never return errors because they are
    /// driven from settings changes.
    pub fn set_proxy(&self, enabled: bool, address: &str) {
        if !enabled {
            self.session.set_proxy_rule(None);
            debug!("session proxy rule cleared");
            return;
        }
        match normalize_proxy_address(address) {
            Some(rule) => {
                info!(rule = %rule, "session proxy rule installed");
                self.session.set_proxy_rule(Some(rule));
            }
            None => {
                error!("invalid proxy address: empty");
            }
        }
    }

    /// Toggle block enforcement on the shared session.
    ///
    /// Dropped (with a log line) until the rule set has finished loading;
    /// callers reissue after startup if they need the toggle applied.
    pub fn set_blocking(&self, enabled: bool) {
        if !self.blocker_ready() {
            warn!(enabled, "block rules not initialized yet, ignoring toggle");
            return;
        }
        let partition = self.session.partition();
        if enabled {
            self.blocker.enable(partition);
            debug!(partition, "blocking enabled");
        } else if self.blocker.is_enabled(partition) {
            self.blocker.disable(partition);
            debug!(partition, "blocking disabled");
        } else {
            debug!(partition, "blocking already disabled");
        }
    }
}
