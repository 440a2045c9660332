//! Prebuilt block-rule provider backed by Brave's `adblock` engine.
//!
//! Filter lists are fetched once at startup; enablement is tracked per
//! session partition so several controllers sharing a partition agree on
//! the blocking state.

use std::collections::HashSet;
use std::sync::Mutex;

use adblock::lists::{FilterSet, ParseOptions};
use adblock::Engine;
use adblock::request::Request;
use async_trait::async_trait;
use tracing::{debug, warn};
use weir_common::WeirError;

use crate::policy::BlockerProvider;

/// Default filter lists fetched at startup.
pub const DEFAULT_FILTER_LISTS: &[&str] = &[
    "https://easylist.to/easylist/easylist.txt",
    "https://easylist.to/easylist/easyprivacy.txt",
];

pub struct AdblockProvider {
    lists: Vec<String>,
    engine: Mutex<Option<Engine>>,
    enabled: Mutex<HashSet<String>>,
}

impl AdblockProvider {
    pub fn new(lists: Vec<String>) -> Self {
        Self {
            lists,
            engine: Mutex::new(None),
            enabled: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_default_lists() -> Self {
        Self::new(DEFAULT_FILTER_LISTS.iter().map(|s| s.to_string()).collect())
    }

    /// Build the engine from raw filter lines. Also the seam tests use to
    /// install rules without the network.
    pub(crate) fn install_rules(&self, lines: Vec<String>) {
        let mut filter_set = FilterSet::new(false);
        filter_set.add_filters(&lines, ParseOptions::default());
        let engine = Engine::from_filter_set(filter_set, true);
        if let Ok(mut guard) = self.engine.lock() {
            *guard = Some(engine);
        }
    }
}

#[async_trait]
impl BlockerProvider for AdblockProvider {
    async fn start(&self) -> Result<(), WeirError> {
        let mut lines: Vec<String> = Vec::new();
        for url in &self.lists {
            let body = reqwest::get(url)
                .await
                .map_err(|e| WeirError::Network(format!("filter list {url}: {e}")))?
                .text()
                .await
                .map_err(|e| WeirError::Network(format!("filter list {url}: {e}")))?;
            debug!(url = %url, rules = body.lines().count(), "filter list fetched");
            lines.extend(body.lines().map(str::to_string));
        }
        self.install_rules(lines);
        Ok(())
    }

    fn enable(&self, partition: &str) {
        if let Ok(mut enabled) = self.enabled.lock() {
            enabled.insert(partition.to_string());
        }
    }

    fn disable(&self, partition: &str) {
        if let Ok(mut enabled) = self.enabled.lock() {
            enabled.remove(partition);
        }
    }

    fn is_enabled(&self, partition: &str) -> bool {
        self.enabled
            .lock()
            .map(|enabled| enabled.contains(partition))
            .unwrap_or(false)
    }

    fn should_block(&self, url: &str, source_url: &str, request_kind: &str) -> bool {
        let guard = match self.engine.lock() {
            Ok(guard) => guard,
            Err(_) => return false,
        };
        let Some(engine) = guard.as_ref() else {
            return false;
        };
        match Request::new(url, source_url, request_kind) {
            Ok(request) => engine.check_network_request(&request).matched,
            Err(e) => {
                warn!(url = %url, "unparseable request, not blocking: {e:?}");
                false
            }
        }
    }
}
