//! Sniffing integration.
//!
//! Consumes candidate-source events from the external detector and either
//! forwards them to the extension channel or persists them as video records.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::debug;
use weir_common::WeirError;

use crate::events::{HostMessage, NavigationInfo, SourceCandidate, VideoRecord};
use crate::host::{resolve_host, HostProvider};

/// The external sniffing detector. Its detection heuristics are a separate
/// concern; the controller consumes only its event stream and its
/// reset/start contract.
pub trait Sniffer: Send + Sync {
    fn start(&self);

    /// Drop detector state belonging to the previous page.
    fn reset(&self, navigation: &NavigationInfo);

    fn subscribe(&self) -> broadcast::Receiver<SourceCandidate>;
}

/// Lookup/insert interface of the video-record repository.
pub trait VideoStore: Send + Sync {
    fn find_by_name(&self, name: &str) -> Option<VideoRecord>;
    fn insert(&self, record: VideoRecord) -> VideoRecord;
}

pub struct SniffingIntegration {
    store: Arc<dyn VideoStore>,
    host: Arc<dyn HostProvider>,
    use_extension: AtomicBool,
}

impl SniffingIntegration {
    pub fn new(store: Arc<dyn VideoStore>, host: Arc<dyn HostProvider>, use_extension: bool) -> Self {
        Self {
            store,
            host,
            use_extension: AtomicBool::new(use_extension),
        }
    }

    pub fn set_use_extension(&self, on: bool) {
        self.use_extension.store(on, Ordering::SeqCst);
    }

    pub fn use_extension(&self) -> bool {
        self.use_extension.load(Ordering::SeqCst)
    }

    /// Handle one detected source.
    ///
    /// Extension path: the candidate goes verbatim to the view's message
    /// channel and the extension owns persistence. Otherwise a name
    /// collision is disambiguated with a timestamp suffix (keeping both
    /// records rather than overwriting), the candidate is inserted, and the
    /// main window is notified. The record list lives in the main window,
    /// so that notification bypasses the overlay preference.
    pub fn handle_candidate(&self, mut candidate: SourceCandidate) -> Result<(), WeirError> {
        if self.use_extension() {
            let host = resolve_host(&*self.host)?;
            host.post(&HostMessage::LinkMessage(candidate));
            return Ok(());
        }

        if self.store.find_by_name(&candidate.name).is_some() {
            let renamed = format!("{}-{}", candidate.name, Utc::now().timestamp_millis());
            debug!(from = %candidate.name, to = %renamed, "record name collision, renaming");
            candidate.name = renamed;
        }

        let record = self.store.insert(candidate.into_record());
        let main = self.host.main_window().ok_or(WeirError::NoHostWindow)?;
        main.post(&HostMessage::DownloadItem(record));
        Ok(())
    }
}
