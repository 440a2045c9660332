//! Navigation bridge.
//!
//! Republishes surface navigation events to the host window and keeps the
//! sniffing detector's session in step with the page.

use std::sync::Arc;

use tracing::debug;
use weir_common::WeirError;

use crate::events::{HostMessage, NavigationInfo};
use crate::host::{resolve_host, HostProvider};
use crate::inject;
use crate::sniff::Sniffer;
use crate::surface::Surface;

pub struct NavigationBridge {
    sniffer: Arc<dyn Sniffer>,
    host: Arc<dyn HostProvider>,
}

impl NavigationBridge {
    pub fn new(sniffer: Arc<dyn Sniffer>, host: Arc<dyn HostProvider>) -> Self {
        Self { sniffer, host }
    }

    /// Handle a committed navigation.
    ///
    /// The detector reset must happen before the host window is notified:
    /// any source event emitted after the notification then belongs to the
    /// new page, never the previous one. The surface may already be gone by
    /// the time the event is drained; reset and notification still run, only
    /// the injection is skipped.
    pub fn on_navigated<S: Surface>(
        &self,
        info: NavigationInfo,
        surface: Option<&S>,
    ) -> Result<(), WeirError> {
        self.sniffer.reset(&info);

        let host = resolve_host(&*self.host)?;
        host.post(&HostMessage::DidNavigate(info));

        match surface {
            // Best-effort side channel; a page that rejects the script must
            // not abort navigation handling.
            Some(surface) => {
                if let Err(e) = surface.evaluate_script(inject::payload()) {
                    debug!("post-navigation injection failed: {e}");
                }
            }
            None => debug!("view already closed, skipping injection"),
        }
        Ok(())
    }

    /// Forward an engine-reported load failure.
    pub fn on_load_failed(&self, code: i32, desc: String) -> Result<(), WeirError> {
        let host = resolve_host(&*self.host)?;
        host.post(&HostMessage::FailLoad { code, desc });
        Ok(())
    }
}
