//! Host window resolution.
//!
//! The application can show the view in one of two top-level windows: an
//! overlay (browser-style) window or the main window. Every outward message
//! and attach/detach funnels through [`resolve_host`], which prefers the
//! overlay when it exists. This is the only place a `NoHostWindow` fault
//! can surface.

use std::sync::Arc;

use weir_common::WeirError;

use crate::events::HostMessage;

/// A top-level window that can receive controller messages.
pub trait HostWindow: Send + Sync {
    fn post(&self, message: &HostMessage);
}

/// Supplies the candidate host windows. Either may be absent at any time.
pub trait HostProvider: Send + Sync {
    fn overlay(&self) -> Option<Arc<dyn HostWindow>>;
    fn main_window(&self) -> Option<Arc<dyn HostWindow>>;
}

/// Resolve the current host window: overlay first, main window otherwise.
pub fn resolve_host(provider: &dyn HostProvider) -> Result<Arc<dyn HostWindow>, WeirError> {
    provider
        .overlay()
        .or_else(|| provider.main_window())
        .ok_or(WeirError::NoHostWindow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NavigationInfo;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingWindow {
        messages: Mutex<Vec<HostMessage>>,
    }

    impl HostWindow for RecordingWindow {
        fn post(&self, message: &HostMessage) {
            self.messages.lock().unwrap().push(message.clone());
        }
    }

    struct Provider {
        overlay: Option<Arc<RecordingWindow>>,
        main: Option<Arc<RecordingWindow>>,
    }

    impl HostProvider for Provider {
        fn overlay(&self) -> Option<Arc<dyn HostWindow>> {
            self.overlay.clone().map(|w| w as Arc<dyn HostWindow>)
        }

        fn main_window(&self) -> Option<Arc<dyn HostWindow>> {
            self.main.clone().map(|w| w as Arc<dyn HostWindow>)
        }
    }

    #[test]
    fn prefers_overlay_window() {
        let overlay = Arc::new(RecordingWindow::default());
        let main = Arc::new(RecordingWindow::default());
        let provider = Provider {
            overlay: Some(Arc::clone(&overlay)),
            main: Some(Arc::clone(&main)),
        };

        let host = resolve_host(&provider).unwrap();
        host.post(&HostMessage::DidNavigate(NavigationInfo::new(
            "t",
            "https://a",
        )));

        assert_eq!(overlay.messages.lock().unwrap().len(), 1);
        assert!(main.messages.lock().unwrap().is_empty());
    }

    #[test]
    fn falls_back_to_main_window() {
        let main = Arc::new(RecordingWindow::default());
        let provider = Provider {
            overlay: None,
            main: Some(Arc::clone(&main)),
        };

        let host = resolve_host(&provider).unwrap();
        host.post(&HostMessage::FailLoad {
            code: -3,
            desc: "aborted".into(),
        });
        assert_eq!(main.messages.lock().unwrap().len(), 1);
    }

    #[test]
    fn no_window_is_a_named_failure() {
        let provider = Provider {
            overlay: None,
            main: None,
        };
        assert!(matches!(
            resolve_host(&provider),
            Err(WeirError::NoHostWindow)
        ));
    }
}
