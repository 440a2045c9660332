//! Real engine backed by `wry`.
//!
//! Surfaces are built as child webviews of the parent window. wry has no
//! native history or stop API, so history is tracked per surface and
//! stop/reload/back go through script evaluation.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use wry::dpi::{LogicalPosition, LogicalSize};
use wry::raw_window_handle::HasWindowHandle;
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use weir_common::{Color, EngineError, Rect};

use crate::events::{EventSink, NavigationInfo, ViewEvent};
use crate::policy::BlockerProvider;
use crate::session::SharedSession;
use crate::surface::{CapturedImage, Engine, Surface, SurfaceOptions};

/// Keeps page audio muted across DOM mutations.
const MUTE_SCRIPT: &str = r#"
(function() {
    var mute = function() {
        document.querySelectorAll('audio,video').forEach(function(m) { m.muted = true; });
    };
    document.addEventListener('DOMContentLoaded', mute);
    new MutationObserver(mute).observe(document.documentElement, { childList: true, subtree: true });
})();
"#;

/// Page-side tracking shared with the wry handler closures.
#[derive(Default)]
struct PageState {
    title: String,
    history: Vec<String>,
}

pub struct WryEngine<W: HasWindowHandle> {
    parent: Arc<W>,
    session: Arc<SharedSession>,
    blocker: Arc<dyn BlockerProvider>,
}

impl<W: HasWindowHandle> WryEngine<W> {
    pub fn new(parent: Arc<W>, session: Arc<SharedSession>, blocker: Arc<dyn BlockerProvider>) -> Self {
        Self {
            parent,
            session,
            blocker,
        }
    }
}

impl<W: HasWindowHandle> Engine for WryEngine<W> {
    type Surface = WrySurface;

    fn create(
        &self,
        options: SurfaceOptions,
        sink: EventSink,
    ) -> Result<Self::Surface, EngineError> {
        let state = Arc::new(Mutex::new(PageState::default()));
        let background = options.background;

        let mut builder = WebViewBuilder::new()
            .with_bounds(to_wry_rect(options.bounds))
            .with_background_color((background.r, background.g, background.b, background.a))
            .with_user_agent(&options.user_agent)
            .with_autoplay(false)
            .with_focused(false);

        if options.muted {
            builder = builder.with_initialization_script(MUTE_SCRIPT);
        }

        // Navigation handler: top-level blocking + best-effort history.
        {
            let state = Arc::clone(&state);
            let blocker = Arc::clone(&self.blocker);
            let partition = options.partition.clone();
            builder = builder.with_navigation_handler(move |url| {
                if blocker.is_enabled(&partition) {
                    let source = state
                        .lock()
                        .ok()
                        .and_then(|s| s.history.last().cloned())
                        .unwrap_or_default();
                    if blocker.should_block(&url, &source, "document") {
                        warn!(url = %url, "navigation blocked by filter rules");
                        return false;
                    }
                }
                if let Ok(mut s) = state.lock() {
                    if s.history.last().map(String::as_str) != Some(url.as_str()) {
                        s.history.push(url.clone());
                    }
                }
                true
            });
        }

        // Title tracking.
        {
            let state = Arc::clone(&state);
            builder = builder.with_document_title_changed_handler(move |title| {
                if let Ok(mut s) = state.lock() {
                    s.title = title;
                }
            });
        }

        // Committed navigations.
        {
            let state = Arc::clone(&state);
            let sink = sink.clone();
            builder = builder.with_on_page_load_handler(move |event, url| {
                if matches!(event, PageLoadEvent::Finished) {
                    let title = state.lock().map(|s| s.title.clone()).unwrap_or_default();
                    sink.push(ViewEvent::Navigated(NavigationInfo::new(title, url)));
                }
            });
        }

        // Popups never get a second surface; the URL is re-issued on this one.
        {
            let sink = sink.clone();
            builder = builder.with_new_window_req_handler(move |url| {
                sink.push(ViewEvent::OpenWindowRequested { url });
                false
            });
        }

        #[cfg(target_os = "windows")]
        {
            if let Some(rule) = self.session.proxy_rule() {
                if let Some(proxy) = parse_proxy_config(&rule) {
                    builder = builder.with_proxy_config(proxy);
                }
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(rule) = self.session.proxy_rule() {
                warn!(rule = %rule, "proxy rule not applied: unsupported by this backend");
            }
        }

        let webview = builder
            .build_as_child(self.parent.as_ref())
            .map_err(|e| EngineError::Creation(e.to_string()))?;

        debug!(partition = %self.session.partition(), "wry surface created");

        Ok(WrySurface {
            webview,
            state,
            bounds: options.bounds,
        })
    }
}

#[cfg(target_os = "windows")]
fn parse_proxy_config(rule: &str) -> Option<wry::ProxyConfig> {
    let rest = rule.split_once("://").map(|(_, r)| r).unwrap_or(rule);
    let (host, port) = rest.split_once(':')?;
    let endpoint = wry::ProxyEndpoint {
        host: host.to_string(),
        port: port.to_string(),
    };
    if rule.starts_with("socks5://") {
        Some(wry::ProxyConfig::Socks5(endpoint))
    } else {
        Some(wry::ProxyConfig::Http(endpoint))
    }
}

pub struct WrySurface {
    webview: WebView,
    state: Arc<Mutex<PageState>>,
    bounds: Rect,
}

impl WrySurface {
    fn eval(&self, script: &str) {
        if let Err(e) = self.webview.evaluate_script(script) {
            debug!("script evaluation failed: {e}");
        }
    }
}

impl Surface for WrySurface {
    fn load_url(&mut self, url: &str) -> Result<(), EngineError> {
        // history is appended by the navigation handler
        self.webview
            .load_url(url)
            .map_err(|e| EngineError::Backend(e.to_string()))
    }

    fn stop(&mut self) {
        self.eval("window.stop();");
    }

    fn reload(&mut self) {
        self.eval("location.reload();");
    }

    fn can_go_back(&self) -> bool {
        self.state.lock().map(|s| s.history.len() > 1).unwrap_or(false)
    }

    fn go_back(&mut self) {
        let previous = match self.state.lock() {
            Ok(mut s) if s.history.len() > 1 => {
                s.history.pop();
                s.history.last().cloned()
            }
            _ => None,
        };
        if let Some(url) = previous {
            // matches the handler's dedupe, so the entry is not re-pushed
            if let Err(e) = self.webview.load_url(&url) {
                debug!("back navigation failed: {e}");
            }
        }
    }

    fn clear_history(&mut self) {
        if let Ok(mut s) = self.state.lock() {
            s.history.clear();
        }
    }

    fn url(&self) -> String {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.history.last().cloned())
            .unwrap_or_default()
    }

    fn set_user_agent(&mut self, _user_agent: &str) {
        // wry fixes the user agent at build time
        warn!("user agent change applies to the next created surface");
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        if let Err(e) = self.webview.set_bounds(to_wry_rect(bounds)) {
            debug!("set_bounds failed: {e}");
        }
    }

    fn set_background_color(&mut self, color: Color) {
        if let Err(e) = self
            .webview
            .set_background_color((color.r, color.g, color.b, color.a))
        {
            debug!("set_background_color failed: {e}");
        }
    }

    fn show(&mut self) {
        if let Err(e) = self.webview.set_visible(true) {
            debug!("show failed: {e}");
        }
    }

    fn hide(&mut self) {
        if let Err(e) = self.webview.set_visible(false) {
            debug!("hide failed: {e}");
        }
    }

    fn capture(&self) -> Result<CapturedImage, EngineError> {
        // wry exposes no page capture
        Err(EngineError::Unsupported("capture"))
    }

    fn evaluate_script(&self, script: &str) -> Result<(), EngineError> {
        self.webview
            .evaluate_script(script)
            .map_err(|e| EngineError::Script(e.to_string()))
    }

    fn close(&mut self) {
        // detach before the webview is dropped
        self.hide();
    }
}

fn to_wry_rect(bounds: Rect) -> wry::Rect {
    wry::Rect {
        position: LogicalPosition::new(bounds.x, bounds.y).into(),
        size: LogicalSize::new(bounds.width, bounds.height).into(),
    }
}
