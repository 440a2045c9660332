//! Composition root.
//!
//! `WebviewController` wires the lifecycle manager, network policy,
//! navigation bridge, and sniffing integration together and exposes the
//! public operations the rest of the application calls.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::warn;
use weir_common::{Color, Rect, WeirError};
use weir_config::WeirConfig;

use crate::agent;
use crate::bridge::NavigationBridge;
use crate::events::ViewEvent;
use crate::host::HostProvider;
use crate::lifecycle::ViewLifecycleManager;
use crate::policy::{BlockerProvider, NetworkPolicyController};
use crate::session::SharedSession;
use crate::sniff::{Sniffer, SniffingIntegration, VideoStore};
use crate::surface::{CapturedImage, Engine, Surface};

pub struct WebviewController<E: Engine> {
    lifecycle: ViewLifecycleManager<E>,
    policy: NetworkPolicyController,
    bridge: NavigationBridge,
    sniffing: Arc<SniffingIntegration>,
    sniffer: Arc<dyn Sniffer>,
    block_ads: bool,
}

impl<E: Engine> WebviewController<E> {
    /// Wire the controller around an engine and the session that engine
    /// consults. The caller builds the session first and hands the same
    /// `Arc` to both, so proxy rules installed here are visible to every
    /// surface the engine creates.
    pub fn new(
        engine: E,
        host: Arc<dyn HostProvider>,
        store: Arc<dyn VideoStore>,
        sniffer: Arc<dyn Sniffer>,
        blocker: Arc<dyn BlockerProvider>,
        session: Arc<SharedSession>,
        config: &WeirConfig,
    ) -> Self {
        let partition = session.partition().to_string();
        let policy = NetworkPolicyController::new(session, blocker);
        if config.network.use_proxy {
            policy.set_proxy(true, &config.network.proxy);
        }

        let background = Color::from_hex(&config.view.background).unwrap_or(Color::WHITE);
        let lifecycle = ViewLifecycleManager::new(
            engine,
            Arc::clone(&host),
            background,
            agent::user_agent_for(config.view.is_mobile),
            config.view.muted,
            partition,
        );

        let sniffing = Arc::new(SniffingIntegration::new(
            store,
            Arc::clone(&host),
            config.sniffing.use_extension,
        ));
        let bridge = NavigationBridge::new(Arc::clone(&sniffer), host);

        Self {
            lifecycle,
            policy,
            bridge,
            sniffing,
            sniffer,
            block_ads: config.network.block_ads,
        }
    }

    /// Start collaborators: the detector and the one-time block-rule load.
    /// The persisted blocking preference is applied once the rules are in,
    /// since earlier toggles are dropped by design.
    pub async fn start(&self) {
        self.sniffer.start();
        self.policy.init_blocker().await;
        if self.block_ads {
            self.policy.set_blocking(true);
        }
    }

    /// Navigate the view, creating it if absent. Stopping any in-flight
    /// navigation first makes this safe to call at any time.
    pub fn load_url(&mut self, url: &str) -> Result<(), WeirError> {
        let surface = self.lifecycle.ensure_view()?;
        surface.stop();
        surface.load_url(url)?;
        Ok(())
    }

    /// Step back in history. Going back past the first page means leaving
    /// the browsing surface: the view is destroyed and `false` returned.
    pub fn go_back(&mut self) -> Result<bool, WeirError> {
        let went_back = {
            let surface = self.lifecycle.view_mut().ok_or(WeirError::NoActiveView)?;
            if surface.can_go_back() {
                surface.go_back();
                true
            } else {
                false
            }
        };
        if !went_back {
            self.lifecycle.destroy();
        }
        Ok(went_back)
    }

    pub fn reload(&mut self) -> Result<(), WeirError> {
        let surface = self.lifecycle.view_mut().ok_or(WeirError::NoActiveView)?;
        surface.reload();
        Ok(())
    }

    /// Return to the chrome-less, view-less state.
    pub fn go_home(&mut self) -> Result<(), WeirError> {
        let surface = self.lifecycle.view_mut().ok_or(WeirError::NoActiveView)?;
        surface.stop();
        surface.clear_history();
        self.lifecycle.destroy();
        Ok(())
    }

    /// A still image of the current rendered content.
    pub fn capture(&self) -> Result<CapturedImage, WeirError> {
        let surface = self.lifecycle.view().ok_or(WeirError::NoActiveView)?;
        Ok(surface.capture()?)
    }

    pub fn set_user_agent(&mut self, is_mobile: bool) {
        self.lifecycle.set_user_agent(agent::user_agent_for(is_mobile));
    }

    pub fn set_proxy(&self, enabled: bool, address: &str) {
        self.policy.set_proxy(enabled, address);
    }

    pub fn set_blocking(&self, enabled: bool) {
        self.policy.set_blocking(enabled);
    }

    pub fn set_use_extension(&self, on: bool) {
        self.sniffing.set_use_extension(on);
    }

    pub fn show(&mut self) -> Result<(), WeirError> {
        self.lifecycle.show()
    }

    pub fn hide(&mut self) -> Result<(), WeirError> {
        self.lifecycle.hide()
    }

    pub fn bounds(&self) -> Result<Rect, WeirError> {
        self.lifecycle.bounds()
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.lifecycle.set_bounds(bounds);
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.lifecycle.set_background_color(color);
    }

    pub fn destroy(&mut self) {
        self.lifecycle.destroy();
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    pub fn policy(&self) -> &NetworkPolicyController {
        &self.policy
    }

    pub fn sniffing(&self) -> &Arc<SniffingIntegration> {
        &self.sniffing
    }

    /// Drain engine events and dispatch them. Each event is handled to
    /// completion before the next, which is what keeps the detector reset
    /// ordered before the host notification.
    pub fn process_events(&mut self) -> Result<(), WeirError> {
        for event in self.lifecycle.sink().drain() {
            match event {
                ViewEvent::Navigated(info) => {
                    self.bridge.on_navigated(info, self.lifecycle.view())?;
                }
                ViewEvent::LoadFailed { code, desc } => {
                    self.bridge.on_load_failed(code, desc)?;
                }
                ViewEvent::OpenWindowRequested { url } => {
                    // popups become same-surface navigations
                    self.load_url(&url)?;
                }
            }
        }
        Ok(())
    }

    /// Forward detector candidates into the sniffing integration until the
    /// detector closes its stream.
    pub fn spawn_candidate_pump(&self) -> JoinHandle<()> {
        let mut rx = self.sniffer.subscribe();
        let sniffing = Arc::clone(&self.sniffing);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(candidate) => {
                        if let Err(e) = sniffing.handle_candidate(candidate) {
                            warn!("sniffed source dropped: {e}");
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "sniffer stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
