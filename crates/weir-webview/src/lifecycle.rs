//! View lifecycle management.
//!
//! `ViewLifecycleManager` is the sole owner of the rendering surface. The
//! surface is in exactly one of two states: absent or active. Other
//! components query it on demand rather than caching a handle, so a destroy
//! is always observed immediately.

use std::sync::Arc;

use tracing::{debug, info};
use weir_common::{Color, Rect, WeirError};

use crate::events::EventSink;
use crate::host::{resolve_host, HostProvider};
use crate::surface::{Engine, Surface, SurfaceOptions};

pub struct ViewLifecycleManager<E: Engine> {
    engine: E,
    host: Arc<dyn HostProvider>,
    surface: Option<E::Surface>,
    sink: EventSink,
    background: Color,
    user_agent: String,
    muted: bool,
    partition: String,
    bounds: Rect,
}

impl<E: Engine> ViewLifecycleManager<E> {
    pub fn new(
        engine: E,
        host: Arc<dyn HostProvider>,
        background: Color,
        user_agent: impl Into<String>,
        muted: bool,
        partition: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            host,
            surface: None,
            sink: EventSink::new(),
            background,
            user_agent: user_agent.into(),
            muted,
            partition: partition.into(),
            bounds: Rect::default(),
        }
    }

    /// The sink surfaces push their events into.
    pub fn sink(&self) -> &EventSink {
        &self.sink
    }

    pub fn is_active(&self) -> bool {
        self.surface.is_some()
    }

    /// The active surface, creating one if absent.
    ///
    /// Creation applies the current background color, mutes audio per the
    /// default, applies the current user agent, and installs event
    /// subscriptions exactly once via the engine's sink.
    pub fn ensure_view(&mut self) -> Result<&mut E::Surface, WeirError> {
        if self.surface.is_none() {
            let options = SurfaceOptions {
                background: self.background,
                user_agent: self.user_agent.clone(),
                muted: self.muted,
                bounds: self.bounds,
                partition: self.partition.clone(),
            };
            let surface = self.engine.create(options, self.sink.clone())?;
            info!(partition = %self.partition, "view created");
            return Ok(self.surface.insert(surface));
        }
        self.surface.as_mut().ok_or(WeirError::NoActiveView)
    }

    pub fn view(&self) -> Option<&E::Surface> {
        self.surface.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut E::Surface> {
        self.surface.as_mut()
    }

    /// Close and drop the active surface. Idempotent.
    pub fn destroy(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.close();
            info!("view destroyed");
        }
    }

    /// Geometry of the active surface. A missing view has no meaningful
    /// geometry to report, so this fails rather than inventing one.
    pub fn bounds(&self) -> Result<Rect, WeirError> {
        self.surface
            .as_ref()
            .map(|s| s.bounds())
            .ok_or(WeirError::NoActiveView)
    }

    /// Position the active surface. Silently ignored when the view is
    /// absent; positioning a torn-down view is safe to drop.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        match self.surface.as_mut() {
            Some(surface) => surface.set_bounds(bounds),
            None => debug!("set_bounds with no active view, ignored"),
        }
    }

    /// Applies immediately when active; always recorded for the next
    /// created surface.
    pub fn set_background_color(&mut self, color: Color) {
        self.background = color;
        match self.surface.as_mut() {
            Some(surface) => surface.set_background_color(color),
            None => debug!("set_background_color with no active view, ignored"),
        }
    }

    /// Switch the rendering identity. Applies to the active surface and to
    /// every surface created afterwards.
    pub fn set_user_agent(&mut self, user_agent: &str) {
        self.user_agent = user_agent.to_string();
        if let Some(surface) = self.surface.as_mut() {
            surface.set_user_agent(user_agent);
        }
    }

    /// Attach the surface to the current host window. No-op when absent.
    pub fn show(&mut self) -> Result<(), WeirError> {
        if let Some(surface) = self.surface.as_mut() {
            resolve_host(&*self.host)?;
            surface.show();
        }
        Ok(())
    }

    /// Detach the surface from the current host window. No-op when absent.
    pub fn hide(&mut self) -> Result<(), WeirError> {
        if let Some(surface) = self.surface.as_mut() {
            resolve_host(&*self.host)?;
            surface.hide();
        }
        Ok(())
    }
}
