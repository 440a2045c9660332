//! The engine seam: what the controller needs from a rendering backend.
//!
//! The controller never talks to a concrete webview toolkit directly; it
//! drives a `Surface` created by an `Engine`. The real implementation lives
//! in [`crate::native`] (wry); tests use in-memory fakes.

use weir_common::{Color, EngineError, Rect};

use crate::events::EventSink;

/// Options applied when a surface is created.
#[derive(Debug, Clone)]
pub struct SurfaceOptions {
    /// Background color behind page content.
    pub background: Color,
    /// User agent string presented to pages.
    pub user_agent: String,
    /// Mute page audio.
    pub muted: bool,
    /// Initial bounds within the host window.
    pub bounds: Rect,
    /// Named persistent session partition the surface joins.
    pub partition: String,
}

/// A still image of the rendered content.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    pub width: u32,
    pub height: u32,
    /// PNG-encoded pixels.
    pub data: Vec<u8>,
}

/// A live rendering surface.
///
/// Every operation is non-blocking; page-driven outcomes come back through
/// the [`EventSink`] the surface was created with.
pub trait Surface {
    fn load_url(&mut self, url: &str) -> Result<(), EngineError>;

    /// Abort any in-flight navigation. Safe when idle.
    fn stop(&mut self);

    fn reload(&mut self);

    fn can_go_back(&self) -> bool;

    /// Step back one history entry. Callers must check [`Surface::can_go_back`]
    /// first; stepping back with no history is a backend no-op.
    fn go_back(&mut self);

    fn clear_history(&mut self);

    fn url(&self) -> String;

    fn set_user_agent(&mut self, user_agent: &str);

    fn bounds(&self) -> Rect;

    fn set_bounds(&mut self, bounds: Rect);

    fn set_background_color(&mut self, color: Color);

    fn show(&mut self);

    fn hide(&mut self);

    fn capture(&self) -> Result<CapturedImage, EngineError>;

    fn evaluate_script(&self, script: &str) -> Result<(), EngineError>;

    /// Close the underlying content. Called exactly once, on destroy.
    fn close(&mut self);
}

/// Factory for rendering surfaces.
pub trait Engine {
    type Surface: Surface;

    fn create(&self, options: SurfaceOptions, sink: EventSink)
        -> Result<Self::Surface, EngineError>;
}
