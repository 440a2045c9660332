//! Embedded web view control for Weir.
//!
//! Owns the single rendering surface, mediates its network policy, and
//! bridges navigation and media-sniffing events to the rest of the
//! application:
//! - View lifecycle (absent/active, queried on demand, never cached)
//! - Session proxy rule and ad/tracker block enforcement
//! - Host window resolution (overlay preferred, main as fallback)
//! - Navigation event bridging and post-navigation script injection
//! - Sniffed media sources: extension hand-off or persist-and-notify

pub mod agent;
pub mod blocker;
pub mod bridge;
pub mod controller;
pub mod events;
pub mod host;
pub mod inject;
pub mod lifecycle;
pub mod policy;
pub mod session;
pub mod sniff;
pub mod surface;

#[cfg(feature = "native")]
pub mod native;

#[cfg(test)]
pub(crate) mod testing;

pub use blocker::AdblockProvider;
pub use controller::WebviewController;
pub use events::{HostMessage, NavigationInfo, SourceCandidate, VideoRecord, ViewEvent};
pub use host::{HostProvider, HostWindow};
pub use policy::{BlockerProvider, NetworkPolicyController};
pub use sniff::{Sniffer, SniffingIntegration, VideoStore};
pub use surface::{CapturedImage, Engine, Surface, SurfaceOptions};
