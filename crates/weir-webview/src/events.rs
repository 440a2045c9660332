//! Event and message types crossing the controller's boundaries.
//!
//! `ViewEvent` flows inward from the rendering engine; `HostMessage` flows
//! outward to whichever top-level window currently hosts the view.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Snapshot taken at the moment a navigation commits. Recreated every
/// navigation and passed by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationInfo {
    pub title: String,
    pub url: String,
}

impl NavigationInfo {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// A downloadable-media candidate emitted by the sniffing detector.
///
/// Only `name` may be rewritten (to disambiguate a repository collision);
/// everything else is carried through untouched, including any extra
/// detector-supplied fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCandidate {
    pub name: String,
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourceCandidate {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            extra: Map::new(),
        }
    }

    /// Convert into the persisted form, assigning a fresh record id.
    pub fn into_record(self) -> VideoRecord {
        VideoRecord {
            id: Uuid::new_v4(),
            name: self.name,
            url: self.url,
            extra: self.extra,
        }
    }
}

/// A persisted sniffed source. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Messages pushed to a host window. Serialized tag names are the wire
/// channel names the UI listens on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload")]
pub enum HostMessage {
    #[serde(rename = "webview-did-navigate")]
    DidNavigate(NavigationInfo),
    #[serde(rename = "webview-fail-load")]
    FailLoad { code: i32, desc: String },
    #[serde(rename = "webview-link-message")]
    LinkMessage(SourceCandidate),
    #[serde(rename = "download-item-notifier")]
    DownloadItem(VideoRecord),
}

impl HostMessage {
    /// The wire channel name for this message.
    pub fn channel(&self) -> &'static str {
        match self {
            HostMessage::DidNavigate(_) => "webview-did-navigate",
            HostMessage::FailLoad { .. } => "webview-fail-load",
            HostMessage::LinkMessage(_) => "webview-link-message",
            HostMessage::DownloadItem(_) => "download-item-notifier",
        }
    }
}

/// Events emitted by the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// A navigation committed.
    Navigated(NavigationInfo),
    /// The engine reported a failed load.
    LoadFailed { code: i32, desc: String },
    /// The page asked for a new window. The engine always denies the popup;
    /// the URL is re-issued as a same-surface navigation instead.
    OpenWindowRequested { url: String },
}

/// Shared sink the engine pushes `ViewEvent`s into; the controller drains
/// it from the event loop. Events are handled in push order.
#[derive(Clone, Default)]
pub struct EventSink {
    events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: ViewEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Drain all pending events.
    pub fn drain(&self) -> Vec<ViewEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_message_channels_match_wire_names() {
        let nav = HostMessage::DidNavigate(NavigationInfo::new("t", "https://a"));
        assert_eq!(nav.channel(), "webview-did-navigate");

        let fail = HostMessage::FailLoad {
            code: -105,
            desc: "name not resolved".into(),
        };
        assert_eq!(fail.channel(), "webview-fail-load");

        let link = HostMessage::LinkMessage(SourceCandidate::new("clip", "https://v"));
        assert_eq!(link.channel(), "webview-link-message");
    }

    #[test]
    fn host_message_serializes_with_channel_tag() {
        let msg = HostMessage::DidNavigate(NavigationInfo::new("Title", "https://example.com"));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["channel"], "webview-did-navigate");
        assert_eq!(json["payload"]["url"], "https://example.com");
    }

    #[test]
    fn candidate_extra_fields_round_trip() {
        let raw = r#"{"name":"clip","url":"https://v/1.m3u8","size":1024,"kind":"hls"}"#;
        let candidate: SourceCandidate = serde_json::from_str(raw).unwrap();
        assert_eq!(candidate.extra["size"], 1024);

        let record = candidate.clone().into_record();
        assert_eq!(record.name, "clip");
        assert_eq!(record.extra["kind"], "hls");

        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["size"], 1024);
    }

    #[test]
    fn into_record_assigns_distinct_ids() {
        let a = SourceCandidate::new("x", "https://v").into_record();
        let b = SourceCandidate::new("x", "https://v").into_record();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn sink_drains_in_push_order() {
        let sink = EventSink::new();
        sink.push(ViewEvent::Navigated(NavigationInfo::new("a", "https://a")));
        sink.push(ViewEvent::LoadFailed {
            code: -2,
            desc: "failed".into(),
        });

        let events = sink.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ViewEvent::Navigated(_)));
        assert!(matches!(events[1], ViewEvent::LoadFailed { .. }));
        assert!(sink.drain().is_empty());
    }
}
