//! Shared in-memory fakes for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::broadcast;
use weir_common::{Color, EngineError, Rect, WeirError};

use crate::events::{EventSink, HostMessage, NavigationInfo, SourceCandidate, VideoRecord};
use crate::host::{HostProvider, HostWindow};
use crate::policy::BlockerProvider;
use crate::sniff::{Sniffer, VideoStore};
use crate::surface::{CapturedImage, Engine, Surface, SurfaceOptions};

/// Monotonic counter shared across fakes so tests can assert ordering.
#[derive(Clone)]
pub struct Sequencer(Arc<AtomicUsize>);

impl Sequencer {
    pub fn new() -> Self {
        Self(Arc::new(AtomicUsize::new(0)))
    }

    pub fn next(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

pub struct RecordingWindow {
    seq: Sequencer,
    pub posts: Mutex<Vec<(usize, HostMessage)>>,
}

impl RecordingWindow {
    pub fn new(seq: Sequencer) -> Self {
        Self {
            seq,
            posts: Mutex::new(Vec::new()),
        }
    }
}

impl HostWindow for RecordingWindow {
    fn post(&self, message: &HostMessage) {
        self.posts
            .lock()
            .unwrap()
            .push((self.seq.next(), message.clone()));
    }
}

pub struct Provider {
    overlay: Option<Arc<RecordingWindow>>,
    main: Option<Arc<RecordingWindow>>,
}

impl Provider {
    pub fn empty() -> Self {
        Self {
            overlay: None,
            main: None,
        }
    }

    pub fn with_main() -> Self {
        Self::with_main_seq(Sequencer::new())
    }

    pub fn with_main_seq(seq: Sequencer) -> Self {
        Self {
            overlay: None,
            main: Some(Arc::new(RecordingWindow::new(seq))),
        }
    }

    pub fn with_both_seq(seq: Sequencer) -> Self {
        Self {
            overlay: Some(Arc::new(RecordingWindow::new(seq.clone()))),
            main: Some(Arc::new(RecordingWindow::new(seq))),
        }
    }

    pub fn overlay_ref(&self) -> Option<&RecordingWindow> {
        self.overlay.as_deref()
    }

    pub fn main_ref(&self) -> Option<&RecordingWindow> {
        self.main.as_deref()
    }
}

impl HostProvider for Provider {
    fn overlay(&self) -> Option<Arc<dyn HostWindow>> {
        self.overlay.clone().map(|w| w as Arc<dyn HostWindow>)
    }

    fn main_window(&self) -> Option<Arc<dyn HostWindow>> {
        self.main.clone().map(|w| w as Arc<dyn HostWindow>)
    }
}

pub struct FakeSniffer {
    seq: Sequencer,
    pub resets: Mutex<Vec<(usize, NavigationInfo)>>,
    pub started: AtomicBool,
    tx: broadcast::Sender<SourceCandidate>,
}

impl FakeSniffer {
    pub fn new(seq: Sequencer) -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            seq,
            resets: Mutex::new(Vec::new()),
            started: AtomicBool::new(false),
            tx,
        }
    }

    /// Emit a candidate as the real detector would.
    pub fn emit(&self, candidate: SourceCandidate) {
        let _ = self.tx.send(candidate);
    }
}

impl Sniffer for FakeSniffer {
    fn start(&self) {
        self.started.store(true, Ordering::SeqCst);
    }

    fn reset(&self, navigation: &NavigationInfo) {
        self.resets
            .lock()
            .unwrap()
            .push((self.seq.next(), navigation.clone()));
    }

    fn subscribe(&self) -> broadcast::Receiver<SourceCandidate> {
        self.tx.subscribe()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<VideoRecord>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn names(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }
}

impl VideoStore for MemoryStore {
    fn find_by_name(&self, name: &str) -> Option<VideoRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name == name)
            .cloned()
    }

    fn insert(&self, record: VideoRecord) -> VideoRecord {
        self.records.lock().unwrap().push(record.clone());
        record
    }
}

/// Blocker whose rule load completes immediately.
#[derive(Default)]
pub struct ReadyBlocker {
    enabled: Mutex<Vec<String>>,
}

#[async_trait]
impl BlockerProvider for ReadyBlocker {
    async fn start(&self) -> Result<(), WeirError> {
        Ok(())
    }

    fn enable(&self, partition: &str) {
        let mut enabled = self.enabled.lock().unwrap();
        if !enabled.iter().any(|p| p == partition) {
            enabled.push(partition.to_string());
        }
    }

    fn disable(&self, partition: &str) {
        self.enabled.lock().unwrap().retain(|p| p != partition);
    }

    fn is_enabled(&self, partition: &str) -> bool {
        self.enabled.lock().unwrap().iter().any(|p| p == partition)
    }

    fn should_block(&self, _url: &str, _source_url: &str, _kind: &str) -> bool {
        false
    }
}

pub struct FakeSurface {
    pub options: SurfaceOptions,
    pub sink: EventSink,
    pub history: Vec<String>,
    pub user_agent: String,
    pub bounds: Rect,
    pub background: Color,
    pub visible: bool,
    pub stops: usize,
    pub reloads: usize,
    pub closed: bool,
    pub fail_scripts: bool,
    pub scripts: Mutex<Vec<String>>,
}

impl Surface for FakeSurface {
    fn load_url(&mut self, url: &str) -> Result<(), EngineError> {
        self.history.push(url.to_string());
        Ok(())
    }

    fn stop(&mut self) {
        self.stops += 1;
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }

    fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }

    fn go_back(&mut self) {
        if self.history.len() > 1 {
            self.history.pop();
        }
    }

    fn clear_history(&mut self) {
        self.history.clear();
    }

    fn url(&self) -> String {
        self.history.last().cloned().unwrap_or_default()
    }

    fn set_user_agent(&mut self, user_agent: &str) {
        self.user_agent = user_agent.to_string();
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn set_background_color(&mut self, color: Color) {
        self.background = color;
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn capture(&self) -> Result<CapturedImage, EngineError> {
        Ok(CapturedImage {
            width: 1,
            height: 1,
            data: vec![0],
        })
    }

    fn evaluate_script(&self, script: &str) -> Result<(), EngineError> {
        if self.fail_scripts {
            return Err(EngineError::Script("page rejected script".into()));
        }
        self.scripts.lock().unwrap().push(script.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[derive(Default)]
pub struct FakeEngine {
    created: Arc<AtomicUsize>,
    pub fail_create: bool,
}

impl FakeEngine {
    pub fn created_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.created)
    }
}

impl Engine for FakeEngine {
    type Surface = FakeSurface;

    fn create(
        &self,
        options: SurfaceOptions,
        sink: EventSink,
    ) -> Result<Self::Surface, EngineError> {
        if self.fail_create {
            return Err(EngineError::Creation("engine offline".into()));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        let user_agent = options.user_agent.clone();
        let bounds = options.bounds;
        let background = options.background;
        Ok(FakeSurface {
            options,
            sink,
            history: Vec::new(),
            user_agent,
            bounds,
            background,
            visible: false,
            stops: 0,
            reloads: 0,
            closed: false,
            fail_scripts: false,
            scripts: Mutex::new(Vec::new()),
        })
    }
}
