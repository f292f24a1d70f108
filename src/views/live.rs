//! Live stream listing with polled viewer counts.

use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::api::{ApiClient, LiveStream};
use crate::config::VirtualizationConfig;
use crate::error::SyncError;
use crate::lifecycle::ScopeHandle;
use crate::notify::{Notifier, Toast};
use crate::polling::Poller;
use crate::virtual_list::ListLayout;

struct ListState {
    streams: RwLock<Vec<LiveStream>>,
    layout: Mutex<ListLayout>,
    virtualization: VirtualizationConfig,
}

impl ListState {
    fn apply(&self, streams: Vec<LiveStream>) {
        let count = streams.len();
        *self.streams.write() = streams;

        let mut layout = self.layout.lock();
        if count >= self.virtualization.threshold && layout.is_virtual() {
            if let Some(window) = layout.window_mut() {
                window.set_count(count);
            }
        } else {
            *layout = ListLayout::plan(count, &self.virtualization);
        }
        tracing::debug!(count, virtualized = layout.is_virtual(), "Live streams refreshed");
    }
}

pub struct LiveStreamList {
    api: Arc<ApiClient>,
    scope: ScopeHandle,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    state: Arc<ListState>,
    poller: Mutex<Poller>,
    viewport: Mutex<f64>,
}

impl LiveStreamList {
    pub fn new(
        api: Arc<ApiClient>,
        scope: ScopeHandle,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
        virtualization: VirtualizationConfig,
    ) -> Self {
        Self {
            api,
            scope,
            notifier,
            interval,
            state: Arc::new(ListState {
                streams: RwLock::new(Vec::new()),
                layout: Mutex::new(ListLayout::plan(0, &virtualization)),
                virtualization,
            }),
            poller: Mutex::new(Poller::new()),
            viewport: Mutex::new(0.0),
        }
    }

    pub fn mount(&self) {
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        self.poller.lock().start(
            "live streams",
            self.scope.clone(),
            self.interval,
            Arc::clone(&self.notifier),
            move || {
                let api = Arc::clone(&api);
                async move { api.list_live_streams().await }
            },
            move |streams| state.apply(streams),
        );
    }

    pub fn stop(&self) {
        self.poller.lock().stop();
    }

    pub fn is_polling(&self) -> bool {
        self.poller.lock().is_running()
    }

    /// One-off fetch outside the timer.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        match self.api.list_live_streams().await {
            Ok(streams) => {
                self.scope.run_if_mounted(|| self.state.apply(streams));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Live stream refresh failed");
                self.notifier
                    .notify(Toast::warning(err.user_message("refresh live streams")));
                Err(err)
            }
        }
    }

    pub fn streams(&self) -> Vec<LiveStream> {
        self.state.streams.read().clone()
    }

    pub fn total_viewers(&self) -> u64 {
        self.state
            .streams
            .read()
            .iter()
            .map(|stream| stream.viewer_count)
            .sum()
    }

    pub fn is_virtualized(&self) -> bool {
        self.state.layout.lock().is_virtual()
    }

    /// Viewport height changed.
    pub fn resize(&self, viewport: f64) {
        *self.viewport.lock() = viewport;
        if let Some(window) = self.state.layout.lock().window_mut() {
            window.resize(viewport);
        }
    }

    pub fn scroll_to(&self, offset: f64) {
        if let Some(window) = self.state.layout.lock().window_mut() {
            window.scroll_to(offset);
        }
    }

    /// Indices of the streams to render right now.
    pub fn visible_range(&self) -> Range<usize> {
        let mut layout = self.state.layout.lock();
        let viewport = *self.viewport.lock();
        if let Some(window) = layout.window_mut() {
            if window.viewport() != viewport {
                window.resize(viewport);
            }
        }
        layout.visible_range()
    }

    /// Streams to render right now, in order.
    pub fn visible_streams(&self) -> Vec<LiveStream> {
        let range = self.visible_range();
        let streams = self.state.streams.read();
        streams[range.start.min(streams.len())..range.end.min(streams.len())].to_vec()
    }
}
