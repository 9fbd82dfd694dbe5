// ABOUTME: Serializable view-state handed to the renderer sink, and the debounced render scheduler.
// ABOUTME: At most one render is pending; a new request cancels it and reissues a fresh token.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::highlight::Highlights;
use crate::record::EquipmentRecord;
use crate::theme::Theme;

/// Delay used to coalesce rapid state changes into a single paint.
pub const RENDER_DEBOUNCE: Duration = Duration::from_millis(100);

/// One card on the visible page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub record: EquipmentRecord,
    pub highlights: Highlights,
    pub selected: bool,
    pub favorite: bool,
}

/// Everything a renderer needs to paint the list view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub cards: Vec<CardView>,
    pub total_records: usize,
    pub selected_count: usize,
    pub filtered_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_numbers: Vec<usize>,
    pub has_previous: bool,
    pub has_next: bool,
    pub query: String,
    pub favorites_only: bool,
    pub page_size: usize,
    pub theme: Theme,
    pub no_results: bool,
}

/// Sink that paints a snapshot. Called from a tokio task.
pub trait Renderer: Send + Sync + 'static {
    fn render(&self, snapshot: ViewSnapshot);
}

/// Identifies one render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderToken(u64);

struct PendingRender {
    token: RenderToken,
    task: JoinHandle<()>,
}

/// Debounces renders: each request waits `delay` before painting, and a
/// request made while another is pending replaces it.
pub struct RenderScheduler<R: Renderer> {
    renderer: Arc<R>,
    delay: Duration,
    pending: Option<PendingRender>,
    issued: u64,
}

impl<R: Renderer> RenderScheduler<R> {
    pub fn new(renderer: Arc<R>) -> Self {
        Self::with_delay(renderer, RENDER_DEBOUNCE)
    }

    pub fn with_delay(renderer: Arc<R>, delay: Duration) -> Self {
        Self {
            renderer,
            delay,
            pending: None,
            issued: 0,
        }
    }

    /// Schedule `snapshot` to be painted after the debounce delay, cancelling
    /// any render still pending. Must be called inside a tokio runtime.
    pub fn request(&mut self, snapshot: ViewSnapshot) -> RenderToken {
        if let Some(cancelled) = self.cancel() {
            tracing::debug!("render {:?} superseded", cancelled);
        }

        self.issued += 1;
        let token = RenderToken(self.issued);
        let renderer = Arc::clone(&self.renderer);
        let delay = self.delay;

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            renderer.render(snapshot);
        });

        self.pending = Some(PendingRender { token, task });
        token
    }

    /// Cancel the pending render, if it has not fired yet.
    pub fn cancel(&mut self) -> Option<RenderToken> {
        let pending = self.pending.take()?;
        if pending.task.is_finished() {
            return None;
        }
        pending.task.abort();
        Some(pending.token)
    }

    /// Token of the render still waiting to fire.
    pub fn pending(&self) -> Option<RenderToken> {
        self.pending
            .as_ref()
            .filter(|p| !p.task.is_finished())
            .map(|p| p.token)
    }
}

impl<R: Renderer> Drop for RenderScheduler<R> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }
}
