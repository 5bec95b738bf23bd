//! Per-chunk progress notifications.
//!
//! The engine fires one [`ProgressEvent`] per completed chunk, synchronously,
//! on the thread that called [`run`](crate::SimulationEngine::run). A slow
//! observer delays the start of the next chunk.

/// Cumulative progress after a chunk has been aggregated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    pub completed_trials: u64,
    pub total_trials: u64,
    pub elapsed_seconds: f64,
}

impl ProgressEvent {
    /// Completed share of the run in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total_trials == 0 {
            0.0
        } else {
            self.completed_trials as f64 / self.total_trials as f64
        }
    }
}

/// Receives progress events.
pub trait ProgressObserver {
    fn on_progress(&mut self, event: ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: FnMut(ProgressEvent),
{
    fn on_progress(&mut self, event: ProgressEvent) {
        self(event);
    }
}

/// Holds the optional single subscriber.
#[derive(Default)]
pub struct ProgressNotifier<'a> {
    observer: Option<Box<dyn ProgressObserver + 'a>>,
}

impl<'a> ProgressNotifier<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self { observer: None }
    }

    /// Replace the current subscriber.
    pub fn subscribe(&mut self, observer: impl ProgressObserver + 'a) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear(&mut self) {
        self.observer = None;
    }

    #[must_use]
    pub fn has_subscriber(&self) -> bool {
        self.observer.is_some()
    }

    pub fn notify(&mut self, event: ProgressEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_progress(event);
        }
    }
}

impl std::fmt::Debug for ProgressNotifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressNotifier")
            .field("subscribed", &self.has_subscriber())
            .finish()
    }
}
