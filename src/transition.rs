//! Per-id transition state machine.
//!
//! One scheduler drives every in-flight transition from a single `tick`,
//! against an injected monotonic time source so the timing logic is testable
//! without a real clock. Progress handed to the per-frame callback is the
//! linear `clamp01(elapsed / duration)`; easing is the consumer's business
//! (the rectangle batch applies its quintic curve downstream).

use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

struct Transition {
    start: f64,
    duration: f64,
    per_frame: Box<dyn FnMut(f32)>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

pub struct TransitionScheduler {
    clock: Box<dyn Fn() -> f64>,
    active: HashMap<String, Transition>,
}

impl TransitionScheduler {
    /// Scheduler over an arbitrary monotonic clock returning seconds.
    pub fn new(clock: impl Fn() -> f64 + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            active: HashMap::new(),
        }
    }

    /// Scheduler anchored to `Instant::now`.
    pub fn with_system_clock() -> Self {
        let anchor = Instant::now();
        Self::new(move || anchor.elapsed().as_secs_f64())
    }

    /// Starts a transition under `id`.
    ///
    /// At most one transition may be in flight per id: a prior one under the
    /// same id is cancelled and discarded WITHOUT firing its completion
    /// handler. The committed state from before the cancellation stays
    /// authoritative; only the visual interpolation is abandoned.
    pub fn begin(
        &mut self,
        id: impl Into<String>,
        duration: f64,
        per_frame: impl FnMut(f32) + 'static,
        on_complete: impl FnOnce() + 'static,
    ) {
        let id = id.into();
        if self.active.remove(&id).is_some() {
            debug!(id = %id, "transition restarted, prior run discarded");
        }
        self.active.insert(
            id,
            Transition {
                start: (self.clock)(),
                duration,
                per_frame: Box::new(per_frame),
                on_complete: Some(Box::new(on_complete)),
            },
        );
    }

    /// Cancels a transition immediately and synchronously; no callback fires.
    pub fn cancel(&mut self, id: &str) {
        self.active.remove(id);
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains_key(id)
    }

    pub fn any_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Drives every active transition one frame. Completion fires exactly
    /// once, on the first tick where elapsed >= duration, right after the
    /// per-frame callback saw progress 1. Returns whether any transition is
    /// still running.
    pub fn tick(&mut self) -> bool {
        let now = (self.clock)();
        let mut finished: Vec<String> = Vec::new();

        for (id, tr) in self.active.iter_mut() {
            let elapsed = now - tr.start;
            let t = if tr.duration <= 0.0 {
                1.0
            } else {
                (elapsed / tr.duration).clamp(0.0, 1.0)
            };
            (tr.per_frame)(t as f32);
            if elapsed >= tr.duration {
                finished.push(id.clone());
            }
        }

        for id in finished {
            if let Some(mut tr) = self.active.remove(&id) {
                if let Some(done) = tr.on_complete.take() {
                    done();
                }
            }
        }

        !self.active.is_empty()
    }
}
