//! Gravity timer - the single cancellable tick source owned by a session
//!
//! The timer never calls back into the session. The owner feeds elapsed time with
//! [`GravityTimer::advance`] and drains due firings with [`GravityTimer::poll_due`],
//! one at a time, so a firing can never overlap another.
//!
//! Arming always replaces the previous arming: the generation is bumped and the
//! accumulated time is dropped, so two intervals can never be live at once and time
//! accumulated under an old interval never fires under the new one.

/// Request handed to an external scheduler: "call `tick()` every `interval_ms`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickRequest {
    pub interval_ms: u32,
    /// Changes every time the timer is re-armed; a scheduler holding an older
    /// generation must drop its schedule.
    pub generation: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GravityTimer {
    interval_ms: u32,
    accumulated_ms: u32,
    generation: u32,
    armed: bool,
}

impl GravityTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) periodic firing every `interval_ms`.
    ///
    /// A zero interval is treated as 1ms.
    pub fn arm(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
        self.accumulated_ms = 0;
        self.generation = self.generation.wrapping_add(1);
        self.armed = true;
    }

    /// Stop firing and drop any accumulated time
    pub fn cancel(&mut self) {
        if self.armed {
            self.generation = self.generation.wrapping_add(1);
        }
        self.armed = false;
        self.accumulated_ms = 0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Time accumulated toward the next firing
    pub fn accumulated_ms(&self) -> u32 {
        self.accumulated_ms
    }

    pub fn request(&self) -> Option<TickRequest> {
        self.armed.then_some(TickRequest {
            interval_ms: self.interval_ms,
            generation: self.generation,
        })
    }

    /// Feed elapsed time. Ignored while cancelled.
    pub fn advance(&mut self, elapsed_ms: u32) {
        if self.armed {
            self.accumulated_ms = self.accumulated_ms.saturating_add(elapsed_ms);
        }
    }

    /// Consume one due firing, if any
    pub fn poll_due(&mut self) -> bool {
        if self.armed && self.accumulated_ms >= self.interval_ms {
            self.accumulated_ms -= self.interval_ms;
            return true;
        }
        false
    }
}
