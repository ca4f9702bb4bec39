//! Resumable timed tasks driven by the tick loop.
//!
//! Every long-running behaviour (roam waits, attack cooldowns, audio fades,
//! emitter flags) is one of these objects instead of a coroutine. Each one is
//! advanced explicitly with `advance(dt)` and can be cancelled at any tick.

/// A cooperative task advanced once per tick.
pub trait Task {
    /// Whether the task still has work left.
    fn is_active(&self) -> bool;

    /// Stop the task immediately. Cancelling an inactive task is a no-op.
    fn cancel(&mut self);

    /// Advance by `dt` seconds. Returns `true` on the tick the task finishes.
    fn advance(&mut self, dt: f32) -> bool;
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

/// A one-shot countdown.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    /// An inactive countdown.
    #[must_use]
    pub const fn idle() -> Self {
        Self { remaining: 0.0 }
    }

    /// A countdown armed with `seconds`.
    #[must_use]
    pub fn started(seconds: f32) -> Self {
        let mut c = Self::idle();
        c.start(seconds);
        c
    }

    /// (Re)arm with `seconds`. Non-positive durations leave it inactive.
    pub fn start(&mut self, seconds: f32) {
        self.remaining = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    }

    /// Arm to at least `seconds`, keeping a longer remaining time.
    pub fn extend_to(&mut self, seconds: f32) {
        if seconds.is_finite() && seconds > self.remaining {
            self.remaining = seconds;
        }
    }

    /// Seconds left.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl Task for Countdown {
    fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    fn cancel(&mut self) {
        self.remaining = 0.0;
    }

    fn advance(&mut self, dt: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        self.remaining <= 0.0
    }
}

// ---------------------------------------------------------------------------
// Cooldown
// ---------------------------------------------------------------------------

/// A reusable gate: closed while cooling down, open otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    duration: f32,
    timer: Countdown,
}

impl Cooldown {
    /// A cooldown of `duration` seconds, initially ready.
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            timer: Countdown::idle(),
        }
    }

    /// Whether the gate is open.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.timer.is_active()
    }

    /// Close the gate for the configured duration.
    pub fn trigger(&mut self) {
        self.timer.start(self.duration);
    }

    /// Seconds until ready.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.timer.remaining()
    }
}

impl Task for Cooldown {
    fn is_active(&self) -> bool {
        self.timer.is_active()
    }

    fn cancel(&mut self) {
        self.timer.cancel();
    }

    fn advance(&mut self, dt: f32) -> bool {
        self.timer.advance(dt)
    }
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Linear volume fade from a start level to silence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    start_volume: f32,
    duration: f32,
    elapsed: f32,
    active: bool,
}

impl Fade {
    /// Begin fading `start_volume` to zero over `duration` seconds.
    /// A zero duration finishes on the first advance.
    #[must_use]
    pub fn out(start_volume: f32, duration: f32) -> Self {
        Self {
            start_volume,
            duration: duration.max(0.0),
            elapsed: 0.0,
            active: true,
        }
    }

    /// Current volume.
    #[must_use]
    pub fn volume(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.active { self.start_volume } else { 0.0 };
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.start_volume * (1.0 - t)
    }
}

impl Task for Fade {
    fn is_active(&self) -> bool {
        self.active
    }

    fn cancel(&mut self) {
        self.active = false;
    }

    fn advance(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.duration {
            self.active = false;
            return true;
        }
        false
    }
}
