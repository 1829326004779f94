/// Largest frame step the clock accepts, in seconds.
pub const MAX_FRAME_DT: f64 = 0.1;

/// Scene clock driven by host timestamps.
///
/// The first tick after creation, resume or unfreeze advances by zero. Steps are clamped to
/// `[0, max_dt]` so a stalled host never produces a time jump.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clock {
    time: f64,
    last: Option<f64>,
    max_dt: f64,
    frozen: bool,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl Clock {
    /// Running clock at time zero.
    pub fn new(max_dt: f64) -> Self {
        Self {
            time: 0.0,
            last: None,
            max_dt: if max_dt.is_finite() && max_dt > 0.0 {
                max_dt
            } else {
                MAX_FRAME_DT
            },
            frozen: false,
        }
    }

    /// Scene time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// `true` while held at phase zero.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Advance to host timestamp `now` (seconds). Returns the scene-time step.
    pub fn tick(&mut self, now: f64, speed: f64) -> f64 {
        let prev = self.last.replace(now);
        if self.frozen {
            return 0.0;
        }
        let dt = match prev {
            Some(prev) if now.is_finite() && prev.is_finite() => {
                (now - prev).clamp(0.0, self.max_dt)
            }
            _ => 0.0,
        };
        let step = if speed.is_finite() { dt * speed.max(0.0) } else { 0.0 };
        self.time += step;
        step
    }

    /// Forget the last timestamp; the next tick advances by zero.
    pub fn suspend(&mut self) {
        self.last = None;
    }

    /// Hold the clock at phase zero.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.time = 0.0;
        self.last = None;
    }

    /// Resume from phase zero.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
        self.last = None;
    }

    /// Back to time zero, keeping the frozen flag.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.last = None;
    }
}
