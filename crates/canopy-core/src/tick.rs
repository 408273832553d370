/// Frame input supplied by the host once per simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    /// Unscaled wall/sim seconds elapsed since the previous frame.
    pub dt_seconds: f32,
    /// Global time scale; agents whose clock ignores it see `1.0`.
    pub time_scale: f32,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32) -> Self {
        Self {
            tick,
            dt_seconds,
            time_scale: 1.0,
        }
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
