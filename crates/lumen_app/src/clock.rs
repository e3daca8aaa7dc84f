//! Frame clock
//!
//! Converts host timestamps (vsync, timer, test harness) into frame deltas.

/// Longest delta handed to the driver; longer gaps are treated as a stall
pub const MAX_FRAME_DELTA_MS: f32 = 250.0;

#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    elapsed_ms: f64,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick at `timestamp_ms` and return the delta since the last.
    ///
    /// The first tick and timestamps that go backwards yield zero.
    pub fn advance(&mut self, timestamp_ms: f64) -> f32 {
        let delta = match self.last_ms {
            Some(last) if timestamp_ms > last => (timestamp_ms - last) as f32,
            _ => 0.0,
        };
        self.last_ms = Some(match self.last_ms {
            Some(last) => last.max(timestamp_ms),
            None => timestamp_ms,
        });

        let delta = if delta > MAX_FRAME_DELTA_MS {
            tracing::debug!(delta, "frame stall, clamping delta");
            MAX_FRAME_DELTA_MS
        } else {
            delta
        };
        self.elapsed_ms += delta as f64;
        self.frames += 1;
        delta
    }

    /// Timestamp of the last tick
    pub fn now_ms(&self) -> Option<f64> {
        self.last_ms
    }

    /// Sum of every delta handed out
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1000.0), 0.0);
        assert_eq!(clock.advance(1016.0), 16.0);
        assert_eq!(clock.advance(1050.0), 34.0);
        assert_eq!(clock.frame_count(), 3);
        assert_eq!(clock.elapsed_ms(), 50.0);
    }

    #[test]
    fn test_backwards_and_stalls() {
        let mut clock = FrameClock::new();
        clock.advance(100.0);
        assert_eq!(clock.advance(90.0), 0.0);
        assert_eq!(clock.now_ms(), Some(100.0));
        assert_eq!(clock.advance(5000.0), MAX_FRAME_DELTA_MS);
    }
}
