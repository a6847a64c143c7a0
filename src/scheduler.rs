/// Simulation tick length (seconds).
pub const TICK_RATE: f64 = 1.0 / 60.0;
/// Slow-phase period (seconds).
const SECOND: f64 = 1.0;
/// Max accumulated tick time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;

/// Work owed after a host frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steps {
    pub ticks: u32,
    /// A one-second boundary was crossed.
    pub second: bool,
}

/// Turns jittery host frame times into fixed 60 Hz ticks and 1 Hz seconds.
#[derive(Debug, Default)]
pub struct FixedScheduler {
    tick_acc: f64,
    second_acc: f64,
}

impl FixedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f64) -> Steps {
        if !dt.is_finite() || dt <= 0.0 {
            return Steps::default();
        }

        self.tick_acc = (self.tick_acc + dt).min(MAX_ACCUMULATOR);
        let mut ticks = 0;
        while self.tick_acc >= TICK_RATE {
            self.tick_acc -= TICK_RATE;
            ticks += 1;
        }

        // A stalled host gets one slow phase, not a burst
        self.second_acc += dt;
        let second = self.second_acc >= SECOND;
        if second {
            self.second_acc %= SECOND;
        }

        Steps { ticks, second }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irregular_frames_sum_to_fixed_steps() {
        let mut clock = FixedScheduler::new();
        let mut ticks = 0;
        let mut seconds = 0;

        // 60 pairs of 5ms + 13ms = 1.08s
        for _ in 0..60 {
            for dt in [0.005, 0.013] {
                let steps = clock.advance(dt);
                ticks += steps.ticks;
                seconds += steps.second as u32;
            }
        }

        assert_eq!(ticks, 64);
        assert_eq!(seconds, 1);
    }

    #[test]
    fn huge_frame_is_clamped() {
        let mut clock = FixedScheduler::new();
        let steps = clock.advance(5.0);

        assert!(steps.ticks <= 15 && steps.ticks >= 14, "ticks = {}", steps.ticks);
        assert!(steps.second);
        assert!(!clock.advance(0.5).second);
    }

    #[test]
    fn bad_dt_is_ignored() {
        let mut clock = FixedScheduler::new();
        assert_eq!(clock.advance(-1.0), Steps::default());
        assert_eq!(clock.advance(f64::NAN), Steps::default());
        assert_eq!(clock.advance(f64::INFINITY), Steps::default());
    }
}
