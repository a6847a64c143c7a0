use instant::Instant;

/// Which simulation system is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SystemPhase {
    Physics = 0,
    Input = 1,
    Movement = 2,
    Rendering = 3,
    Audio = 4,
}

impl SystemPhase {
    pub const ALL: [SystemPhase; 5] = [
        Self::Physics,
        Self::Input,
        Self::Movement,
        Self::Rendering,
        Self::Audio,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Physics => "Physics",
            Self::Input => "Input",
            Self::Movement => "Movement",
            Self::Rendering => "Rendering",
            Self::Audio => "Audio",
        }
    }
}

/// Per-system timing with exponential moving average smoothing.
pub struct SystemTimers {
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; 5],
    /// Timestamp when `begin()` was called.
    start: Instant,
}

const EMA_ALPHA: f64 = 0.1;

impl SystemTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; 5],
            start: Instant::now(),
        }
    }

    /// Call before a system runs.
    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Call after a system finishes. Records elapsed time for `phase`.
    pub fn end(&mut self, phase: SystemPhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        let idx = phase as usize;
        self.durations_us[idx] =
            self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
    }

    /// Sum of all phase durations (microseconds).
    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }

    /// One-line breakdown for the periodic stats log.
    pub fn summary(&self) -> String {
        let phases = SystemPhase::ALL
            .iter()
            .map(|&p| format!("{} {:.1}us", p.label(), self.durations_us[p as usize]))
            .collect::<Vec<_>>()
            .join(" | ");
        format!("{phases} | total {:.1}us", self.total_us())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_every_phase() {
        let mut timers = SystemTimers::new();
        timers.begin();
        timers.end(SystemPhase::Movement);

        let summary = timers.summary();
        for phase in SystemPhase::ALL {
            assert!(summary.contains(phase.label()));
        }
        assert!(timers.total_us() >= 0.0);
    }
}
