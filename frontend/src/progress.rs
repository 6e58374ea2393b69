//! Simulated upload progress.
//!
//! `fetch` exposes no upload progress events, so the bar is advanced on a
//! timer as UX smoothing while the request is in flight. It never reaches
//! 100%; the modal is closed when the request settles instead.

pub const PROGRESS_TICK_MS: u32 = 200;
pub const PROGRESS_STEP: u32 = 5;
pub const PROGRESS_CEILING: u32 = 90;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatedProgress {
    percent: u32,
}

impl SimulatedProgress {
    pub fn percent(&self) -> u32 {
        self.percent
    }

    pub fn at_ceiling(&self) -> bool {
        self.percent >= PROGRESS_CEILING
    }

    /// Advances one step. Returns `false` once the ceiling has been reached
    /// and the timer driving it should stop.
    pub fn tick(&mut self) -> bool {
        if self.at_ceiling() {
            return false;
        }
        self.percent = (self.percent + PROGRESS_STEP).min(PROGRESS_CEILING);
        !self.at_ceiling()
    }

    pub fn reset(&mut self) {
        self.percent = 0;
    }

    pub fn bar_width(&self) -> String {
        format!("{}%", self.percent)
    }

    pub fn status_text(&self) -> String {
        format!("Uploading: {}%", self.percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_in_fixed_steps_and_stops_at_ceiling() {
        let mut progress = SimulatedProgress::default();
        let mut seen = Vec::new();
        while progress.tick() {
            seen.push(progress.percent());
        }
        seen.push(progress.percent());

        assert_eq!(seen.first(), Some(&5));
        assert_eq!(seen.last(), Some(&90));
        assert_eq!(seen.len(), 18);
        assert!(seen.windows(2).all(|pair| pair[1] - pair[0] == PROGRESS_STEP));

        assert!(!progress.tick());
        assert_eq!(progress.percent(), 90);
    }

    #[test]
    fn renders_width_and_status() {
        let mut progress = SimulatedProgress::default();
        progress.tick();
        progress.tick();
        assert_eq!(progress.bar_width(), "10%");
        assert_eq!(progress.status_text(), "Uploading: 10%");

        progress.reset();
        assert_eq!(progress.bar_width(), "0%");
    }
}
