//! Rolling sprint velocity.

use sprintcast_core::StatsTriple;
use tracing::debug;

/// Per-sprint completed-size deltas and the stats derived from them.
///
/// One entry is appended per sprint boundary. `None` entries mark sprints
/// with no completed-size data. Zero and `None` entries never contribute to
/// the stats.
#[derive(Debug, Clone, Default)]
pub struct VelocityCalculator {
    window: Option<usize>,
    previous_completed_size: Option<f64>,
    history: Vec<Option<f64>>,
    stats: Option<StatsTriple<f64>>,
}

impl VelocityCalculator {
    /// Create a calculator averaging over the trailing `window` sprints
    /// (every sprint when `None`).
    pub fn new(window: Option<usize>) -> Self {
        Self {
            window,
            ..Default::default()
        }
    }

    /// Record a sprint boundary with the cumulative completed size on that day.
    pub fn update(&mut self, completed_size: Option<f64>) {
        match completed_size {
            Some(completed) => {
                let delta = completed - self.previous_completed_size.unwrap_or(0.0);
                self.history.push(Some(delta));
                self.previous_completed_size = Some(completed);
            }
            None => self.history.push(None),
        }

        let stats = self.compute_stats();
        debug!(
            sprints = self.history.len(),
            min = stats.min,
            average = stats.average,
            max = stats.max,
            "Velocity updated"
        );
        self.stats = Some(stats);
    }

    /// Stats over the trailing window, `None` before the first boundary.
    pub fn stats(&self) -> Option<StatsTriple<f64>> {
        self.stats
    }

    /// The most recent per-sprint delta.
    pub fn latest(&self) -> Option<f64> {
        self.history.last().copied().flatten()
    }

    /// Every per-sprint delta recorded so far.
    pub fn history(&self) -> &[Option<f64>] {
        &self.history
    }

    fn compute_stats(&self) -> StatsTriple<f64> {
        let start = match self.window {
            Some(n) if self.history.len() > n => self.history.len() - n,
            _ => 0,
        };

        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        let mut total = 0.0;
        let mut count = 0usize;

        for velocity in self.history[start..].iter().flatten().copied() {
            if velocity == 0.0 {
                continue;
            }

            total += velocity;
            count += 1;
            min = Some(min.map_or(velocity, |m| m.min(velocity)));
            max = Some(max.map_or(velocity, |m| m.max(velocity)));
        }

        let average = if count > 0 { total / count as f64 } else { 0.0 };

        StatsTriple::new(min.unwrap_or(0.0), average, max.unwrap_or(0.0))
    }
}
