//! Episode bookkeeping for display layers and run summaries

use std::fmt;

mod recorder;
mod rolling;
mod scoreboard;

pub use recorder::{RunRecorder, RunSummary};
pub use rolling::RollingWindow;
pub use scoreboard::Scoreboard;

/// Which stream an episode is recorded to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Learning was active
    Training,
    /// Learning was disabled; measures policy quality only
    Validation,
}

/// Outcome of one finished episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeRecord {
    pub ord: u32,
    pub reward: f64,
    pub win: bool,
    pub steps: u32,
    pub epsilon: f64,
    pub alpha: f64,
}

/// Formats as one data line of a run summary: `ord, reward, win, steps, epsilon, alpha`
impl fmt::Display for EpisodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {:.4}, {}, {}, {}, {}",
            self.ord,
            self.reward,
            u8::from(self.win),
            self.steps,
            self.epsilon,
            self.alpha
        )
    }
}
