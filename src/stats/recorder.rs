use std::{
    fmt,
    time::{Duration, Instant},
};

use super::{EpisodeRecord, Stream};

/// Per-episode history of a run, split into training and validation streams
#[derive(Debug, Clone)]
pub struct RunRecorder {
    training: Vec<EpisodeRecord>,
    validation: Vec<EpisodeRecord>,
    started: Instant,
}

impl Default for RunRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl RunRecorder {
    pub fn new() -> Self {
        Self {
            training: Vec::new(),
            validation: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Append an episode and return its record
    ///
    /// Training episodes are numbered consecutively from 0. Validation episodes carry the
    /// number of training episodes recorded before them and always log ε = α = 0.
    pub fn record(
        &mut self,
        stream: Stream,
        reward: f64,
        win: bool,
        steps: u32,
        epsilon: f64,
        alpha: f64,
    ) -> EpisodeRecord {
        let ord = self.training.len() as u32;
        match stream {
            Stream::Training => {
                let record = EpisodeRecord {
                    ord,
                    reward,
                    win,
                    steps,
                    epsilon,
                    alpha,
                };
                self.training.push(record);
                record
            }
            Stream::Validation => {
                let record = EpisodeRecord {
                    ord,
                    reward,
                    win,
                    steps,
                    epsilon: 0.0,
                    alpha: 0.0,
                };
                self.validation.push(record);
                record
            }
        }
    }

    pub fn training(&self) -> &[EpisodeRecord] {
        &self.training
    }

    pub fn validation(&self) -> &[EpisodeRecord] {
        &self.validation
    }

    /// Wall-clock time since the recorder was created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Human-readable run summary consumed by analysis scripts
///
/// ```text
/// epsilon: 1, 0.02, 10000
/// alpha: 0.2, 0.2, 0
/// gamma: 0.99
/// training_time: 00:01:02.5000000
/// training_episodes: 2
/// validation_episodes: 1
/// Training: ord, reward, win, steps
/// 0, -3.2500, 0, 65, 1, 0.2
/// 1, 1.5500, 1, 9, 0.9999, 0.2
/// Validation: ord, reward, win, steps
/// 2, 1.6500, 1, 7, 0, 0
/// ```
#[derive(Debug, Clone)]
pub struct RunSummary<'a> {
    pub epsilon: (f64, f64, f64),
    pub alpha: (f64, f64, f64),
    pub gamma: f64,
    pub training_time: Duration,
    pub recorder: &'a RunRecorder,
}

impl RunSummary<'_> {
    pub fn with_training_time(self, training_time: Duration) -> Self {
        Self {
            training_time,
            ..self
        }
    }
}

impl fmt::Display for RunSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (es, ee, ed) = self.epsilon;
        let (as_, ae, ad) = self.alpha;
        writeln!(f, "epsilon: {es}, {ee}, {ed}")?;
        writeln!(f, "alpha: {as_}, {ae}, {ad}")?;
        writeln!(f, "gamma: {}", self.gamma)?;
        writeln!(f, "training_time: {}", TimeSpan(self.training_time))?;
        writeln!(f, "training_episodes: {}", self.recorder.training.len())?;
        writeln!(f, "validation_episodes: {}", self.recorder.validation.len())?;
        writeln!(f, "Training: ord, reward, win, steps")?;
        for episode in &self.recorder.training {
            writeln!(f, "{episode}")?;
        }
        writeln!(f, "Validation: ord, reward, win, steps")?;
        for episode in &self.recorder.validation {
            writeln!(f, "{episode}")?;
        }
        Ok(())
    }
}

/// `[d.]hh:mm:ss[.fffffff]`, the constant format of a .NET `TimeSpan`
struct TimeSpan(Duration);

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        let (days, hours) = (secs / 86_400, secs % 86_400 / 3_600);
        let (minutes, seconds) = (secs % 3_600 / 60, secs % 60);
        let ticks = self.0.subsec_nanos() / 100;

        if days > 0 {
            write!(f, "{days}.")?;
        }
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")?;
        if ticks > 0 {
            write!(f, ".{ticks:07}")?;
        }
        Ok(())
    }
}
