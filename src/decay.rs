use crate::error::{Error, Result};

/// An implementation of a value that changes with the number of finished episodes
pub trait Decay {
    /// Calculate value after `t` finished episodes
    fn evaluate(&self, t: f64) -> f64;

    /// The `(start, end, decay)` triple reported in run summaries
    fn params(&self) -> (f64, f64, f64);
}

fn validate_values(start: f64, end: f64) -> Result<()> {
    (start.is_finite() && end.is_finite())
        .then_some(())
        .ok_or_else(|| Error::InvalidSchedule {
            reason: format!("start ({start}) and end ({end}) must be finite"),
        })
}

/// A constant value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f64) -> f64 {
        self.value
    }

    fn params(&self) -> (f64, f64, f64) {
        (self.value, self.value, 0.0)
    }
}

/// v(t) = v<sub>s</sub> + (v<sub>e</sub> - v<sub>s</sub>) * min(t / n, 1)
///
/// Interpolates over a budget of `n` episodes, then holds at the end value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linear {
    start: f64,
    end: f64,
    episodes: u32,
}

impl Linear {
    pub fn new(start: f64, end: f64, episodes: u32) -> Result<Self> {
        validate_values(start, end)?;
        if episodes == 0 {
            return Err(Error::InvalidSchedule {
                reason: String::from("linear schedule needs a horizon of at least one episode"),
            });
        }
        Ok(Self {
            start,
            end,
            episodes,
        })
    }
}

impl Decay for Linear {
    fn evaluate(&self, t: f64) -> f64 {
        let &Self {
            start,
            end,
            episodes,
        } = self;
        let progress = (t / episodes as f64).max(0.0);
        if progress >= 1.0 {
            return end;
        }
        start + (end - start) * progress
    }

    fn params(&self) -> (f64, f64, f64) {
        (self.start, self.end, self.episodes as f64)
    }
}

/// v(t) = v<sub>e</sub> + (v<sub>s</sub> - v<sub>e</sub>) * (1 - d)<sup>t</sup>
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    start: f64,
    end: f64,
    decay: f64,
}

impl Exponential {
    pub fn new(start: f64, end: f64, decay: f64) -> Result<Self> {
        validate_values(start, end)?;
        if !(0.0..=1.0).contains(&decay) {
            return Err(Error::InvalidSchedule {
                reason: format!("decay factor {decay} must be in the interval [0, 1]"),
            });
        }
        Ok(Self { start, end, decay })
    }
}

impl Decay for Exponential {
    fn evaluate(&self, t: f64) -> f64 {
        let &Self { start, end, decay } = self;
        end + (start - end) * (1.0 - decay).powf(t.max(0.0))
    }

    fn params(&self) -> (f64, f64, f64) {
        (self.start, self.end, self.decay)
    }
}

/// Any of the supported schedules, so ε and α can be configured independently
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Schedule {
    Constant(Constant),
    Linear(Linear),
    Exponential(Exponential),
}

impl Decay for Schedule {
    fn evaluate(&self, t: f64) -> f64 {
        match self {
            Schedule::Constant(s) => s.evaluate(t),
            Schedule::Linear(s) => s.evaluate(t),
            Schedule::Exponential(s) => s.evaluate(t),
        }
    }

    fn params(&self) -> (f64, f64, f64) {
        match self {
            Schedule::Constant(s) => s.params(),
            Schedule::Linear(s) => s.params(),
            Schedule::Exponential(s) => s.params(),
        }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::Constant(Constant::default())
    }
}

impl From<Constant> for Schedule {
    fn from(value: Constant) -> Self {
        Schedule::Constant(value)
    }
}

impl From<Linear> for Schedule {
    fn from(value: Linear) -> Self {
        Schedule::Linear(value)
    }
}

impl From<Exponential> for Schedule {
    fn from(value: Exponential) -> Self {
        Schedule::Exponential(value)
    }
}
