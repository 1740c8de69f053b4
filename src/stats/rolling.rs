use crate::ds::RingBuffer;

/// `(reward, win)` of the last N episodes, oldest overwritten first
#[derive(Debug, Clone)]
pub struct RollingWindow {
    buffer: RingBuffer<(f64, bool)>,
}

impl RollingWindow {
    /// **Panics** if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: RingBuffer::new(capacity),
        }
    }

    pub fn push(&mut self, reward: f64, win: bool) {
        self.buffer.push((reward, win));
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Entries from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = (f64, bool)> + '_ {
        self.buffer.iter().copied()
    }

    pub fn wins(&self) -> usize {
        self.iter().filter(|&(_, win)| win).count()
    }

    pub fn losses(&self) -> usize {
        self.len() - self.wins()
    }

    /// Mean reward over the stored episodes, `None` while empty
    pub fn mean_reward(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.iter().map(|(r, _)| r).sum::<f64>() / self.len() as f64)
    }

    /// Fraction of stored episodes that were wins, `None` while empty
    pub fn win_rate(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.wins() as f64 / self.len() as f64)
    }

    /// Wins per loss, `None` (undefined) while there are no losses
    pub fn win_loss_ratio(&self) -> Option<f64> {
        let losses = self.losses();
        (losses > 0).then(|| self.wins() as f64 / losses as f64)
    }
}
