/// Running scalars a text display reads between steps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scoreboard {
    episodes: u32,
    wins: u32,
    losses: u32,
    current_reward: f64,
    expected_reward: f64,
    last_reward: Option<f64>,
    best_reward: Option<f64>,
    total_reward: f64,
}

impl Scoreboard {
    pub fn episodes(&self) -> u32 {
        self.episodes
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    /// Reward accumulated so far in the running episode
    pub fn current_reward(&self) -> f64 {
        self.current_reward
    }

    /// Value of the last greedy choice
    pub fn expected_reward(&self) -> f64 {
        self.expected_reward
    }

    /// Reward so far plus the value of the last greedy choice
    pub fn expected_return(&self) -> f64 {
        self.current_reward + self.expected_reward
    }

    pub fn last_reward(&self) -> Option<f64> {
        self.last_reward
    }

    pub fn best_reward(&self) -> Option<f64> {
        self.best_reward
    }

    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    pub fn mean_reward(&self) -> Option<f64> {
        (self.episodes > 0).then(|| self.total_reward / self.episodes as f64)
    }

    /// Wins per loss, `None` (undefined) until the first loss
    pub fn win_loss_ratio(&self) -> Option<f64> {
        (self.losses > 0).then(|| self.wins as f64 / self.losses as f64)
    }

    pub(crate) fn add_step_reward(&mut self, reward: f64) {
        self.current_reward += reward;
    }

    pub(crate) fn set_expected(&mut self, value: f64) {
        self.expected_reward = value;
    }

    pub(crate) fn finish(&mut self, reward: f64, win: bool) {
        self.episodes += 1;
        if win {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.last_reward = Some(reward);
        if self.best_reward.map_or(true, |best| reward > best) {
            self.best_reward = Some(reward);
        }
        self.total_reward += reward;
        self.current_reward = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_episodes() {
        let mut board = Scoreboard::default();
        assert_eq!(board.best_reward(), None);
        assert_eq!(board.mean_reward(), None);

        board.add_step_reward(-0.5);
        board.add_step_reward(3.0);
        board.set_expected(1.0);
        assert_eq!(board.current_reward(), 2.5);
        assert_eq!(board.expected_return(), 3.5);

        board.finish(2.5, true);
        assert_eq!(board.current_reward(), 0.0, "cleared for the next episode");
        assert_eq!(board.win_loss_ratio(), None, "undefined without losses");

        board.finish(-4.0, false);
        board.finish(-1.0, false);
        assert_eq!((board.episodes(), board.wins(), board.losses()), (3, 1, 2));
        assert_eq!(board.last_reward(), Some(-1.0));
        assert_eq!(board.best_reward(), Some(2.5));
        assert_eq!(board.total_reward(), -2.5);
        assert_eq!(board.win_loss_ratio(), Some(0.5));
    }
}
