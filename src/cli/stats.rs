use std::collections::HashMap;
use std::time::Duration;

use crate::game::state::{GameStatus, LossCause};
use crate::game::Game;
use crate::game::sink::GameLog;

#[derive(Debug, Default, Clone)]
pub struct GameStats {
    pub games: u32,
    pub wins: u32,
    pub losses: HashMap<LossCause, u32>,
    pub unfinished: u32,
    pub total_steps: u64,
    pub total_turns: u64,
    pub total_incidents: u64,
    pub total_duration: Duration,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game<L: GameLog>(&mut self, game: &Game<L>, duration: Duration) {
        self.games += 1;
        self.total_duration += duration;
        self.total_turns += u64::from(game.state.turn);
        self.total_steps += game.state.history.len() as u64;
        self.total_incidents += u64::from(game.state.incidents.count());

        match game.state.status {
            GameStatus::Won => self.wins += 1,
            GameStatus::Lost { cause } => *self.losses.entry(cause).or_insert(0) += 1,
            GameStatus::Playing => self.unfinished += 1,
        }
    }

    pub fn merge(&mut self, other: GameStats) {
        self.games += other.games;
        self.wins += other.wins;
        for (cause, count) in other.losses {
            *self.losses.entry(cause).or_insert(0) += count;
        }
        self.unfinished += other.unfinished;
        self.total_steps += other.total_steps;
        self.total_turns += other.total_turns;
        self.total_incidents += other.total_incidents;
        self.total_duration += other.total_duration;
    }

    fn average(&self, total: u64) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        total as f64 / self.games as f64
    }

    pub fn get_avg_steps(&self) -> f64 {
        self.average(self.total_steps)
    }

    pub fn get_avg_turns(&self) -> f64 {
        self.average(self.total_turns)
    }

    pub fn get_avg_incidents(&self) -> f64 {
        self.average(self.total_incidents)
    }

    pub fn get_avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }
}
