//! One round of play: the player, the current enemy set and the interval
//! that steps the enemies. Everything here is plain data, no browser types.

use crate::engine::input::Command;
use crate::engine::Interval;
use crate::settings::Settings;
use crate::sprite::{Direction, Sprite};
use rand::rngs::SmallRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Playing,
    /// player reached the water row
    Won,
    /// an enemy shares the player's cell
    Lost,
}

pub struct Round {
    player: Sprite,
    enemies: Vec<Sprite>,
    steps: Interval,
    rng: SmallRng,
    enemy_count: usize,
    player_time_scale: f64,
    allow_reset: bool,
}

impl Round {
    pub fn new(settings: &Settings, mut rng: SmallRng) -> Self {
        let enemies = spawn_enemies(settings.enemy_count, &mut rng);
        Round {
            player: Sprite::player(),
            enemies,
            steps: Interval::new(settings.enemy_step_seconds),
            rng,
            enemy_count: settings.enemy_count,
            player_time_scale: settings.player_time_scale,
            allow_reset: settings.allow_reset,
        }
    }

    pub fn player(&self) -> &Sprite {
        &self.player
    }

    pub fn enemies(&self) -> &[Sprite] {
        &self.enemies
    }

    /// Replace the player and the whole enemy set, and restart the step
    /// interval so fresh enemies wait a full period before moving.
    pub fn reset(&mut self) {
        self.player = Sprite::player();
        self.enemies = spawn_enemies(self.enemy_count, &mut self.rng);
        self.steps.restart();
    }

    /// Apply one input command. Returns `false` when it was rejected:
    /// a move off the grid, or a reset while resets are disabled.
    pub fn handle(&mut self, command: Command) -> bool {
        let direction = match command {
            Command::Up => Direction::Up,
            Command::Down => Direction::Down,
            Command::Left => Direction::Left,
            Command::Right => Direction::Right,
            Command::Reset => {
                if self.allow_reset {
                    log::info!("Round reset by player");
                    self.reset();
                }
                return self.allow_reset;
            }
        };

        if self.player.can_move(direction) {
            self.player.move_towards(direction);
            true
        } else {
            false
        }
    }

    /// Advance the round by `delta` seconds, then check for a win or loss.
    /// Either outcome resets the round before returning.
    pub fn update(&mut self, delta: f64) -> Outcome {
        for enemy in &mut self.enemies {
            enemy.update(delta);
        }
        self.player.update(delta * self.player_time_scale);

        for _ in 0..self.steps.advance(delta) {
            for enemy in &mut self.enemies {
                enemy.step();
            }
        }

        let outcome = self.outcome();
        match outcome {
            Outcome::Won => {
                log::info!("Round won");
                self.reset();
            }
            Outcome::Lost => {
                log::info!("Round lost at {:?}", self.player.cell());
                self.reset();
            }
            Outcome::Playing => {}
        }
        outcome
    }

    pub fn outcome(&self) -> Outcome {
        let player = self.player.cell();
        if player.row == 0 {
            Outcome::Won
        } else if self.enemies.iter().any(|enemy| enemy.cell() == player) {
            Outcome::Lost
        } else {
            Outcome::Playing
        }
    }
}

fn spawn_enemies(count: usize, rng: &mut SmallRng) -> Vec<Sprite> {
    (0..count).map(|_| Sprite::enemy(&mut *rng)).collect()
}
