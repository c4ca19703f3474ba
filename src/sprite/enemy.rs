use super::{Cell, Kind, Sprite, COLUMNS};
use crate::game::assets;
use rand::Rng;

// stone rows enemies may spawn on
const TOP_LANE: i32 = 1;
const BOTTOM_LANE: i32 = 3;

/// Horizontal direction an enemy travels in, fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    fn column_delta(self) -> i32 {
        match self {
            Heading::Right => 1,
            Heading::Left => -1,
        }
    }

    /// Enemies enter from the edge they move away from.
    fn start_column(self) -> i32 {
        match self {
            Heading::Right => 0,
            Heading::Left => COLUMNS - 1,
        }
    }
}

impl Sprite {
    pub fn enemy(rng: &mut impl Rng) -> Self {
        let row = rng.gen_range(TOP_LANE..=BOTTOM_LANE);
        let heading = if rng.gen_bool(0.5) {
            Heading::Right
        } else {
            Heading::Left
        };

        Sprite {
            image: assets::ENEMY,
            cell: Cell {
                column: heading.start_column(),
                row,
            },
            kind: Kind::Enemy(heading),
        }
    }

    /// Move one column along the heading. Columns keep going past the
    /// visible grid without wrapping; they only stop at the `i32` limits.
    /// No effect on the player.
    pub fn step(&mut self) {
        if let Kind::Enemy(heading) = self.kind {
            self.cell.column = self.cell.column.saturating_add(heading.column_delta());
        }
    }
}
