use super::{Cell, Kind, Sprite, COLUMNS, ROWS};
use crate::game::assets;

const START: Cell = Cell { column: 2, row: 5 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Sprite {
    pub fn player() -> Self {
        Sprite {
            image: assets::PLAYER,
            cell: START,
            kind: Kind::Player,
        }
    }

    // The single step moves do not check bounds; callers ask can_move first.

    pub fn up(&mut self) {
        self.cell.row -= 1;
    }

    pub fn down(&mut self) {
        self.cell.row += 1;
    }

    pub fn left(&mut self) {
        self.cell.column -= 1;
    }

    pub fn right(&mut self) {
        self.cell.column += 1;
    }

    /// Whether one step towards `direction` stays on the grid.
    pub fn can_move(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.cell.row > 0,
            Direction::Down => self.cell.row < ROWS - 1,
            Direction::Left => self.cell.column > 0,
            Direction::Right => self.cell.column < COLUMNS - 1,
        }
    }

    pub fn move_towards(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.up(),
            Direction::Down => self.down(),
            Direction::Left => self.left(),
            Direction::Right => self.right(),
        }
    }
}
