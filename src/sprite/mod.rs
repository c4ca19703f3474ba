// ┌────────────────────────── Sprite Layout ──────────────────────────┐
// │ File        │ Contents                                            │
// ├─────────────┼─────────────────────────────────────────────────────┤
// │ mod.rs      │ Sprite (shared shape), Cell, Kind, grid → pixels    │
// │ enemy.rs    │ Heading, Sprite::enemy(), step()                    │
// │ player.rs   │ Direction, Sprite::player(), up/down/left/right     │
// └─────────────┴─────────────────────────────────────────────────────┘
//
// Player and enemies are one struct tagged with a Kind rather than two
// types: they share image, cell, update and draw, and differ only in
// what moves them (input vs the round's step interval).

pub mod enemy;
pub mod player;

use crate::engine::{ImageCache, Point, Renderer};

pub use self::enemy::Heading;
pub use self::player::Direction;

pub const COLUMNS: i32 = 5;
pub const ROWS: i32 = 6;

// pixel size of one grid cell
pub const COLUMN_WIDTH: i32 = 101;
pub const ROW_HEIGHT: i32 = 83;
// sprites sit higher than the tile they stand on
const SPRITE_OFFSET: i32 = -40;

/// Grid coordinates. Column 0 is leftmost, row 0 is the top (water) row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub column: i32,
    pub row: i32,
}

impl Cell {
    /// Top left corner of the terrain tile drawn for this cell.
    pub fn tile_position(&self) -> Point {
        Point {
            x: self.column * COLUMN_WIDTH,
            y: self.row * ROW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Enemy(Heading),
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    image: &'static str,
    cell: Cell,
    kind: Kind,
}

impl Sprite {
    pub fn image(&self) -> &'static str {
        self.image
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn pixel_position(&self) -> Point {
        let tile = self.cell.tile_position();
        Point {
            x: tile.x,
            y: tile.y + SPRITE_OFFSET,
        }
    }

    /// Per frame hook. Neither kind moves with frame time: enemies step on
    /// the round's interval and the player moves on input only.
    pub fn update(&mut self, _delta: f64) {}

    /// Draws nothing until the image is in the cache.
    pub fn draw(&self, renderer: &Renderer, images: &ImageCache) {
        if let Some(image) = images.get(self.image) {
            renderer.draw_image(&image, &self.pixel_position());
        }
    }
}
