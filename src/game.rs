use crate::engine::input::Command;
use crate::engine::{Game, ImageCache, ImageFetcher, Point, Rect, Renderer, Size};
use crate::round::Round;
use crate::settings::Settings;
use crate::sprite::{Cell, COLUMNS};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// ┌──────────────────────── Board Layout ─────────────────────────┐
/// │ row 0 │ water │ goal row, reaching it wins the round          │
/// │ row 1 │ stone │                                               │
/// │ row 2 │ stone │ enemy lanes                                   │
/// │ row 3 │ stone │                                               │
/// │ row 4 │ grass │                                               │
/// │ row 5 │ grass │ player starts at column 2                     │
/// └───────┴───────┴───────────────────────────────────────────────┘
pub mod assets {
    pub const STONE: &str = "images/stone-block.png";
    pub const WATER: &str = "images/water-block.png";
    pub const GRASS: &str = "images/grass-block.png";
    pub const ENEMY: &str = "images/enemy-bug.png";
    pub const PLAYER: &str = "images/char-boy.png";

    /// everything the first frame needs
    pub const ALL: [&str; 5] = [STONE, WATER, GRASS, ENEMY, PLAYER];

    /// terrain tile for each row, top to bottom
    pub const ROW_TILES: [&str; 6] = [WATER, STONE, STONE, STONE, GRASS, GRASS];
}

pub const CANVAS_WIDTH: u32 = 505;
pub const CANVAS_HEIGHT: u32 = 606;

pub enum Crossing {
    /// Waiting for every image in `assets::ALL`
    Loading(Settings),

    /// Images are cached and a round is in progress
    Loaded(Board),
}

pub struct Board {
    images: ImageCache,
    round: Round,
}

impl Crossing {
    pub fn new(settings: Settings) -> Self {
        Crossing::Loading(settings)
    }
}

#[async_trait(?Send)]
impl Game for Crossing {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            Crossing::Loading(settings) => {
                let images = ImageCache::new(ImageFetcher);
                images.load(&assets::ALL);
                images
                    .ready()
                    .await
                    .context("Failed to load game images")?;

                let round = Round::new(settings, SmallRng::from_entropy());
                log::info!(
                    "Round started with {} enemies",
                    round.enemies().len()
                );
                Ok(Box::new(Crossing::Loaded(Board { images, round })))
            }
            Crossing::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, delta: f64, commands: Vec<Command>) {
        if let Crossing::Loaded(board) = self {
            for command in commands {
                if !board.round.handle(command) {
                    log::debug!("Ignored {:?} at {:?}", command, board.round.player().cell());
                }
            }
            board.round.update(delta);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let Crossing::Loaded(board) = self {
            renderer.clear(&Rect {
                position: Point { x: 0, y: 0 },
                size: Size {
                    width: CANVAS_WIDTH as i32,
                    height: CANVAS_HEIGHT as i32,
                },
            });
            // draw order matters : terrain -> enemies -> player
            board.draw_terrain(renderer);
            for enemy in board.round.enemies() {
                enemy.draw(renderer, &board.images);
            }
            board.round.player().draw(renderer, &board.images);
        }
    }
}

impl Board {
    fn draw_terrain(&self, renderer: &Renderer) {
        for (row, tile) in (0..).zip(assets::ROW_TILES) {
            let Some(image) = self.images.get(tile) else {
                continue;
            };
            for column in 0..COLUMNS {
                renderer.draw_image(&image, &Cell { column, row }.tile_position());
            }
        }
    }
}
