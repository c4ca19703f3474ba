use crate::browser;
use crate::resources::{Fetcher, ResourceCache};
use anyhow::{anyhow, Result};
// wasm is single threaded, so Rc<RefCell> instead of Arc<Mutex>
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref casts the closure to a js Function; we built the
    // closure ourselves so the expected type is known
    JsCast,
    JsValue,
};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

pub mod input;

use self::input::{Command, InputQueue};

/// ┌──────────────────── Tick ────────────────────┐
/// │ raf(perf) ─► delta ─► drain input            │
/// │           ─► Game::update(delta, commands)   │
/// │           ─► Game::draw(renderer)            │
/// │           ─► raf(next)                       │
/// └──────────────────────────────────────────────┘
#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    fn update(&mut self, delta: f64, commands: Vec<Command>);
    fn draw(&self, renderer: &Renderer);
}

pub struct GameLoop {
    last_frame: f64,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut game = game.initialize().await?;
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
        };
        let renderer = Renderer {
            context: browser::context()?,
        };

        let input = Rc::new(RefCell::new(InputQueue::new()));
        let keys = Rc::clone(&input);
        browser::on_keyup(move |code| keys.borrow_mut().push_key(code))?;

        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            let delta = game_loop.advance(perf);
            let commands = input.borrow_mut().drain();
            game.update(delta, commands);
            game.draw(&renderer);

            if let Some(next) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(next) {
                    log::error!("Game loop stopped : {:#}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }

    /// Seconds since the previous frame; `now` becomes the new baseline.
    /// The first frame timestamp can predate the baseline taken at start,
    /// so negative deltas clamp to zero.
    fn advance(&mut self, now: f64) -> f64 {
        let delta = ((now - self.last_frame) / 1000.0).max(0.0);
        self.last_frame = now;
        delta
    }
}

/// Fires once per elapsed `period` of accumulated frame time.
///
/// Owned by whoever ticks the time-driven entities, so restarting a round
/// just restarts the interval.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period: f64,
    elapsed: f64,
}

impl Interval {
    pub const MAX_CATCH_UP: u32 = 8;

    pub fn new(period: f64) -> Self {
        Interval {
            period,
            elapsed: 0.0,
        }
    }

    /// Add `delta` seconds and return how many whole periods completed,
    /// at most `MAX_CATCH_UP`. Time beyond that is dropped, so a page that
    /// slept for minutes does not replay every missed period.
    pub fn advance(&mut self, delta: f64) -> u32 {
        if self.period.is_nan() || self.period <= 0.0 || !delta.is_finite() {
            return 0;
        }
        self.elapsed += delta.max(0.0);
        let mut fired = 0;
        while self.elapsed >= self.period {
            if fired == Self::MAX_CATCH_UP {
                self.elapsed = 0.0;
                break;
            }
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

pub struct Rect {
    pub position: Point,
    pub size: Size,
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.position.x.into(),
            rect.position.y.into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    /// Blit `image` unscaled with its top left corner at `position`.
    pub fn draw_image(&self, image: &HtmlImageElement, position: &Point) {
        if let Err(err) = self.context.draw_image_with_html_image_element(
            image,
            position.x.into(),
            position.y.into(),
        ) {
            log::error!("Could not draw {} : {:#?}", image.src(), err);
        }
    }
}

/// Load an image element from `source`.
///
/// Resolves once the browser fires `load`, or fails with an error naming
/// `source` on `error`. Both handlers are detached again before returning.
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::create_html_image_element()?;
    let (tx, rx) = channel::<Result<()>>();
    let tx = RefCell::new(Some(tx));
    // onload and onerror race; whichever fires first wins
    let settle = Rc::new(move |result: Result<()>| {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(result);
        }
    });

    let on_load = browser::closure_once({
        let settle = Rc::clone(&settle);
        move || (*settle)(Ok(()))
    });
    let on_error = browser::closure_once({
        let settle = Rc::clone(&settle);
        let source = source.to_owned();
        move |err: JsValue| (*settle)(Err(anyhow!("Could not load image {} : {:?}", source, err)))
    });

    image.set_onload(Some(on_load.as_ref().unchecked_ref()));
    image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    image.set_src(source);

    let loaded = rx
        .await
        .map_err(|_| anyhow!("Image load for {} was dropped", source));
    image.set_onload(None);
    image.set_onerror(None);
    drop((on_load, on_error));

    // outer: channel, inner: the load itself
    loaded??;
    Ok(image)
}

/// Feeds a [`ResourceCache`] from `<img>` loads on the local executor.
pub struct ImageFetcher;

impl Fetcher for ImageFetcher {
    type Image = HtmlImageElement;

    fn fetch(&self, source: &str, cache: ResourceCache<Self>) {
        let source = source.to_owned();
        browser::spawn_local(async move {
            let result = load_image(&source).await;
            cache.complete(&source, result);
        });
    }
}

pub type ImageCache = ResourceCache<ImageFetcher>;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn advance_reports_seconds_and_moves_baseline() {
        let mut game_loop = GameLoop { last_frame: 1000.0 };

        assert_relative_eq!(game_loop.advance(1016.0), 0.016);
        assert_relative_eq!(game_loop.advance(1050.0), 0.034);
    }

    #[test]
    fn advance_clamps_frames_older_than_baseline() {
        let mut game_loop = GameLoop { last_frame: 500.0 };

        assert_relative_eq!(game_loop.advance(499.5), 0.0);
        assert_relative_eq!(game_loop.advance(509.5), 0.01);
    }

    #[test]
    fn interval_fires_only_on_whole_periods() {
        let mut interval = Interval::new(1.0);

        for _ in 0..59 {
            assert_eq!(interval.advance(1.0 / 60.0), 0);
        }
        assert_eq!(interval.advance(0.02), 1);
        assert_eq!(interval.advance(0.5), 0);
    }

    #[test]
    fn interval_catches_up_after_long_frame() {
        let mut interval = Interval::new(1.0);

        assert_eq!(interval.advance(3.25), 3);
        assert_eq!(interval.advance(0.75), 1);
    }

    #[test]
    fn catch_up_is_capped_after_a_long_sleep() {
        let mut interval = Interval::new(1.0);

        assert_eq!(interval.advance(600.0), Interval::MAX_CATCH_UP);
        assert_eq!(interval.advance(0.5), 0);
    }

    #[test]
    fn tiny_period_fires_a_bounded_number_of_times() {
        let mut interval = Interval::new(1e-9);

        assert_eq!(interval.advance(0.016), Interval::MAX_CATCH_UP);
    }

    #[test]
    fn non_positive_period_never_fires() {
        let mut zero = Interval::new(0.0);
        let mut negative = Interval::new(-1.0);

        assert_eq!(zero.advance(5.0), 0);
        assert_eq!(negative.advance(5.0), 0);
    }

    #[test]
    fn restart_discards_partial_period() {
        let mut interval = Interval::new(1.0);
        interval.advance(0.9);
        interval.restart();

        assert_eq!(interval.advance(0.5), 0);
        assert_eq!(interval.advance(0.5), 1);
    }
}
