//! The visualizer: grid state, command handling and the animated search.

use std::thread;
use std::time::Duration;

use pathviz_search::{Grid, Outcome, SearchObserver, Step, search_placed};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::app::{Effect, Model, Screen};
use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::input::{self, Command, Placed};
use crate::messages::{Key, Msg};
use crate::painter::Painter;

const READY: &str = "Place the start and end with the left button, then press space";
const SEARCHING: &str = "Searching... (esc to stop)";

/// The application model driving the A* visualizer.
pub struct Visualizer {
    grid: Grid,
    painter: Painter,
    config: VizConfig,
    rng: StdRng,
    status: String,
}

impl Visualizer {
    pub fn new(config: VizConfig) -> Self {
        let grid = Grid::build(config.rows, config.width);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            painter: Painter::for_grid(&grid),
            grid,
            config,
            rng,
            status: READY.to_string(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Canvas size the visualizer draws into.
    pub fn screen_size(&self) -> (i32, i32) {
        self.painter.screen_size()
    }

    fn apply(&mut self, cmd: Command, screen: &mut Screen<'_>) -> Option<Effect> {
        match cmd {
            Command::Place(p) => match input::place(&mut self.grid, p) {
                Ok(Placed::Start) => self.status = format!("Start at {p}"),
                Ok(Placed::End) => self.status = format!("End at {p}"),
                Ok(Placed::Barrier | Placed::Unchanged) => {}
                Err(e) => log::debug!("placement rejected: {e}"),
            },
            Command::Erase(p) => {
                if let Err(e) = input::erase(&mut self.grid, p) {
                    log::debug!("erase rejected: {e}");
                }
            }
            Command::Run => return self.run_search(screen),
            Command::Rerun => {
                self.grid.clear_search();
                return Some(Effect::Send(Msg::key(Key::Space)));
            }
            Command::Clear => {
                self.grid = Grid::build(self.config.rows, self.config.width);
                self.status = READY.to_string();
            }
            Command::Scatter => {
                self.grid.clear_search();
                let n = self.grid.scatter_barriers(&mut self.rng, self.config.density);
                log::debug!("scattered {n} barriers");
                self.status = format!("Scattered {n} barriers");
            }
            // Escape only matters while a search runs; the animator handles it.
            Command::Cancel => {}
            Command::Quit => return Some(Effect::End),
        }
        None
    }

    fn run_search(&mut self, screen: &mut Screen<'_>) -> Option<Effect> {
        let mut animator = Animator::new(screen, self.painter, self.config.step_delay());
        let result = search_placed(&mut self.grid, &mut animator);
        let quit = animator.quit;
        self.status = match result {
            Ok(Outcome::PathFound(route)) => format!("Path found: {} moves", route.cost()),
            Ok(Outcome::PathNotFound) => "No path found".to_string(),
            Ok(Outcome::Cancelled) => "Search cancelled".to_string(),
            Err(e) => {
                log::debug!("search refused: {e}");
                format!("Cannot search: {e}")
            }
        };
        quit.then_some(Effect::End)
    }
}

impl Model for Visualizer {
    fn update(&mut self, msg: Msg, screen: &mut Screen<'_>) -> Option<Effect> {
        if let Msg::Screen { width, height, .. } = msg {
            log::debug!("terminal resized to {width}x{height}");
        }
        let cmd = input::translate(&msg, &self.painter)?;
        self.apply(cmd, screen)
    }

    fn draw(&self, canvas: &mut Canvas) {
        self.painter.paint(&self.grid, canvas, &self.status);
    }
}

/// Repaints after every search step and watches for input that should stop
/// the search.
struct Animator<'s, 'a> {
    screen: &'s mut Screen<'a>,
    painter: Painter,
    delay: Duration,
    cancelled: bool,
    quit: bool,
    /// Set once presenting fails; the search continues unanimated.
    broken: bool,
}

impl<'s, 'a> Animator<'s, 'a> {
    fn new(screen: &'s mut Screen<'a>, painter: Painter, delay: Duration) -> Self {
        Self {
            screen,
            painter,
            delay,
            cancelled: false,
            quit: false,
            broken: false,
        }
    }
}

impl SearchObserver for Animator<'_, '_> {
    fn on_step(&mut self, grid: &Grid, step: Step) {
        if self.broken {
            return;
        }
        let painter = self.painter;
        if let Err(e) = self.screen.present(|c| painter.paint(grid, c, SEARCHING)) {
            log::warn!("animation stopped at {step:?}: {e}");
            self.broken = true;
            return;
        }
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }

    fn should_stop(&mut self) -> bool {
        if self.broken || self.screen.context().is_done() {
            return self.cancelled || self.quit;
        }
        match self.screen.poll() {
            Ok(msgs) => {
                for msg in msgs {
                    if msg.is_quit() {
                        self.quit = true;
                    } else if let Msg::KeyDown {
                        key: Key::Escape, ..
                    } = msg
                    {
                        self.cancelled = true;
                    }
                }
            }
            Err(e) => {
                log::warn!("input polling failed during search: {e}");
                self.broken = true;
            }
        }
        self.cancelled || self.quit
    }
}
