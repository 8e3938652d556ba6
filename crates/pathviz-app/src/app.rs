//! The Elm-style application loop: [`Model`], [`Driver`], [`Effect`],
//! [`Screen`], [`App`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crate::canvas::{Canvas, compute_frame};
use crate::messages::Msg;

/// How long the main loop waits for input before polling again.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A cooperative shutdown token backed by an [`AtomicBool`].
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether shutdown has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request shutdown.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A follow-up action returned by [`Model::update`].
#[derive(Debug)]
pub enum Effect {
    /// Queue another message; it is handled after the current frame is drawn.
    Send(Msg),
    /// Stop the application loop.
    End,
}

// ---------------------------------------------------------------------------
// Model / Driver
// ---------------------------------------------------------------------------

/// The application model.
pub trait Model {
    /// Process a message, optionally returning a follow-up effect.
    ///
    /// Long-running updates may use `screen` to show intermediate frames and
    /// to check for input that should interrupt them.
    fn update(&mut self, msg: Msg, screen: &mut Screen<'_>) -> Option<Effect>;

    /// Render the current state into `canvas`.
    fn draw(&self, canvas: &mut Canvas);
}

/// Back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Wait up to `timeout` for input, then send every pending message
    /// through `tx`. Should return early once `ctx.is_done()`.
    fn poll_msgs(
        &mut self,
        ctx: &Context,
        timeout: Duration,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: crate::canvas::Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Restore the back-end to its original state.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// Access to the display from inside [`Model::update`].
pub struct Screen<'a> {
    driver: &'a mut dyn Driver,
    ctx: &'a Context,
    prev: &'a mut Canvas,
    curr: &'a mut Canvas,
}

impl<'a> Screen<'a> {
    pub fn new(
        driver: &'a mut dyn Driver,
        ctx: &'a Context,
        prev: &'a mut Canvas,
        curr: &'a mut Canvas,
    ) -> Self {
        Self {
            driver,
            ctx,
            prev,
            curr,
        }
    }

    /// Draw with `draw` and flush whatever changed since the last frame.
    pub fn present(
        &mut self,
        draw: impl FnOnce(&mut Canvas),
    ) -> Result<(), Box<dyn std::error::Error>> {
        draw(self.curr);
        let frame = compute_frame(self.prev, self.curr);
        if !frame.glyphs.is_empty() {
            self.driver.flush(frame)?;
        }
        self.prev.copy_from(self.curr);
        Ok(())
    }

    /// Collect input that is already waiting, without blocking.
    pub fn poll(&mut self) -> Result<Vec<Msg>, Box<dyn std::error::Error>> {
        let (tx, rx) = mpsc::channel();
        self.driver.poll_msgs(self.ctx, Duration::ZERO, tx)?;
        Ok(rx.try_iter().collect())
    }

    pub fn context(&self) -> &Context {
        self.ctx
    }
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
}

impl<M: Model, D: Driver> App<M, D> {
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
        }
    }

    /// Give back the model and driver, e.g. to inspect them after `run`.
    pub fn into_parts(self) -> (M, D) {
        (self.model, self.driver)
    }

    /// Run the update/draw loop.
    ///
    /// 1. Initialises the driver.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Loops: poll → update → draw → diff → flush.
    /// 4. Stops when the model returns `Effect::End`; the driver is closed on
    ///    every exit path once initialised.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;
        log::info!("app started ({}x{})", self.width, self.height);

        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init).ok();

        let mut prev = Canvas::new(self.width, self.height);
        let mut curr = Canvas::new(self.width, self.height);

        let result = self.event_loop(&ctx, &tx, &rx, &mut prev, &mut curr);
        self.driver.close();
        match &result {
            Ok(()) => log::info!("app stopped"),
            Err(e) => log::warn!("app stopped with error: {e}"),
        }
        result
    }

    fn event_loop(
        &mut self,
        ctx: &Context,
        tx: &Sender<Msg>,
        rx: &Receiver<Msg>,
        prev: &mut Canvas,
        curr: &mut Canvas,
    ) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            self.process_pending(ctx, tx, rx, prev, curr)?;
            if ctx.is_done() {
                return Ok(());
            }
            self.driver.poll_msgs(ctx, POLL_TIMEOUT, tx.clone())?;
        }
    }

    /// Drain queued messages; update and redraw after each one.
    fn process_pending(
        &mut self,
        ctx: &Context,
        tx: &Sender<Msg>,
        rx: &Receiver<Msg>,
        prev: &mut Canvas,
        curr: &mut Canvas,
    ) -> Result<(), Box<dyn std::error::Error>> {
        while let Ok(msg) = rx.try_recv() {
            let mut screen = Screen::new(&mut self.driver, ctx, prev, curr);
            let effect = self.model.update(msg, &mut screen);
            let model = &self.model;
            screen.present(|c| model.draw(c))?;
            match effect {
                Some(Effect::End) => {
                    ctx.cancel();
                    return Ok(());
                }
                Some(Effect::Send(next)) => {
                    tx.send(next).ok();
                }
                None => {}
            }
        }
        Ok(())
    }
}
