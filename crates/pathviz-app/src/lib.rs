//! **pathviz-app**: the interactive front end of the A* visualizer.
//!
//! This crate holds everything between a terminal back-end and the search
//! engine: input events, a glyph canvas with frame diffing, the Elm-style
//! application loop, the painter that colours cells, the input adapter, and
//! the [`Visualizer`] model tying them together.

pub mod app;
pub mod canvas;
pub mod config;
pub mod input;
pub mod logger;
pub mod messages;
pub mod model;
pub mod painter;
pub mod style;

pub use app::{App, AppConfig, Context, Driver, Effect, Model, POLL_TIMEOUT, Screen};
pub use canvas::{Canvas, Frame, FrameGlyph, Glyph, compute_frame};
pub use config::{ConfigError, MAX_ROWS, MAX_WIDTH, VizConfig};
pub use input::{Command, Placed};
pub use messages::*;
pub use model::Visualizer;
pub use painter::{HELP, Painter, Shade};
pub use style::{Color, Style};
