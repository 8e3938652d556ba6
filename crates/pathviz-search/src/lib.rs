//! A* shortest-path search on square, 4-connected grids.
//!
//! The crate is the algorithmic core of the *pathviz* visualizer:
//!
//! - [`Grid`] owns the [`Cell`]s, enforces placement of start, end and
//!   barriers, and computes adjacency.
//! - [`manhattan`] is the heuristic.
//! - [`Frontier`] orders discovered cells by `(f_score, insertion order)`.
//! - [`Search`] / [`search`] run A* and report an [`Outcome`].
//! - [`reconstruct`] turns predecessor links into a [`Route`].
//!
//! A search reports its progress through a [`SearchObserver`], which is how a
//! front-end animates the frontier and how it asks a long search to stop.
//!
//! ```
//! use pathviz_search::{Grid, Outcome, Pos, Quiet, search_placed};
//!
//! let mut grid = Grid::from_layout(
//!     "
//!     S..
//!     .#.
//!     ..E
//!     ",
//! )
//! .unwrap();
//! let outcome = search_placed(&mut grid, &mut Quiet).unwrap();
//! let Outcome::PathFound(route) = outcome else { panic!() };
//! assert_eq!(route.len(), 4);
//! assert_eq!(route.cells()[0], Pos::new(2, 2));
//! ```

mod astar;
mod cell;
mod error;
mod frontier;
mod grid;
mod heuristic;
mod observer;
mod pos;
mod reconstruct;

pub use astar::{Outcome, STEP_COST, Search, UNREACHABLE, search, search_placed};
pub use cell::{Cell, CellState, Role, SearchTag};
pub use error::{GridError, SearchError};
pub use frontier::{Entry, Frontier};
pub use grid::Grid;
pub use heuristic::manhattan;
pub use observer::{Quiet, SearchObserver, Step};
pub use pos::Pos;
pub use reconstruct::{CameFrom, Route, reconstruct};
