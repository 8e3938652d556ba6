use crate::grid::Grid;
use crate::pos::Pos;

/// One observable step of a search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// A cell was popped from the frontier and its neighbours relaxed.
    Expanded(Pos),
    /// A cell was added to the reconstructed route.
    Traced(Pos),
}

/// Hooks the search engine calls back into while it runs.
///
/// The engine never depends on what an observer does; observers exist to
/// repaint and to let the caller stop a long search.
pub trait SearchObserver {
    /// Called once per expansion and once per reconstruction step.
    fn on_step(&mut self, grid: &Grid, step: Step);

    /// Polled at the top of every expansion. Returning `true` ends the search
    /// with [`Outcome::Cancelled`](crate::Outcome::Cancelled).
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// An observer that ignores every step and never stops the search.
#[derive(Copy, Clone, Debug, Default)]
pub struct Quiet;

impl SearchObserver for Quiet {
    fn on_step(&mut self, _grid: &Grid, _step: Step) {}
}

impl<F: FnMut(&Grid, Step)> SearchObserver for F {
    fn on_step(&mut self, grid: &Grid, step: Step) {
        self(grid, step)
    }
}
