//! Predecessor links and route reconstruction.

use crate::cell::SearchTag;
use crate::grid::Grid;
use crate::observer::{SearchObserver, Step};
use crate::pos::Pos;

/// Predecessor of each cell on the best route found so far.
///
/// The links form a forest rooted at the search start: a link is only
/// replaced when it lowers the cell's cost, so no cycle can form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameFrom {
    size: i32,
    links: Vec<Option<usize>>,
}

impl CameFrom {
    /// No links, for a `size × size` grid.
    pub fn new(size: i32) -> Self {
        let n = size.max(0) as usize;
        Self {
            size,
            links: vec![None; n * n],
        }
    }

    /// Predecessor of `p`, if one was recorded.
    pub fn get(&self, p: Pos) -> Option<Pos> {
        self.index(p)
            .and_then(|i| self.links[i])
            .map(|j| self.pos(j))
    }

    /// Number of cells with a predecessor.
    pub fn len(&self) -> usize {
        self.links.iter().filter(|l| l.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(cell, predecessor)` pairs in row-major order of the cell.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Pos)> + '_ {
        self.links
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.map(|j| (self.pos(i), self.pos(j))))
    }

    #[inline]
    pub(crate) fn link(&mut self, idx: usize, from: usize) {
        self.links[idx] = Some(from);
    }

    #[inline]
    pub(crate) fn parent(&self, idx: usize) -> Option<usize> {
        self.links.get(idx).copied().flatten()
    }

    fn index(&self, p: Pos) -> Option<usize> {
        if p.row < 0 || p.col < 0 || p.row >= self.size || p.col >= self.size {
            return None;
        }
        Some(p.row as usize * self.size as usize + p.col as usize)
    }

    fn pos(&self, idx: usize) -> Pos {
        let n = self.size as usize;
        Pos::new((idx / n) as i32, (idx % n) as i32)
    }
}

/// Walk `came_from` from `end` back towards the start.
///
/// Returns the route from `end` back to, but excluding, the start cell. Each
/// visited cell is tagged [`SearchTag::Path`] and reported to `observer` as
/// [`Step::Traced`]. The result is empty when `end` has no predecessor.
pub fn reconstruct<O: SearchObserver + ?Sized>(
    grid: &mut Grid,
    came_from: &CameFrom,
    end: Pos,
    observer: &mut O,
) -> Vec<Pos> {
    let mut route = Vec::new();
    let Some(mut ci) = grid.idx(end) else {
        return route;
    };
    while let Some(prev) = came_from.parent(ci) {
        let p = grid.pos_of(ci);
        route.push(p);
        grid.tag_at(ci, SearchTag::Path);
        observer.on_step(grid, Step::Traced(p));
        ci = prev;
    }
    route
}

/// A found route with its cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    cells: Vec<Pos>,
    cost: u32,
}

impl Route {
    pub(crate) fn new(cells: Vec<Pos>, cost: u32) -> Self {
        Self { cells, cost }
    }

    /// Cells from the end back to the cell next to the start.
    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    /// Cells walked from the cell next to the start up to the end.
    pub fn forward(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells.iter().rev().copied()
    }

    /// Total cost, which equals the number of moves on a unit-cost grid.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Number of moves from start to end.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
