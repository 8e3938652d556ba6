//! The [`Grid`] model: an `n × n` square of [`Cell`]s with 4-connected
//! adjacency.
//!
//! The grid is the single owner of every cell. Roles (start, end, barriers)
//! are edited through the methods here so that the placement invariants hold:
//! at most one start, at most one end, and never a barrier on either.

use std::fmt;

use rand::Rng;

use crate::cell::{Cell, CellState, Role, SearchTag};
use crate::error::GridError;
use crate::pos::Pos;

/// A square grid of cells stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: i32,
    cell_width: i32,
    cells: Vec<Cell>,
    start: Option<Pos>,
    end: Option<Pos>,
}

impl Grid {
    /// Build an `n × n` grid of fresh cells spanning `width` screen units.
    ///
    /// Each cell is `width / n` units wide. Both values are clamped to at
    /// least 1.
    pub fn build(n: i32, width: i32) -> Self {
        let size = n.max(1);
        let cell_width = (width / size).max(1);
        let n = size as usize;
        let mut cells = Vec::with_capacity(n * n);
        for row in 0..size {
            for col in 0..size {
                cells.push(Cell::new(Pos::new(row, col)));
            }
        }
        Self {
            size,
            cell_width,
            cells,
            start: None,
            end: None,
        }
    }

    /// Parse a square text layout.
    ///
    /// `.` is an empty cell, `#` a barrier, `S` the start and `E` the end.
    /// Surrounding whitespace is trimmed from the whole text and from each
    /// line.
    pub fn from_layout(text: &str) -> Result<Self, GridError> {
        let lines: Vec<&str> = text.trim().lines().map(str::trim).collect();
        let n = lines.len() as i32;
        if n == 0 || lines.iter().any(|l| l.chars().count() as i32 != n) {
            return Err(GridError::InconsistentSize(text.trim().to_string()));
        }
        let mut grid = Self::build(n, n);
        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let pos = Pos::new(row as i32, col as i32);
                match ch {
                    '.' => {}
                    '#' => grid.set_barrier(pos)?,
                    'S' if grid.start.is_some() => {
                        return Err(GridError::DuplicateRole {
                            role: Role::Start,
                            pos,
                        });
                    }
                    'E' if grid.end.is_some() => {
                        return Err(GridError::DuplicateRole {
                            role: Role::End,
                            pos,
                        });
                    }
                    'S' => grid.set_start(pos)?,
                    'E' => grid.set_end(pos)?,
                    _ => return Err(GridError::InvalidChar { ch, pos }),
                }
            }
        }
        Ok(grid)
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Screen width of one cell.
    #[inline]
    pub fn cell_width(&self) -> i32 {
        self.cell_width
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.row >= 0 && p.col >= 0 && p.row < self.size && p.col < self.size
    }

    #[inline]
    pub fn start(&self) -> Option<Pos> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Option<Pos> {
        self.end
    }

    /// The cell at `p`, or `None` outside the grid.
    pub fn cell(&self, p: Pos) -> Option<&Cell> {
        self.idx(p).map(|i| &self.cells[i])
    }

    /// Row-major iterator over all cells.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Combined state of the cell at `p`.
    pub fn state(&self, p: Pos) -> Option<CellState> {
        self.cell(p).map(Cell::state)
    }

    // -----------------------------------------------------------------------
    // Adjacency
    // -----------------------------------------------------------------------

    /// Up to four in-bounds, non-barrier neighbours of `p`, computed from the
    /// current barrier layout (down, up, right, left).
    pub fn neighbors_of(&self, p: Pos) -> Vec<Pos> {
        if !self.contains(p) {
            return Vec::new();
        }
        p.neighbors_4()
            .into_iter()
            .filter(|&n| self.cell(n).is_some_and(|c| !c.is_barrier()))
            .collect()
    }

    /// Refresh every cell's cached adjacency from the current barriers.
    pub fn update_neighbors(&mut self) {
        for i in 0..self.cells.len() {
            let n = self.neighbors_of(self.cells[i].pos());
            self.cells[i].set_neighbors(n);
        }
    }

    // -----------------------------------------------------------------------
    // Role editing
    // -----------------------------------------------------------------------

    /// Place the start at `p`, vacating the previous start.
    ///
    /// A barrier at `p` is replaced; the end cell cannot become the start.
    pub fn set_start(&mut self, p: Pos) -> Result<(), GridError> {
        let i = self.idx(p).ok_or(GridError::OutOfBounds(p))?;
        match self.cells[i].role() {
            Role::Start => return Ok(()),
            Role::End => return Err(conflict(p, Role::End, Role::Start)),
            Role::Empty | Role::Barrier => {}
        }
        if let Some(old) = self.start.take().and_then(|o| self.idx(o)) {
            self.cells[old].set_role(Role::Empty);
        }
        self.cells[i].set_role(Role::Start);
        self.start = Some(p);
        Ok(())
    }

    /// Place the end at `p`, vacating the previous end.
    pub fn set_end(&mut self, p: Pos) -> Result<(), GridError> {
        let i = self.idx(p).ok_or(GridError::OutOfBounds(p))?;
        match self.cells[i].role() {
            Role::End => return Ok(()),
            Role::Start => return Err(conflict(p, Role::Start, Role::End)),
            Role::Empty | Role::Barrier => {}
        }
        if let Some(old) = self.end.take().and_then(|o| self.idx(o)) {
            self.cells[old].set_role(Role::Empty);
        }
        self.cells[i].set_role(Role::End);
        self.end = Some(p);
        Ok(())
    }

    /// Turn the cell at `p` into a barrier.
    pub fn set_barrier(&mut self, p: Pos) -> Result<(), GridError> {
        let i = self.idx(p).ok_or(GridError::OutOfBounds(p))?;
        match self.cells[i].role() {
            r @ (Role::Start | Role::End) => Err(conflict(p, r, Role::Barrier)),
            Role::Empty | Role::Barrier => {
                self.cells[i].set_role(Role::Barrier);
                Ok(())
            }
        }
    }

    /// Flip a cell between empty and barrier. Returns whether it is now a
    /// barrier.
    pub fn toggle_barrier(&mut self, p: Pos) -> Result<bool, GridError> {
        let i = self.idx(p).ok_or(GridError::OutOfBounds(p))?;
        match self.cells[i].role() {
            r @ (Role::Start | Role::End) => Err(conflict(p, r, Role::Barrier)),
            Role::Barrier => {
                self.cells[i].set_role(Role::Empty);
                Ok(false)
            }
            Role::Empty => {
                self.cells[i].set_role(Role::Barrier);
                Ok(true)
            }
        }
    }

    /// Reset a single cell to empty. Clearing the start or end forgets it.
    pub fn clear_cell(&mut self, p: Pos) -> Result<(), GridError> {
        let i = self.idx(p).ok_or(GridError::OutOfBounds(p))?;
        self.cells[i].set_role(Role::Empty);
        self.cells[i].set_tag(SearchTag::Unvisited);
        if self.start == Some(p) {
            self.start = None;
        }
        if self.end == Some(p) {
            self.end = None;
        }
        Ok(())
    }

    /// Return every cell to its freshly built state. Start and end are
    /// forgotten and must be placed again.
    pub fn reset_all(&mut self) {
        for c in &mut self.cells {
            c.reset();
        }
        self.start = None;
        self.end = None;
    }

    /// Drop the marks left by a previous search, keeping all roles.
    pub fn clear_search(&mut self) {
        for c in &mut self.cells {
            c.set_tag(SearchTag::Unvisited);
        }
    }

    /// Turn each empty cell into a barrier with probability `density`.
    ///
    /// Start and end are never covered. Returns the number of new barriers.
    pub fn scatter_barriers<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) -> usize {
        let p = if density.is_finite() {
            density.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut placed = 0;
        for c in &mut self.cells {
            if c.role() == Role::Empty && rng.random_bool(p) {
                c.set_role(Role::Barrier);
                placed += 1;
            }
        }
        placed
    }

    // -----------------------------------------------------------------------
    // Index helpers
    // -----------------------------------------------------------------------

    /// Convert a `Pos` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Pos) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some(p.row as usize * self.size as usize + p.col as usize)
    }

    /// Convert a flat index back to a `Pos`.
    #[inline]
    pub(crate) fn pos_of(&self, idx: usize) -> Pos {
        let n = self.size as usize;
        Pos::new((idx / n) as i32, (idx % n) as i32)
    }

    #[inline]
    pub(crate) fn cell_at(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    #[inline]
    pub(crate) fn tag_at(&mut self, idx: usize, tag: SearchTag) {
        self.cells[idx].set_tag(tag);
    }
}

fn conflict(pos: Pos, found: Role, wanted: Role) -> GridError {
    GridError::RoleConflict { pos, found, wanted }
}

/// Renders the grid one row per line: `.` unvisited, `#` barrier, `S`
/// start, `E` end, `o` open, `x` closed, `*` path.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.cells.iter().enumerate() {
            if i > 0 && i % self.size as usize == 0 {
                writeln!(f)?;
            }
            let ch = match c.state() {
                CellState::Unvisited => '.',
                CellState::Barrier => '#',
                CellState::Start => 'S',
                CellState::End => 'E',
                CellState::Open => 'o',
                CellState::Closed => 'x',
                CellState::Path => '*',
            };
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn build_dimensions() {
        let g = Grid::build(50, 800);
        assert_eq!(g.size(), 50);
        assert_eq!(g.cell_width(), 16);
        assert_eq!(g.len(), 2500);
        assert_eq!(g.cell(Pos::new(3, 7)).map(Cell::pos), Some(Pos::new(3, 7)));
        assert!(g.cell(Pos::new(50, 0)).is_none());
        assert!(g.cells().all(|c| c.state() == CellState::Unvisited));
    }

    #[test]
    fn build_clamps_degenerate_input() {
        let g = Grid::build(0, 0);
        assert_eq!(g.size(), 1);
        assert_eq!(g.cell_width(), 1);
    }

    #[test]
    fn index_round_trip() {
        let g = Grid::build(7, 7);
        for i in 0..g.len() {
            assert_eq!(g.idx(g.pos_of(i)), Some(i));
        }
    }

    #[test]
    fn index_does_not_overflow_on_large_sides() {
        // Only the side length matters for indexing; no cells are needed.
        let g = Grid {
            size: 50_000,
            cell_width: 1,
            cells: Vec::new(),
            start: None,
            end: None,
        };
        let p = Pos::new(49_999, 49_999);
        assert_eq!(g.idx(p), Some(2_499_999_999));
        assert_eq!(g.pos_of(2_499_999_999), p);
    }

    #[test]
    fn neighbors_corner_and_edge() {
        let g = Grid::build(3, 3);
        assert_eq!(
            g.neighbors_of(Pos::new(0, 0)),
            vec![Pos::new(1, 0), Pos::new(0, 1)]
        );
        assert_eq!(g.neighbors_of(Pos::new(1, 1)).len(), 4);
        assert_eq!(g.neighbors_of(Pos::new(2, 1)).len(), 3);
        assert!(g.neighbors_of(Pos::new(-1, 0)).is_empty());
    }

    #[test]
    fn neighbors_skip_barriers_and_follow_edits() {
        let mut g = Grid::build(3, 3);
        g.set_barrier(Pos::new(1, 1)).unwrap();
        assert!(!g.neighbors_of(Pos::new(0, 1)).contains(&Pos::new(1, 1)));
        g.toggle_barrier(Pos::new(1, 1)).unwrap();
        assert!(g.neighbors_of(Pos::new(0, 1)).contains(&Pos::new(1, 1)));
    }

    #[test]
    fn update_neighbors_caches_current_layout() {
        let mut g = Grid::build(3, 3);
        g.update_neighbors();
        assert_eq!(g.cell(Pos::new(1, 1)).unwrap().neighbors().len(), 4);
        g.set_barrier(Pos::new(0, 1)).unwrap();
        // Stale until refreshed.
        assert_eq!(g.cell(Pos::new(1, 1)).unwrap().neighbors().len(), 4);
        g.update_neighbors();
        assert_eq!(g.cell(Pos::new(1, 1)).unwrap().neighbors().len(), 3);
    }

    #[test]
    fn single_start_and_end() {
        let mut g = Grid::build(4, 4);
        g.set_start(Pos::new(0, 0)).unwrap();
        g.set_start(Pos::new(1, 1)).unwrap();
        assert_eq!(g.start(), Some(Pos::new(1, 1)));
        assert_eq!(g.state(Pos::new(0, 0)), Some(CellState::Unvisited));
        g.set_end(Pos::new(3, 3)).unwrap();
        g.set_end(Pos::new(2, 3)).unwrap();
        let starts = g.cells().filter(|c| c.role() == Role::Start).count();
        let ends = g.cells().filter(|c| c.role() == Role::End).count();
        assert_eq!((starts, ends), (1, 1));
    }

    #[test]
    fn role_conflicts() {
        let mut g = Grid::build(3, 3);
        g.set_start(Pos::new(0, 0)).unwrap();
        g.set_end(Pos::new(2, 2)).unwrap();
        assert!(matches!(
            g.set_barrier(Pos::new(0, 0)),
            Err(GridError::RoleConflict { found: Role::Start, .. })
        ));
        assert!(g.toggle_barrier(Pos::new(2, 2)).is_err());
        assert!(g.set_end(Pos::new(0, 0)).is_err());
        assert!(g.set_start(Pos::new(2, 2)).is_err());
        assert_eq!(
            g.set_start(Pos::new(5, 5)),
            Err(GridError::OutOfBounds(Pos::new(5, 5)))
        );
    }

    #[test]
    fn start_replaces_barrier() {
        let mut g = Grid::build(3, 3);
        g.set_barrier(Pos::new(1, 0)).unwrap();
        g.set_start(Pos::new(1, 0)).unwrap();
        assert_eq!(g.state(Pos::new(1, 0)), Some(CellState::Start));
    }

    #[test]
    fn clear_cell_forgets_endpoints() {
        let mut g = Grid::build(3, 3);
        g.set_start(Pos::new(0, 0)).unwrap();
        g.set_end(Pos::new(0, 2)).unwrap();
        g.clear_cell(Pos::new(0, 0)).unwrap();
        assert_eq!(g.start(), None);
        assert_eq!(g.end(), Some(Pos::new(0, 2)));
        assert_eq!(g.state(Pos::new(0, 0)), Some(CellState::Unvisited));
    }

    #[test]
    fn reset_all_wipes_roles_and_tags() {
        let mut g = Grid::from_layout("S.#\n.#.\n..E").unwrap();
        g.tag_at(4, SearchTag::Expanded);
        g.reset_all();
        assert_eq!(g, Grid::build(3, 3));
    }

    #[test]
    fn clear_search_keeps_roles() {
        let mut g = Grid::from_layout("S#\n.E").unwrap();
        g.tag_at(2, SearchTag::Path);
        g.clear_search();
        assert_eq!(g.to_string(), "S#\n.E");
    }

    #[test]
    fn scatter_respects_endpoints() {
        let mut g = Grid::build(10, 10);
        g.set_start(Pos::new(0, 0)).unwrap();
        g.set_end(Pos::new(9, 9)).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let placed = g.scatter_barriers(&mut rng, 1.0);
        assert_eq!(placed, 98);
        assert_eq!(g.start(), Some(Pos::new(0, 0)));
        assert_eq!(g.state(Pos::new(9, 9)), Some(CellState::End));
        assert_eq!(g.scatter_barriers(&mut rng, f64::NAN), 0);
    }

    #[test]
    fn layout_parsing() {
        let g = Grid::from_layout(
            "
            S.#
            .#.
            ..E
            ",
        )
        .unwrap();
        assert_eq!(g.size(), 3);
        assert_eq!(g.start(), Some(Pos::new(0, 0)));
        assert_eq!(g.end(), Some(Pos::new(2, 2)));
        assert_eq!(g.state(Pos::new(0, 2)), Some(CellState::Barrier));
        assert_eq!(g.to_string(), "S.#\n.#.\n..E");
    }

    #[test]
    fn layout_errors() {
        assert!(matches!(
            Grid::from_layout("..\n..."),
            Err(GridError::InconsistentSize(_))
        ));
        assert_eq!(
            Grid::from_layout("..\n.x"),
            Err(GridError::InvalidChar {
                ch: 'x',
                pos: Pos::new(1, 1)
            })
        );
        assert_eq!(
            Grid::from_layout("S.\n.S"),
            Err(GridError::DuplicateRole {
                role: Role::Start,
                pos: Pos::new(1, 1)
            })
        );
    }
}
