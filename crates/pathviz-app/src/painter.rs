//! Turning a [`Grid`] into glyphs, and screen positions back into cells.
//!
//! The painter is the only place that knows about colours. It derives a
//! [`Shade`] from each cell's role and search tag at paint time; the search
//! engine never sees presentation state.

use pathviz_search::{Cell, CellState, Grid, Pos};

use crate::canvas::{Canvas, Glyph};
use crate::style::{Color, Style};

pub const HELP: &str =
    "LMB place  RMB erase  space run  r rerun  c clear  g scatter  esc stop  q quit";

/// How a cell is presented.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shade {
    Empty,
    Barrier,
    Start,
    End,
    Open,
    Closed,
    Path,
}

impl Shade {
    pub fn of(cell: &Cell) -> Self {
        match cell.state() {
            CellState::Unvisited => Self::Empty,
            CellState::Barrier => Self::Barrier,
            CellState::Start => Self::Start,
            CellState::End => Self::End,
            CellState::Open => Self::Open,
            CellState::Closed => Self::Closed,
            CellState::Path => Self::Path,
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Self::Empty => Color::WHITE,
            Self::Barrier => Color::BLACK,
            Self::Start => Color::ORANGE,
            Self::End => Color::TURQUOISE,
            Self::Open => Color::GREEN,
            Self::Closed => Color::RED,
            Self::Path => Color::PURPLE,
        }
    }
}

/// Screen layout for an `n × n` grid: one terminal row per grid row,
/// `cell_width` columns per grid column, then a status line and a help line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Painter {
    size: i32,
    cell_width: i32,
}

impl Painter {
    pub fn for_grid(grid: &Grid) -> Self {
        Self {
            size: grid.size(),
            cell_width: grid.cell_width(),
        }
    }

    /// Canvas size needed for the grid plus the two text lines.
    pub fn screen_size(&self) -> (i32, i32) {
        let w = (self.size * self.cell_width).max(HELP.chars().count() as i32);
        (w, self.size + 2)
    }

    #[inline]
    pub fn status_row(&self) -> i32 {
        self.size
    }

    /// The grid cell under screen position `p`, if any.
    pub fn cell_at(&self, p: Pos) -> Option<Pos> {
        if p.row < 0 || p.col < 0 {
            return None;
        }
        let cell = Pos::new(p.row, p.col / self.cell_width);
        (cell.row < self.size && cell.col < self.size).then_some(cell)
    }

    /// Paint every grid cell.
    pub fn paint_grid(&self, grid: &Grid, canvas: &mut Canvas) {
        for cell in grid.cells() {
            let glyph = Glyph::new(' ', Style::default().with_bg(Shade::of(cell).color()));
            let p = cell.pos();
            for dx in 0..self.cell_width {
                canvas.set(Pos::new(p.row, p.col * self.cell_width + dx), glyph);
            }
        }
    }

    /// Paint the status line and the help line below the grid.
    pub fn paint_text(&self, canvas: &mut Canvas, status: &str) {
        let blank = Glyph::default();
        for row in [self.status_row(), self.status_row() + 1] {
            for col in 0..canvas.width() {
                canvas.set(Pos::new(row, col), blank);
            }
        }
        let bold = Style::default().with_bold(true);
        canvas.print(Pos::new(self.status_row(), 0), status, bold);
        let dim = Style::default().with_fg(Color::GREY);
        canvas.print(Pos::new(self.status_row() + 1, 0), HELP, dim);
    }

    /// Paint the whole screen.
    pub fn paint(&self, grid: &Grid, canvas: &mut Canvas, status: &str) {
        self.paint_grid(grid, canvas);
        self.paint_text(canvas, status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_and_click_mapping() {
        let grid = Grid::build(10, 30);
        let painter = Painter::for_grid(&grid);
        assert_eq!(painter.screen_size(), (HELP.chars().count() as i32, 12));
        assert_eq!(painter.cell_at(Pos::new(0, 0)), Some(Pos::new(0, 0)));
        assert_eq!(painter.cell_at(Pos::new(4, 5)), Some(Pos::new(4, 1)));
        assert_eq!(painter.cell_at(Pos::new(9, 29)), Some(Pos::new(9, 9)));
        assert_eq!(painter.cell_at(Pos::new(9, 30)), None);
        assert_eq!(painter.cell_at(Pos::new(10, 0)), None);
        assert_eq!(painter.cell_at(Pos::new(-1, 0)), None);
    }

    #[test]
    fn colours_follow_cell_state() {
        let mut grid = Grid::from_layout("S#\n.E").unwrap();
        let painter = Painter::for_grid(&grid);
        let (w, h) = painter.screen_size();
        let mut canvas = Canvas::new(w, h);
        painter.paint(&grid, &mut canvas, "ready");
        assert_eq!(canvas.at(Pos::new(0, 0)).style.bg, Color::ORANGE);
        assert_eq!(canvas.at(Pos::new(0, 1)).style.bg, Color::BLACK);
        assert_eq!(canvas.at(Pos::new(1, 0)).style.bg, Color::WHITE);
        assert_eq!(canvas.at(Pos::new(1, 1)).style.bg, Color::TURQUOISE);
        assert_eq!(canvas.at(Pos::new(2, 0)).ch, 'r');

        pathviz_search::search_placed(&mut grid, &mut pathviz_search::Quiet).unwrap();
        painter.paint_grid(&grid, &mut canvas);
        assert_eq!(canvas.at(Pos::new(1, 0)).style.bg, Color::PURPLE);
    }

    #[test]
    fn wide_cells_fill_their_span() {
        let mut grid = Grid::build(2, 8);
        grid.set_barrier(Pos::new(0, 1)).unwrap();
        let painter = Painter::for_grid(&grid);
        let mut canvas = Canvas::new(80, 4);
        painter.paint_grid(&grid, &mut canvas);
        for col in 4..8 {
            assert_eq!(canvas.at(Pos::new(0, col)).style.bg, Color::BLACK);
        }
        assert_eq!(canvas.at(Pos::new(0, 3)).style.bg, Color::WHITE);
    }

    #[test]
    fn status_line_is_rewritten() {
        let grid = Grid::build(2, 2);
        let painter = Painter::for_grid(&grid);
        let (w, h) = painter.screen_size();
        let mut canvas = Canvas::new(w, h);
        painter.paint_text(&mut canvas, "a long message");
        painter.paint_text(&mut canvas, "ok");
        assert_eq!(canvas.at(Pos::new(2, 2)).ch, ' ');
        assert!(canvas.at(Pos::new(2, 0)).style.bold);
    }
}
