//! The input adapter: user gestures to grid commands.

use pathviz_search::{Grid, GridError, Pos};

use crate::messages::{Key, ModMask, Msg, MouseAction};
use crate::painter::Painter;

/// Something the user asked for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Main button on a cell: start, then end, then barriers.
    Place(Pos),
    /// Secondary button on a cell: back to empty.
    Erase(Pos),
    Run,
    /// Wipe the previous search's marks and run again.
    Rerun,
    /// Rebuild an empty grid.
    Clear,
    /// Sprinkle random barriers.
    Scatter,
    /// Stop a running search.
    Cancel,
    Quit,
}

/// Translate a message into a command, mapping pointer positions through
/// `painter`. Returns `None` for input with no meaning here.
pub fn translate(msg: &Msg, painter: &Painter) -> Option<Command> {
    if msg.is_quit() {
        return Some(Command::Quit);
    }
    match msg {
        Msg::KeyDown { key, modifiers, .. } => {
            if modifiers.contains(ModMask::CTRL) {
                return None;
            }
            match key {
                Key::Space | Key::Enter => Some(Command::Run),
                Key::Escape => Some(Command::Cancel),
                Key::Char('r') => Some(Command::Rerun),
                Key::Char('c') => Some(Command::Clear),
                Key::Char('g') => Some(Command::Scatter),
                _ => None,
            }
        }
        Msg::Mouse { action, pos, .. } => {
            let cell = painter.cell_at(*pos)?;
            match action {
                MouseAction::Main => Some(Command::Place(cell)),
                MouseAction::Secondary => Some(Command::Erase(cell)),
                MouseAction::Release | MouseAction::Move => None,
            }
        }
        _ => None,
    }
}

/// What a placement did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placed {
    Start,
    End,
    Barrier,
    /// The click landed on the start or end and changed nothing.
    Unchanged,
}

/// Place on `p`: the start if none is placed yet, else the end if none is
/// placed yet, else a barrier. The start and end cells are never
/// overwritten.
pub fn place(grid: &mut Grid, p: Pos) -> Result<Placed, GridError> {
    let (start, end) = (grid.start(), grid.end());
    if start.is_none() && end != Some(p) {
        grid.set_start(p)?;
        Ok(Placed::Start)
    } else if end.is_none() && start != Some(p) {
        grid.set_end(p)?;
        Ok(Placed::End)
    } else if start != Some(p) && end != Some(p) {
        grid.set_barrier(p)?;
        Ok(Placed::Barrier)
    } else {
        Ok(Placed::Unchanged)
    }
}

/// Reset the cell at `p`, forgetting the start or end if it was one.
pub fn erase(grid: &mut Grid, p: Pos) -> Result<(), GridError> {
    grid.clear_cell(p)
}
