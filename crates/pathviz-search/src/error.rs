//! Error types for grid editing and search preconditions.

use std::fmt;

use crate::cell::Role;
use crate::pos::Pos;

/// Errors raised while editing or parsing a [`Grid`](crate::Grid).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The position lies outside the grid.
    OutOfBounds(Pos),
    /// The edit would break the placement invariants (for example a barrier
    /// over the start cell).
    RoleConflict { pos: Pos, found: Role, wanted: Role },
    /// Layout lines are not all `n` characters long, or there are not `n` lines.
    InconsistentSize(String),
    /// A character outside `.#SE` was found in a layout.
    InvalidChar { ch: char, pos: Pos },
    /// A layout places a second start or end.
    DuplicateRole { role: Role, pos: Pos },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(p) => write!(f, "position {p} is outside the grid"),
            Self::RoleConflict { pos, found, wanted } => {
                write!(f, "cannot place {wanted:?} at {pos}: cell holds {found:?}")
            }
            Self::InconsistentSize(s) => write!(f, "layout is not square:\n{s}"),
            Self::InvalidChar { ch, pos } => {
                write!(f, "layout contains invalid character \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::DuplicateRole { role, pos } => write!(f, "layout has a second {role:?} at {pos}"),
        }
    }
}

impl std::error::Error for GridError {}

/// Precondition violations rejected before a search starts.
///
/// Failing to find a path is not an error; see
/// [`Outcome::PathNotFound`](crate::Outcome::PathNotFound).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    MissingStart,
    MissingEnd,
    OutOfBounds(Pos),
    SameEndpoints(Pos),
    BarrierEndpoint(Pos),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => f.write_str("no start cell placed"),
            Self::MissingEnd => f.write_str("no end cell placed"),
            Self::OutOfBounds(p) => write!(f, "endpoint {p} is outside the grid"),
            Self::SameEndpoints(p) => write!(f, "start and end are both {p}"),
            Self::BarrierEndpoint(p) => write!(f, "endpoint {p} is a barrier"),
        }
    }
}

impl std::error::Error for SearchError {}
