//! The [`Cell`] type and its two orthogonal state fields.
//!
//! A cell carries a [`Role`], placed by the user through the
//! [`Grid`](crate::Grid), and a [`SearchTag`], written only by the search
//! engine. Presentation is derived from both by whoever paints the grid.

use crate::pos::Pos;

/// What the user placed on a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    #[default]
    Empty,
    Barrier,
    Start,
    End,
}

/// Engine-side bookkeeping for a cell during the last search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchTag {
    #[default]
    Unvisited,
    /// Currently waiting in the frontier.
    Frontier,
    /// Popped and expanded at least once.
    Expanded,
    /// Part of the reconstructed route.
    Path,
}

/// Combined traversal state of a cell.
///
/// A placed role (barrier, start, end) wins over the search tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    Unvisited,
    Open,
    Closed,
    Barrier,
    Start,
    End,
    Path,
}

/// A single addressable grid square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pos: Pos,
    role: Role,
    tag: SearchTag,
    neighbors: Vec<Pos>,
}

impl Cell {
    pub(crate) fn new(pos: Pos) -> Self {
        Self {
            pos,
            role: Role::Empty,
            tag: SearchTag::Unvisited,
            neighbors: Vec::new(),
        }
    }

    /// Position of the cell in its grid.
    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn tag(&self) -> SearchTag {
        self.tag
    }

    #[inline]
    pub fn is_barrier(&self) -> bool {
        self.role == Role::Barrier
    }

    /// Adjacency as of the last [`Grid::update_neighbors`](crate::Grid::update_neighbors).
    #[inline]
    pub fn neighbors(&self) -> &[Pos] {
        &self.neighbors
    }

    pub fn state(&self) -> CellState {
        match self.role {
            Role::Barrier => CellState::Barrier,
            Role::Start => CellState::Start,
            Role::End => CellState::End,
            Role::Empty => match self.tag {
                SearchTag::Unvisited => CellState::Unvisited,
                SearchTag::Frontier => CellState::Open,
                SearchTag::Expanded => CellState::Closed,
                SearchTag::Path => CellState::Path,
            },
        }
    }

    #[inline]
    pub(crate) fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    #[inline]
    pub(crate) fn set_tag(&mut self, tag: SearchTag) {
        self.tag = tag;
    }

    #[inline]
    pub(crate) fn set_neighbors(&mut self, neighbors: Vec<Pos>) {
        self.neighbors = neighbors;
    }

    /// Back to a freshly built cell.
    pub(crate) fn reset(&mut self) {
        self.role = Role::Empty;
        self.tag = SearchTag::Unvisited;
        self.neighbors.clear();
    }
}
