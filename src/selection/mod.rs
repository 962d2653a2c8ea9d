//! Rectangular selections and the selection stack
//!
//! This module provides the region machinery used by every data-consuming
//! operation:
//! - [`Selection`]: A normalized rectangle given by two inclusive corners
//! - [`SelectionStack`]: LIFO stack of selections plus the one open selection
//! - [`shape`]: Rank/extent queries and slicing
//! - [`broadcast`]: Rank-polymorphic application of elementwise kernels
//!
//! # Normalization
//!
//! A selection is opened at `cursor + run` and closed at `cursor - run`, so the
//! raw endpoints can come in any order. [`Selection::new`] orders each axis
//! independently, so every consumer can rely on `beg <= end` componentwise.
//!
//! ```text
//! . . E        B . .
//! . . .   →    . . .
//! B . .        . . E
//! ```

pub mod broadcast;
pub mod shape;

pub use shape::Shape;

use crate::grid::Vec2;
use std::fmt;

/// A rectangular region with `beg.x <= end.x` and `beg.y <= end.y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    beg: Vec2,
    end: Vec2,
}

impl Selection {
    /// Build a selection from two raw corners, normalizing each axis
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Selection {
            beg: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            end: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// A single-cell selection
    pub fn point(p: Vec2) -> Self {
        Selection { beg: p, end: p }
    }

    pub fn beg(&self) -> Vec2 {
        self.beg
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }

    pub fn width(&self) -> i64 {
        self.end.x.saturating_sub(self.beg.x).saturating_add(1)
    }

    pub fn height(&self) -> i64 {
        self.end.y.saturating_sub(self.beg.y).saturating_add(1)
    }

    /// Whether the selection lies within a single row
    pub fn is_horizontal(&self) -> bool {
        self.beg.y == self.end.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (self.beg.x..=self.end.x).contains(&p.x) && (self.beg.y..=self.end.y).contains(&p.y)
    }

    /// All covered positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Vec2> {
        let Selection { beg, end } = *self;
        (beg.y..=end.y).flat_map(move |y| (beg.x..=end.x).map(move |x| Vec2::new(x, y)))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.beg, self.end)
    }
}

/// Selection stack misuse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// `begin` while a selection is already open
    AlreadySelecting { open_at: Vec2 },
    /// `end` without a matching `begin`
    NotSelecting,
    /// `pop` or `peek` on an empty stack
    Empty,
    /// A corner `position + offset` (or `- offset`) is not representable
    CoordinateOverflow { position: Vec2, offset: Vec2 },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::AlreadySelecting { open_at } => {
                write!(f, "A selection is already open at {}", open_at)
            }
            SelectionError::NotSelecting => write!(f, "No selection is open"),
            SelectionError::Empty => write!(f, "Selection stack is empty"),
            SelectionError::CoordinateOverflow { position, offset } => write!(
                f,
                "Selection corner {} offset by {} overflows",
                position, offset
            ),
        }
    }
}

impl std::error::Error for SelectionError {}

/// LIFO stack of normalized selections plus the in-progress one
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionStack {
    selections: Vec<Selection>,
    open: Option<Vec2>,
}

impl SelectionStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selecting(&self) -> bool {
        self.open.is_some()
    }

    /// Start point of the open selection, if any
    pub fn open_start(&self) -> Option<Vec2> {
        self.open
    }

    /// Open a selection at `cursor + run`
    pub fn begin(&mut self, cursor: Vec2, run: Vec2) -> Result<(), SelectionError> {
        if let Some(open_at) = self.open {
            return Err(SelectionError::AlreadySelecting { open_at });
        }
        let start = cursor
            .checked_add(run)
            .ok_or(SelectionError::CoordinateOverflow {
                position: cursor,
                offset: run,
            })?;
        self.open = Some(start);
        Ok(())
    }

    /// Close the open selection at `cursor - run`, normalize it and push it
    pub fn end(&mut self, cursor: Vec2, run: Vec2) -> Result<Selection, SelectionError> {
        let beg = self.open.ok_or(SelectionError::NotSelecting)?;
        let end = cursor
            .checked_sub(run)
            .ok_or(SelectionError::CoordinateOverflow {
                position: cursor,
                offset: run,
            })?;
        self.open = None;
        let selection = Selection::new(beg, end);
        self.selections.push(selection);
        Ok(selection)
    }

    pub fn push(&mut self, selection: Selection) {
        self.selections.push(selection);
    }

    pub fn pop(&mut self) -> Result<Selection, SelectionError> {
        self.selections.pop().ok_or(SelectionError::Empty)
    }

    pub fn peek(&self) -> Result<&Selection, SelectionError> {
        self.selections.last().ok_or(SelectionError::Empty)
    }

    pub fn depth(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Selections from top of stack to bottom
    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.selections.iter().rev()
    }
}
