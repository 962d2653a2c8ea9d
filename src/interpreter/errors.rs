//! Runtime error types for the grid interpreter
//!
//! This module defines two tiers of execution-time problems:
//! - [`RuntimeError`]: fatal faults. They stop the step loop; the machine is
//!   left as it was when the fault was detected.
//! - [`Diagnostic`]: reported, non-fatal conditions. The offending operation
//!   becomes a no-op (or, for `print`, emits an error line) and execution
//!   continues.
//!
//! Load-time problems are a separate tier, see [`crate::loader::LoadError`].

use crate::grid::{Cell, GridError, Operation, Vec2};
use crate::selection::broadcast::BroadcastError;
use crate::selection::{SelectionError, Shape};
use std::fmt;

/// Fatal execution faults
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// A runtime-computed position (selection cell) lies outside the grid
    OutOfBounds {
        position: Vec2,
        width: usize,
        height: usize,
    },

    /// The cursor left the grid
    CursorOutOfBounds { cursor: Vec2, step: u64 },

    /// `position` moved by `offset` does not fit in a coordinate
    CoordinateOverflow { position: Vec2, offset: Vec2 },

    /// `print`, `goto`, `run` or `add` with no selection to consume
    EmptySelectionStack { op: Operation, cursor: Vec2 },

    /// A selection was opened while another one was open
    SelectionAlreadyOpen { open_at: Vec2, cursor: Vec2 },

    /// A selection was closed with none open
    SelectionNotOpen { cursor: Vec2 },

    /// Broadcast argument whose rank cannot be reconciled
    RankMismatch {
        op: Operation,
        argument: usize,
        rank: usize,
        expected: usize,
    },

    /// Broadcast arguments of different lengths along the batch axis
    ExtentMismatch {
        op: Operation,
        argument: usize,
        extent: i64,
        expected: i64,
    },

    /// Kernel invoked with the wrong number of arguments
    ArityMismatch { op: Operation, args: usize, expected: usize },

    /// Arithmetic operand is not a number cell
    NotANumber { op: Operation, position: Vec2, found: Cell },

    /// Integer overflow in arithmetic
    IntegerOverflow { op: Operation, position: Vec2 },

    /// Zero run-vector on a non-operation cell: no further state change is possible
    Stalled { cursor: Vec2, step: u64 },

    /// Configured step limit reached
    StepLimitExceeded { limit: u64 },

    /// Snapshot history limit exceeded
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// History navigation failed
    HistoryOperationFailed { message: String },

    /// Writing program output failed
    OutputFailed { message: String },
}

impl RuntimeError {
    /// Grid position the fault refers to, if any
    pub fn position(&self) -> Option<Vec2> {
        match self {
            RuntimeError::OutOfBounds { position, .. } => Some(*position),
            RuntimeError::CursorOutOfBounds { cursor, .. } => Some(*cursor),
            RuntimeError::CoordinateOverflow { position, .. } => Some(*position),
            RuntimeError::EmptySelectionStack { cursor, .. } => Some(*cursor),
            RuntimeError::SelectionAlreadyOpen { cursor, .. } => Some(*cursor),
            RuntimeError::SelectionNotOpen { cursor } => Some(*cursor),
            RuntimeError::NotANumber { position, .. } => Some(*position),
            RuntimeError::IntegerOverflow { position, .. } => Some(*position),
            RuntimeError::Stalled { cursor, .. } => Some(*cursor),
            RuntimeError::RankMismatch { .. } => None,
            RuntimeError::ExtentMismatch { .. } => None,
            RuntimeError::ArityMismatch { .. } => None,
            RuntimeError::StepLimitExceeded { .. } => None,
            RuntimeError::SnapshotLimitExceeded { .. } => None,
            RuntimeError::HistoryOperationFailed { .. } => None,
            RuntimeError::OutputFailed { .. } => None,
        }
    }

    /// Wrap a selection-stack failure with the context of the running operation
    pub(crate) fn from_selection(err: SelectionError, op: Operation, cursor: Vec2) -> Self {
        match err {
            SelectionError::Empty => RuntimeError::EmptySelectionStack { op, cursor },
            SelectionError::AlreadySelecting { open_at } => {
                RuntimeError::SelectionAlreadyOpen { open_at, cursor }
            }
            SelectionError::NotSelecting => RuntimeError::SelectionNotOpen { cursor },
            SelectionError::CoordinateOverflow { position, offset } => {
                RuntimeError::CoordinateOverflow { position, offset }
            }
        }
    }

    /// Wrap a broadcast failure with the operation that requested it
    pub(crate) fn from_broadcast(err: BroadcastError, op: Operation) -> Self {
        match err {
            BroadcastError::ArityMismatch { args, ranks } => RuntimeError::ArityMismatch {
                op,
                args,
                expected: ranks,
            },
            BroadcastError::RankMismatch {
                index,
                rank,
                expected,
            } => RuntimeError::RankMismatch {
                op,
                argument: index,
                rank,
                expected,
            },
            BroadcastError::ExtentMismatch {
                index,
                extent,
                expected,
            } => RuntimeError::ExtentMismatch {
                op,
                argument: index,
                extent,
                expected,
            },
        }
    }
}

impl From<GridError> for RuntimeError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::OutOfBounds {
                position,
                width,
                height,
            } => RuntimeError::OutOfBounds {
                position,
                width,
                height,
            },
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::OutOfBounds {
                position,
                width,
                height,
            } => {
                write!(
                    f,
                    "Access to {} outside the {}x{} grid",
                    position, height, width
                )
            }
            RuntimeError::CursorOutOfBounds { cursor, step } => {
                write!(f, "Cursor left the grid at {} (step {})", cursor, step)
            }
            RuntimeError::CoordinateOverflow { position, offset } => {
                write!(
                    f,
                    "Moving {} by {} leaves the coordinate range",
                    position, offset
                )
            }
            RuntimeError::EmptySelectionStack { op, cursor } => {
                write!(
                    f,
                    "Operation <{}> at {} found no selection on the stack",
                    op, cursor
                )
            }
            RuntimeError::SelectionAlreadyOpen { open_at, cursor } => {
                write!(
                    f,
                    "Selection opened at {} while one is already open at {}",
                    cursor, open_at
                )
            }
            RuntimeError::SelectionNotOpen { cursor } => {
                write!(f, "Selection closed at {} but none is open", cursor)
            }
            RuntimeError::RankMismatch {
                op,
                argument,
                rank,
                expected,
            } => {
                write!(
                    f,
                    "Operation <{}>: argument {} has rank {} and cannot be broadcast to rank {}",
                    op, argument, rank, expected
                )
            }
            RuntimeError::ExtentMismatch {
                op,
                argument,
                extent,
                expected,
            } => {
                write!(
                    f,
                    "Operation <{}>: argument {} has length {}, expected {}",
                    op, argument, extent, expected
                )
            }
            RuntimeError::ArityMismatch { op, args, expected } => {
                write!(
                    f,
                    "Operation <{}> expects {} argument{}, got {}",
                    op,
                    expected,
                    if *expected == 1 { "" } else { "s" },
                    args
                )
            }
            RuntimeError::NotANumber {
                op,
                position,
                found,
            } => {
                write!(
                    f,
                    "Operation <{}>: cell {} holds {} ({}), expected a number",
                    op,
                    position,
                    found,
                    found.kind()
                )
            }
            RuntimeError::IntegerOverflow { op, position } => {
                write!(
                    f,
                    "Integer overflow in <{}> writing to {}",
                    op, position
                )
            }
            RuntimeError::Stalled { cursor, step } => {
                write!(
                    f,
                    "Execution stalled at {} with a zero run-vector (step {})",
                    cursor, step
                )
            }
            RuntimeError::StepLimitExceeded { limit } => {
                write!(f, "Step limit of {} exceeded", limit)
            }
            RuntimeError::SnapshotLimitExceeded { current, limit } => {
                write!(
                    f,
                    "Snapshot memory limit exceeded: {} bytes used, limit is {}",
                    current, limit
                )
            }
            RuntimeError::HistoryOperationFailed { message } => {
                write!(f, "History operation failed: {}", message)
            }
            RuntimeError::OutputFailed { message } => {
                write!(f, "Failed to write output: {}", message)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// What went wrong in a non-fatal diagnostic
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// `goto`/`run` on a selection that is not a length-2 line
    BadVectorShape { shape: Shape },
    /// `goto`/`run` component that is not a number cell
    NonNumericComponent { position: Vec2, found: Cell },
    /// `print` over an operation cell
    UnprintableOperation { position: Vec2, found: Operation },
}

/// A reported, non-fatal execution problem
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub step: u64,
    pub cursor: Vec2,
    pub op: Operation,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.op.to_string().to_uppercase();
        match &self.kind {
            DiagnosticKind::BadVectorShape { shape } => write!(
                f,
                "ERR {}: Current selection is not a 1 dimensional vector of length 2 (got {})",
                tag, shape
            ),
            DiagnosticKind::NonNumericComponent { position, found } => write!(
                f,
                "ERR {}: Cell {} holds {} ({}), expected a number",
                tag,
                position,
                found,
                found.kind()
            ),
            DiagnosticKind::UnprintableOperation { found, .. } => {
                write!(f, "ERR {}: Operation <{}> cannot be printed", tag, found)
            }
        }
    }
}
