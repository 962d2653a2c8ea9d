//! # Introduction
//!
//! selgrid loads a program laid out on a fixed two-dimensional grid and runs
//! it with a single cursor that walks the grid by a run-vector. Data is
//! addressed by rectangular selections kept on a LIFO stack; operations such
//! as `print` and `add` consume them, and `add` broadcasts over lines and
//! rectangles. An optional snapshot history can then be navigated forward
//! and backward through a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Loader → Grid → Interpreter → Snapshots → TUI
//! ```
//!
//! 1. [`loader`] parses `x y token` records into a [`grid::Grid`].
//! 2. [`grid`] is the cell store: nil, character, number or operation cells.
//! 3. [`selection`] holds selections, the selection stack, shapes and the
//!    [`selection::broadcast::replicate`] broadcaster.
//! 4. [`interpreter`] steps the cursor, executes operations and optionally
//!    captures a [`snapshot::Snapshot`] before each step.
//! 5. [`snapshot`] is the bounded snapshot history plus a
//!    [`snapshot::MockTerminal`] that records `print` output.
//! 6. [`ui`] is the ratatui-based TUI; not part of the stable library API.
//!
//! ## Operations
//!
//! Motion: `up`, `down`, `left`, `right`, `run`, `goto`.
//! Data: `select`, `print`, `add`. Control: `halt`.

pub mod grid;
pub mod interpreter;
pub mod loader;
pub mod selection;
pub mod snapshot;
pub mod ui;
